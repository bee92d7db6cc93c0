//! Periodic polling task driving the oracle request lifecycle.

use crate::{cache::ResultCache, config::OracleConfig, contracts::OracleApi};
use eyre::{WrapErr, bail};
use init4_bin_base::deps::metrics::{counter, histogram};
use std::time::{Duration, Instant};
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Drives the request lifecycle for every configured well on a fixed
/// interval.
///
/// Each pass walks the well list strictly in order, one id at a time:
/// submit a request transaction, wait for it to mine, and on success read
/// the contract's last-response slot into the [`ResultCache`]. The contract
/// keeps only that single shared slot, so two in-flight requests could read
/// each other's results; the sequential pass is what keeps the read
/// unambiguous.
///
/// Failures at any step are logged and the well is skipped until the next
/// pass. There is no backoff and no attempt ceiling: every pass re-submits
/// every id unconditionally, which is also the only retry mechanism.
#[derive(Debug)]
pub struct PollerTask<C> {
    oracle: C,
    cache: ResultCache,
    subscription_id: u64,
    well_ids: Vec<String>,
    poll_interval: Duration,
}

impl<C: OracleApi + Send + Sync + 'static> PollerTask<C> {
    /// Creates a new poller over the configured well set.
    pub fn new(config: &OracleConfig, oracle: C, cache: ResultCache) -> Self {
        Self {
            oracle,
            cache,
            subscription_id: config.subscription_id,
            well_ids: config.well_id_list(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Spawns the polling loop onto the runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Runs one pass immediately, then one per interval tick until `cancel`
    /// fires. Ticks that elapse while a pass is still running are dropped,
    /// not queued. Cancellation is observed between passes and between
    /// wells, never mid-wait.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            wells = self.well_ids.len(),
            interval_secs = self.poll_interval.as_secs(),
            "starting oracle polling"
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("poller task shutting down");
                    return;
                }
                _ = ticker.tick() => self.process_pass(&cancel).await,
            }
        }
    }

    /// Processes every configured well once, in list order.
    pub async fn process_pass(&self, cancel: &CancellationToken) {
        debug!(wells = self.well_ids.len(), "starting poll pass");
        for id in &self.well_ids {
            if cancel.is_cancelled() {
                debug!("cancellation observed mid-pass");
                return;
            }
            if let Err(err) = self.process_one(id).await {
                counter!("oracle.wells_skipped").increment(1);
                error!(%err, well_id = %id, "skipping well for this pass");
            }
        }
    }

    /// Runs the full request lifecycle for a single well. The cache entry
    /// is written only if every step succeeds; on any error the previous
    /// value is left in place.
    #[instrument(skip(self), fields(well_id = %id))]
    pub async fn process_one(&self, id: &str) -> eyre::Result<()> {
        let tx_hash = self
            .oracle
            .submit_request(self.subscription_id, vec![id.to_string()])
            .await
            .wrap_err("failed to submit request transaction")?;
        counter!("oracle.requests_submitted").increment(1);
        info!(%tx_hash, "request transaction sent");

        let dispatched = Instant::now();
        let receipt = self
            .oracle
            .wait_for_inclusion(tx_hash)
            .await
            .wrap_err("failed waiting for request inclusion")?;
        histogram!("oracle.request_mine_time").record(dispatched.elapsed().as_millis() as f64);

        if !receipt.success {
            counter!("oracle.requests_reverted").increment(1);
            self.log_contract_error().await;
            bail!("request transaction reverted");
        }

        let response =
            self.oracle.last_response().await.wrap_err("failed to read oracle response")?;
        let value = String::from_utf8_lossy(&response).into_owned();
        self.cache.set(id, value).await;
        counter!("oracle.valuations_stored").increment(1);
        info!(bytes = response.len(), "stored valuation");

        Ok(())
    }

    /// Best-effort read of the contract's last error slot for diagnostics.
    async fn log_contract_error(&self) {
        match self.oracle.last_error().await {
            Ok(raw) if !raw.is_empty() => {
                warn!(error = %String::from_utf8_lossy(&raw), "oracle reported an error")
            }
            Ok(_) => {}
            Err(err) => debug!(%err, "could not read oracle error slot"),
        }
    }
}
