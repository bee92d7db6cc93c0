use alloy::providers::Provider as _;
use init4_bin_base::{
    deps::tracing::{info, info_span},
    utils::from_env::FromEnv,
};
use tokio::select;
use tokio_util::sync::CancellationToken;
use wells_oracle::{
    cache::ResultCache,
    config::OracleConfig,
    service::{ReadState, serve_oracle},
    tasks::poller::PollerTask,
};

// Note: Must be set to `multi_thread` to support async tasks.
// See: https://docs.rs/tokio/latest/tokio/attr.main.html
#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    let _guard = init4_bin_base::init4();
    let init_span_guard = info_span!("oracle initialization");

    // Pull the configuration from the environment
    let config = OracleConfig::from_env()?;

    // Connect the provider and confirm the node is reachable. Connection and
    // credential failures here are fatal.
    let provider = config.connect_provider()?;
    let chain_id = provider.get_chain_id().await?;
    info!(chain_id, contract = %config.oracle_contract_address, "connected to chain");

    let oracle = config.connect_oracle(provider);
    let cache = ResultCache::new();

    // Spawn the polling task
    let cancel = CancellationToken::new();
    let poller = PollerTask::new(&config, oracle, cache.clone());
    let poller_jh = poller.spawn(cancel.clone());

    // Start the read-side server over the same cache
    let state = ReadState::new(cache, config.well_name_map());
    let server = serve_oracle(([0, 0, 0, 0], config.oracle_port), state);

    // We have finished initializing the oracle, so we can drop the init span
    // guard.
    drop(init_span_guard);

    select! {
        _ = poller_jh => {
            info!("poller task finished");
        },
        _ = server => {
            info!("read server finished");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received");
        },
    }

    cancel.cancel();
    info!("shutting down");

    Ok(())
}
