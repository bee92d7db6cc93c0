//! Test utilities for exercising oracle tasks.
use crate::{
    config::OracleConfig,
    contracts::{InclusionReceipt, OracleApi},
};
use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use eyre::eyre;
use init4_bin_base::deps::tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry, util::SubscriberInitExt,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Sets up an oracle config with test values
pub fn setup_test_config() -> OracleConfig {
    OracleConfig {
        rpc_url: "http://localhost:8545".parse().unwrap(),
        oracle_key: "0000000000000000000000000000000000000000000000000000000000000001".into(),
        oracle_contract_address: Address::default(),
        subscription_id: 5832,
        well_ids: "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11".into(),
        well_names: None,
        poll_interval_secs: 1800,
        oracle_port: 8080,
    }
}

/// Initializes a logger that prints during testing
pub fn setup_logging() {
    // Initialize logging
    let filter = EnvFilter::from_default_env();
    let fmt = fmt::layer().with_filter(filter);
    let registry = registry().with(fmt);
    let _ = registry.try_init();
}

#[derive(Debug, Default)]
struct MockOracleState {
    submit_outcomes: VecDeque<Result<(), String>>,
    wait_outcomes: VecDeque<Result<bool, String>>,
    response_outcomes: VecDeque<Result<String, String>>,
    submissions: Vec<(u64, Vec<String>)>,
}

/// A scripted [`OracleApi`] double. Outcomes are consumed in FIFO order,
/// one per adapter call; an unscripted call fails.
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    state: Arc<Mutex<MockOracleState>>,
}

impl MockOracle {
    /// New mock with no scripted outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful submission.
    pub fn push_submit_ok(&self) {
        self.state.lock().unwrap().submit_outcomes.push_back(Ok(()));
    }

    /// Scripts a failed submission.
    pub fn push_submit_err(&self, msg: &str) {
        self.state.lock().unwrap().submit_outcomes.push_back(Err(msg.to_string()));
    }

    /// Scripts an inclusion with the given execution status.
    pub fn push_included(&self, success: bool) {
        self.state.lock().unwrap().wait_outcomes.push_back(Ok(success));
    }

    /// Scripts an error while waiting for inclusion.
    pub fn push_wait_err(&self, msg: &str) {
        self.state.lock().unwrap().wait_outcomes.push_back(Err(msg.to_string()));
    }

    /// Scripts a successful last-response read.
    pub fn push_response(&self, value: &str) {
        self.state.lock().unwrap().response_outcomes.push_back(Ok(value.to_string()));
    }

    /// Scripts a failed last-response read.
    pub fn push_response_err(&self, msg: &str) {
        self.state.lock().unwrap().response_outcomes.push_back(Err(msg.to_string()));
    }

    /// Scripts one fully successful lifecycle yielding `value`.
    pub fn push_lifecycle_success(&self, value: &str) {
        self.push_submit_ok();
        self.push_included(true);
        self.push_response(value);
    }

    /// Every `(subscription_id, args)` pair submitted so far, including
    /// submissions that were scripted to fail.
    pub fn submissions(&self) -> Vec<(u64, Vec<String>)> {
        self.state.lock().unwrap().submissions.clone()
    }
}

#[async_trait]
impl OracleApi for MockOracle {
    async fn submit_request(
        &self,
        subscription_id: u64,
        args: Vec<String>,
    ) -> eyre::Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        state.submissions.push((subscription_id, args));
        let nth = state.submissions.len() as u8;
        match state.submit_outcomes.pop_front() {
            Some(Ok(())) => Ok(TxHash::with_last_byte(nth)),
            Some(Err(msg)) => Err(eyre!(msg)),
            None => Err(eyre!("unscripted submit_request call")),
        }
    }

    async fn wait_for_inclusion(&self, tx_hash: TxHash) -> eyre::Result<InclusionReceipt> {
        match self.state.lock().unwrap().wait_outcomes.pop_front() {
            Some(Ok(success)) => Ok(InclusionReceipt { tx_hash, success }),
            Some(Err(msg)) => Err(eyre!(msg)),
            None => Err(eyre!("unscripted wait_for_inclusion call")),
        }
    }

    async fn last_response(&self) -> eyre::Result<Bytes> {
        match self.state.lock().unwrap().response_outcomes.pop_front() {
            Some(Ok(value)) => Ok(Bytes::from(value.into_bytes())),
            Some(Err(msg)) => Err(eyre!(msg)),
            None => Err(eyre!("unscripted last_response call")),
        }
    }

    async fn last_error(&self) -> eyre::Result<Bytes> {
        Ok(Bytes::new())
    }

    async fn owner(&self) -> eyre::Result<Address> {
        Ok(Address::ZERO)
    }
}
