//! Lifecycle tests for the polling task, driven against a scripted oracle.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wells_oracle::{
    cache::ResultCache,
    tasks::poller::PollerTask,
    test_utils::{MockOracle, setup_logging, setup_test_config},
};

const WELL_A: &str = "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11";
const WELL_B: &str = "b1ffcd00-0d1c-5fa9-cc7e-7cc0ce491b22";

fn poller_for(ids: &str, oracle: MockOracle, cache: ResultCache) -> PollerTask<MockOracle> {
    let mut config = setup_test_config();
    config.well_ids = ids.into();
    PollerTask::new(&config, oracle, cache)
}

#[tokio::test]
async fn successful_lifecycle_fills_cache_and_resubmits() {
    setup_logging();

    let oracle = MockOracle::new();
    let cache = ResultCache::new();
    let poller = poller_for(WELL_A, oracle.clone(), cache.clone());
    let cancel = CancellationToken::new();

    // First pass stores the payload.
    oracle.push_lifecycle_success("{npv:100}");
    poller.process_pass(&cancel).await;
    assert_eq!(cache.get(WELL_A).await, "{npv:100}");

    let submissions = oracle.submissions();
    assert_eq!(submissions, vec![(5832, vec![WELL_A.to_string()])]);

    // A second pass re-submits unconditionally, even though the value is
    // unchanged.
    oracle.push_lifecycle_success("{npv:100}");
    poller.process_pass(&cancel).await;
    assert_eq!(oracle.submissions().len(), 2);
    assert_eq!(cache.get(WELL_A).await, "{npv:100}");
}

#[tokio::test]
async fn submit_failure_does_not_stop_the_pass() {
    setup_logging();

    let oracle = MockOracle::new();
    let cache = ResultCache::new();
    let poller = poller_for(&format!("{WELL_A},{WELL_B}"), oracle.clone(), cache.clone());

    // A fails at submission, B succeeds end to end.
    oracle.push_submit_err("nonce too low");
    oracle.push_lifecycle_success("{\"npv_usd\":42}");
    poller.process_pass(&CancellationToken::new()).await;

    assert_eq!(cache.get(WELL_A).await, "");
    assert_eq!(cache.get(WELL_B).await, "{\"npv_usd\":42}");

    // Both ids were attempted.
    assert_eq!(oracle.submissions().len(), 2);
}

#[tokio::test]
async fn reverted_transaction_preserves_cache_entry() {
    setup_logging();

    let oracle = MockOracle::new();
    let cache = ResultCache::new();
    cache.set(WELL_A, "{\"npv_usd\":41}").await;

    let poller = poller_for(WELL_A, oracle.clone(), cache.clone());
    oracle.push_submit_ok();
    oracle.push_included(false);
    poller.process_pass(&CancellationToken::new()).await;

    assert_eq!(cache.get(WELL_A).await, "{\"npv_usd\":41}");
}

#[tokio::test]
async fn wait_error_skips_the_well() {
    setup_logging();

    let oracle = MockOracle::new();
    let cache = ResultCache::new();
    let poller = poller_for(WELL_A, oracle.clone(), cache.clone());

    oracle.push_submit_ok();
    oracle.push_wait_err("rpc connection reset");
    poller.process_pass(&CancellationToken::new()).await;

    assert_eq!(cache.get(WELL_A).await, "");
}

#[tokio::test]
async fn read_failure_preserves_cache_entry() {
    setup_logging();

    let oracle = MockOracle::new();
    let cache = ResultCache::new();
    cache.set(WELL_A, "{\"npv_usd\":41}").await;

    let poller = poller_for(WELL_A, oracle.clone(), cache.clone());
    oracle.push_submit_ok();
    oracle.push_included(true);
    oracle.push_response_err("eth_call failed");
    poller.process_pass(&CancellationToken::new()).await;

    assert_eq!(cache.get(WELL_A).await, "{\"npv_usd\":41}");
}

#[tokio::test]
async fn cancelled_token_returns_without_polling() {
    setup_logging();

    let oracle = MockOracle::new();
    let cache = ResultCache::new();
    let poller = poller_for(WELL_A, oracle.clone(), cache.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(1), poller.run(cancel))
        .await
        .expect("run should return promptly when already cancelled");

    assert!(oracle.submissions().is_empty());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn cancellation_is_observed_between_wells() {
    setup_logging();

    let oracle = MockOracle::new();
    let cache = ResultCache::new();
    let poller = poller_for(&format!("{WELL_A},{WELL_B}"), oracle.clone(), cache.clone());

    // Cancel before the pass starts; no well is attempted.
    let cancel = CancellationToken::new();
    cancel.cancel();
    poller.process_pass(&cancel).await;

    assert!(oracle.submissions().is_empty());
}
