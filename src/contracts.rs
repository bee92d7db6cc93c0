//! Binding for the valuation oracle contract and the capability trait the
//! poller consumes.

use crate::config::HostProvider;
use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, TxHash},
    providers::{PendingTransactionBuilder, Provider},
    sol,
};
use async_trait::async_trait;
use eyre::Result;

sol! {
    /// Chainlink Functions consumer holding the valuation oracle. The
    /// computed result lands in a single contract-wide last-response slot,
    /// not in per-request storage.
    #[sol(rpc)]
    contract WellsOracle {
        function sendRequest(uint64 subscriptionId, string[] calldata args) external returns (bytes32 requestId);
        function s_lastResponse() external view returns (bytes memory);
        function s_lastError() external view returns (bytes memory);
        function owner() external view returns (address);
    }
}

/// A [`WellsOracle`] contract instance on the configured provider.
pub type WellsOracleInstance<P = HostProvider> = WellsOracle::WellsOracleInstance<P, Ethereum>;

/// Terminal outcome of waiting for a submitted request transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionReceipt {
    /// Hash of the mined transaction.
    pub tx_hash: TxHash,
    /// Whether the transaction executed successfully.
    pub success: bool,
}

/// The narrow chain capability surface consumed by the poller.
///
/// Anything here may fail with a transport or protocol error. Connection
/// pooling, retries, and reorg handling are the implementation's concern,
/// not the caller's.
#[async_trait]
pub trait OracleApi {
    /// Submits a request transaction carrying `args` under the given
    /// Functions subscription, returning the pending transaction hash.
    async fn submit_request(&self, subscription_id: u64, args: Vec<String>) -> Result<TxHash>;

    /// Blocks until the transaction is included and returns its outcome.
    async fn wait_for_inclusion(&self, tx_hash: TxHash) -> Result<InclusionReceipt>;

    /// Reads the contract-wide last response slot.
    async fn last_response(&self) -> Result<Bytes>;

    /// Reads the contract-wide last error slot.
    async fn last_error(&self) -> Result<Bytes>;

    /// Reads the contract owner.
    async fn owner(&self) -> Result<Address>;
}

/// Alloy-backed [`OracleApi`] implementation over a deployed [`WellsOracle`].
#[derive(Debug, Clone)]
pub struct OracleClient {
    instance: WellsOracleInstance,
}

impl OracleClient {
    /// Wraps the oracle contract at `address` on the given provider.
    pub fn new(address: Address, provider: HostProvider) -> Self {
        Self { instance: WellsOracle::new(address, provider) }
    }

    /// Address of the wrapped contract.
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

#[async_trait]
impl OracleApi for OracleClient {
    async fn submit_request(&self, subscription_id: u64, args: Vec<String>) -> Result<TxHash> {
        let pending = self.instance.sendRequest(subscription_id, args).send().await?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_inclusion(&self, tx_hash: TxHash) -> Result<InclusionReceipt> {
        let root = self.instance.provider().root().clone();
        let receipt = PendingTransactionBuilder::new(root, tx_hash).get_receipt().await?;
        Ok(InclusionReceipt { tx_hash: receipt.transaction_hash, success: receipt.status() })
    }

    async fn last_response(&self) -> Result<Bytes> {
        self.instance.s_lastResponse().call().await.map_err(Into::into)
    }

    async fn last_error(&self) -> Result<Bytes> {
        self.instance.s_lastError().call().await.map_err(Into::into)
    }

    async fn owner(&self) -> Result<Address> {
        self.instance.owner().call().await.map_err(Into::into)
    }
}
