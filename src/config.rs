use crate::contracts::OracleClient;
use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{
        Identity, ProviderBuilder, RootProvider,
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
    },
    signers::local::PrivateKeySigner,
};
use eyre::Result;
use init4_bin_base::utils::from_env::FromEnv;
use std::{collections::HashMap, time::Duration};

/// Type alias for the provider used to submit request transactions and read
/// contract state.
pub type HostProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider,
>;

/// Configuration for an oracle polling a specific valuation contract.
#[derive(Debug, Clone, FromEnv)]
pub struct OracleConfig {
    /// URL for the Ethereum RPC node.
    #[from_env(
        var = "RPC_URL",
        desc = "URL for the Ethereum RPC node, starting with http:// or https://"
    )]
    pub rpc_url: url::Url,

    /// Hex private key used to sign request transactions.
    #[from_env(
        var = "ORACLE_KEY",
        desc = "Hex private key used to sign oracle request transactions",
        infallible
    )]
    pub oracle_key: String,

    /// Address of the deployed valuation oracle contract.
    #[from_env(
        var = "ORACLE_CONTRACT_ADDRESS",
        desc = "Address of the deployed valuation oracle contract"
    )]
    pub oracle_contract_address: Address,

    /// Chainlink Functions subscription funding the requests.
    #[from_env(
        var = "FUNCTIONS_SUBSCRIPTION_ID",
        desc = "Chainlink Functions subscription id funding oracle requests",
        default = 5832
    )]
    pub subscription_id: u64,

    /// The set of well ids to poll, comma-separated, processed in order.
    #[from_env(
        var = "WELL_IDS",
        desc = "Comma-separated list of well ids to poll each pass, in order",
        infallible
    )]
    pub well_ids: String,

    /// Display names for wells, as comma-separated `id=name` pairs.
    #[from_env(
        var = "WELL_NAMES",
        desc = "Comma-separated id=name pairs mapping well ids to display names",
        infallible,
        optional
    )]
    pub well_names: Option<String>,

    /// Seconds between poll passes.
    #[from_env(
        var = "POLL_INTERVAL_SECS",
        desc = "Seconds between poll passes over the configured well ids",
        default = 1800
    )]
    pub poll_interval_secs: u64,

    /// Port for the read-side HTTP server.
    #[from_env(var = "ORACLE_PORT", desc = "Port for the oracle read server", default = 8080)]
    pub oracle_port: u16,
}

impl OracleConfig {
    /// The interval between poll passes.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// The ordered list of well ids to process each pass.
    pub fn well_id_list(&self) -> Vec<String> {
        self.well_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The well display name map parsed from `WELL_NAMES`. Entries without
    /// an `=` separator are ignored.
    pub fn well_name_map(&self) -> HashMap<String, String> {
        self.well_names
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .map(|(id, name)| (id.trim().to_string(), name.trim().to_string()))
            .collect()
    }

    /// Connect to the host provider, loading the transaction signer.
    pub fn connect_provider(&self) -> Result<HostProvider> {
        let signer: PrivateKeySigner = self.oracle_key.parse()?;
        Ok(ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.rpc_url.clone()))
    }

    /// Connect to the oracle contract, using the specified provider.
    pub fn connect_oracle(&self, provider: HostProvider) -> OracleClient {
        OracleClient::new(self.oracle_contract_address, provider)
    }
}
