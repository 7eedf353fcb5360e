use async_trait::async_trait;
use ethers::{
    prelude::JsonRpcClient,
    providers::{Http, Middleware, Provider},
    types::{Address, U256},
};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

use super::traits::BalanceFetcher;
use crate::core::config::WalletConfig;
use crate::core::domain::Balance;
use crate::core::errors::WalletError;

#[derive(Clone)]
pub struct EthereumClient<P: JsonRpcClient + Clone = Http> {
    provider: Provider<P>,
    network_name: String,
}

impl EthereumClient<Http> {
    /// Build a client for `rpc_url`. No request is made until the first lookup.
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, WalletError> {
        let rpc_url_clean = rpc_url.trim();
        let parsed_url = reqwest::Url::parse(rpc_url_clean).map_err(|e| {
            WalletError::ConfigError(format!("Invalid Ethereum RPC URL '{}': {}", rpc_url_clean, e))
        })?;

        info!("Using Ethereum RPC endpoint: {}", parsed_url);
        // Allow proxy environment vars.
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Ok(proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("HTTP_PROXY")) {
            if let Ok(p) = reqwest::Proxy::all(proxy) {
                builder = builder.proxy(p);
            }
        }
        let client = builder
            .build()
            .map_err(|e| WalletError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let provider = Provider::new(Http::new_with_client(parsed_url, client));

        Ok(Self { provider, network_name: "ethereum".to_string() })
    }

    /// Client for the configured default network.
    pub fn from_config(config: &WalletConfig) -> Result<Self, WalletError> {
        let rpc_url = config
            .rpc_url()
            .ok_or_else(|| WalletError::ConfigError("No Ethereum network configured".into()))?;
        Self::new(rpc_url, Duration::from_secs(config.balance.request_timeout_secs))
    }
}

impl<P> EthereumClient<P>
where
    P: JsonRpcClient + Clone + Send + Sync,
{
    /// Creates a new EthereumClient with a given provider.
    /// This is useful for testing with a `MockProvider`.
    pub fn new_with_provider(provider: Provider<P>) -> EthereumClient<P> {
        EthereumClient { provider, network_name: "test".to_string() }
    }

    /// Balance in wei, straight from `eth_getBalance`.
    pub async fn get_balance_wei(&self, address: &str) -> Result<U256, WalletError> {
        let address = Address::from_str(address.trim())
            .map_err(|e| WalletError::InvalidAddress(format!("Invalid Ethereum address: {}", e)))?;

        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| WalletError::NetworkError(format!("Failed to get balance: {}", e)))
    }
}

/// Scale a wei amount to an 18-digit ether decimal.
pub fn wei_to_balance(address: &str, wei: U256) -> Result<Balance, WalletError> {
    if wei > U256::from(u128::MAX) {
        return Err(WalletError::NetworkError("balance out of range".to_string()));
    }
    Balance::from_wei(address, wei.as_u128())
}

#[async_trait]
impl<P> BalanceFetcher for EthereumClient<P>
where
    P: JsonRpcClient + Clone + 'static + Send + Sync,
{
    async fn fetch_balance(&self, address: &str) -> Result<Balance, WalletError> {
        debug!("Getting ETH balance for address: {}", address);

        let wei = self.get_balance_wei(address).await?;
        let balance = wei_to_balance(address, wei)?;
        debug!("Balance: {}", balance);

        Ok(balance)
    }

    fn network_name(&self) -> &str {
        &self.network_name
    }
}
