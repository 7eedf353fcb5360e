use async_trait::async_trait;

use crate::core::domain::Balance;
use crate::core::errors::WalletError;

/// Source of native-token balances for the account-based chain.
#[async_trait]
pub trait BalanceFetcher: Send + Sync {
    /// Retrieves the balance of a given address. One request per call; no
    /// retries, no de-duplication.
    async fn fetch_balance(&self, address: &str) -> Result<Balance, WalletError>;

    /// Returns the name of the network (e.g., "ethereum").
    fn network_name(&self) -> &str;
}
