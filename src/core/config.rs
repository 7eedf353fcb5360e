use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Key of the network whose RPC endpoint serves balance lookups.
pub const DEFAULT_NETWORK: &str = "eth";

/// Environment variable overriding the Ethereum RPC URL.
pub const RPC_URL_ENV: &str = "WALLET_ETHEREUM_RPC_URL";

/// Errors raised while reading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Blockchain network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
}

/// Blockchain configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockchainConfig {
    pub networks: HashMap<String, NetworkConfig>,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        let mut networks = HashMap::with_capacity(1);

        networks.insert(
            DEFAULT_NETWORK.to_string(),
            NetworkConfig {
                name: "Ethereum Mainnet".to_string(),
                rpc_url: "https://eth.llamarpc.com".to_string(),
                chain_id: 1,
            },
        );

        Self { networks }
    }
}

/// Derivation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivationConfig {
    /// Parent node of all Ethereum addresses; address `i` lives at `<account_path>/i`.
    #[serde(default = "DerivationConfig::default_account_path")]
    pub account_path: String,

    /// Words in a freshly generated mnemonic (12 or 24).
    #[serde(default = "DerivationConfig::default_word_count")]
    pub word_count: usize,
}

impl DerivationConfig {
    fn default_account_path() -> String {
        "m/44'/60'/0'/0".to_string()
    }
    fn default_word_count() -> usize {
        12
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            account_path: Self::default_account_path(),
            word_count: Self::default_word_count(),
        }
    }
}

/// Balance lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceConfig {
    /// HTTP timeout for a single `eth_getBalance` call (seconds)
    #[serde(default = "BalanceConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl BalanceConfig {
    fn default_request_timeout() -> u64 {
        10
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self { request_timeout_secs: Self::default_request_timeout() }
    }
}

/// Wallet configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WalletConfig {
    #[serde(default)]
    pub blockchain: BlockchainConfig,
    #[serde(default)]
    pub derivation: DerivationConfig,
    #[serde(default)]
    pub balance: BalanceConfig,
}

impl WalletConfig {
    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigLoadError> {
        let config: WalletConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults when the file does not exist, then apply
    /// the `WALLET_ETHEREUM_RPC_URL` override.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            info!("Loaded configuration from {}", path.display());
            Self::from_toml_str(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        if let Ok(url) = std::env::var(RPC_URL_ENV) {
            config.set_rpc_url(url.trim());
            info!("Ethereum RPC URL overridden from {}", RPC_URL_ENV);
        }

        config.validate()?;
        Ok(config)
    }

    /// RPC endpoint used for balance lookups.
    pub fn rpc_url(&self) -> Option<&str> {
        self.blockchain.networks.get(DEFAULT_NETWORK).map(|n| n.rpc_url.as_str())
    }

    fn set_rpc_url(&mut self, url: &str) {
        self.blockchain
            .networks
            .entry(DEFAULT_NETWORK.to_string())
            .and_modify(|n| n.rpc_url = url.to_string())
            .or_insert_with(|| NetworkConfig {
                name: "Ethereum Mainnet".to_string(),
                rpc_url: url.to_string(),
                chain_id: 1,
            });
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let rpc_url = self.rpc_url().ok_or_else(|| {
            ConfigLoadError::Invalid(format!("missing [blockchain.networks.{}]", DEFAULT_NETWORK))
        })?;
        reqwest::Url::parse(rpc_url)
            .map_err(|e| ConfigLoadError::Invalid(format!("rpc_url '{}': {}", rpc_url, e)))?;

        if !matches!(self.derivation.word_count, 12 | 24) {
            return Err(ConfigLoadError::Invalid(format!(
                "word_count must be 12 or 24, got {}",
                self.derivation.word_count
            )));
        }

        self.derivation
            .account_path
            .parse::<coins_bip32::path::DerivationPath>()
            .map_err(|e| {
                ConfigLoadError::Invalid(format!(
                    "account_path '{}': {}",
                    self.derivation.account_path, e
                ))
            })?;

        if self.balance.request_timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid("request_timeout_secs must be > 0".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WalletConfig::default();
        config.validate().unwrap();
        assert_eq!(config.rpc_url(), Some("https://eth.llamarpc.com"));
        assert_eq!(config.derivation.account_path, "m/44'/60'/0'/0");
        assert_eq!(config.derivation.word_count, 12);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = WalletConfig::from_toml_str(
            r#"
            [derivation]
            word_count = 24
            "#,
        )
        .unwrap();
        assert_eq!(config.derivation.word_count, 24);
        assert_eq!(config.derivation.account_path, "m/44'/60'/0'/0");
        assert_eq!(config.balance.request_timeout_secs, 10);
        assert!(config.rpc_url().is_some());
    }

    #[test]
    fn test_rejects_bad_word_count() {
        let err = WalletConfig::from_toml_str("[derivation]\nword_count = 15\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_rpc_url() {
        let err = WalletConfig::from_toml_str(
            r#"
            [blockchain.networks.eth]
            name = "broken"
            rpc_url = "not a url"
            chain_id = 1
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("rpc_url"));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = WalletConfig::from_toml_str("this is = = not toml").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
    }
}
