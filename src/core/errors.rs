use std::fmt;

/// Error type for wallet session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Empty, malformed, or checksum-failing mnemonic phrase.
    InvalidMnemonic(String),
    /// A derivation was requested before any wallet was created or loaded.
    NoWalletLoaded,
    /// Balance lookup failed (transport, RPC error, or malformed reply).
    NetworkError(String),
    /// The OS entropy source could not be read. Not recoverable.
    EntropyFailure(String),
    /// BIP-32 derivation failed.
    KeyDerivationError(String),
    /// Address rejected by the chain's address parser.
    InvalidAddress(String),
    /// Configuration errors.
    ConfigError(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::InvalidMnemonic(msg) => write!(f, "Invalid mnemonic: {}", msg),
            WalletError::NoWalletLoaded => write!(f, "No wallet loaded"),
            WalletError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            WalletError::EntropyFailure(msg) => write!(f, "Entropy source failure: {}", msg),
            WalletError::KeyDerivationError(msg) => write!(f, "Key derivation error: {}", msg),
            WalletError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            WalletError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

impl WalletError {
    /// Only an entropy failure stops the session; everything else is reported inline.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WalletError::EntropyFailure(_))
    }

    /// Whether repeating the same request could succeed. Nothing in the crate
    /// retries automatically; the shell offers `balance` for that.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::NetworkError(_))
    }
}

impl From<bip39::Error> for WalletError {
    fn from(err: bip39::Error) -> Self {
        WalletError::InvalidMnemonic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_mnemonic() {
        let err = WalletError::InvalidMnemonic("empty phrase".to_string());
        assert_eq!(format!("{}", err), "Invalid mnemonic: empty phrase");
    }

    #[test]
    fn test_display_no_wallet_loaded() {
        assert_eq!(WalletError::NoWalletLoaded.to_string(), "No wallet loaded");
    }

    #[test]
    fn test_only_entropy_failure_is_fatal() {
        assert!(WalletError::EntropyFailure("rng".into()).is_fatal());
        assert!(!WalletError::NetworkError("down".into()).is_fatal());
        assert!(!WalletError::InvalidMnemonic("bad".into()).is_fatal());
        assert!(!WalletError::NoWalletLoaded.is_fatal());
    }

    #[test]
    fn test_retryable() {
        assert!(WalletError::NetworkError("timeout".into()).is_retryable());
        assert!(!WalletError::InvalidAddress("0x".into()).is_retryable());
    }

    #[test]
    fn test_from_bip39_error() {
        let err = bip39::Mnemonic::parse("abandon").unwrap_err();
        let wallet_err: WalletError = err.into();
        assert!(matches!(wallet_err, WalletError::InvalidMnemonic(_)));
    }
}
