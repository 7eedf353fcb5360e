use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::WalletError;

/// Fractional digits of one ether expressed in wei.
pub const ETHER_DECIMALS: u32 = 18;

/// The two chain families a session manages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Account-based chain; addresses are BIP-44 children of the mnemonic.
    #[default]
    Ethereum,
    /// Ledger-based chain; addresses are independent random keypairs.
    Solana,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Ethereum, Chain::Solana];

    pub fn label(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Solana => "Solana",
        }
    }

    /// Native token symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETH",
            Chain::Solana => "SOL",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Chain {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eth" | "ethereum" => Ok(Chain::Ethereum),
            "sol" | "solana" => Ok(Chain::Solana),
            other => Err(WalletError::ConfigError(format!(
                "Unsupported chain: {}. Currently supported: eth, sol.",
                other
            ))),
        }
    }
}

/// One entry of a chain's address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAddress {
    pub index: u32,
    pub address: String,
}

impl DerivedAddress {
    pub fn new(index: u32, address: impl Into<String>) -> Self {
        Self { index, address: address.into() }
    }
}

/// Ether balance of one address at the time it was fetched.
///
/// The amount is exact: it is the wei integer scaled by 10^-18, never a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub address: String,
    pub ether: Decimal,
}

impl Balance {
    /// Build from a wei amount. Fails when the amount exceeds the 96-bit
    /// decimal mantissa (far above total ether supply).
    pub fn from_wei(address: impl Into<String>, wei: u128) -> Result<Self, WalletError> {
        let wei = i128::try_from(wei)
            .map_err(|_| WalletError::NetworkError("balance out of range".to_string()))?;
        let ether = Decimal::try_from_i128_with_scale(wei, ETHER_DECIMALS)
            .map_err(|_| WalletError::NetworkError("balance out of range".to_string()))?;
        Ok(Self { address: address.into(), ether })
    }

    /// Ether amount without trailing zeros; whole amounts keep one decimal
    /// place ("0.0", "2.0", "1.5").
    pub fn format_ether(&self) -> String {
        let s = self.ether.normalize().to_string();
        if s.contains('.') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.format_ether())
    }
}
