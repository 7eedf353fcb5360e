//! Address derivation
//!
//! Ethereum addresses are BIP-32 children of the account node
//! `m/44'/60'/0'/0`, so address `i` is `m/44'/60'/0'/0/i` and index 0 matches
//! the default path every Ethereum wallet uses.
//!
//! Solana addresses are NOT derived from the mnemonic: each one is a fresh
//! ed25519 keypair and its index is only a label. The derivation scheme for
//! that chain was never specified, so it is kept as independent generation
//! rather than guessed.

use coins_bip32::prelude::{Parent, SigningKey, XPriv};
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use ethers::signers::{LocalWallet, Signer};
use rand_core::{OsRng, RngCore};
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::domain::DerivedAddress;
use crate::core::errors::WalletError;
use crate::core::mnemonic::MnemonicPhrase;

/// Parent node of all Ethereum addresses.
pub const ETHEREUM_ACCOUNT_PATH: &str = "m/44'/60'/0'/0";

/// First hardened index; children are only derived below it.
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Extended private key at the Ethereum account node.
#[derive(Clone)]
pub struct RootKeyMaterial {
    node: XPriv,
    path: String,
}

impl RootKeyMaterial {
    /// Path of the node this key sits at.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for RootKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootKeyMaterial").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Derive the account node on the default Ethereum path.
pub fn derive_root(phrase: &MnemonicPhrase) -> Result<RootKeyMaterial, WalletError> {
    derive_root_at(phrase, ETHEREUM_ACCOUNT_PATH)
}

/// Derive the account node at `account_path` from the BIP-39 seed.
pub fn derive_root_at(
    phrase: &MnemonicPhrase,
    account_path: &str,
) -> Result<RootKeyMaterial, WalletError> {
    debug!("Deriving root key at {}", account_path);

    let seed = phrase.to_seed()?;
    let master = XPriv::root_from_seed(seed.as_slice(), None)
        .map_err(|e| WalletError::KeyDerivationError(format!("master key: {}", e)))?;
    let node = master
        .derive_path(account_path)
        .map_err(|e| WalletError::KeyDerivationError(format!("path {}: {}", account_path, e)))?;

    Ok(RootKeyMaterial { node, path: account_path.to_string() })
}

/// Ethereum address at `<root>/index`, EIP-55 checksummed.
pub fn derive_child(root: &RootKeyMaterial, index: u32) -> Result<DerivedAddress, WalletError> {
    if index >= HARDENED_OFFSET {
        return Err(WalletError::KeyDerivationError(format!(
            "index {} is outside the non-hardened range",
            index
        )));
    }

    let child = root
        .node
        .derive_child(index)
        .map_err(|e| WalletError::KeyDerivationError(format!("child {}: {}", index, e)))?;
    let key: &SigningKey = child.as_ref();
    let wallet = LocalWallet::from_bytes(key.to_bytes().as_slice())
        .map_err(|e| WalletError::KeyDerivationError(e.to_string()))?;

    let address = ethers::utils::to_checksum(&wallet.address(), None);
    debug!("Derived Ethereum address at {}/{}", root.path, index);

    Ok(DerivedAddress::new(index, address))
}

/// Fresh ed25519 keypair; returns the base58 public key labelled with `index`.
///
/// The mnemonic plays no part here, so the same index never reproduces the
/// same address. The secret half is dropped immediately.
pub fn generate_independent_address(index: u32) -> Result<DerivedAddress, WalletError> {
    let mut secret = Zeroizing::new([0u8; 32]);
    OsRng
        .try_fill_bytes(secret.as_mut_slice())
        .map_err(|e| WalletError::EntropyFailure(e.to_string()))?;

    let signing_key = Ed25519SigningKey::from_bytes(&secret);
    let address = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();

    Ok(DerivedAddress::new(index, address))
}

/// Whether `address` is a base58 encoded 32-byte ed25519 public key.
pub fn is_solana_address(address: &str) -> bool {
    bs58::decode(address).into_vec().map(|bytes| bytes.len() == 32).unwrap_or(false)
}
