//! tests/derivation_vectors.rs
//!
//! Ethereum addresses must match what any BIP-44 wallet derives from the same
//! mnemonic; Solana addresses are independent ed25519 keys.

use coins_bip39::English;
use ethers::signers::{MnemonicBuilder, Signer};
use gnp_wallet::core::derivation::{
    derive_child, derive_root, generate_independent_address, is_solana_address,
};
use gnp_wallet::core::mnemonic::{create_mnemonic, MnemonicPhrase};
use pretty_assertions::assert_eq;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn reference_address(phrase: &str, index: u32) -> String {
    let wallet = MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .derivation_path(&format!("m/44'/60'/0'/0/{}", index))
        .unwrap()
        .build()
        .unwrap();
    ethers::utils::to_checksum(&wallet.address(), None)
}

#[test]
fn test_first_addresses_match_reference_wallet() {
    let root = derive_root(&MnemonicPhrase::parse(ABANDON).unwrap()).unwrap();
    for index in 0..5 {
        let derived = derive_child(&root, index).unwrap();
        assert_eq!(derived.address, reference_address(ABANDON, index), "index {}", index);
    }
}

#[test]
fn test_generated_mnemonic_matches_reference_wallet() {
    let phrase = create_mnemonic(24).unwrap();
    let root = derive_root(&phrase).unwrap();

    assert_eq!(derive_child(&root, 0).unwrap().address, reference_address(phrase.as_str(), 0));
    assert_eq!(derive_child(&root, 7).unwrap().address, reference_address(phrase.as_str(), 7));
}

#[test]
fn test_solana_addresses_are_independent() {
    let a = generate_independent_address(3).unwrap();
    let b = generate_independent_address(3).unwrap();

    assert_eq!(a.index, 3);
    assert!(is_solana_address(&a.address));
    assert!(is_solana_address(&b.address));
    assert_ne!(a.address, b.address);
}
