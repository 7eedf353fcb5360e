//! tests/session_properties.rs
//!
//! Invariants of the shared derivation counter under arbitrary interleavings
//! of derive and tab switches.

use gnp_wallet::core::domain::Chain;
use gnp_wallet::core::session::{Action, WalletSession};
use proptest::prelude::*;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn step() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::DeriveNext),
        1 => Just(Action::SwitchChain(Chain::Ethereum)),
        1 => Just(Action::SwitchChain(Chain::Solana)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_counter_is_shared_and_never_reused(steps in prop::collection::vec(step(), 0..20)) {
        let mut session = WalletSession::default();
        session.dispatch(Action::Load(ABANDON.to_string())).unwrap();

        let derives = steps.iter().filter(|a| **a == Action::DeriveNext).count() as u32;
        for action in steps {
            session.dispatch(action).unwrap();
        }

        prop_assert_eq!(session.next_index(), 1 + derives);
        prop_assert!(session.error().is_none());

        let eth: Vec<u32> = session.addresses(Chain::Ethereum).iter().map(|a| a.index).collect();
        let sol: Vec<u32> = session.addresses(Chain::Solana).iter().map(|a| a.index).collect();
        prop_assert_eq!(eth[0], 0);
        prop_assert_eq!(sol[0], 0);
        prop_assert!(eth.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(sol.windows(2).all(|w| w[0] < w[1]));

        // Apart from the shared index 0 every index lands on exactly one chain.
        let mut rest: Vec<u32> = eth[1..].iter().chain(sol[1..].iter()).copied().collect();
        rest.sort_unstable();
        prop_assert_eq!(rest, (1..1 + derives).collect::<Vec<_>>());
    }

    #[test]
    fn prop_reload_resets_lists(derives in 0usize..6) {
        let mut session = WalletSession::default();
        session.dispatch(Action::Load(ABANDON.to_string())).unwrap();
        for _ in 0..derives {
            session.dispatch(Action::DeriveNext).unwrap();
        }
        let primary = session.primary_address().map(str::to_string);

        session.dispatch(Action::Load(ABANDON.to_string())).unwrap();
        prop_assert_eq!(session.next_index(), 1);
        prop_assert_eq!(session.addresses(Chain::Ethereum).len(), 1);
        prop_assert_eq!(session.addresses(Chain::Solana).len(), 1);
        prop_assert_eq!(session.primary_address().map(str::to_string), primary);
    }
}

#[test]
fn test_failed_load_keeps_previous_wallet() {
    let mut session = WalletSession::default();
    session.dispatch(Action::Load(ABANDON.to_string())).unwrap();
    session.dispatch(Action::DeriveNext).unwrap();

    session.dispatch(Action::Load("not a real mnemonic".to_string())).unwrap();

    assert!(session.error().unwrap().starts_with("Failed to load wallet"));
    assert_eq!(session.next_index(), 2);
    assert_eq!(session.addresses(Chain::Ethereum).len(), 2);
    assert_eq!(session.mnemonic().unwrap().as_str(), ABANDON);
}

#[test]
fn test_derive_without_wallet_reports_error() {
    let mut session = WalletSession::default();
    session.dispatch(Action::DeriveNext).unwrap();

    assert_eq!(session.error(), Some("Failed to derive new wallet: No wallet loaded"));
    assert_eq!(session.next_index(), 0);
}
