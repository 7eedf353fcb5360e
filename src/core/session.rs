//! Wallet session state
//!
//! Holds everything the view renders: the mnemonic, the Ethereum root node,
//! one address list per chain, the shared derivation counter, the displayed
//! balance and the last error. Every user action goes through [`WalletSession::dispatch`],
//! which never lets a non-fatal error escape; it is turned into a message in
//! [`WalletSession::error`] instead.
//!
//! Balance lookups are not performed here. Whenever the primary Ethereum
//! address or the active chain changes, the session hands out a
//! [`BalanceRequest`] and later accepts the result through
//! [`WalletSession::apply_balance`]. Only the most recent request is current;
//! results for anything older, or for an address that is no longer primary,
//! are dropped.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::config::DerivationConfig;
use crate::core::derivation::{self, RootKeyMaterial};
use crate::core::domain::{Balance, Chain, DerivedAddress};
use crate::core::errors::WalletError;
use crate::core::mnemonic::{self, MnemonicPhrase};

/// User actions the view can dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create,
    Load(String),
    DeriveNext,
    SwitchChain(Chain),
}

/// A balance lookup the session wants performed.
///
/// `ticket` increases with every request; a result is only accepted for the
/// latest ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRequest {
    pub ticket: u64,
    pub address: String,
}

/// What happened to a balance result handed back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceOutcome {
    Applied,
    Failed,
    Stale,
}

#[derive(Debug, Default)]
pub struct WalletSession {
    derivation: DerivationConfig,
    mnemonic: Option<MnemonicPhrase>,
    root: Option<RootKeyMaterial>,
    active_chain: Chain,
    next_index: u32,
    ethereum: Vec<DerivedAddress>,
    solana: Vec<DerivedAddress>,
    balance: Option<Balance>,
    error: Option<String>,
    last_ticket: u64,
    pending: Option<BalanceRequest>,
}

impl WalletSession {
    pub fn new(derivation: DerivationConfig) -> Self {
        Self { derivation, ..Self::default() }
    }

    /// Run one user action. Non-fatal errors are stored in [`Self::error`];
    /// only [`WalletError::EntropyFailure`] is returned.
    pub fn dispatch(&mut self, action: Action) -> Result<Option<BalanceRequest>, WalletError> {
        let (context, result) = match action {
            Action::Create => ("Failed to create wallet", self.create()),
            Action::Load(phrase) => ("Failed to load wallet", self.load(&phrase)),
            Action::DeriveNext => ("Failed to derive new wallet", self.derive_next().map(|_| None)),
            Action::SwitchChain(chain) => return Ok(self.switch_chain(chain)),
        };

        match result {
            Ok(request) => Ok(request),
            Err(e) if e.is_fatal() => {
                self.error = Some(format!("{}: {}", context, e));
                Err(e)
            }
            Err(e) => {
                warn!("{}: {}", context, e);
                self.error = Some(format!("{}: {}", context, e));
                Ok(None)
            }
        }
    }

    /// Generate a fresh mnemonic and reset both address lists.
    pub fn create(&mut self) -> Result<Option<BalanceRequest>, WalletError> {
        let phrase = mnemonic::create_mnemonic(self.derivation.word_count)?;
        info!("Created new wallet ({} words)", phrase.word_count());
        self.adopt(phrase)
    }

    /// Adopt a user supplied mnemonic. On error the session is left as it was.
    pub fn load(&mut self, input: &str) -> Result<Option<BalanceRequest>, WalletError> {
        let phrase = MnemonicPhrase::parse(input)?;
        info!("Loaded wallet from mnemonic ({} words)", phrase.word_count());
        self.adopt(phrase)
    }

    fn adopt(&mut self, phrase: MnemonicPhrase) -> Result<Option<BalanceRequest>, WalletError> {
        // Compute everything before touching state so a failure changes nothing.
        let root = derivation::derive_root_at(&phrase, &self.derivation.account_path)?;
        let first = derivation::derive_child(&root, 0)?;
        let first_solana = derivation::generate_independent_address(0)?;

        self.mnemonic = Some(phrase);
        self.root = Some(root);
        self.ethereum = vec![first];
        self.solana = vec![first_solana];
        self.next_index = 1;
        self.balance = None;
        self.pending = None;
        self.error = None;

        Ok(self.balance_request_for_active_chain())
    }

    /// Append the next address on the active chain.
    pub fn derive_next(&mut self) -> Result<DerivedAddress, WalletError> {
        let root = self.root.as_ref().ok_or(WalletError::NoWalletLoaded)?;
        let index = self.next_index;

        let derived = match self.active_chain {
            Chain::Ethereum => derivation::derive_child(root, index)?,
            Chain::Solana => derivation::generate_independent_address(index)?,
        };
        debug!("Derived {} address at index {}", self.active_chain, index);

        match self.active_chain {
            Chain::Ethereum => self.ethereum.push(derived.clone()),
            Chain::Solana => self.solana.push(derived.clone()),
        }
        self.next_index = index + 1;
        self.error = None;

        Ok(derived)
    }

    /// Change the active chain. Switching to Ethereum asks for a balance refresh.
    pub fn switch_chain(&mut self, chain: Chain) -> Option<BalanceRequest> {
        if self.active_chain == chain {
            return None;
        }
        debug!("Switching active chain to {}", chain);
        self.active_chain = chain;
        self.balance_request_for_active_chain()
    }

    fn balance_request_for_active_chain(&mut self) -> Option<BalanceRequest> {
        match self.active_chain {
            Chain::Ethereum => self.request_balance(),
            Chain::Solana => None,
        }
    }

    /// Issue a new balance request for the primary address, superseding any
    /// pending one. `None` when no wallet is loaded.
    pub fn request_balance(&mut self) -> Option<BalanceRequest> {
        let address = self.primary_address()?.to_string();
        self.last_ticket += 1;
        let request = BalanceRequest { ticket: self.last_ticket, address };
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Drop `request` without a result, e.g. when no fetcher is available.
    pub fn cancel_balance(&mut self, request: &BalanceRequest) {
        if self.pending.as_ref() == Some(request) {
            self.pending = None;
        }
    }

    /// Accept the result of `request`. Results for superseded requests are
    /// discarded; a failure keeps the previous balance and sets the error.
    pub fn apply_balance(
        &mut self,
        request: &BalanceRequest,
        result: Result<Balance, WalletError>,
    ) -> BalanceOutcome {
        let current = self.pending.as_ref().is_some_and(|p| p == request)
            && self.primary_address() == Some(request.address.as_str());
        if !current {
            debug!("Discarding stale balance result (ticket {})", request.ticket);
            return BalanceOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(balance) => {
                self.balance = Some(balance);
                BalanceOutcome::Applied
            }
            Err(e) => {
                warn!("Balance lookup for {} failed: {}", request.address, e);
                self.error = Some(format!("Failed to fetch balance: {}", e));
                BalanceOutcome::Failed
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    pub fn mnemonic(&self) -> Option<&MnemonicPhrase> {
        self.mnemonic.as_ref()
    }

    /// Index-0 Ethereum address; the balance is shown for this one.
    pub fn primary_address(&self) -> Option<&str> {
        self.ethereum.first().map(|a| a.address.as_str())
    }

    pub fn addresses(&self, chain: Chain) -> &[DerivedAddress] {
        match chain {
            Chain::Ethereum => &self.ethereum,
            Chain::Solana => &self.solana,
        }
    }

    pub fn active_chain(&self) -> Chain {
        self.active_chain
    }

    /// Index the next derived address will get, on either chain.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    pub fn balance(&self) -> Option<&Balance> {
        self.balance.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending_balance(&self) -> Option<&BalanceRequest> {
        self.pending.as_ref()
    }
}
