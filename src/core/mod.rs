pub mod config;
pub mod derivation;
pub mod domain;
pub mod errors;
pub mod mnemonic;
pub mod session;

pub use domain::{Balance, Chain, DerivedAddress};
pub use errors::WalletError;
pub use session::{Action, WalletSession};
