pub mod wallet;

// Re-export WalletController to make it accessible via `crate::service::WalletController`
pub use wallet::WalletController;
