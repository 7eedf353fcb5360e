//! Text rendering of a wallet session
//!
//! The terminal front end prints these after every action. Addresses and the
//! mnemonic are written on their own lines so they can be copied as-is.

use serde::Serialize;
use std::fmt::Write;

use crate::core::domain::{Chain, DerivedAddress};
use crate::core::session::WalletSession;

pub const TITLE: &str = "Web Wallet for GNP";

/// Serializable view of a session, for `--json` output.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub active_chain: Chain,
    pub mnemonic: Option<&'a str>,
    pub primary_address: Option<&'a str>,
    pub balance_eth: Option<String>,
    pub next_index: u32,
    pub ethereum: &'a [DerivedAddress],
    pub solana: &'a [DerivedAddress],
    pub error: Option<&'a str>,
}

impl<'a> SessionSnapshot<'a> {
    pub fn of(session: &'a WalletSession) -> Self {
        Self {
            active_chain: session.active_chain(),
            mnemonic: session.mnemonic().map(|m| m.as_str()),
            primary_address: session.primary_address(),
            balance_eth: session.balance().map(|b| b.format_ether()),
            next_index: session.next_index(),
            ethereum: session.addresses(Chain::Ethereum),
            solana: session.addresses(Chain::Solana),
            error: session.error(),
        }
    }
}

pub fn render(session: &WalletSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));

    if !session.is_loaded() {
        let _ = writeln!(out, "No wallet loaded. Use `create` or `load <mnemonic phrase>`.");
        render_error(&mut out, session);
        return out;
    }

    let tabs: Vec<String> = Chain::ALL
        .iter()
        .map(|c| {
            if *c == session.active_chain() {
                format!("[{}]", c.label())
            } else {
                format!(" {} ", c.label())
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" "));
    let _ = writeln!(out);

    match session.active_chain() {
        Chain::Ethereum => {
            let _ = writeln!(out, "Ethereum Address:");
            let _ = writeln!(out, "{}", session.primary_address().unwrap_or_default());
            let _ = writeln!(out);
            let _ = writeln!(out, "Balance:");
            let balance = match (session.balance(), session.pending_balance()) {
                (Some(b), _) => b.to_string(),
                (None, Some(_)) => "fetching...".to_string(),
                (None, None) => "unknown".to_string(),
            };
            let _ = writeln!(out, "{}", balance);
            let _ = writeln!(out);
            let _ = writeln!(out, "Derived Ethereum Addresses:");
            render_addresses(&mut out, session.addresses(Chain::Ethereum));
        }
        Chain::Solana => {
            let _ = writeln!(out, "Solana Addresses:");
            render_addresses(&mut out, session.addresses(Chain::Solana));
        }
    }

    if let Some(mnemonic) = session.mnemonic() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Mnemonic Phrase (Keep this safe!):");
        let _ = writeln!(out, "{}", mnemonic.as_str());
    }

    render_error(&mut out, session);
    out
}

fn render_addresses(out: &mut String, addresses: &[DerivedAddress]) {
    for entry in addresses {
        let _ = writeln!(out, "  Address {}: {}", entry.index, entry.address);
    }
}

fn render_error(out: &mut String, session: &WalletSession) {
    if let Some(error) = session.error() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Error: {}", error);
    }
}
