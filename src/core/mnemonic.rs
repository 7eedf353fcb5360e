//! BIP-39 mnemonic phrases
//!
//! A phrase is the only secret the user has to keep. It is generated from OS
//! entropy or parsed from user input, and never mutated afterwards.

use bip39::{Language, Mnemonic};
use rand_core::{OsRng, RngCore};
use std::fmt;
use zeroize::Zeroizing;

use crate::core::errors::WalletError;

/// Word counts accepted for freshly generated phrases.
pub const SUPPORTED_WORD_COUNTS: [usize; 2] = [12, 24];

/// A validated English BIP-39 phrase.
#[derive(Clone)]
pub struct MnemonicPhrase {
    phrase: Zeroizing<String>,
}

impl MnemonicPhrase {
    /// Validate user input. Leading/trailing and repeated whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, WalletError> {
        let normalized = Zeroizing::new(input.split_whitespace().collect::<Vec<_>>().join(" "));
        if normalized.is_empty() {
            return Err(WalletError::InvalidMnemonic(
                "Please enter a mnemonic phrase".to_string(),
            ));
        }

        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)?;
        Ok(Self { phrase: Zeroizing::new(mnemonic.to_string()) })
    }

    /// The phrase as space separated words, for display and backup.
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split(' ').count()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase.split(' ')
    }

    /// 64-byte BIP-39 seed with an empty passphrase.
    pub(crate) fn to_seed(&self) -> Result<Zeroizing<[u8; 64]>, WalletError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &self.phrase)?;
        Ok(Zeroizing::new(mnemonic.to_seed("")))
    }
}

impl PartialEq for MnemonicPhrase {
    fn eq(&self, other: &Self) -> bool {
        *self.phrase == *other.phrase
    }
}

impl Eq for MnemonicPhrase {}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MnemonicPhrase(<{} words redacted>)", self.word_count())
    }
}

/// Generate a fresh phrase from the OS random number generator.
///
/// 12 words take 16 bytes of entropy, 24 words take 32.
pub fn create_mnemonic(word_count: usize) -> Result<MnemonicPhrase, WalletError> {
    let entropy_len = match word_count {
        12 => 16,
        24 => 32,
        other => {
            return Err(WalletError::InvalidMnemonic(format!(
                "unsupported word count {} (expected one of {:?})",
                other, SUPPORTED_WORD_COUNTS
            )))
        }
    };

    let mut entropy = Zeroizing::new([0u8; 32]);
    OsRng
        .try_fill_bytes(&mut entropy[..entropy_len])
        .map_err(|e| WalletError::EntropyFailure(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..entropy_len])?;
    Ok(MnemonicPhrase { phrase: Zeroizing::new(mnemonic.to_string()) })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_create_twelve_words() {
        let phrase = create_mnemonic(12).unwrap();
        assert_eq!(phrase.word_count(), 12);
        // Round-trips through the validator.
        assert_eq!(MnemonicPhrase::parse(phrase.as_str()).unwrap(), phrase);
    }

    #[test]
    fn test_create_twenty_four_words() {
        let phrase = create_mnemonic(24).unwrap();
        assert_eq!(phrase.word_count(), 24);
    }

    #[test]
    fn test_create_rejects_other_counts() {
        assert!(matches!(create_mnemonic(15), Err(WalletError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_created_phrases_differ() {
        assert_ne!(create_mnemonic(12).unwrap(), create_mnemonic(12).unwrap());
    }

    #[test]
    fn test_parse_normalizes_whitespace() {
        let messy = format!("  {}  \n", ABANDON.replace(' ', "   "));
        let phrase = MnemonicPhrase::parse(&messy).unwrap();
        assert_eq!(phrase.as_str(), ABANDON);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(MnemonicPhrase::parse(""), Err(WalletError::InvalidMnemonic(_))));
        assert!(matches!(MnemonicPhrase::parse("   \t"), Err(WalletError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_parse_bad_checksum() {
        let bad = ABANDON.replace("about", "abandon");
        assert!(matches!(MnemonicPhrase::parse(&bad), Err(WalletError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_parse_unknown_word() {
        let bad = ABANDON.replace("about", "zzzz");
        assert!(matches!(MnemonicPhrase::parse(&bad), Err(WalletError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_debug_is_redacted() {
        let phrase = MnemonicPhrase::parse(ABANDON).unwrap();
        let dbg = format!("{:?}", phrase);
        assert!(!dbg.contains("abandon"));
        assert!(dbg.contains("12 words"));
    }
}
