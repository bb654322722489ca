//! Token mutations.
//!
//! Every token is counted under four normalized forms computed from the same
//! tokenization: the token itself, its lowercase form, its NFKC form, and the
//! NFKC form of its lowercase form.
//!
//! # Examples
//!
//! ```
//! use wikifreq::analysis::mutation::{Mutation, Mutations};
//!
//! let forms = Mutations::expand("Ｃａｆé");
//! assert_eq!(forms.get(Mutation::Identity), "Ｃａｆé");
//! assert_eq!(forms.get(Mutation::Lower), "ｃａｆé");
//! assert_eq!(forms.get(Mutation::Nfkc), "Café");
//! assert_eq!(forms.get(Mutation::NfkcLower), "café");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// One of the four normalized forms of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mutation {
    Identity,
    Lower,
    Nfkc,
    NfkcLower,
}

impl Mutation {
    /// All mutations, in output order.
    pub const ALL: [Mutation; 4] = [
        Mutation::Identity,
        Mutation::Lower,
        Mutation::Nfkc,
        Mutation::NfkcLower,
    ];

    /// Suffix inserted into output file names.
    pub fn suffix(self) -> &'static str {
        match self {
            Mutation::Identity => "",
            Mutation::Lower => "-lower",
            Mutation::Nfkc => "-nfkc",
            Mutation::NfkcLower => "-nfkc-lower",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mutation::Identity => "identity",
            Mutation::Lower => "lower",
            Mutation::Nfkc => "nfkc",
            Mutation::NfkcLower => "nfkc-lower",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Apply this mutation to a single token.
    pub fn apply(self, token: &str) -> String {
        match self {
            Mutation::Identity => token.to_string(),
            Mutation::Lower => token.to_lowercase(),
            Mutation::Nfkc => token.nfkc().collect(),
            Mutation::NfkcLower => token.to_lowercase().nfkc().collect(),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four forms of one token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutations {
    forms: [String; 4],
}

impl Mutations {
    /// Compute all four forms of `token`.
    pub fn expand(token: &str) -> Self {
        let lower = token.to_lowercase();
        let nfkc: String = token.nfkc().collect();
        let nfkc_lower: String = lower.nfkc().collect();
        Mutations {
            forms: [token.to_string(), lower, nfkc, nfkc_lower],
        }
    }

    pub fn get(&self, mutation: Mutation) -> &str {
        &self.forms[mutation.index()]
    }

    /// Forms paired with their mutation, in [`Mutation::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Mutation, &str)> {
        Mutation::ALL
            .into_iter()
            .zip(self.forms.iter().map(String::as_str))
    }

    pub fn into_forms(self) -> [String; 4] {
        self.forms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ascii() {
        let forms = Mutations::expand("Hello");
        assert_eq!(forms.get(Mutation::Identity), "Hello");
        assert_eq!(forms.get(Mutation::Lower), "hello");
        assert_eq!(forms.get(Mutation::Nfkc), "Hello");
        assert_eq!(forms.get(Mutation::NfkcLower), "hello");
    }

    #[test]
    fn test_expand_compatibility_characters() {
        let forms = Mutations::expand("ﬁre");
        assert_eq!(forms.get(Mutation::Lower), "ﬁre");
        assert_eq!(forms.get(Mutation::Nfkc), "fire");

        let forms = Mutations::expand("ｶﾀｶﾅ");
        assert_eq!(forms.get(Mutation::Nfkc), "カタカナ");
        assert_eq!(forms.get(Mutation::NfkcLower), "カタカナ");
    }

    #[test]
    fn test_nfkc_lower_lowercases_first() {
        // Lowercasing U+2160 (ROMAN NUMERAL ONE) gives U+2170, whose NFKC is "i".
        let forms = Mutations::expand("Ⅰ");
        assert_eq!(forms.get(Mutation::Lower), "ⅰ");
        assert_eq!(forms.get(Mutation::Nfkc), "I");
        assert_eq!(forms.get(Mutation::NfkcLower), "i");
    }

    #[test]
    fn test_apply_matches_expand() {
        for token in ["Straße", "ＡＢＣ", "İstanbul", "日本"] {
            let forms = Mutations::expand(token);
            for (mutation, form) in forms.iter() {
                assert_eq!(mutation.apply(token), form);
            }
        }
    }

    #[test]
    fn test_suffixes() {
        let suffixes: Vec<_> = Mutation::ALL.iter().map(|m| m.suffix()).collect();
        assert_eq!(suffixes, vec!["", "-lower", "-nfkc", "-nfkc-lower"]);
    }

    #[test]
    fn test_order() {
        assert!(Mutation::Identity < Mutation::Lower);
        assert!(Mutation::Nfkc < Mutation::NfkcLower);
        assert_eq!(Mutation::NfkcLower.index(), 3);
    }
}
