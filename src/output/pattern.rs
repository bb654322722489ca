//! Output file names.
//!
//! An output pattern is a path in which `%` stands for the mutation suffix
//! (empty, `-lower`, `-nfkc`, `-nfkc-lower`) and `@` for the tokenizer
//! variant name. A pattern without `%` writes only the identity table.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::TokenizerVariant;
use crate::analysis::mutation::Mutation;
use crate::error::{Result, WikiFreqError};

const MUTATION_PLACEHOLDER: char = '%';
const VARIANT_PLACEHOLDER: char = '@';

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputPattern(String);

impl OutputPattern {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        OutputPattern(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_mutations(&self) -> bool {
        self.0.contains(MUTATION_PLACEHOLDER)
    }

    pub fn has_variant(&self) -> bool {
        self.0.contains(VARIANT_PLACEHOLDER)
    }

    /// Mutations this pattern writes tables for.
    pub fn mutations(&self) -> Vec<Mutation> {
        if self.has_mutations() {
            Mutation::ALL.to_vec()
        } else {
            vec![Mutation::Identity]
        }
    }

    /// Check the pattern can name one file per table of a run over
    /// `variant_count` variants.
    pub fn validate(&self, variant_count: usize) -> Result<()> {
        if self.0.trim().is_empty() {
            return Err(WikiFreqError::config("Output pattern is empty"));
        }
        if variant_count > 1 && !self.has_variant() {
            return Err(WikiFreqError::config(format!(
                "Output pattern '{}' needs '{VARIANT_PLACEHOLDER}' to tell {variant_count} variants apart",
                self.0
            )));
        }
        Ok(())
    }

    /// Path of the table for `variant` and `mutation`, or `None` when the
    /// pattern does not write that mutation.
    pub fn path(&self, variant: TokenizerVariant, mutation: Mutation) -> Option<PathBuf> {
        if !self.has_mutations() && mutation != Mutation::Identity {
            return None;
        }
        let path = self
            .0
            .replace(MUTATION_PLACEHOLDER, mutation.suffix())
            .replace(VARIANT_PLACEHOLDER, variant.name());
        Some(PathBuf::from(path))
    }
}

impl From<&str> for OutputPattern {
    fn from(pattern: &str) -> Self {
        OutputPattern::new(pattern)
    }
}

impl From<String> for OutputPattern {
    fn from(pattern: String) -> Self {
        OutputPattern(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_mutations() {
        let pattern = OutputPattern::new("out/en%.tsv.gz");
        let paths: Vec<_> = Mutation::ALL
            .iter()
            .map(|m| pattern.path(TokenizerVariant::Penn, *m).unwrap())
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/en.tsv.gz"),
                PathBuf::from("out/en-lower.tsv.gz"),
                PathBuf::from("out/en-nfkc.tsv.gz"),
                PathBuf::from("out/en-nfkc-lower.tsv.gz"),
            ]
        );
    }

    #[test]
    fn test_identity_only_without_placeholder() {
        let pattern = OutputPattern::new("en.tsv");
        assert_eq!(pattern.mutations(), vec![Mutation::Identity]);
        assert_eq!(
            pattern.path(TokenizerVariant::Regex, Mutation::Identity),
            Some(PathBuf::from("en.tsv"))
        );
        assert_eq!(pattern.path(TokenizerVariant::Regex, Mutation::Lower), None);
    }

    #[test]
    fn test_variant_placeholder() {
        let pattern = OutputPattern::new("en-@%.tsv");
        assert_eq!(
            pattern.path(TokenizerVariant::Regex, Mutation::Nfkc),
            Some(PathBuf::from("en-regex-nfkc.tsv"))
        );
        assert!(pattern.validate(2).is_ok());
        assert!(OutputPattern::new("en%.tsv").validate(2).is_err());
        assert!(OutputPattern::new("en%.tsv").validate(1).is_ok());
        assert!(OutputPattern::new(" ").validate(1).is_err());
    }
}
