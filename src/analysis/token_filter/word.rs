//! Word inclusion predicates.
//!
//! "Word character" is the Unicode `\w` class of the `regex` crate and
//! "digit" is `\d` (Unicode `Nd`). CJK numerals such as `一二三` are not
//! digits, fullwidth `１２３` are.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{Result, WikiFreqError};

lazy_static! {
    static ref RELAXED: Regex = Regex::new(r"^\D*[\w&&\D]\D*$").unwrap();
}

/// Which segments count as words.
#[derive(Clone, Debug)]
pub enum WordFilter {
    /// Any non-empty segment.
    NonEmpty,
    /// No digit, and at least one word character.
    Relaxed(Regex),
    /// No digit; first and last characters are word characters or one of
    /// the extra boundary characters.
    Strict(Regex),
}

impl WordFilter {
    /// Keep every non-empty segment.
    pub fn non_empty() -> Self {
        WordFilter::NonEmpty
    }

    /// No digit, and at least one word character.
    pub fn relaxed() -> Self {
        WordFilter::Relaxed(RELAXED.clone())
    }

    /// No digit; starts and ends with a word character or one of `boundary`.
    pub fn strict(boundary: &[char]) -> Result<Self> {
        let extra: String = boundary
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let edge = format!(r"[[\w{extra}]&&\D]");
        let pattern = format!(r"^{edge}(?:\D*{edge})?$");
        let regex = Regex::new(&pattern)
            .map_err(|e| WikiFreqError::analysis(format!("Invalid word pattern: {e}")))?;
        Ok(WordFilter::Strict(regex))
    }

    /// Whether `segment` counts as a word.
    pub fn is_word(&self, segment: &str) -> bool {
        match self {
            WordFilter::NonEmpty => !segment.is_empty(),
            WordFilter::Relaxed(regex) | WordFilter::Strict(regex) => regex.is_match(segment),
        }
    }
}

impl Filter for WordFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let kept: Vec<Token> = tokens.filter(|t| self.is_word(&t.text)).collect();
        Ok(Box::new(kept.into_iter()))
    }

    fn name(&self) -> &'static str {
        match self {
            WordFilter::NonEmpty => "non_empty",
            WordFilter::Relaxed(_) => "relaxed_word",
            WordFilter::Strict(_) => "strict_word",
        }
    }
}
