//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split cleaned article text into raw segments. Whether a segment
//! counts as a word is decided afterwards by a [`WordFilter`], so tokenizers
//! are free to emit punctuation or whitespace segments.
//!
//! # Available Tokenizers
//!
//! - [`regex::RegexTokenizer`] - Maximal runs of non-digit word characters
//! - [`penn::PennTreebankTokenizer`] - Penn-Treebank-style English tokenization
//! - [`lindera::LinderaTokenizer`] - Dictionary-based segmentation (Japanese, Chinese)
//!
//! # Examples
//!
//! ```
//! use wikifreq::analysis::tokenizer::Tokenizer;
//! use wikifreq::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```
//!
//! [`WordFilter`]: crate::analysis::token_filter::word::WordFilter

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so one instance can be shared read-only by
/// every worker of a run.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lindera;
pub mod penn;
pub mod regex;

pub use lindera::LinderaTokenizer;
pub use penn::PennTreebankTokenizer;
pub use regex::RegexTokenizer;
