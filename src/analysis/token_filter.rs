//! Token filters applied to tokenizer output.
//!
//! # Available Filters
//!
//! - [`word::WordFilter`] - Keeps only segments that count as words
//!
//! # Examples
//!
//! ```
//! use wikifreq::analysis::token::Token;
//! use wikifreq::analysis::token_filter::Filter;
//! use wikifreq::analysis::token_filter::word::WordFilter;
//!
//! let filter = WordFilter::relaxed();
//! let tokens = vec![Token::new("ca", 0), Token::new("n't", 1), Token::new("2", 2)];
//! let kept: Vec<_> = filter
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(kept, vec!["ca", "n't"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// The trait requires `Send + Sync` to allow use in concurrent contexts.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod word;

pub use word::WordFilter;
