//! Analyzers that combine char filters, a tokenizer and token filters.
//!
//! [`pipeline::PipelineAnalyzer`] is the generic building block;
//! [`variant::WordAnalyzer`] assembles the pipeline for one
//! [`variant::TokenizerVariant`].

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod pipeline;
pub mod variant;

pub use pipeline::PipelineAnalyzer;
pub use variant::{AnalyzerOptions, JapaneseDictionary, Language, TokenizerVariant, WordAnalyzer};
