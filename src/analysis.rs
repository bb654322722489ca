//! Text analysis: cleaning, tokenization, word filtering and mutations.
//!
//! Cleaned article text flows through a [`analyzer::WordAnalyzer`] built for
//! one [`analyzer::TokenizerVariant`]; every resulting word is then expanded
//! into its four [`mutation::Mutation`] forms.

pub mod analyzer;
pub mod char_filter;
pub mod mutation;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
