//! # wikifreq
//!
//! Word frequency tables from Wikipedia dump shards.
//!
//! ## Pipeline
//!
//! - Markup cleaning of each article
//! - Tokenization with one or more variants (regex, Penn Treebank, Japanese
//!   morphological analysis, Chinese segmentation)
//! - Four mutations of every word: identity, lower, NFKC, NFKC + lower
//! - Parallel per-shard counting and an order-independent merge
//! - Filtered, sorted, compressed tables with a `[TOTAL]` row

pub mod analysis;
pub mod cli;
pub mod config;
pub mod counting;
pub mod error;
pub mod extract;
pub mod observe;
pub mod output;
pub mod parallel_count;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
