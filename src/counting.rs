//! Occurrence and document counting.
//!
//! - [`count`] - count tables: per token occurrences and document frequency
//! - [`shard`] - the shard counter, which folds one shard's articles into counts
//! - [`aggregate`] - merging of per-shard counts into run totals
//!
//! Counts are kept per tokenizer variant and, within a variant, per
//! [`Mutation`](crate::analysis::mutation::Mutation). Merging is a pointwise
//! sum, so the result does not depend on the order shards finish in.

pub mod aggregate;
pub mod count;
pub mod shard;

pub use aggregate::{Aggregator, merge_all};
pub use count::{CountEntry, GlobalCount, PartialCount, ShardCounts, TokenCounts, Totals, VariantCounts};
pub use shard::ShardCounter;
