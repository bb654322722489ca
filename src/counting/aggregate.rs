//! Merging per-shard counts.

use crate::counting::count::ShardCounts;

/// Accumulates shard results as they arrive, in any order.
#[derive(Debug, Default)]
pub struct Aggregator {
    counts: ShardCounts,
    shards_merged: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from empty counts that already list the run's variants, so a
    /// variant that produced no tokens still gets (empty) tables.
    pub fn with_counts(counts: ShardCounts) -> Self {
        Aggregator {
            counts,
            shards_merged: 0,
        }
    }

    pub fn merge(&mut self, partial: ShardCounts) {
        self.counts.merge(partial);
        self.shards_merged += 1;
    }

    pub fn shards_merged(&self) -> usize {
        self.shards_merged
    }

    pub fn counts(&self) -> &ShardCounts {
        &self.counts
    }

    pub fn finish(self) -> ShardCounts {
        self.counts
    }
}

/// Merge any number of partial counts.
pub fn merge_all<I>(partials: I) -> ShardCounts
where
    I: IntoIterator<Item = ShardCounts>,
{
    let mut aggregator = Aggregator::new();
    for partial in partials {
        aggregator.merge(partial);
    }
    aggregator.finish()
}
