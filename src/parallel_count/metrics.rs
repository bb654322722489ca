//! Metrics collection for parallel counting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::counting::count::ShardCounts;

/// Snapshot of the metrics of a counting run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountMetrics {
    /// Shards counted successfully.
    pub shards_completed: u64,

    /// Shards that failed as a whole.
    pub shards_failed: u64,

    /// Articles folded into the counts.
    pub articles_processed: u64,

    /// Articles skipped as malformed.
    pub articles_skipped: u64,

    /// Words counted, summed over all variants.
    pub tokens_counted: u64,

    /// Time spent counting shards, summed over all workers.
    pub total_shard_time: Duration,

    /// Slowest shard.
    pub max_shard_time: Duration,

    /// Wall clock time since the collector was created.
    pub elapsed: Duration,

    /// Articles per second of wall clock time.
    pub articles_per_second: f64,
}

impl CountMetrics {
    pub fn avg_shard_time(&self) -> Duration {
        let shards = self.shards_completed + self.shards_failed;
        if shards == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos((self.total_shard_time.as_nanos() / shards as u128) as u64)
    }
}

/// Collector for gathering counting metrics from worker threads.
#[derive(Debug)]
pub struct CountMetricsCollector {
    shards_completed: AtomicU64,
    shards_failed: AtomicU64,
    articles_processed: AtomicU64,
    articles_skipped: AtomicU64,
    tokens_counted: AtomicU64,
    total_shard_nanos: AtomicU64,
    max_shard_nanos: AtomicU64,
    start_time: Instant,
}

impl CountMetricsCollector {
    pub fn new() -> Self {
        Self {
            shards_completed: AtomicU64::new(0),
            shards_failed: AtomicU64::new(0),
            articles_processed: AtomicU64::new(0),
            articles_skipped: AtomicU64::new(0),
            tokens_counted: AtomicU64::new(0),
            total_shard_nanos: AtomicU64::new(0),
            max_shard_nanos: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a shard that was counted.
    pub fn record_shard(&self, elapsed: Duration, counts: &ShardCounts) {
        self.shards_completed.fetch_add(1, Ordering::Relaxed);
        self.articles_processed
            .fetch_add(counts.articles, Ordering::Relaxed);
        self.articles_skipped
            .fetch_add(counts.skipped_articles, Ordering::Relaxed);
        let tokens: u64 = counts.variants().map(|(_, c)| c.total_tokens()).sum();
        self.tokens_counted.fetch_add(tokens, Ordering::Relaxed);
        self.record_time(elapsed);
    }

    /// Record a shard that failed.
    pub fn record_failure(&self, elapsed: Duration) {
        self.shards_failed.fetch_add(1, Ordering::Relaxed);
        self.record_time(elapsed);
    }

    fn record_time(&self, elapsed: Duration) {
        let nanos = elapsed.as_nanos() as u64;
        self.total_shard_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_shard_nanos.fetch_max(nanos, Ordering::Relaxed);
    }

    /// Get the current metrics snapshot.
    pub fn snapshot(&self) -> CountMetrics {
        let articles_processed = self.articles_processed.load(Ordering::Relaxed);
        let elapsed = self.start_time.elapsed();
        let articles_per_second = if elapsed.as_secs_f64() > 0.0 {
            articles_processed as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        CountMetrics {
            shards_completed: self.shards_completed.load(Ordering::Relaxed),
            shards_failed: self.shards_failed.load(Ordering::Relaxed),
            articles_processed,
            articles_skipped: self.articles_skipped.load(Ordering::Relaxed),
            tokens_counted: self.tokens_counted.load(Ordering::Relaxed),
            total_shard_time: Duration::from_nanos(self.total_shard_nanos.load(Ordering::Relaxed)),
            max_shard_time: Duration::from_nanos(self.max_shard_nanos.load(Ordering::Relaxed)),
            elapsed,
            articles_per_second,
        }
    }
}

impl Default for CountMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for timing shard tasks.
pub struct CountTimer {
    start: Instant,
}

impl CountTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
