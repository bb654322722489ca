//! Parallel shard counting.
//!
//! This module provides functionality to:
//! - Count many dump shards concurrently on a fixed-size worker pool
//! - Merge per-shard counts as workers finish, in any order
//! - Surface failed shards without letting them contribute counts
//! - Monitor counting throughput

pub mod config;
pub mod engine;
pub mod metrics;

pub use config::ParallelCountConfig;
pub use engine::{ParallelCountEngine, RunOutcome, ShardSummary};
pub use metrics::{CountMetrics, CountMetricsCollector, CountTimer};
