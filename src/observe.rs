//! Reporting of skipped articles and cleaning warnings.
//!
//! A [`SkipReporter`] receives one event per problem article. Reporting never
//! fails and never stops processing.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Sink for per-article problems.
pub trait SkipReporter: Send + Sync {
    /// Record that `article_id` of `shard` was skipped or needs attention.
    fn report(&self, shard: &Path, article_id: &str, reason: &str);
}

/// Writes each event to the log as a warning.
#[derive(Clone, Debug, Default)]
pub struct LogReporter;

impl SkipReporter for LogReporter {
    fn report(&self, shard: &Path, article_id: &str, reason: &str) {
        log::warn!("{}: article {article_id}: {reason}", shard.display());
    }
}

/// One reported event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkipEvent {
    pub shard: PathBuf,
    pub article_id: String,
    pub reason: String,
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<SkipEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SkipEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl SkipReporter for CollectingReporter {
    fn report(&self, shard: &Path, article_id: &str, reason: &str) {
        self.events.lock().push(SkipEvent {
            shard: shard.to_path_buf(),
            article_id: article_id.to_string(),
            reason: reason.to_string(),
        });
    }
}
