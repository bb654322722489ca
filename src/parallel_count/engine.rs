//! Main parallel counting engine implementation.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam_channel::unbounded;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::analysis::analyzer::TokenizerVariant;
use crate::counting::aggregate::Aggregator;
use crate::counting::count::{ShardCounts, Totals};
use crate::counting::shard::ShardCounter;
use crate::error::{Result, WikiFreqError};
use crate::parallel_count::config::ParallelCountConfig;
use crate::parallel_count::metrics::{CountMetrics, CountMetricsCollector, CountTimer};

/// What happened to one shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSummary {
    pub path: PathBuf,
    pub articles: u64,
    pub skipped_articles: u64,
    pub elapsed: Duration,
    pub failed: bool,
}

/// Result of counting a set of shards.
#[derive(Debug)]
pub struct RunOutcome {
    /// Merged counts of every shard that succeeded.
    pub counts: ShardCounts,

    /// One summary per shard, in completion order.
    pub shards: Vec<ShardSummary>,

    /// Shards that failed, with their errors. They contribute no counts.
    pub failed_shards: Vec<(PathBuf, WikiFreqError)>,

    /// Metrics of this run alone.
    pub metrics: CountMetrics,

    /// Total execution time.
    pub execution_time: Duration,
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed_shards.is_empty()
    }

    pub fn totals(&self, variant: TokenizerVariant) -> Totals {
        self.counts.totals(variant)
    }

    /// Fail unless every shard was counted or partial results are accepted.
    pub fn check_complete(&self, allow_partial: bool) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        let failed: Vec<_> = self
            .failed_shards
            .iter()
            .map(|(path, _)| path.display().to_string())
            .collect();
        if allow_partial {
            log::warn!(
                "Continuing without {} failed shard(s): {}",
                failed.len(),
                failed.join(", ")
            );
            Ok(())
        } else {
            Err(WikiFreqError::other(format!(
                "{} of {} shards failed: {}",
                failed.len(),
                self.shards.len(),
                failed.join(", ")
            )))
        }
    }
}

/// Counts shards on a fixed-size worker pool and merges the results.
pub struct ParallelCountEngine {
    config: ParallelCountConfig,
    thread_pool: ThreadPool,
}

impl ParallelCountEngine {
    /// Create a new parallel counting engine.
    pub fn new(config: ParallelCountConfig) -> Result<Self> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(config.effective_thread_pool_size())
            .thread_name(|i| format!("parallel-count-{i}"))
            .build()
            .map_err(|e| WikiFreqError::thread_pool(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            config,
            thread_pool,
        })
    }

    pub fn config(&self) -> &ParallelCountConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Count `shards` in parallel.
    pub fn count(&self, counter: &ShardCounter, shards: &[PathBuf]) -> Result<RunOutcome> {
        self.count_with_progress(counter, shards, |_| {})
    }

    /// Count `shards` in parallel, calling `on_shard` on the coordinating
    /// thread as each shard finishes. Metrics start from zero on every call.
    pub fn count_with_progress<F>(
        &self,
        counter: &ShardCounter,
        shards: &[PathBuf],
        mut on_shard: F,
    ) -> Result<RunOutcome>
    where
        F: FnMut(&ShardSummary),
    {
        let timer = CountTimer::start();
        let metrics = CountMetricsCollector::new();
        log::info!(
            "Counting {} shard(s) on {} worker(s)",
            shards.len(),
            self.worker_count()
        );

        let (tx, rx) = unbounded();
        for shard in shards {
            let tx = tx.clone();
            let counter = counter.clone();
            let shard = shard.clone();

            self.thread_pool.spawn(move || {
                let timer = CountTimer::start();
                let result = count_guarded(&counter, &shard);
                let _ = tx.send((shard, result, timer.elapsed()));
            });
        }

        // Drop the original sender so the receiver knows when all tasks are done
        drop(tx);

        let mut aggregator = Aggregator::with_counts(counter.empty_counts());
        let mut summaries = Vec::with_capacity(shards.len());
        let mut failed_shards = Vec::new();

        for (path, result, elapsed) in rx {
            let summary = match result {
                Ok(counts) => {
                    if self.config.enable_metrics {
                        metrics.record_shard(elapsed, &counts);
                    }
                    log::info!(
                        "Counted {} ({} articles in {:.1?})",
                        path.display(),
                        counts.articles,
                        elapsed
                    );
                    let summary = ShardSummary {
                        path,
                        articles: counts.articles,
                        skipped_articles: counts.skipped_articles,
                        elapsed,
                        failed: false,
                    };
                    aggregator.merge(counts);
                    summary
                }
                Err(e) => {
                    if self.config.enable_metrics {
                        metrics.record_failure(elapsed);
                    }
                    log::error!("{e}");
                    let summary = ShardSummary {
                        path: path.clone(),
                        articles: 0,
                        skipped_articles: 0,
                        elapsed,
                        failed: true,
                    };
                    failed_shards.push((path, e));
                    summary
                }
            };
            on_shard(&summary);
            summaries.push(summary);
        }

        if summaries.len() != shards.len() {
            return Err(WikiFreqError::thread_pool(format!(
                "Expected {} shard results, received {}",
                shards.len(),
                summaries.len()
            )));
        }

        Ok(RunOutcome {
            counts: aggregator.finish(),
            shards: summaries,
            failed_shards,
            metrics: metrics.snapshot(),
            execution_time: timer.elapsed(),
        })
    }
}

/// Count one shard, turning a panic inside a tokenizer into a shard failure.
fn count_guarded(counter: &ShardCounter, shard: &Path) -> Result<ShardCounts> {
    match panic::catch_unwind(AssertUnwindSafe(|| counter.count_shard(shard))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(WikiFreqError::shard(
                shard,
                WikiFreqError::other(format!("worker panicked: {message}")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::analysis::analyzer::{AnalyzerOptions, WordAnalyzer};
    use crate::analysis::mutation::Mutation;
    use crate::extract::doc_file::DocFileExtractor;
    use crate::observe::CollectingReporter;

    fn counter() -> ShardCounter {
        let analyzer = WordAnalyzer::new(TokenizerVariant::Regex, &AnalyzerOptions::default()).unwrap();
        ShardCounter::new(
            vec![Arc::new(analyzer)],
            Arc::new(DocFileExtractor),
            Arc::new(CollectingReporter::new()),
        )
    }

    fn write_shard(dir: &TempDir, name: &str, docs: &[(&str, &str)]) -> PathBuf {
        let mut text = String::new();
        for (id, body) in docs {
            text.push_str(&format!("<doc id=\"{id}\" url=\"\" title=\"{id}\">\n{body}\n</doc>\n"));
        }
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn engine(threads: usize) -> ParallelCountEngine {
        ParallelCountEngine::new(ParallelCountConfig::default().with_thread_pool_size(threads)).unwrap()
    }

    #[test]
    fn test_count_shards() {
        let dir = TempDir::new().unwrap();
        let shards = vec![
            write_shard(&dir, "a.txt", &[("1", "apple banana"), ("2", "apple")]),
            write_shard(&dir, "b.txt", &[("3", "apple cherry cherry")]),
        ];

        let outcome = engine(2).count(&counter(), &shards).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.shards.len(), 2);
        assert_eq!(outcome.counts.articles, 3);

        let identity = outcome
            .counts
            .variant(TokenizerVariant::Regex)
            .unwrap()
            .get(Mutation::Identity);
        let apple = identity.get("apple").unwrap();
        assert_eq!((apple.occurrences, apple.documents), (3, 3));
        let cherry = identity.get("cherry").unwrap();
        assert_eq!((cherry.occurrences, cherry.documents), (2, 1));

        assert_eq!(outcome.metrics.shards_completed, 2);
        assert_eq!(outcome.metrics.articles_processed, 3);
    }

    #[test]
    fn test_failed_shard_is_surfaced() {
        let dir = TempDir::new().unwrap();
        let shards = vec![
            write_shard(&dir, "a.txt", &[("1", "apple")]),
            dir.path().join("missing.txt"),
        ];

        let mut seen = Vec::new();
        let outcome = engine(2)
            .count_with_progress(&counter(), &shards, |s| seen.push(s.failed))
            .unwrap();
        assert_eq!(seen.len(), 2);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failed_shards.len(), 1);
        assert_eq!(outcome.failed_shards[0].0, shards[1]);
        assert_eq!(outcome.counts.articles, 1);

        assert!(outcome.check_complete(false).is_err());
        assert!(outcome.check_complete(true).is_ok());
    }

    #[test]
    fn test_metrics_reset_between_runs() {
        let dir = TempDir::new().unwrap();
        let shards = vec![write_shard(&dir, "a.txt", &[("1", "apple"), ("2", "pear")])];
        let engine = engine(1);
        let counter = counter();

        let first = engine.count(&counter, &shards).unwrap();
        let second = engine.count(&counter, &shards).unwrap();
        assert_eq!(first.metrics.shards_completed, 1);
        assert_eq!(second.metrics.shards_completed, 1);
        assert_eq!(second.metrics.articles_processed, 2);
    }

    #[test]
    fn test_metrics_disabled() {
        let dir = TempDir::new().unwrap();
        let shards = vec![write_shard(&dir, "a.txt", &[("1", "apple")])];
        let engine = ParallelCountEngine::new(
            ParallelCountConfig::default()
                .with_thread_pool_size(1)
                .with_metrics(false),
        )
        .unwrap();

        let outcome = engine.count(&counter(), &shards).unwrap();
        assert_eq!(outcome.counts.articles, 1);
        assert_eq!(outcome.metrics.shards_completed, 0);
        assert_eq!(outcome.metrics.articles_processed, 0);
    }

    #[test]
    fn test_no_shards() {
        let outcome = engine(1).count(&counter(), &[]).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.totals(TokenizerVariant::Regex), Totals::default());
    }
}
