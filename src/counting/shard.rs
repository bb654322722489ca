//! The shard counter.
//!
//! For every article of a shard: clean the text once, tokenize it with each
//! requested variant, expand every word into its mutations and fold the
//! article into the shard's counts. An article that cannot be extracted or
//! tokenized is reported and skipped as a whole, so it contributes neither
//! to token counts nor to the article total.

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::{TokenizerVariant, WordAnalyzer};
use crate::analysis::char_filter::markup::MarkupCharFilter;
use crate::analysis::mutation::Mutations;
use crate::config::RunConfig;
use crate::counting::count::ShardCounts;
use crate::error::{Result, WikiFreqError};
use crate::extract::{Article, Extractor};
use crate::observe::SkipReporter;

type ArticleCounts = [AHashMap<String, u64>; 4];

/// Counts the articles of one shard at a time. Cheap to clone; clones share
/// the analyzers.
#[derive(Clone)]
pub struct ShardCounter {
    analyzers: Vec<Arc<WordAnalyzer>>,
    extractor: Arc<dyn Extractor>,
    reporter: Arc<dyn SkipReporter>,
    cleaner: Arc<MarkupCharFilter>,
}

impl ShardCounter {
    pub fn new(
        analyzers: Vec<Arc<WordAnalyzer>>,
        extractor: Arc<dyn Extractor>,
        reporter: Arc<dyn SkipReporter>,
    ) -> Self {
        ShardCounter {
            analyzers,
            extractor,
            reporter,
            cleaner: Arc::new(MarkupCharFilter::new()),
        }
    }

    /// Build the analyzers and extractor a run configuration asks for.
    /// Fails before any shard is read if a dictionary cannot be loaded.
    pub fn from_config(config: &RunConfig, reporter: Arc<dyn SkipReporter>) -> Result<Self> {
        let options = config.analyzer_options();
        let analyzers = config
            .effective_variants()
            .into_iter()
            .map(|variant| WordAnalyzer::new(variant, &options).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(analyzers, Arc::from(config.format.extractor()), reporter))
    }

    pub fn variants(&self) -> Vec<TokenizerVariant> {
        self.analyzers.iter().map(|a| a.variant()).collect()
    }

    /// Empty counts with a table for each analyzer's variant.
    pub fn empty_counts(&self) -> ShardCounts {
        ShardCounts::new(&self.variants())
    }

    /// Count every article of `shard`. Fails only when the shard cannot be
    /// opened or read.
    pub fn count_shard(&self, shard: &Path) -> Result<ShardCounts> {
        let articles = self
            .extractor
            .extract(shard)
            .map_err(|e| WikiFreqError::shard(shard, e))?;

        let mut counts = self.empty_counts();
        for article in articles {
            match article {
                Ok(article) => self.count_article(shard, &article, &mut counts),
                Err(e) if e.is_recoverable() => {
                    let id = match &e {
                        WikiFreqError::MalformedArticle { article_id, .. } => article_id.clone(),
                        _ => String::new(),
                    };
                    self.reporter.report(shard, &id, &e.to_string());
                    counts.skipped_articles += 1;
                }
                Err(e) => return Err(WikiFreqError::shard(shard, e)),
            }
        }

        log::debug!(
            "{}: {} articles, {} skipped",
            shard.display(),
            counts.articles,
            counts.skipped_articles
        );
        Ok(counts)
    }

    /// Fold one article into `counts`, or report it and skip it.
    pub fn count_article(&self, shard: &Path, article: &Article, counts: &mut ShardCounts) {
        let cleaned = self.cleaner.clean(&article.text);
        if !cleaned.warnings.is_empty() {
            counts.warnings += 1;
            for warning in &cleaned.warnings {
                self.reporter.report(shard, &article.id, &warning.to_string());
            }
        }

        let mut per_variant = Vec::with_capacity(self.analyzers.len());
        for analyzer in &self.analyzers {
            match analyzer.words(&cleaned.text) {
                Ok(words) => per_variant.push((analyzer.variant(), words)),
                Err(e) => {
                    self.reporter.report(
                        shard,
                        &article.id,
                        &format!("{} tokenizer failed: {e}", analyzer.variant()),
                    );
                    counts.skipped_articles += 1;
                    return;
                }
            }
        }

        for (variant, words) in per_variant {
            let tokens = words.len() as u64;
            counts
                .variant_mut(variant)
                .add_document(article_counts(words), tokens);
        }
        counts.articles += 1;
    }
}

/// Per-mutation occurrences of `words` within one article.
fn article_counts(words: Vec<String>) -> ArticleCounts {
    let mut tables: ArticleCounts = Default::default();
    for word in words {
        for (table, form) in tables.iter_mut().zip(Mutations::expand(&word).into_forms()) {
            *table.entry(form).or_insert(0) += 1;
        }
    }
    tables
}
