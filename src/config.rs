//! Run configuration.
//!
//! A [`RunConfig`] describes one counting run: which language edition, which
//! tokenizer variants, where the shards are and where the tables go. It can
//! be built in code, loaded from JSON, or assembled from command line flags.
//!
//! ```
//! use wikifreq::analysis::analyzer::{Language, TokenizerVariant};
//! use wikifreq::config::RunConfig;
//!
//! let config = RunConfig::new(Language::English)
//!     .with_variants(vec![TokenizerVariant::Regex, TokenizerVariant::Penn])
//!     .with_output("out/en-@%.tsv.gz")
//!     .with_dumps(vec!["enwiki-20240301-pages-articles1.xml.bz2".into()]);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.min_doc_freq, 3);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{AnalyzerOptions, Language, TokenizerVariant};
use crate::error::{Result, WikiFreqError};
use crate::extract::ShardFormat;
use crate::output::pattern::OutputPattern;
use crate::output::storage::Storage;
use crate::output::table::DEFAULT_MIN_DOC_FREQ;
use crate::parallel_count::config::ParallelCountConfig;

/// Configuration of one counting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Language edition; selects the default tokenizer variant.
    pub language: Language,

    /// Tokenizer variants to run. Empty means the language default.
    pub variants: Vec<TokenizerVariant>,

    /// Installation directory of the external Japanese dictionary.
    pub dictionary_path: Option<PathBuf>,

    /// Rows with fewer documents are left out of the tables.
    pub min_doc_freq: u64,

    /// Number of shards counted in parallel.
    /// If None, uses the number of CPU cores minus one.
    pub worker_count: Option<usize>,

    /// Normalize typographic apostrophes before Penn tokenization.
    pub smart_apostrophe: bool,

    /// Layout of the shard files.
    pub format: ShardFormat,

    /// Compression of the written tables.
    pub storage: Storage,

    /// Output path pattern, see [`OutputPattern`].
    pub output: OutputPattern,

    /// Write tables even when some shards failed.
    pub allow_partial: bool,

    /// Shard files to count.
    pub dumps: Vec<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            variants: Vec::new(),
            dictionary_path: None,
            min_doc_freq: DEFAULT_MIN_DOC_FREQ,
            worker_count: None,
            smart_apostrophe: true,
            format: ShardFormat::default(),
            storage: Storage::default(),
            output: OutputPattern::default(),
            allow_partial: false,
            dumps: Vec::new(),
        }
    }
}

impl RunConfig {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            WikiFreqError::config(format!("Cannot read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_variants(mut self, variants: Vec<TokenizerVariant>) -> Self {
        self.variants = variants;
        self
    }

    pub fn with_dictionary_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dictionary_path = Some(path.into());
        self
    }

    pub fn with_min_doc_freq(mut self, min_doc_freq: u64) -> Self {
        self.min_doc_freq = min_doc_freq;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = Some(worker_count);
        self
    }

    pub fn with_smart_apostrophe(mut self, enabled: bool) -> Self {
        self.smart_apostrophe = enabled;
        self
    }

    pub fn with_format(mut self, format: ShardFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_output<P: Into<OutputPattern>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_allow_partial(mut self, allow: bool) -> Self {
        self.allow_partial = allow;
        self
    }

    pub fn with_dumps(mut self, dumps: Vec<PathBuf>) -> Self {
        self.dumps = dumps;
        self
    }

    /// Requested variants without duplicates, or the language default.
    pub fn effective_variants(&self) -> Vec<TokenizerVariant> {
        if self.variants.is_empty() {
            return self.language.default_variants();
        }
        let mut variants = Vec::with_capacity(self.variants.len());
        for variant in &self.variants {
            if !variants.contains(variant) {
                variants.push(*variant);
            }
        }
        variants
    }

    pub fn effective_worker_count(&self) -> usize {
        self.worker_count
            .unwrap_or_else(|| num_cpus::get().saturating_sub(1))
            .max(1)
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            dictionary_path: self.dictionary_path.clone(),
            smart_apostrophe: self.smart_apostrophe,
        }
    }

    pub fn parallel_config(&self) -> ParallelCountConfig {
        ParallelCountConfig::default()
            .with_thread_pool_size(self.effective_worker_count())
            .with_allow_partial_failures(self.allow_partial)
    }

    /// Check the configuration before any work starts. Suspicious but usable
    /// settings are logged as warnings.
    pub fn validate(&self) -> Result<()> {
        if self.dumps.is_empty() {
            return Err(WikiFreqError::config("No dump shards given"));
        }
        if self.worker_count == Some(0) {
            return Err(WikiFreqError::config("worker_count must be at least 1"));
        }

        let variants = self.effective_variants();
        for variant in &variants {
            if variant.needs_dictionary_path() && self.dictionary_path.is_none() {
                return Err(WikiFreqError::config(format!(
                    "Variant {variant} needs dictionary_path"
                )));
            }
            if !self.language.supports(*variant) {
                log::warn!(
                    "Variant {variant} is not meant for language {}",
                    self.language
                );
            }
        }
        self.output.validate(variants.len())?;

        let sample = self
            .output
            .path(variants[0], crate::analysis::mutation::Mutation::Identity);
        if let Some(sample) = sample {
            if !self.storage.matches_path(&sample) {
                log::warn!(
                    "Output {} does not end with {:?} for {} storage",
                    sample.display(),
                    self.storage.suffix(),
                    self.storage
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::JapaneseDictionary;

    fn base() -> RunConfig {
        RunConfig::new(Language::Japanese)
            .with_output("ja%.tsv.gz")
            .with_dumps(vec![PathBuf::from("jawiki-20240301-pages-articles1.xml.bz2")])
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.min_doc_freq, 3);
        assert!(config.smart_apostrophe);
        assert_eq!(config.storage, Storage::Gzip);
        assert!(!config.allow_partial);
        assert!(config.effective_worker_count() >= 1);
        assert_eq!(config.effective_variants(), vec![TokenizerVariant::Penn]);
    }

    #[test]
    fn test_effective_variants_dedup() {
        let config = base().with_variants(vec![
            TokenizerVariant::Regex,
            TokenizerVariant::Regex,
            TokenizerVariant::Japanese(JapaneseDictionary::Bundled),
        ]);
        assert_eq!(config.effective_variants().len(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(base().validate().is_ok());
        assert!(base().with_dumps(Vec::new()).validate().is_err());
        assert!(base().with_worker_count(0).validate().is_err());

        let external = base().with_variants(vec![TokenizerVariant::Japanese(JapaneseDictionary::External)]);
        assert!(external.validate().is_err());
        assert!(external.with_dictionary_path("/opt/unidic").validate().is_ok());

        let two = base().with_variants(vec![
            TokenizerVariant::Japanese(JapaneseDictionary::Bundled),
            TokenizerVariant::Regex,
        ]);
        assert!(two.clone().validate().is_err());
        assert!(two.with_output("ja-@%.tsv.gz").validate().is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{
                "language": "zh",
                "variants": ["zh", "regex"],
                "min_doc_freq": 5,
                "storage": "bzip2",
                "output": "zh-@%.tsv.bz2",
                "dumps": ["a.xml.bz2"]
            }"#,
        )
        .unwrap();

        let config = RunConfig::from_json_file(&path).unwrap();
        assert_eq!(config.language, Language::Chinese);
        assert_eq!(
            config.variants,
            vec![TokenizerVariant::Chinese, TokenizerVariant::Regex]
        );
        assert_eq!(config.min_doc_freq, 5);
        assert_eq!(config.storage, Storage::Bzip2);
        assert!(config.smart_apostrophe);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_file_errors() {
        assert!(matches!(
            RunConfig::from_json_file("/nonexistent/run.json"),
            Err(WikiFreqError::Config(_))
        ));

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"variants": ["mecab"]}"#).unwrap();
        assert!(RunConfig::from_json_file(&path).is_err());
    }

    #[test]
    fn test_parallel_config() {
        let config = base().with_worker_count(3).with_allow_partial(true);
        let parallel = config.parallel_config();
        assert_eq!(parallel.thread_pool_size, Some(3));
        assert!(parallel.allow_partial_failures);
    }
}
