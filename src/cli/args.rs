//! Command line argument parsing for the wikifreq CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Language, TokenizerVariant};
use crate::config::RunConfig;
use crate::error::Result;
use crate::extract::ShardFormat;
use crate::output::storage::Storage;

/// wikifreq - word frequency tables from Wikipedia dumps
#[derive(Parser, Debug, Clone)]
#[command(name = "wikifreq")]
#[command(about = "Count word frequencies in Wikipedia dump shards")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct WikiFreqArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Format of the run summary
    #[arg(long = "summary", default_value = "human", global = true)]
    pub summary_format: SummaryFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl WikiFreqArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Count word frequencies in dump shards and write the tables
    Count(CountArgs),

    /// Print the words a tokenizer variant finds in a text
    Tokenize(TokenizeArgs),
}

/// Output compression flags; at most one may be given.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct StorageArgs {
    /// Write uncompressed tables
    #[arg(long)]
    pub plain: bool,

    /// Write gzip-compressed tables (default)
    #[arg(long)]
    pub gzip: bool,

    /// Write bzip2-compressed tables
    #[arg(long)]
    pub bzip2: bool,

    /// Write xz (LZMA)-compressed tables
    #[arg(long)]
    pub xz: bool,
}

impl StorageArgs {
    pub fn storage(&self) -> Option<Storage> {
        if self.plain {
            Some(Storage::Plain)
        } else if self.gzip {
            Some(Storage::Gzip)
        } else if self.bzip2 {
            Some(Storage::Bzip2)
        } else if self.xz {
            Some(Storage::Xz)
        } else {
            None
        }
    }
}

/// Arguments for counting
#[derive(Parser, Debug, Clone)]
pub struct CountArgs {
    /// Dump shard files
    #[arg(value_name = "DUMPS")]
    pub dumps: Vec<PathBuf>,

    /// Output path pattern; '%' becomes the mutation suffix, '@' the variant
    #[arg(short, long, value_name = "PATTERN")]
    pub output: Option<String>,

    /// Language code of the dump (en, ja, zh, ...)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Tokenizer variant (regex, penn, ja-bundled, ja-external, zh); repeatable
    #[arg(long = "variant", value_name = "VARIANT")]
    pub variants: Vec<TokenizerVariant>,

    /// Installation directory of the external Japanese dictionary
    #[arg(long, value_name = "DIR")]
    pub dictionary_path: Option<PathBuf>,

    /// Minimum number of documents a word must appear in
    #[arg(short = 'm', long = "min-docs")]
    pub min_docs: Option<u64>,

    /// Number of shards counted in parallel
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Shard layout (xml or doc)
    #[arg(long)]
    pub format: Option<ShardFormat>,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Do not normalize typographic apostrophes before Penn tokenization
    #[arg(long)]
    pub no_smart_apostrophe: bool,

    /// Write tables even when some shards failed
    #[arg(long)]
    pub allow_partial: bool,

    /// JSON run configuration; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CountArgs {
    /// Build the run configuration from the config file, if any, and flags.
    pub fn to_run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if !self.dumps.is_empty() {
            config.dumps = self.dumps.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.as_str().into();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if !self.variants.is_empty() {
            config.variants = self.variants.clone();
        }
        if let Some(path) = &self.dictionary_path {
            config.dictionary_path = Some(path.clone());
        }
        if let Some(min_docs) = self.min_docs {
            config.min_doc_freq = min_docs;
        }
        if let Some(workers) = self.workers {
            config.worker_count = Some(workers);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(storage) = self.storage.storage() {
            config.storage = storage;
        }
        if self.no_smart_apostrophe {
            config.smart_apostrophe = false;
        }
        if self.allow_partial {
            config.allow_partial = true;
        }
        Ok(config)
    }
}

/// Arguments for tokenizing
#[derive(Parser, Debug, Clone)]
pub struct TokenizeArgs {
    /// Text to tokenize; read from stdin when absent
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Tokenizer variant
    #[arg(long, default_value = "regex")]
    pub variant: TokenizerVariant,

    /// Installation directory of the external Japanese dictionary
    #[arg(long, value_name = "DIR")]
    pub dictionary_path: Option<PathBuf>,

    /// Skip markup cleaning
    #[arg(long)]
    pub raw: bool,

    /// Print all four mutations of each word
    #[arg(long)]
    pub mutations: bool,

    /// Do not normalize typographic apostrophes before Penn tokenization
    #[arg(long)]
    pub no_smart_apostrophe: bool,
}

/// Summary formats available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::JapaneseDictionary;

    #[test]
    fn test_count_args() {
        let args = WikiFreqArgs::try_parse_from([
            "wikifreq",
            "count",
            "--language",
            "ja",
            "--variant",
            "ja-bundled",
            "--variant",
            "ja-external",
            "--dictionary-path",
            "/opt/unidic",
            "-o",
            "ja-@%.tsv.bz2",
            "--bzip2",
            "-m",
            "5",
            "jawiki-20240301-pages-articles1.xml.bz2",
            "jawiki-20240301-pages-articles2.xml.bz2",
        ])
        .unwrap();

        let Command::Count(count) = &args.command else {
            panic!("Expected Count command");
        };
        let config = count.to_run_config().unwrap();
        assert_eq!(config.language, Language::Japanese);
        assert_eq!(
            config.variants,
            vec![
                TokenizerVariant::Japanese(JapaneseDictionary::Bundled),
                TokenizerVariant::Japanese(JapaneseDictionary::External),
            ]
        );
        assert_eq!(config.storage, Storage::Bzip2);
        assert_eq!(config.min_doc_freq, 5);
        assert_eq!(config.dumps.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_flags_conflict() {
        let result = WikiFreqArgs::try_parse_from([
            "wikifreq", "count", "-o", "x.tsv", "--plain", "--gzip", "a.xml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_xz_flag() {
        let args = WikiFreqArgs::try_parse_from([
            "wikifreq", "count", "-o", "en%.tsv.xz", "--xz", "a.xml",
        ])
        .unwrap();
        let Command::Count(count) = &args.command else {
            panic!("Expected Count command");
        };
        assert_eq!(count.to_run_config().unwrap().storage, Storage::Xz);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let result = WikiFreqArgs::try_parse_from([
            "wikifreq", "count", "--variant", "mecab", "-o", "x.tsv", "a.xml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity() {
        let args = WikiFreqArgs::try_parse_from(["wikifreq", "-q", "tokenize", "x"]).unwrap();
        assert_eq!(args.verbosity(), 0);
        let args = WikiFreqArgs::try_parse_from(["wikifreq", "tokenize", "x"]).unwrap();
        assert_eq!(args.verbosity(), 1);
        let args = WikiFreqArgs::try_parse_from(["wikifreq", "-vv", "tokenize", "x"]).unwrap();
        assert_eq!(args.verbosity(), 3);
    }

    #[test]
    fn test_tokenize_args() {
        let args = WikiFreqArgs::try_parse_from([
            "wikifreq", "tokenize", "--variant", "penn", "--mutations", "can't",
        ])
        .unwrap();
        let Command::Tokenize(tokenize) = args.command else {
            panic!("Expected Tokenize command");
        };
        assert_eq!(tokenize.variant, TokenizerVariant::Penn);
        assert!(tokenize.mutations);
        assert_eq!(tokenize.text.as_deref(), Some("can't"));
    }
}
