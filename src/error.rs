//! Error types for the wikifreq library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`WikiFreqError`] enum. Errors fall into three groups:
//!
//! - per-article errors ([`WikiFreqError::MalformedArticle`]) which the shard
//!   counter skips and reports,
//! - per-shard errors (I/O while reading an archive) which fail one shard task,
//! - run-fatal errors (a tokenizer dictionary that cannot be loaded, an invalid
//!   configuration) which stop a run before any shard is touched.
//!
//! # Examples
//!
//! ```
//! use wikifreq::error::{WikiFreqError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(WikiFreqError::invalid_argument("no dump shards given"))
//! }
//!
//! assert!(example_operation().is_err());
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for wikifreq operations.
#[derive(Error, Debug)]
pub enum WikiFreqError {
    /// I/O errors (reading shards, writing tables).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Tokenization and text analysis errors.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A tokenizer resource (e.g. a morphological dictionary) could not be loaded.
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// A single article could not be extracted or analyzed.
    #[error("Malformed article {article_id}: {reason}")]
    MalformedArticle { article_id: String, reason: String },

    /// A shard task failed as a whole.
    #[error("Shard {} failed: {source}", .path.display())]
    Shard {
        path: PathBuf,
        #[source]
        source: Box<WikiFreqError>,
    },

    /// Invalid run configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Worker pool errors.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with WikiFreqError.
pub type Result<T> = std::result::Result<T, WikiFreqError>;

impl WikiFreqError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        WikiFreqError::Analysis(msg.into())
    }

    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        WikiFreqError::Dictionary(msg.into())
    }

    /// Create a new malformed article error.
    pub fn malformed_article<I: Into<String>, R: Into<String>>(article_id: I, reason: R) -> Self {
        WikiFreqError::MalformedArticle {
            article_id: article_id.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error as the failure of the shard at `path`.
    pub fn shard<P: Into<PathBuf>>(path: P, source: WikiFreqError) -> Self {
        WikiFreqError::Shard {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        WikiFreqError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        WikiFreqError::InvalidArgument(msg.into())
    }

    /// Create a new thread pool error.
    pub fn thread_pool<S: Into<String>>(msg: S) -> Self {
        WikiFreqError::ThreadPool(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        WikiFreqError::Other(msg.into())
    }

    /// Whether processing can continue past this error by skipping one article.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WikiFreqError::MalformedArticle { .. })
    }
}
