//! Article extraction from dump shards.
//!
//! An [`Extractor`] turns one shard file into a lazy, single-pass stream of
//! [`Article`]s. Errors inside the stream are either per-article
//! ([`WikiFreqError::MalformedArticle`], the article is skipped) or I/O errors
//! that end the stream and fail the shard.
//!
//! Shards may be plain, gzip (`.gz`) or bzip2 (`.bz2`) files; the format is
//! picked from the file name.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WikiFreqError};

pub mod doc_file;
pub mod shard_name;
pub mod wikitext;
pub mod xml_dump;

pub use doc_file::DocFileExtractor;
pub use shard_name::ShardName;
pub use xml_dump::XmlDumpExtractor;

const READ_BUFFER_SIZE: usize = 256 * 1024;

/// One article of a shard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Article {
    /// Identifier as found in the shard (page id).
    pub id: String,
    /// Plain text, one paragraph or heading per line.
    pub text: String,
}

impl Article {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Article {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A lazy stream of articles.
pub type ArticleStream = Box<dyn Iterator<Item = Result<Article>> + Send>;

/// Produces the articles of one shard.
pub trait Extractor: Send + Sync {
    /// Open `shard` and stream its articles.
    fn extract(&self, shard: &Path) -> Result<ArticleStream>;

    /// Get the name of this extractor.
    fn name(&self) -> &'static str;
}

/// Open a shard for buffered reading, decompressing by file suffix.
pub fn open_shard(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead + Send> = match path.extension().and_then(|e| e.to_str()) {
        Some("bz2") => Box::new(BufReader::with_capacity(
            READ_BUFFER_SIZE,
            MultiBzDecoder::new(file),
        )),
        Some("gz") => Box::new(BufReader::with_capacity(
            READ_BUFFER_SIZE,
            MultiGzDecoder::new(file),
        )),
        _ => Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file)),
    };
    Ok(reader)
}

/// Read one line as bytes and decode it lossily. Returns `Ok(None)` at end of
/// input. The line terminator is removed.
pub(crate) fn read_line_lossy<R: BufRead + ?Sized>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Shard file formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardFormat {
    /// Raw MediaWiki `pages-articles` XML.
    #[default]
    Xml,
    /// Plain text articles wrapped in `<doc id=…>…</doc>`.
    Doc,
}

impl ShardFormat {
    pub fn extractor(self) -> Box<dyn Extractor> {
        match self {
            ShardFormat::Xml => Box::new(XmlDumpExtractor::new()),
            ShardFormat::Doc => Box::new(DocFileExtractor::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShardFormat::Xml => "xml",
            ShardFormat::Doc => "doc",
        }
    }
}

impl fmt::Display for ShardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShardFormat {
    type Err = WikiFreqError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xml" => Ok(ShardFormat::Xml),
            "doc" => Ok(ShardFormat::Doc),
            _ => Err(WikiFreqError::invalid_argument(format!(
                "Unknown shard format '{s}', expected 'xml' or 'doc'"
            ))),
        }
    }
}
