//! Output compression.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use xz2::write::XzEncoder;

use crate::error::{Result, WikiFreqError};

const WRITE_BUFFER_SIZE: usize = 256 * 1024;
const XZ_PRESET: u32 = 6;

/// How a table file is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    Plain,
    #[default]
    Gzip,
    Bzip2,
    Xz,
}

impl Storage {
    /// Conventional file name suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Storage::Plain => "",
            Storage::Gzip => ".gz",
            Storage::Bzip2 => ".bz2",
            Storage::Xz => ".xz",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Storage::Plain => "plain",
            Storage::Gzip => "gzip",
            Storage::Bzip2 => "bzip2",
            Storage::Xz => "xz",
        }
    }

    /// Whether `path` ends with the suffix of this storage. Plain storage
    /// matches any path without a compression suffix.
    pub fn matches_path(self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        match self {
            Storage::Plain => [Storage::Gzip, Storage::Bzip2, Storage::Xz]
                .iter()
                .all(|s| !name.ends_with(s.suffix())),
            _ => name.ends_with(self.suffix()),
        }
    }

    /// Create `path` for writing through this storage's compressor.
    pub fn create(self, path: &Path) -> Result<StorageWriter> {
        if !self.matches_path(path) {
            log::warn!(
                "{} does not end with {:?}, but is written as {}",
                path.display(),
                self.suffix(),
                self.name()
            );
        }
        let file = BufWriter::with_capacity(WRITE_BUFFER_SIZE, File::create(path)?);
        Ok(match self {
            Storage::Plain => StorageWriter::Plain(file),
            Storage::Gzip => StorageWriter::Gzip(GzEncoder::new(file, flate2::Compression::default())),
            Storage::Bzip2 => StorageWriter::Bzip2(BzEncoder::new(file, bzip2::Compression::default())),
            Storage::Xz => StorageWriter::Xz(XzEncoder::new(file, XZ_PRESET)),
        })
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Storage {
    type Err = WikiFreqError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(Storage::Plain),
            "gzip" | "gz" | "deflate" => Ok(Storage::Gzip),
            "bzip2" | "bz2" => Ok(Storage::Bzip2),
            "xz" | "lzma" => Ok(Storage::Xz),
            _ => Err(WikiFreqError::invalid_argument(format!(
                "Unknown storage '{s}', expected plain, gzip, bzip2 or xz"
            ))),
        }
    }
}

/// A file being written through a compressor. Call [`finish`](Self::finish)
/// to flush the compressed stream and surface write errors.
pub enum StorageWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Bzip2(BzEncoder<BufWriter<File>>),
    Xz(XzEncoder<BufWriter<File>>),
}

impl StorageWriter {
    pub fn finish(self) -> Result<()> {
        let mut file = match self {
            StorageWriter::Plain(file) => file,
            StorageWriter::Gzip(encoder) => encoder.finish()?,
            StorageWriter::Bzip2(encoder) => encoder.finish()?,
            StorageWriter::Xz(encoder) => encoder.finish()?,
        };
        file.flush()?;
        Ok(())
    }
}

impl Write for StorageWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StorageWriter::Plain(w) => w.write(buf),
            StorageWriter::Gzip(w) => w.write(buf),
            StorageWriter::Bzip2(w) => w.write(buf),
            StorageWriter::Xz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StorageWriter::Plain(w) => w.flush(),
            StorageWriter::Gzip(w) => w.flush(),
            StorageWriter::Bzip2(w) => w.flush(),
            StorageWriter::Xz(w) => w.flush(),
        }
    }
}
