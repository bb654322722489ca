//! Dump shard file names.
//!
//! Wikimedia names article dump shards
//! `{lang}wiki-{date}-pages-articles{N}.xml[-p{first}p{last}].bz2`, e.g.
//! `jawiki-20240301-pages-articles3.xml-p114476p390740.bz2`.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SHARD_NAME: Regex = Regex::new(concat!(
        r"^(?P<lang>[a-z][a-z_-]*?)wiki-(?P<date>\d{8}|latest)-pages-articles",
        r"(?:-multistream)?(?P<part>\d*)\.xml(?:-p(?P<first>\d+)p(?P<last>\d+))?",
        r"(?:\.bz2)?$",
    ))
    .unwrap();
}

/// Fields encoded in a shard's file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardName {
    pub language: String,
    pub date: String,
    pub part: Option<u32>,
    /// First and last page id covered by the shard.
    pub page_range: Option<(u64, u64)>,
}

impl ShardName {
    /// Parse the file name of `path`; `None` when it does not follow the
    /// dump naming scheme.
    pub fn parse(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let caps = SHARD_NAME.captures(file_name)?;

        let part = match &caps["part"] {
            "" => None,
            digits => Some(digits.parse().ok()?),
        };
        let page_range = match (caps.name("first"), caps.name("last")) {
            (Some(first), Some(last)) => {
                Some((first.as_str().parse().ok()?, last.as_str().parse().ok()?))
            }
            _ => None,
        };

        Some(ShardName {
            language: caps["lang"].replace('_', "-"),
            date: caps["date"].to_string(),
            part,
            page_range,
        })
    }
}
