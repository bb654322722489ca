//! Frequency table serialization.
//!
//! A table is tab-separated text:
//!
//! ```text
//! word	count	documents
//! the	120	40
//! of	80	35
//! [TOTAL]	950	41
//! ```
//!
//! Rows with fewer documents than the threshold are dropped. The remaining
//! rows are ordered by count, highest first, ties by word in byte order. The
//! last row carries the totals over everything counted, filtered rows
//! included, so the visible rows never add up to it.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::counting::count::{CountEntry, TokenCounts, Totals};
use crate::error::Result;
use crate::output::storage::Storage;

/// Label of the totals row.
pub const TOTAL_LABEL: &str = "[TOTAL]";

/// Default minimum document frequency.
pub const DEFAULT_MIN_DOC_FREQ: u64 = 3;

const COLUMNS: [&str; 3] = ["word", "count", "documents"];

/// What was written for one table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub rows_written: usize,
    pub rows_dropped: usize,
    pub totals: Totals,
}

/// Filters, sorts and writes count tables.
#[derive(Clone, Copy, Debug)]
pub struct TableWriter {
    min_doc_freq: u64,
}

impl Default for TableWriter {
    fn default() -> Self {
        TableWriter::new(DEFAULT_MIN_DOC_FREQ)
    }
}

impl TableWriter {
    /// `min_doc_freq` of 0 or 1 keeps every row.
    pub fn new(min_doc_freq: u64) -> Self {
        TableWriter { min_doc_freq }
    }

    pub fn min_doc_freq(&self) -> u64 {
        self.min_doc_freq
    }

    /// Rows that pass the filter, in output order.
    pub fn rows<'a>(&self, counts: &'a TokenCounts) -> Vec<(&'a str, CountEntry)> {
        let mut rows: Vec<_> = counts
            .iter()
            .filter(|(_, entry)| entry.documents >= self.min_doc_freq)
            .collect();
        rows.sort_unstable_by(|(a_token, a), (b_token, b)| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a_token.cmp(b_token))
        });
        rows
    }

    /// Write the table for `counts` to `out`.
    pub fn write<W: Write>(&self, counts: &TokenCounts, totals: Totals, mut out: W) -> Result<TableSummary> {
        let rows = self.rows(counts);

        writeln!(out, "{}", COLUMNS.join("\t"))?;
        for (token, entry) in &rows {
            writeln!(out, "{token}\t{}\t{}", entry.occurrences, entry.documents)?;
        }
        writeln!(
            out,
            "{TOTAL_LABEL}\t{}\t{}",
            totals.total_tokens, totals.total_documents
        )?;
        out.flush()?;

        Ok(TableSummary {
            rows_written: rows.len(),
            rows_dropped: counts.len() - rows.len(),
            totals,
        })
    }

    /// Write the table for `counts` to `path` through `storage`.
    pub fn write_file(
        &self,
        counts: &TokenCounts,
        totals: Totals,
        path: &Path,
        storage: Storage,
    ) -> Result<TableSummary> {
        let mut writer = storage.create(path)?;
        let summary = self.write(counts, totals, &mut writer)?;
        writer.finish()?;
        log::info!(
            "Wrote {} ({} rows, {} below {} documents)",
            path.display(),
            summary.rows_written,
            summary.rows_dropped,
            self.min_doc_freq
        );
        Ok(summary)
    }
}
