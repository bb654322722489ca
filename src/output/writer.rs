//! Writing every table of a run.

use std::fs;
use std::path::PathBuf;

use crate::analysis::analyzer::TokenizerVariant;
use crate::analysis::mutation::Mutation;
use crate::config::RunConfig;
use crate::counting::count::ShardCounts;
use crate::error::Result;
use crate::output::pattern::OutputPattern;
use crate::output::storage::Storage;
use crate::output::table::{TableSummary, TableWriter};

/// One table file that was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenTable {
    pub variant: TokenizerVariant,
    pub mutation: Mutation,
    pub path: PathBuf,
    pub summary: TableSummary,
}

/// Writes one table per (variant, mutation) of merged counts.
#[derive(Clone, Debug)]
pub struct RunWriter {
    pattern: OutputPattern,
    storage: Storage,
    table: TableWriter,
}

impl RunWriter {
    pub fn new(pattern: OutputPattern, storage: Storage, min_doc_freq: u64) -> Self {
        RunWriter {
            pattern,
            storage,
            table: TableWriter::new(min_doc_freq),
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        RunWriter::new(config.output.clone(), config.storage, config.min_doc_freq)
    }

    /// Write the tables of every variant in `counts`. Parent directories are
    /// created as needed.
    pub fn write_all(&self, counts: &ShardCounts) -> Result<Vec<WrittenTable>> {
        let mut written = Vec::new();
        for (variant, variant_counts) in counts.variants() {
            let totals = counts.totals(variant);
            for mutation in self.pattern.mutations() {
                let Some(path) = self.pattern.path(variant, mutation) else {
                    continue;
                };
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                let summary = self.table.write_file(
                    variant_counts.get(mutation),
                    totals,
                    &path,
                    self.storage,
                )?;
                written.push(WrittenTable {
                    variant,
                    mutation,
                    path,
                    summary,
                });
            }
        }
        Ok(written)
    }
}
