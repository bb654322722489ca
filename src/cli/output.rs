//! Output formatting for CLI commands.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::cli::args::{SummaryFormat, WikiFreqArgs};
use crate::error::Result;
use crate::output::table::TOTAL_LABEL;
use crate::output::writer::WrittenTable;
use crate::parallel_count::engine::RunOutcome;

/// Result structure for one written table.
#[derive(Debug, Serialize, Deserialize)]
pub struct TableReport {
    pub path: String,
    pub variant: String,
    pub mutation: String,
    pub rows_written: usize,
    pub rows_dropped: usize,
    pub total_tokens: u64,
    pub total_documents: u64,
}

/// Result structure for a counting run.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountReport {
    pub shards_counted: usize,
    pub failed_shards: Vec<String>,
    pub articles: u64,
    pub skipped_articles: u64,
    pub articles_with_warnings: u64,
    pub duration_ms: u64,
    pub articles_per_second: f64,
    pub tables: Vec<TableReport>,
}

impl CountReport {
    pub fn new(outcome: &RunOutcome, tables: &[WrittenTable]) -> Self {
        CountReport {
            shards_counted: outcome.shards.len() - outcome.failed_shards.len(),
            failed_shards: outcome
                .failed_shards
                .iter()
                .map(|(path, e)| format!("{}: {e}", path.display()))
                .collect(),
            articles: outcome.counts.articles,
            skipped_articles: outcome.counts.skipped_articles,
            articles_with_warnings: outcome.counts.warnings,
            duration_ms: outcome.execution_time.as_millis() as u64,
            articles_per_second: outcome.metrics.articles_per_second,
            tables: tables
                .iter()
                .map(|table| TableReport {
                    path: table.path.display().to_string(),
                    variant: table.variant.to_string(),
                    mutation: table.mutation.to_string(),
                    rows_written: table.summary.rows_written,
                    rows_dropped: table.summary.rows_dropped,
                    total_tokens: table.summary.totals.total_tokens,
                    total_documents: table.summary.totals.total_documents,
                })
                .collect(),
        }
    }
}

/// Print the summary of a counting run in the requested format.
pub fn output_count_report(report: &CountReport, args: &WikiFreqArgs) -> Result<()> {
    match args.summary_format {
        SummaryFormat::Json => output_json(report, args),
        SummaryFormat::Human => {
            if args.verbosity() > 0 {
                output_count_report_human(report);
            }
            Ok(())
        }
    }
}

fn output_count_report_human(report: &CountReport) {
    println!(
        "Counted {} articles from {} shard(s) in {:.1}s ({:.0} articles/s)",
        report.articles,
        report.shards_counted,
        report.duration_ms as f64 / 1000.0,
        report.articles_per_second
    );
    if report.skipped_articles > 0 {
        println!("Skipped {} malformed article(s)", report.skipped_articles);
    }
    if report.articles_with_warnings > 0 {
        println!(
            "{} article(s) had markup warnings",
            report.articles_with_warnings
        );
    }
    for failed in &report.failed_shards {
        println!("Failed: {failed}");
    }

    if report.tables.is_empty() {
        return;
    }
    println!();
    println!(
        "| {:<40} | {:>10} | {:>10} | {:>14} | {:>10} |",
        "File", "Rows", "Dropped", TOTAL_LABEL, "Documents"
    );
    println!("|{:-<42}|{:->12}|{:->12}|{:->16}|{:->12}|", "", "", "", "", "");
    for table in &report.tables {
        println!(
            "| {:<40} | {:>10} | {:>10} | {:>14} | {:>10} |",
            table.path,
            table.rows_written,
            table.rows_dropped,
            table.total_tokens,
            table.total_documents
        );
    }
}

/// Output in JSON format.
pub fn output_json<T: Serialize>(result: &T, args: &WikiFreqArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// A progress bar over shards, shown on interactive terminals only.
pub struct ShardProgress {
    bar: Option<ProgressBar>,
}

impl ShardProgress {
    pub fn new(enabled: bool, shards: usize) -> Self {
        let bar = (enabled && std::io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new(shards as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] {bar:30} {pos}/{len} shards {msg}",
            ) {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        ShardProgress { bar }
    }

    pub fn shard_done(&self, name: &str, failed: bool) {
        if let Some(bar) = &self.bar {
            if failed {
                bar.println(format!("failed: {name}"));
            }
            bar.set_message(name.to_string());
            bar.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ShardProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
