//! Command implementations for the wikifreq CLI.

use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::analysis::analyzer::{AnalyzerOptions, WordAnalyzer};
use crate::analysis::char_filter::markup::MarkupCharFilter;
use crate::analysis::mutation::Mutations;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::RunConfig;
use crate::counting::shard::ShardCounter;
use crate::error::Result;
use crate::extract::ShardName;
use crate::observe::LogReporter;
use crate::output::writer::RunWriter;
use crate::parallel_count::engine::ParallelCountEngine;

/// Execute a CLI command.
pub fn execute_command(args: WikiFreqArgs) -> Result<()> {
    match &args.command {
        Command::Count(count_args) => count(count_args, &args),
        Command::Tokenize(tokenize_args) => tokenize(tokenize_args, &args),
    }
}

/// Count the shards and write the tables.
fn count(args: &CountArgs, cli_args: &WikiFreqArgs) -> Result<()> {
    let config = args.to_run_config()?;
    config.validate()?;
    warn_on_foreign_shards(&config);

    let counter = ShardCounter::from_config(&config, Arc::new(LogReporter))?;
    let engine = ParallelCountEngine::new(config.parallel_config())?;

    let progress = ShardProgress::new(cli_args.verbosity() > 0, config.dumps.len());
    let outcome = engine.count_with_progress(&counter, &config.dumps, |summary| {
        let name = summary
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.shard_done(&name, summary.failed);
    })?;
    progress.finish();

    outcome.check_complete(engine.config().allow_partial_failures)?;
    let tables = RunWriter::from_config(&config).write_all(&outcome.counts)?;
    output_count_report(&CountReport::new(&outcome, &tables), cli_args)
}

fn warn_on_foreign_shards(config: &RunConfig) {
    let language = config.language.code();
    for dump in &config.dumps {
        if let Some(name) = ShardName::parse(dump) {
            if name.language != language {
                log::warn!(
                    "{} looks like a {} dump, but the language is {language}",
                    dump.display(),
                    name.language
                );
            }
        }
    }
}

/// Print the words of a text, one per line.
fn tokenize(args: &TokenizeArgs, _cli_args: &WikiFreqArgs) -> Result<()> {
    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let options = AnalyzerOptions {
        dictionary_path: args.dictionary_path.clone(),
        smart_apostrophe: !args.no_smart_apostrophe,
    };
    let analyzer = WordAnalyzer::new(args.variant, &options)?;
    let text = if args.raw {
        text
    } else {
        let cleaned = MarkupCharFilter::new().clean(&text);
        for warning in &cleaned.warnings {
            log::warn!("{warning}");
        }
        cleaned.text
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for word in analyzer.words(&text)? {
        if args.mutations {
            let mutations = Mutations::expand(&word);
            let forms: Vec<&str> = mutations.iter().map(|(_, form)| form).collect();
            writeln!(out, "{}", forms.join("\t"))?;
        } else {
            writeln!(out, "{word}")?;
        }
    }
    Ok(())
}
