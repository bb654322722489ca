//! End-to-end counting runs over small shards written to a temp directory.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bzip2::write::BzEncoder;
use flate2::read::GzDecoder;
use tempfile::TempDir;

use wikifreq::analysis::analyzer::{Language, TokenizerVariant};
use wikifreq::analysis::mutation::Mutation;
use wikifreq::config::RunConfig;
use wikifreq::counting::shard::ShardCounter;
use wikifreq::error::Result;
use wikifreq::extract::ShardFormat;
use wikifreq::observe::CollectingReporter;
use wikifreq::output::storage::Storage;
use wikifreq::output::writer::{RunWriter, WrittenTable};
use wikifreq::parallel_count::engine::{ParallelCountEngine, RunOutcome};

fn doc_shard(dir: &Path, name: &str, docs: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    for (id, body) in docs {
        writeln!(file, "<doc id=\"{id}\" url=\"https://en.wikipedia.org/wiki?curid={id}\" title=\"T{id}\">").unwrap();
        writeln!(file, "{body}").unwrap();
        writeln!(file, "</doc>").unwrap();
    }
    path
}

fn corpus(dir: &Path) -> Vec<PathBuf> {
    vec![
        doc_shard(
            dir,
            "enwiki-20240301-pages-articles1.txt",
            &[
                ("1", "The cat sat on the mat."),
                ("2", "The dog and the cat."),
                ("3", "A cat, a dog, a bird."),
            ],
        ),
        doc_shard(
            dir,
            "enwiki-20240301-pages-articles2.txt",
            &[
                ("4", "The bird sang. The bird flew."),
                ("5", "Cats and dogs and birds and R2D2."),
            ],
        ),
        doc_shard(
            dir,
            "enwiki-20240301-pages-articles3.txt",
            &[("6", "the the the the the"), ("7", "")],
        ),
    ]
}

fn run(config: &RunConfig) -> Result<(RunOutcome, Vec<WrittenTable>)> {
    config.validate()?;
    let counter = ShardCounter::from_config(config, Arc::new(CollectingReporter::new()))?;
    let engine = ParallelCountEngine::new(config.parallel_config())?;
    let outcome = engine.count(&counter, &config.dumps)?;
    outcome.check_complete(engine.config().allow_partial_failures)?;
    let tables = RunWriter::from_config(config).write_all(&outcome.counts)?;
    Ok((outcome, tables))
}

fn read_gz(path: &Path) -> String {
    let mut text = String::new();
    GzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    text
}

fn parse_rows(text: &str) -> Vec<(String, u64, u64)> {
    text.lines()
        .skip(1)
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 3, "bad row {line:?}");
            (
                fields[0].to_string(),
                fields[1].parse().unwrap(),
                fields[2].parse().unwrap(),
            )
        })
        .collect()
}

fn regex_config(dir: &Path, shards: Vec<PathBuf>) -> RunConfig {
    RunConfig::new(Language::English)
        .with_variants(vec![TokenizerVariant::Regex])
        .with_format(ShardFormat::Doc)
        .with_output(dir.join("out/en%.tsv.gz").to_string_lossy().into_owned())
        .with_worker_count(2)
        .with_dumps(shards)
}

#[test]
fn test_tables_filter_and_totals() {
    let dir = TempDir::new().unwrap();
    let config = regex_config(dir.path(), corpus(dir.path()));
    let (outcome, tables) = run(&config).unwrap();

    assert_eq!(tables.len(), 4);
    assert_eq!(outcome.counts.articles, 7);

    let text = read_gz(&dir.path().join("out/en.tsv.gz"));
    assert!(text.starts_with("word\tcount\tdocuments\n"));
    let rows = parse_rows(&text);
    let (total_label, total_tokens, total_documents) = rows.last().unwrap().clone();
    assert_eq!(total_label, "[TOTAL]");
    assert_eq!(total_documents, 7);

    let body = &rows[..rows.len() - 1];
    assert!(body.iter().all(|(_, _, docs)| *docs >= 3));
    assert!(body.iter().all(|(_, _, docs)| *docs <= total_documents));
    let visible: u64 = body.iter().map(|(_, count, _)| count).sum();
    assert!(visible < total_tokens);

    let identity = outcome
        .counts
        .variant(TokenizerVariant::Regex)
        .unwrap()
        .get(Mutation::Identity);
    assert_eq!(identity.total_occurrences(), total_tokens);
    assert_eq!(identity.get("the").map(|e| (e.occurrences, e.documents)), Some((7, 3)));
    assert!(identity.get("R").is_some());
    assert!(identity.get("R2D2").is_none());
}

#[test]
fn test_mutation_tables_share_totals() {
    let dir = TempDir::new().unwrap();
    let config = regex_config(dir.path(), corpus(dir.path()));
    let (_, tables) = run(&config).unwrap();

    let totals: Vec<_> = tables.iter().map(|t| t.summary.totals).collect();
    assert!(totals.windows(2).all(|w| w[0] == w[1]));

    let lower = parse_rows(&read_gz(&dir.path().join("out/en-lower.tsv.gz")));
    let the = lower.iter().find(|(w, _, _)| w == "the").unwrap();
    // "The" and "the" fold together under lowercasing.
    assert_eq!(the.1, 11);
    assert_eq!(the.2, 4);
    assert!(dir.path().join("out/en-nfkc.tsv.gz").exists());
    assert!(dir.path().join("out/en-nfkc-lower.tsv.gz").exists());
}

#[test]
fn test_output_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let shards = corpus(dir.path());

    let first = regex_config(dir.path(), shards.clone())
        .with_output(dir.path().join("a%.tsv.gz").to_string_lossy().into_owned())
        .with_worker_count(1);
    let mut reversed = shards.clone();
    reversed.reverse();
    let second = regex_config(dir.path(), reversed)
        .with_output(dir.path().join("b%.tsv.gz").to_string_lossy().into_owned())
        .with_worker_count(3);

    run(&first).unwrap();
    run(&second).unwrap();

    for suffix in ["", "-lower", "-nfkc", "-nfkc-lower"] {
        let a = read_gz(&dir.path().join(format!("a{suffix}.tsv.gz")));
        let b = read_gz(&dir.path().join(format!("b{suffix}.tsv.gz")));
        assert_eq!(a, b, "table{suffix} differs");
    }
}

#[test]
fn test_two_variants_in_one_pass() {
    let dir = TempDir::new().unwrap();
    let shards = vec![doc_shard(
        dir.path(),
        "s.txt",
        &[
            ("1", "It can't be R2D2 and women's rights."),
            ("2", "It can't be."),
            ("3", "It can't."),
        ],
    )];
    let config = RunConfig::new(Language::English)
        .with_variants(vec![TokenizerVariant::Regex, TokenizerVariant::Penn])
        .with_format(ShardFormat::Doc)
        .with_storage(Storage::Plain)
        .with_min_doc_freq(0)
        .with_output(dir.path().join("en-@.tsv").to_string_lossy().into_owned())
        .with_dumps(shards);
    let (outcome, tables) = run(&config).unwrap();
    assert_eq!(tables.len(), 2);

    let regex = fs::read_to_string(dir.path().join("en-regex.tsv")).unwrap();
    let penn = fs::read_to_string(dir.path().join("en-penn.tsv")).unwrap();
    assert!(regex.contains("\nwomen\t1\t1\n"));
    assert!(regex.contains("\nR\t1\t1\n"));
    assert!(penn.contains("\nca\t3\t3\n"));
    assert!(penn.contains("\nn't\t3\t3\n"));
    assert!(!penn.contains("R2D2"));

    assert_eq!(
        outcome.totals(TokenizerVariant::Regex).total_documents,
        outcome.totals(TokenizerVariant::Penn).total_documents
    );
}

#[test]
fn test_xml_bz2_shard() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("enwiki-20240301-pages-articles1.xml.bz2");
    let dump = r#"<mediawiki>
  <page>
    <title>Alpha</title>
    <ns>0</ns>
    <id>1</id>
    <revision><text xml:space="preserve">'''Alpha''' is a [[letter|Greek letter]].&lt;ref&gt;source&lt;/ref&gt;</text></revision>
  </page>
  <page>
    <title>Beta</title>
    <ns>0</ns>
    <id>2</id>
    <revision><text xml:space="preserve">Beta is a letter.</text></revision>
  </page>
  <page>
    <title>Category:Letters</title>
    <ns>14</ns>
    <id>3</id>
    <revision><text>letter letter letter</text></revision>
  </page>
</mediawiki>
"#;
    let mut encoder = BzEncoder::new(File::create(&path).unwrap(), bzip2::Compression::default());
    encoder.write_all(dump.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let config = RunConfig::new(Language::English)
        .with_variants(vec![TokenizerVariant::Regex])
        .with_min_doc_freq(1)
        .with_storage(Storage::Plain)
        .with_output(dir.path().join("en.tsv").to_string_lossy().into_owned())
        .with_dumps(vec![path]);
    let (outcome, _) = run(&config).unwrap();

    assert_eq!(outcome.counts.articles, 2);
    let text = fs::read_to_string(dir.path().join("en.tsv")).unwrap();
    assert!(text.contains("\nletter\t2\t2\n"));
    assert!(text.contains("\nGreek\t1\t1\n"));
    assert!(!text.contains("source"));
    assert!(text.ends_with("[TOTAL]\t11\t2\n"));
}

#[test]
fn test_failed_shard_fails_run_unless_partial_allowed() {
    let dir = TempDir::new().unwrap();
    let mut shards = corpus(dir.path());
    shards.push(dir.path().join("missing.txt"));

    let strict = regex_config(dir.path(), shards.clone());
    assert!(run(&strict).is_err());
    assert!(!dir.path().join("out/en.tsv.gz").exists());

    let partial = regex_config(dir.path(), shards).with_allow_partial(true);
    let (outcome, tables) = run(&partial).unwrap();
    assert_eq!(outcome.failed_shards.len(), 1);
    assert_eq!(outcome.counts.articles, 7);
    assert_eq!(tables.len(), 4);
}

#[test]
fn test_missing_dictionary_fails_before_counting() {
    let dir = TempDir::new().unwrap();
    let config = RunConfig::new(Language::Japanese)
        .with_variants(vec!["ja-external".parse().unwrap()])
        .with_dictionary_path(dir.path().join("no-such-dictionary"))
        .with_format(ShardFormat::Doc)
        .with_output("ja.tsv.gz")
        .with_dumps(corpus(dir.path()));

    let result = ShardCounter::from_config(&config, Arc::new(CollectingReporter::new()));
    assert!(result.is_err());
}
