//! Penn-Treebank-style English tokenizer.
//!
//! Text is first cut into lines and sentences, then each sentence is rewritten
//! by an ordered list of substitution rules that pad punctuation, quotes and
//! clitics with spaces; the result is split on whitespace. Contractions come
//! out the Treebank way: `can't` becomes `ca` + `n't`, `I'm` becomes `I` + `'m`.
//!
//! Token offsets are not tracked through the rewriting; every token carries
//! offsets relative to itself.

use fancy_regex::Regex as FancyRegex;
use lazy_static::lazy_static;
use regex::Regex;

use super::Tokenizer;
use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::smart_apostrophe::SmartApostropheCharFilter;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, WikiFreqError};

struct Rule {
    pattern: FancyRegex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        pattern: FancyRegex::new(pattern).unwrap(),
        replacement,
    }
}

lazy_static! {
    static ref STARTING_QUOTES: Vec<Rule> = vec![
        rule(r"([«“‘„]|`+)", " ${1} "),
        rule(r#"^""#, "``"),
        rule(r"(``)", " ${1} "),
        rule(r#"([ (\[{<])("|'{2})"#, "${1} `` "),
        rule(r"(?i)(')(?!re|ve|ll|m|t|s|d|n)(\w)\b", "${1} ${2}"),
    ];

    static ref PUNCTUATION: Vec<Rule> = vec![
        rule(r#"([^.])(\.)([\])}>"'»”’ ]*)\s*$"#, "${1} ${2} ${3} "),
        rule(r"([:,])([^\d])", " ${1} ${2}"),
        rule(r"([:,])$", " ${1} "),
        rule(r"\.{2,}", " ${0} "),
        rule(r"[;@#$%&]", " ${0} "),
        rule(r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2}${3} "),
        rule(r"[?!]", " ${0} "),
        rule(r"([^'])' ", "${1} ' "),
        rule(r"\*", " ${0} "),
    ];

    static ref PARENS_BRACKETS: Rule = rule(r"[\]\[(){}<>]", " ${0} ");

    static ref DOUBLE_DASHES: Rule = rule(r"--", " -- ");

    static ref ENDING_QUOTES: Vec<Rule> = vec![
        rule(r"([»”’])", " ${1} "),
        rule(r"''", " '' "),
        rule(r#"""#, " '' "),
        rule(r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        rule(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ];

    static ref CONTRACTIONS: Vec<Rule> = vec![
        rule(r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        rule(r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        rule(r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        rule(r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        rule(r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        rule(r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        rule(r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        rule(r"(?i)\b(wan)(na)(?=\s)", " ${1} ${2} "),
        rule(r"(?i) ('t)(is)\b", " ${1} ${2} "),
        rule(r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ];

    // A sentence ends after terminal punctuation and any closing quotes or
    // brackets, when followed by whitespace.
    static ref SENTENCE_END: Regex = Regex::new(r#"[.?!]+[\])}>"'»”’]*\s+"#).unwrap();

    // A single capital initial ("J."), or dotted letters ("U.S.", "e.g.").
    static ref INITIALS: Regex = Regex::new(r"^(?:\p{Lu}|(?:\p{L}\.)+\p{L})$").unwrap();
}

/// Words whose trailing period marks an abbreviation, not a sentence end.
const ABBREVIATIONS: &[&str] = &[
    "adm", "apr", "approx", "aug", "ave", "bros", "capt", "cf", "co", "col", "corp", "dec",
    "dept", "dr", "est", "etc", "feb", "fig", "fr", "ft", "gen", "gov", "hon", "inc", "jan",
    "jr", "jul", "jun", "lt", "ltd", "mar", "mr", "mrs", "ms", "mt", "no", "nov", "oct",
    "op", "pp", "prof", "rev", "sen", "sep", "sept", "sgt", "sr", "st", "vol", "vs",
];

/// Whether the period after `word` belongs to the word.
fn is_abbreviation(word: &str) -> bool {
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }
    INITIALS.is_match(word) || ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

fn apply(rule: &Rule, text: String) -> Result<String> {
    let replaced = rule
        .pattern
        .try_replacen(&text, 0, rule.replacement)
        .map_err(|e| WikiFreqError::analysis(format!("Penn rule failed: {e}")))?;
    Ok(replaced.into_owned())
}

/// Split one line into sentences, keeping the terminal punctuation with the
/// sentence it closes. A lone period after an abbreviation or an initial
/// does not end a sentence.
fn sentences(line: &str) -> impl Iterator<Item = &str> {
    let mut start = 0;
    let mut parts = Vec::new();
    for m in SENTENCE_END.find_iter(line) {
        let punctuation = m.as_str().trim_end();
        if punctuation == "." {
            let previous = line[start..m.start()].split_whitespace().next_back();
            if previous.is_some_and(is_abbreviation) {
                continue;
            }
        }
        let end = m.start() + punctuation.len();
        parts.push(&line[start..end]);
        start = m.end();
    }
    parts.push(&line[start..]);
    parts.into_iter().filter(|s| !s.trim().is_empty())
}

/// Tokenize one sentence with the Treebank substitution rules.
pub fn treebank_words(sentence: &str) -> Result<Vec<String>> {
    let mut text = sentence.to_string();

    for r in STARTING_QUOTES.iter() {
        text = apply(r, text)?;
    }
    for r in PUNCTUATION.iter() {
        text = apply(r, text)?;
    }
    text = apply(&PARENS_BRACKETS, text)?;
    text = apply(&DOUBLE_DASHES, text)?;

    text = format!(" {text} ");

    for r in ENDING_QUOTES.iter() {
        text = apply(r, text)?;
    }
    for r in CONTRACTIONS.iter() {
        text = apply(r, text)?;
    }

    Ok(text.split_whitespace().map(str::to_string).collect())
}

/// Penn-Treebank-style tokenizer for English.
pub struct PennTreebankTokenizer {
    smart_apostrophe: Option<SmartApostropheCharFilter>,
}

impl PennTreebankTokenizer {
    /// Create a tokenizer; `smart_apostrophe` turns `’` into `'` where it
    /// acts as an apostrophe before segmenting.
    pub fn new(smart_apostrophe: bool) -> Self {
        Self {
            smart_apostrophe: smart_apostrophe.then(SmartApostropheCharFilter::new),
        }
    }
}

impl Default for PennTreebankTokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Tokenizer for PennTreebankTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let text = match &self.smart_apostrophe {
            Some(filter) => filter.filter(text),
            None => text.to_string(),
        };

        let mut tokens = Vec::new();
        for line in text.lines() {
            for sentence in sentences(line) {
                for word in treebank_words(sentence)? {
                    let position = tokens.len();
                    tokens.push(Token::new(word, position));
                }
            }
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "penn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokenizer: &PennTreebankTokenizer, text: &str) -> Vec<String> {
        tokenizer.tokenize(text).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_contraction() {
        let tokenizer = PennTreebankTokenizer::new(false);
        assert_eq!(texts(&tokenizer, "can't"), vec!["ca", "n't"]);
        assert_eq!(texts(&tokenizer, "I'm here"), vec!["I", "'m", "here"]);
    }

    #[test]
    fn test_smart_apostrophe_contraction() {
        let tokenizer = PennTreebankTokenizer::new(true);
        assert_eq!(texts(&tokenizer, "can’t"), vec!["ca", "n't"]);
    }

    #[test]
    fn test_sentence_punctuation() {
        let tokenizer = PennTreebankTokenizer::default();
        assert_eq!(
            texts(&tokenizer, "Hello, world. It works!"),
            vec!["Hello", ",", "world", ".", "It", "works", "!"]
        );
    }

    #[test]
    fn test_digits_kept_as_one_segment() {
        let tokenizer = PennTreebankTokenizer::default();
        assert_eq!(texts(&tokenizer, "R2D2"), vec!["R2D2"]);
    }

    #[test]
    fn test_quotes_and_parens() {
        let tokenizer = PennTreebankTokenizer::default();
        assert_eq!(
            texts(&tokenizer, "He said \"go (now)\""),
            vec!["He", "said", "``", "go", "(", "now", ")", "''"]
        );
    }

    #[test]
    fn test_cannot() {
        assert_eq!(treebank_words("cannot").unwrap(), vec!["can", "not"]);
    }

    #[test]
    fn test_lines_are_separate() {
        let tokenizer = PennTreebankTokenizer::default();
        assert_eq!(texts(&tokenizer, "end.\nNext"), vec!["end", ".", "Next"]);
    }

    #[test]
    fn test_abbreviations_keep_their_period() {
        let tokenizer = PennTreebankTokenizer::default();
        assert_eq!(
            texts(
                &tokenizer,
                "Mr. Smith met Dr. Jones, e.g. at St. Paul's in the U.S. today."
            ),
            vec![
                "Mr.", "Smith", "met", "Dr.", "Jones", ",", "e.g.", "at", "St.", "Paul", "'s",
                "in", "the", "U.S.", "today", "."
            ]
        );
    }

    #[test]
    fn test_initial_is_not_sentence_end() {
        let tokenizer = PennTreebankTokenizer::default();
        assert_eq!(
            texts(&tokenizer, "John F. Kennedy spoke. Then he left."),
            vec!["John", "F.", "Kennedy", "spoke", ".", "Then", "he", "left", "."]
        );
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(PennTreebankTokenizer::default().name(), "penn");
    }
}
