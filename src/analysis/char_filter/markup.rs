//! Markup removal for extracted article text.
//!
//! Plain-text extraction from wikitext leaves residue behind: reference
//! bodies, table attributes, formula/code placeholders, ruby annotations,
//! musical scores and leaked revision metadata. [`MarkupCharFilter`] removes
//! them. Every removed span is replaced by a space so that the words on
//! either side never fuse into one token. Ruby annotations are the exception:
//! their readings are dropped without a separator, since the base text they
//! annotate is a single word.
//!
//! Unmatched or partial markup is left in place.
//!
//! # Examples
//!
//! ```
//! use wikifreq::analysis::char_filter::markup::clean;
//!
//! let cleaned = clean("Foo<ref>citation</ref>Bar");
//! assert_eq!(cleaned, "Foo Bar");
//! ```

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::CharFilter;
use super::pattern_replace::PatternReplaceCharFilter;

lazy_static! {
    // Self-closing references, and references split over exactly two lines.
    // Longer or unclosed spans are left to the per-line rules, so an
    // unclosed reference costs at most the rest of its line.
    static ref REFERENCE: Regex = Regex::new(concat!(
        r"<ref\b[^>\n]*/>|",
        r"<ref(?:\s[^>\n]*)?>[^<\n]*\n[^<\n]*</ref>",
    ))
    .unwrap();

    // Line-level markup, replaced by a space.
    static ref MARKUP: Regex = Regex::new(concat!(
        r"<br( [^>]+)?>|",
        r"<chem>[^<]*</chem>|",
        r"<ref\b[^>]*/ref>|",
        r"<ref(\s[^>]*)?>[^<]*</ref>|",
        r"<ref(\s[^>]*)?>[^<]*$|^[^<]*</ref>|",
        r"<!--.*?-->|",
        // table remnants
        r"^!.*=.*\||",
        r"\bhidden=1\b|",
        r#"\b(rowspan|colspan|width|style|bgcolor|align|valign|frame-style|title-style|"#,
        r#"content-style)\s*=\s*("[^"]*"|.*\||\w+|)|"#,
        // code and formula placeholders
        r"(codice|formula)_[0-9]+|",
        // template residue and behavior switches
        r"\{\{[^{}]*\}\}|",
        r"__[A-Z]+__|",
        r"</?(ins|del|math|onlyinclude)>|<onlyinclude/>|",
        r"<(poem|q|section)( [^>]+)?>|</(poem|q)>|",
        // leaked page metadata
        r"<ns>.*?</ns>|",
        r"<parentid>.*?</parentid>|",
        r"<revision>|",
        r"<timestamp>.*?</timestamp>|",
        r"</?contributor>|",
        r"<username>.*?</username>|",
        r"<minor />|",
        r"<comment>.*?</comment>|",
        r"<model>.*?</model>|",
        r"<format>.*?</format>",
    ))
    .unwrap();

    static ref RUBY: Regex = Regex::new(r"<ruby( [^>]+)?>(?P<content>.*?)</ruby>").unwrap();
    static ref RUBY_DEL: Regex = Regex::new(r"<rp>[^<]*</rp>|<rt( [^>]+)?>[^<]*</rt>|</?rb>").unwrap();

    // A <score> opener, or an untagged LilyPond construct that probably starts one.
    static ref SCORE_OPEN: Regex = Regex::new(concat!(
        r"<score( [^>]+)?>|(?P<maybe>",
        r"\\override Score\.\b|",
        r"\\new Staff\b|",
        r"\\new PianoStaff\b|",
        r"\\relative c\b|",
        r"\\clef\b|",
        r"\\unfoldRepeats\b)",
    ))
    .unwrap();
    static ref SCORE_CLOSE: Regex = Regex::new(r"</score>").unwrap();
}

/// Problems noticed while cleaning that do not stop the article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupWarning {
    /// Lines looked like a musical score without `<score>` tags, but no
    /// `</score>` followed. They were kept as text.
    PossibleUntaggedScore { first_line: String },
    /// A `<score>` was never closed; everything after it was dropped.
    UnclosedScore,
}

impl std::fmt::Display for MarkupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkupWarning::PossibleUntaggedScore { first_line } => {
                write!(f, "possible score without <score> tags, starts with: {first_line}")
            }
            MarkupWarning::UnclosedScore => {
                write!(f, "ignored lines up to the end of article, missing </score>")
            }
        }
    }
}

/// Result of cleaning one article.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanedText {
    pub text: String,
    pub warnings: Vec<MarkupWarning>,
}

/// Removes markup and non-textual residue from article text.
pub struct MarkupCharFilter {
    markup: PatternReplaceCharFilter,
}

impl Default for MarkupCharFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupCharFilter {
    pub fn new() -> Self {
        Self {
            markup: PatternReplaceCharFilter::from_regex(MARKUP.clone(), " "),
        }
    }

    /// Clean one line: line-level markup first, then ruby annotations.
    pub fn clean_line(&self, line: &str) -> String {
        let without_markup = self.markup.filter(line);
        RUBY.replace_all(&without_markup, |caps: &Captures| {
            RUBY_DEL.replace_all(&caps["content"], "").into_owned()
        })
        .into_owned()
    }

    /// Clean a whole article, reporting score blocks that could not be
    /// resolved.
    pub fn clean(&self, raw: &str) -> CleanedText {
        let text = REFERENCE.replace_all(raw, " ");

        let mut lines: Vec<String> = Vec::new();
        let mut warnings = Vec::new();
        let mut in_score = false;
        // Raw lines of an untagged score, restored if it never closes.
        let mut maybe_score: Option<Vec<String>> = None;

        for line in text.lines() {
            let mut line = line;

            if in_score {
                match SCORE_CLOSE.find(line) {
                    Some(close) => {
                        in_score = false;
                        maybe_score = None;
                        line = &line[close.end()..];
                    }
                    None => {
                        if let Some(pending) = maybe_score.as_mut() {
                            pending.push(line.to_string());
                        }
                        continue;
                    }
                }
            } else if let Some(open) = SCORE_OPEN.captures(line) {
                let whole = open.get(0).map_or(0..0, |m| m.range());
                let before = &line[..whole.start];
                let close = SCORE_CLOSE
                    .find_at(line, whole.end)
                    .map(|close| &line[close.end()..]);

                match close {
                    Some(after) => {
                        lines.push(self.clean_line(&format!("{before} {after}")));
                        continue;
                    }
                    None => {
                        if open.name("maybe").is_some() {
                            maybe_score = Some(vec![line[whole.start..].to_string()]);
                        }
                        in_score = true;
                        line = before;
                    }
                }
            }

            lines.push(self.clean_line(line));
        }

        if in_score {
            match maybe_score {
                Some(pending) => {
                    warnings.push(MarkupWarning::PossibleUntaggedScore {
                        first_line: pending.first().cloned().unwrap_or_default(),
                    });
                    lines.extend(pending.iter().map(|l| self.clean_line(l)));
                }
                None => warnings.push(MarkupWarning::UnclosedScore),
            }
        }

        CleanedText {
            text: lines.join("\n"),
            warnings,
        }
    }
}

impl CharFilter for MarkupCharFilter {
    fn filter(&self, input: &str) -> String {
        self.clean(input).text
    }

    fn name(&self) -> &'static str {
        "markup"
    }
}

/// Clean article text with the default rules, discarding warnings.
pub fn clean(raw: &str) -> String {
    MarkupCharFilter::new().clean(raw).text
}
