//! Typographic apostrophe normalization for English.
//!
//! A right single quotation mark `’` becomes `'` unless it closes a paired
//! `‘…’` quotation. Inside such a pair, a `’` between two word characters is
//! still an apostrophe. A prime `′` becomes `'` after two ASCII letters or
//! before `s`.

use fancy_regex::{Captures, Regex};
use lazy_static::lazy_static;

use super::CharFilter;

lazy_static! {
    static ref SMART_APOSTROPHE: Regex = Regex::new(concat!(
        r"‘(([^‘’]*\b’\b)*[^‘’]*)’(?!s)|",
        r"’|",
        r"(?<=[A-Za-z]{2})′|",
        r"′(?=s)",
    ))
    .unwrap();
}

fn replace(caps: &Captures) -> String {
    match caps.get(1) {
        Some(quoted) => format!("‘{}’", quoted.as_str().replace('’', "'")),
        None => "'".to_string(),
    }
}

/// Char filter applying the apostrophe heuristics above.
#[derive(Clone, Debug, Default)]
pub struct SmartApostropheCharFilter;

impl SmartApostropheCharFilter {
    pub fn new() -> Self {
        SmartApostropheCharFilter
    }
}

impl CharFilter for SmartApostropheCharFilter {
    fn filter(&self, input: &str) -> String {
        match SMART_APOSTROPHE.try_replacen(input, 0, replace) {
            Ok(replaced) => replaced.into_owned(),
            Err(e) => {
                log::debug!("Smart apostrophe normalization skipped: {e}");
                input.to_string()
            }
        }
    }

    fn name(&self) -> &'static str {
        "smart_apostrophe"
    }
}
