//! Literal string mapping.
//!
//! Replaces fixed strings with leftmost-longest matching. Japanese text uses
//! it to turn the fullwidth tilde into a wave dash before segmentation.

use std::collections::BTreeMap;

use aho_corasick::{AhoCorasick, MatchKind};

use super::CharFilter;
use crate::error::{Result, WikiFreqError};

/// Fullwidth tilde, a common typo for the wave dash in Japanese text.
pub const FULLWIDTH_TILDE: char = '\u{FF5E}';

/// Wave dash.
pub const WAVE_DASH: char = '\u{301C}';

/// A char filter that replaces literal strings using leftmost-longest matching.
pub struct MappingCharFilter {
    ac: AhoCorasick,
    replacements: Vec<String>,
}

impl MappingCharFilter {
    pub fn new(mapping: BTreeMap<String, String>) -> Result<Self> {
        let mut keys = Vec::new();
        let mut replacements = Vec::new();

        for (k, v) in mapping {
            keys.push(k);
            replacements.push(v);
        }

        let ac = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&keys)
            .map_err(|e| WikiFreqError::Anyhow(anyhow::Error::from(e)))?;

        Ok(Self { ac, replacements })
    }

    /// Maps `～` (fullwidth tilde) to `〜` (wave dash) before Japanese segmentation.
    pub fn fullwidth_tilde_to_wave_dash() -> Result<Self> {
        let mut mapping = BTreeMap::new();
        mapping.insert(FULLWIDTH_TILDE.to_string(), WAVE_DASH.to_string());
        Self::new(mapping)
    }
}

impl CharFilter for MappingCharFilter {
    fn filter(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut last_match_end = 0;

        for m in self.ac.find_iter(input) {
            let replacement = &self.replacements[m.pattern().as_usize()];
            output.push_str(&input[last_match_end..m.start()]);
            output.push_str(replacement);
            last_match_end = m.end();
        }

        output.push_str(&input[last_match_end..]);
        output
    }

    fn name(&self) -> &'static str {
        "mapping"
    }
}
