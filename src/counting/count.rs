//! Count tables.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::TokenizerVariant;
use crate::analysis::mutation::Mutation;

/// Counts of one token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    /// Number of times the token was seen.
    pub occurrences: u64,
    /// Number of distinct articles the token was seen in.
    pub documents: u64,
}

impl CountEntry {
    pub fn new(occurrences: u64, documents: u64) -> Self {
        CountEntry {
            occurrences,
            documents,
        }
    }

    pub fn merge(&mut self, other: CountEntry) {
        self.occurrences += other.occurrences;
        self.documents += other.documents;
    }
}

/// Token → counts. Tokens absent from the table have zero counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenCounts {
    entries: AHashMap<String, CountEntry>,
}

/// Counts gathered from the articles of one shard.
pub type PartialCount = TokenCounts;

/// Counts summed over every shard of a run.
pub type GlobalCount = TokenCounts;

impl TokenCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the tokens of one article, given as token → occurrences in that
    /// article. Each token gains one document.
    pub fn add_document(&mut self, article: AHashMap<String, u64>) {
        for (token, occurrences) in article {
            self.entries
                .entry(token)
                .or_default()
                .merge(CountEntry::new(occurrences, 1));
        }
    }

    /// Add `entry` to the counts of `token`.
    pub fn add(&mut self, token: impl Into<String>, entry: CountEntry) {
        self.entries.entry(token.into()).or_default().merge(entry);
    }

    /// Pointwise sum with `other`.
    pub fn merge(&mut self, mut other: TokenCounts) {
        if other.entries.len() > self.entries.len() {
            std::mem::swap(&mut self.entries, &mut other.entries);
        }
        self.entries.reserve(other.entries.len());
        for (token, entry) in other.entries {
            self.entries.entry(token).or_default().merge(entry);
        }
    }

    pub fn get(&self, token: &str) -> Option<CountEntry> {
        self.entries.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CountEntry)> {
        self.entries.iter().map(|(token, entry)| (token.as_str(), *entry))
    }

    /// Sum of occurrences over all tokens.
    pub fn total_occurrences(&self) -> u64 {
        self.entries.values().map(|e| e.occurrences).sum()
    }
}

impl FromIterator<(String, CountEntry)> for TokenCounts {
    fn from_iter<I: IntoIterator<Item = (String, CountEntry)>>(iter: I) -> Self {
        let mut counts = TokenCounts::new();
        for (token, entry) in iter {
            counts.add(token, entry);
        }
        counts
    }
}

/// Grand totals written in the `[TOTAL]` row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Tokens counted, including those later dropped by the filter.
    pub total_tokens: u64,
    /// Articles processed, whether or not they produced tokens.
    pub total_documents: u64,
}

/// The four mutation tables of one tokenizer variant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariantCounts {
    mutations: [TokenCounts; 4],
    total_tokens: u64,
}

impl VariantCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one article's per-mutation tables, built from `tokens` tokens.
    pub fn add_document(&mut self, article: [AHashMap<String, u64>; 4], tokens: u64) {
        for (counts, article) in self.mutations.iter_mut().zip(article) {
            counts.add_document(article);
        }
        self.total_tokens += tokens;
    }

    pub fn get(&self, mutation: Mutation) -> &TokenCounts {
        &self.mutations[mutation.index()]
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn merge(&mut self, other: VariantCounts) {
        for (counts, other) in self.mutations.iter_mut().zip(other.mutations) {
            counts.merge(other);
        }
        self.total_tokens += other.total_tokens;
    }
}

/// Everything counted for one shard, or for a whole run once merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShardCounts {
    variants: BTreeMap<TokenizerVariant, VariantCounts>,
    /// Articles folded into the counts.
    pub articles: u64,
    /// Articles skipped as malformed.
    pub skipped_articles: u64,
    /// Articles counted despite cleaning warnings.
    pub warnings: u64,
}

impl ShardCounts {
    /// Empty counts with a table for each of `variants`.
    pub fn new(variants: &[TokenizerVariant]) -> Self {
        ShardCounts {
            variants: variants.iter().map(|v| (*v, VariantCounts::new())).collect(),
            ..Default::default()
        }
    }

    pub fn variant(&self, variant: TokenizerVariant) -> Option<&VariantCounts> {
        self.variants.get(&variant)
    }

    pub fn variant_mut(&mut self, variant: TokenizerVariant) -> &mut VariantCounts {
        self.variants.entry(variant).or_default()
    }

    pub fn variants(&self) -> impl Iterator<Item = (TokenizerVariant, &VariantCounts)> {
        self.variants.iter().map(|(v, c)| (*v, c))
    }

    pub fn totals(&self, variant: TokenizerVariant) -> Totals {
        Totals {
            total_tokens: self.variant(variant).map_or(0, VariantCounts::total_tokens),
            total_documents: self.articles,
        }
    }

    pub fn merge(&mut self, other: ShardCounts) {
        for (variant, counts) in other.variants {
            self.variant_mut(variant).merge(counts);
        }
        self.articles += other.articles;
        self.skipped_articles += other.skipped_articles;
        self.warnings += other.warnings;
    }
}
