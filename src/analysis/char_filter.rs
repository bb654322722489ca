//! Char filters that rewrite text before it is tokenized.
//!
//! # Available Filters
//!
//! - [`markup::MarkupCharFilter`] - Removes wiki/HTML markup and placeholders (the text cleaner)
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//! - [`mapping::MappingCharFilter`] - Literal string mapping
//! - [`smart_apostrophe::SmartApostropheCharFilter`] - Turns typographic apostrophes into `'`
//!
//! # Examples
//!
//! ```
//! use wikifreq::analysis::char_filter::CharFilter;
//! use wikifreq::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let filter = PatternReplaceCharFilter::new(r"<br>", " ").unwrap();
//! assert_eq!(filter.filter("a<br>b"), "a b");
//! ```

/// Trait for character filters that transform text before tokenization.
///
/// Filters never fail: input they do not recognize is passed through.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod mapping;
pub mod markup;
pub mod pattern_replace;
pub mod smart_apostrophe;
