//! Per-language tokenizer dispatch.
//!
//! A [`TokenizerVariant`] is the closed set of tokenization strategies. A
//! [`WordAnalyzer`] is built once per variant and run, shared read-only by
//! every worker. Building one may load a dictionary, which fails the run
//! before any shard is processed.
//!
//! | variant       | tokenizer          | before            | kept segments                      |
//! |---------------|--------------------|-------------------|------------------------------------|
//! | `regex`       | non-digit `\w` runs | -                | all                                |
//! | `penn`        | Penn Treebank      | smart apostrophe  | no digit, some word character      |
//! | `ja-bundled`  | lindera, UniDic    | `～` → `〜`       | no digit, `\w`/`〜` at both ends   |
//! | `ja-external` | lindera, from path | `～` → `〜`       | no digit, `\w`/`〜` at both ends   |
//! | `zh`          | lindera, CC-CEDICT | -                 | no digit, `\w` at both ends        |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::mapping::{MappingCharFilter, WAVE_DASH};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::word::WordFilter;
use crate::analysis::tokenizer::lindera::{EMBEDDED_CC_CEDICT, EMBEDDED_UNIDIC, LinderaTokenizer};
use crate::analysis::tokenizer::penn::PennTreebankTokenizer;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::{Result, WikiFreqError};

const SEGMENTER_MODE: &str = "normal";

/// Which Japanese dictionary the morphological analyzer loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JapaneseDictionary {
    /// The lightweight dictionary compiled into the binary.
    Bundled,
    /// A full dictionary installed on disk, see [`AnalyzerOptions::dictionary_path`].
    External,
}

/// A tokenization strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenizerVariant {
    Regex,
    Penn,
    Japanese(JapaneseDictionary),
    Chinese,
}

impl TokenizerVariant {
    pub const ALL: [TokenizerVariant; 5] = [
        TokenizerVariant::Regex,
        TokenizerVariant::Penn,
        TokenizerVariant::Japanese(JapaneseDictionary::Bundled),
        TokenizerVariant::Japanese(JapaneseDictionary::External),
        TokenizerVariant::Chinese,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TokenizerVariant::Regex => "regex",
            TokenizerVariant::Penn => "penn",
            TokenizerVariant::Japanese(JapaneseDictionary::Bundled) => "ja-bundled",
            TokenizerVariant::Japanese(JapaneseDictionary::External) => "ja-external",
            TokenizerVariant::Chinese => "zh",
        }
    }

    pub fn needs_dictionary_path(self) -> bool {
        self == TokenizerVariant::Japanese(JapaneseDictionary::External)
    }
}

impl fmt::Display for TokenizerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenizerVariant {
    type Err = WikiFreqError;

    fn from_str(s: &str) -> Result<Self> {
        TokenizerVariant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| {
                let known: Vec<_> = TokenizerVariant::ALL.iter().map(|v| v.name()).collect();
                WikiFreqError::invalid_argument(format!(
                    "Unknown tokenizer variant '{s}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

impl TryFrom<String> for TokenizerVariant {
    type Error = WikiFreqError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TokenizerVariant> for String {
    fn from(variant: TokenizerVariant) -> Self {
        variant.name().to_string()
    }
}

/// A Wikipedia language edition, identified by its code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    #[default]
    English,
    Japanese,
    Chinese,
    /// Any other edition; tokenized with the regex rules.
    Other(String),
}

impl Language {
    pub fn code(&self) -> &str {
        match self {
            Language::English => "en",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::Other(code) => code,
        }
    }

    /// Variants run when none are requested.
    pub fn default_variants(&self) -> Vec<TokenizerVariant> {
        match self {
            Language::English => vec![TokenizerVariant::Penn],
            Language::Japanese => vec![TokenizerVariant::Japanese(JapaneseDictionary::Bundled)],
            Language::Chinese => vec![TokenizerVariant::Chinese],
            Language::Other(_) => vec![TokenizerVariant::Regex],
        }
    }

    /// Whether `variant` makes sense for this language. The regex variant
    /// works everywhere.
    pub fn supports(&self, variant: TokenizerVariant) -> bool {
        match variant {
            TokenizerVariant::Regex => true,
            TokenizerVariant::Penn => *self == Language::English,
            TokenizerVariant::Japanese(_) => *self == Language::Japanese,
            TokenizerVariant::Chinese => *self == Language::Chinese,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = WikiFreqError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_lowercase();
        match code.as_str() {
            "en" => Ok(Language::English),
            "ja" => Ok(Language::Japanese),
            "zh" => Ok(Language::Chinese),
            _ if !code.is_empty()
                && code.len() <= 12
                && code.chars().all(|c| c.is_ascii_lowercase() || c == '-') =>
            {
                Ok(Language::Other(code))
            }
            _ => Err(WikiFreqError::invalid_argument(format!(
                "Invalid language code '{s}'"
            ))),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = WikiFreqError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

/// Settings shared by every analyzer of a run.
#[derive(Clone, Debug)]
pub struct AnalyzerOptions {
    /// Installation directory of the external Japanese dictionary.
    pub dictionary_path: Option<PathBuf>,
    /// Normalize `’` to `'` before Penn tokenization.
    pub smart_apostrophe: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            dictionary_path: None,
            smart_apostrophe: true,
        }
    }
}

/// Turns cleaned article text into the words counted for one variant.
#[derive(Debug)]
pub struct WordAnalyzer {
    variant: TokenizerVariant,
    pipeline: PipelineAnalyzer,
}

impl WordAnalyzer {
    /// Build the analyzer for `variant`. Loads dictionaries; a missing
    /// dictionary is an error.
    pub fn new(variant: TokenizerVariant, options: &AnalyzerOptions) -> Result<Self> {
        let pipeline = match variant {
            TokenizerVariant::Regex => PipelineAnalyzer::new(Arc::new(RegexTokenizer::new()?))
                .add_filter(Arc::new(WordFilter::non_empty())),
            TokenizerVariant::Penn => PipelineAnalyzer::new(Arc::new(
                PennTreebankTokenizer::new(options.smart_apostrophe),
            ))
            .add_filter(Arc::new(WordFilter::relaxed())),
            TokenizerVariant::Japanese(dictionary) => {
                let uri = match dictionary {
                    JapaneseDictionary::Bundled => EMBEDDED_UNIDIC.to_string(),
                    JapaneseDictionary::External => {
                        let path = options.dictionary_path.as_ref().ok_or_else(|| {
                            WikiFreqError::dictionary(
                                "The ja-external variant needs a dictionary path",
                            )
                        })?;
                        if !path.is_dir() {
                            return Err(WikiFreqError::dictionary(format!(
                                "Dictionary directory not found: {}",
                                path.display()
                            )));
                        }
                        path.to_string_lossy().into_owned()
                    }
                };
                PipelineAnalyzer::new(Arc::new(LinderaTokenizer::new(SEGMENTER_MODE, &uri)?))
                    .add_char_filter(Arc::new(MappingCharFilter::fullwidth_tilde_to_wave_dash()?))
                    .add_filter(Arc::new(WordFilter::strict(&[WAVE_DASH])?))
            }
            TokenizerVariant::Chinese => PipelineAnalyzer::new(Arc::new(LinderaTokenizer::new(
                SEGMENTER_MODE,
                EMBEDDED_CC_CEDICT,
            )?))
            .add_filter(Arc::new(WordFilter::strict(&[])?)),
        }
        .with_name(variant.name());

        log::debug!("Built analyzer {pipeline:?}");

        Ok(WordAnalyzer { variant, pipeline })
    }

    pub fn variant(&self) -> TokenizerVariant {
        self.variant
    }

    /// The words of `text`, in order.
    pub fn words(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.pipeline.analyze(text)?.map(|t| t.text).collect())
    }
}

impl Analyzer for WordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.pipeline.analyze(text)
    }

    fn name(&self) -> &'static str {
        self.variant.name()
    }
}
