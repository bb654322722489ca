use std::borrow::Cow;
use std::str::FromStr;

use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;

use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, WikiFreqError};

use super::Tokenizer;

/// Bundled UniDic, the lightweight default for Japanese.
pub const EMBEDDED_UNIDIC: &str = "embedded://unidic";

/// Bundled CC-CEDICT, used for Chinese segmentation.
pub const EMBEDDED_CC_CEDICT: &str = "embedded://cc-cedict";

/// Dictionary-backed segmenter.
///
/// Loading a dictionary is expensive, so one instance is built per run and
/// shared by every worker.
pub struct LinderaTokenizer {
    inner: Segmenter,
    dictionary: String,
}

impl LinderaTokenizer {
    /// Create a new Lindera tokenizer.
    ///
    /// `dict_uri` is either an `embedded://` URI or the path of a compiled
    /// dictionary directory.
    pub fn new(mode_str: &str, dict_uri: &str) -> Result<Self> {
        let mode = Mode::from_str(mode_str)
            .map_err(|e| WikiFreqError::analysis(format!("Invalid mode '{mode_str}': {e}")))?;
        let dict = load_dictionary(dict_uri).map_err(|e| {
            WikiFreqError::dictionary(format!("Failed to load dictionary '{dict_uri}': {e}"))
        })?;
        let inner = Segmenter::new(mode, dict, None);

        log::info!("Loaded segmentation dictionary {dict_uri}");

        Ok(Self {
            inner,
            dictionary: dict_uri.to_string(),
        })
    }

    /// The dictionary URI or path this tokenizer was built from.
    pub fn dictionary(&self) -> &str {
        &self.dictionary
    }
}

impl Tokenizer for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();

        for token in self
            .inner
            .segment(Cow::Borrowed(text))
            .map_err(|e| WikiFreqError::analysis(format!("Failed to segment text: {e}")))?
        {
            tokens.push(Token::with_offsets(
                token.surface,
                token.position,
                token.byte_start,
                token.byte_end,
            ));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lindera"
    }
}
