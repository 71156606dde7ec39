/*!
 * Locale-aware sentence segmentation facilities.
 */

use std::fmt::Debug;

use unicode_segmentation::UnicodeSegmentation;

use crate::errors::SegmentationError;
use crate::language_utils;

/// A locale-sensitive sentence segmentation facility.
///
/// Implementations answer `supports` truthfully; the segmenter only calls
/// `segment` for languages reported as supported. Returned pieces must
/// concatenate back to the input text.
pub trait LocaleSegmenter: Send + Sync + Debug {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Whether sentence rules exist for this language tag
    fn supports(&self, language: &str) -> bool;

    /// Split text into sentence pieces
    fn segment(&self, text: &str, language: &str) -> Result<Vec<String>, SegmentationError>;
}

/// Unicode UAX #29 sentence boundaries.
///
/// The rules are language independent, so any tag whose primary subtag is a
/// known ISO 639 code is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

impl LocaleSegmenter for UnicodeSentenceSegmenter {
    fn name(&self) -> &str {
        "unicode-uax29"
    }

    fn supports(&self, language: &str) -> bool {
        language_utils::is_known_language(language)
    }

    fn segment(&self, text: &str, language: &str) -> Result<Vec<String>, SegmentationError> {
        if !self.supports(language) {
            return Err(SegmentationError::UnsupportedLanguage(language.to_string()));
        }

        Ok(text.split_sentence_bounds().map(str::to_string).collect())
    }
}

/// A facility for hosts without locale data: never supports anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocaleSegmenter;

impl LocaleSegmenter for NoLocaleSegmenter {
    fn name(&self) -> &str {
        "none"
    }

    fn supports(&self, _language: &str) -> bool {
        false
    }

    fn segment(&self, _text: &str, language: &str) -> Result<Vec<String>, SegmentationError> {
        Err(SegmentationError::UnsupportedLanguage(language.to_string()))
    }
}
