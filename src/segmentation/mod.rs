/*!
 * Sentence segmentation of source text.
 *
 * Text is split into ordered, addressable `TextSegment`s. A locale-aware
 * facility is tried first; whenever it is missing, does not support the
 * language, or fails, the deterministic regex splitter takes over.
 * Segmentation itself never fails.
 *
 * - `locale`: the `LocaleSegmenter` capability and its implementations
 * - `fallback`: the terminator-aware regex splitter
 */

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub mod fallback;
pub mod locale;

pub use self::fallback::fallback_split;
pub use self::locale::{LocaleSegmenter, NoLocaleSegmenter, UnicodeSentenceSegmenter};

/// One unit of translatable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    /// Position in segmentation order, starting at 0
    pub id: usize,

    /// Source text, including its surrounding whitespace and punctuation
    pub text: String,
}

impl TextSegment {
    /// Create a new segment
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Pair this segment with its translation
    pub fn translated(self, translated_text: impl Into<String>) -> TranslatedSegment {
        TranslatedSegment {
            id: self.id,
            text: self.text,
            translated_text: translated_text.into(),
        }
    }
}

/// A segment together with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedSegment {
    /// Id of the source segment
    pub id: usize,

    /// Source text
    pub text: String,

    /// Translated text
    pub translated_text: String,
}

/// Splits text into segments using an optional locale facility
#[derive(Clone)]
pub struct Segmenter {
    facility: Option<Arc<dyn LocaleSegmenter>>,
}

impl std::fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter")
            .field("facility", &self.facility.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(Arc::new(UnicodeSentenceSegmenter))
    }
}

impl Segmenter {
    /// Create a segmenter backed by the given locale facility
    pub fn new(facility: Arc<dyn LocaleSegmenter>) -> Self {
        Self {
            facility: Some(facility),
        }
    }

    /// Create a segmenter that always uses the regex fallback
    pub fn fallback_only() -> Self {
        Self { facility: None }
    }

    /// Split `text` into ordered segments with ids `0..n`
    pub fn segment(&self, text: &str, language: &str) -> Vec<TextSegment> {
        let pieces = self
            .locale_pieces(text, language)
            .unwrap_or_else(|| fallback_split(text));

        number(pieces)
    }

    /// Run the locale facility, or `None` when the fallback must be used
    fn locale_pieces(&self, text: &str, language: &str) -> Option<Vec<String>> {
        let facility = self.facility.as_ref()?;

        if !facility.supports(language) {
            debug!(
                "Locale segmenter '{}' does not support '{}', using fallback",
                facility.name(),
                language
            );
            return None;
        }

        // A misbehaving facility must not take the job down with it
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| facility.segment(text, language)));

        match outcome {
            Ok(Ok(pieces)) if pieces.is_empty() => Some(vec![String::new()]),
            Ok(Ok(pieces)) => Some(pieces),
            Ok(Err(e)) => {
                warn!("Error while segmenting with '{}': {}", facility.name(), e);
                None
            }
            Err(_) => {
                warn!("Locale segmenter '{}' panicked, using fallback", facility.name());
                None
            }
        }
    }
}

fn number(pieces: Vec<String>) -> Vec<TextSegment> {
    pieces
        .into_iter()
        .enumerate()
        .map(|(id, text)| TextSegment { id, text })
        .collect()
}

/// Segment text with the default Unicode sentence facility
pub fn segment_text(text: &str, language: &str) -> Vec<TextSegment> {
    Segmenter::default().segment(text, language)
}
