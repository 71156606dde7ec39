/*!
 * Job and result values exchanged with the orchestrator.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// One request to translate a body of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationJob {
    /// Text to translate
    pub source_text: String,

    /// Language tag of the source text, also used to pick sentence rules
    #[serde(rename = "sourceLang", alias = "sourceLanguage")]
    pub source_language: String,

    /// Language tag to translate into
    #[serde(rename = "targetLang", alias = "targetLanguage")]
    pub target_language: String,
}

impl TranslationJob {
    /// Create a new translation job
    pub fn new(
        source_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Terminal outcome of a job.
///
/// Exactly one of `translated_text` and `error` is set; the constructors are
/// the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    translated_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TranslationResult {
    /// A successful job with its reassembled text
    pub fn success(translated_text: impl Into<String>) -> Self {
        Self {
            success: true,
            translated_text: Some(translated_text.into()),
            error: None,
        }
    }

    /// A failed job with a human-readable message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            translated_text: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn translated_text(&self) -> Option<&str> {
        self.translated_text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Convert into a plain `Result`, text on success and message on failure
    pub fn into_result(self) -> Result<String, String> {
        match (self.translated_text, self.error) {
            (Some(text), None) => Ok(text),
            (_, Some(error)) => Err(error),
            (None, None) => Err("Translation produced no result".to_string()),
        }
    }
}

/// Lifecycle of a single orchestration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Pending,
    Segmenting,
    Dispatching,
    AllSucceeded,
    AnyFailed,
    Resolved,
}

impl JobPhase {
    /// Whether `next` is a legal successor of this phase
    pub fn can_advance_to(self, next: JobPhase) -> bool {
        matches!(
            (self, next),
            (JobPhase::Pending, JobPhase::Segmenting)
                | (JobPhase::Segmenting, JobPhase::Dispatching)
                | (JobPhase::Dispatching, JobPhase::AllSucceeded)
                | (JobPhase::Dispatching, JobPhase::AnyFailed)
                | (JobPhase::AllSucceeded, JobPhase::Resolved)
                | (JobPhase::AnyFailed, JobPhase::Resolved)
        )
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::Pending => "pending",
            JobPhase::Segmenting => "segmenting",
            JobPhase::Dispatching => "dispatching",
            JobPhase::AllSucceeded => "all-succeeded",
            JobPhase::AnyFailed => "any-failed",
            JobPhase::Resolved => "resolved",
        };
        write!(f, "{}", name)
    }
}
