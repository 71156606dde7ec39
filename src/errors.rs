/*!
 * Error types for the doctrans library.
 *
 * This module contains custom error types for the different layers of the
 * translation engine, using the thiserror crate for ergonomic error definitions.
 * Application plumbing (config loading, file handling) uses `anyhow` directly.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered with nothing for a non-blank segment
    #[error("Provider returned an empty translation for segment {segment_id}")]
    EmptyResponse {
        /// Id of the segment that came back empty
        segment_id: usize,
    },
}

/// Errors raised inside a locale segmentation facility.
///
/// These never leave the segmenter: every variant is recovered by the
/// regex fallback.
#[derive(Error, Debug)]
pub enum SegmentationError {
    /// The facility has no sentence rules for the requested language
    #[error("Language not supported by locale segmenter: {0}")]
    UnsupportedLanguage(String),

    /// The facility failed while segmenting
    #[error("Locale segmentation failed: {0}")]
    Facility(String),
}

/// Errors raised by orchestration itself.
///
/// Provider and capability failures travel as `anyhow::Error` so their
/// context chain survives up to the failure message.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The capability returned ids that do not cover the dispatched segments
    #[error("Segment id mismatch: expected ids 0..{expected}, got {actual:?}")]
    SegmentIdMismatch {
        /// Number of dispatched segments
        expected: usize,
        /// Ids actually returned, in ascending order
        actual: Vec<usize>,
    },

    /// The job was cancelled before every segment settled
    #[error("Translation cancelled")]
    Cancelled,
}
