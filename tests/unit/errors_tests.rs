/*!
 * Tests for error types and conversions
 */

use doctrans::errors::{ProviderError, TranslationError};

#[test]
fn test_provider_error_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "rate limited".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 429 - rate limited");
}

#[test]
fn test_provider_error_asAnyhow_shouldDowncast() {
    let error = anyhow::Error::from(ProviderError::EmptyResponse { segment_id: 3 });
    assert!(matches!(
        error.downcast_ref::<ProviderError>(),
        Some(ProviderError::EmptyResponse { segment_id: 3 })
    ));
}

#[test]
fn test_segment_id_mismatch_shouldListReturnedIds() {
    let error = TranslationError::SegmentIdMismatch {
        expected: 2,
        actual: vec![1, 2],
    };
    assert_eq!(error.to_string(), "Segment id mismatch: expected ids 0..2, got [1, 2]");
}

#[test]
fn test_cancelled_display_shouldBeStable() {
    assert_eq!(TranslationError::Cancelled.to_string(), "Translation cancelled");
}
