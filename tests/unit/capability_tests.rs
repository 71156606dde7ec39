/*!
 * Tests for capability decorators and the provider adapter
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use doctrans::providers::mock::MockProvider;
use doctrans::segmentation::{TextSegment, TranslatedSegment};
use doctrans::translation::{
    Cached, ConcurrencyLimited, ProviderTranslator, Retrying, SegmentTranslator, TranslationCache,
    TranslationJob, orchestrate_translation,
};

/// Tracks the peak number of concurrent calls
#[derive(Debug, Default)]
struct PeakTracker {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl SegmentTranslator for PeakTracker {
    async fn translate_segment(&self, segment: TextSegment, _s: &str, _t: &str) -> Result<TranslatedSegment> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let text = segment.text.clone();
        Ok(segment.translated(text))
    }
}

/// Fails the first `failures` calls, then echoes
#[derive(Debug)]
struct FlakyTranslator {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl SegmentTranslator for FlakyTranslator {
    async fn translate_segment(&self, segment: TextSegment, _s: &str, _t: &str) -> Result<TranslatedSegment> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(anyhow!("temporary failure #{}", call + 1));
        }
        let text = segment.text.clone();
        Ok(segment.translated(text))
    }
}

#[tokio::test]
async fn test_concurrency_limited_shouldCapCallsInFlight() {
    let tracker = Arc::new(PeakTracker::default());
    let limited = ConcurrencyLimited::new(tracker.clone(), 2);
    let job = TranslationJob::new("A. B. C. D. E. F.", "en", "fr");

    let result = orchestrate_translation(&job, &limited).await;

    assert!(result.is_success());
    assert_eq!(tracker.peak.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrency_limited_overBorrowedTranslator_shouldCapCallsInFlight() {
    let tracker = PeakTracker::default();
    let limited = ConcurrencyLimited::new(&tracker, 3);
    let job = TranslationJob::new("A. B. C. D. E. F.", "en", "fr");

    let result = orchestrate_translation(&job, &limited).await;

    assert_eq!(result.translated_text(), Some("A. B. C. D. E. F."));
    assert_eq!(tracker.peak.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_concurrency_limited_withZero_shouldStillAllowOne() {
    let limited = ConcurrencyLimited::new(PeakTracker::default(), 0);
    assert_eq!(limited.max_concurrent_requests(), 1);
}

#[tokio::test]
async fn test_retrying_withTransientFailures_shouldEventuallySucceed() {
    let retrying = Retrying::new(FlakyTranslator { failures: 2, calls: AtomicUsize::new(0) }, 3, 1);

    let translated = retrying
        .translate_segment(TextSegment::new(0, "Hi."), "en", "fr")
        .await
        .unwrap();

    assert_eq!(translated.translated_text, "Hi.");
}

#[tokio::test]
async fn test_retrying_withExhaustedAttempts_shouldReturnLastError() {
    let flaky = FlakyTranslator { failures: 10, calls: AtomicUsize::new(0) };
    let retrying = Retrying::new(flaky, 2, 1);

    let error = retrying
        .translate_segment(TextSegment::new(0, "Hi."), "en", "fr")
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "temporary failure #3");
}

#[tokio::test]
async fn test_cached_withRepeatedSentences_shouldCallProviderOnce() {
    let provider = MockProvider::uppercase();
    let cached = Cached::new(
        ProviderTranslator::new(provider.clone(), "Translate."),
        TranslationCache::new(true),
    );
    let job = TranslationJob::new("Yes. Yes. ", "en", "fr");

    // Warm the cache, then every segment is a hit
    cached.translate_segment(TextSegment::new(0, "Yes. "), "en", "fr").await.unwrap();
    let result = orchestrate_translation(&job, &cached).await;

    assert_eq!(result.translated_text(), Some("YES. YES. "));
    assert_eq!(provider.request_count(), 1);
    assert_eq!(cached.cache().stats().hits, 2);
}

#[tokio::test]
async fn test_cached_withDisabledCache_shouldAlwaysCallProvider() {
    let provider = MockProvider::echo();
    let cached = Cached::new(
        ProviderTranslator::new(provider.clone(), "Translate."),
        TranslationCache::new(false),
    );

    for _ in 0..3 {
        cached.translate_segment(TextSegment::new(0, "Same."), "en", "fr").await.unwrap();
    }

    assert_eq!(provider.request_count(), 3);
    assert!(cached.cache().is_empty());
}

#[tokio::test]
async fn test_provider_translator_shouldPreserveIdAndSpacing() {
    let translator = ProviderTranslator::new(MockProvider::uppercase(), "From {source_language} to {target_language}.");

    let translated = translator
        .translate_segment(TextSegment::new(7, "Hello world. "), "en", "es")
        .await
        .unwrap();

    assert_eq!(translated.id, 7);
    assert_eq!(translated.text, "Hello world. ");
    assert_eq!(translated.translated_text, "HELLO WORLD. ");
}

#[tokio::test]
async fn test_provider_translator_withEmptyResponse_shouldFail() {
    let translator = ProviderTranslator::new(MockProvider::empty(), "Translate.");

    let error = translator
        .translate_segment(TextSegment::new(3, "Hello."), "en", "fr")
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Provider returned an empty translation for segment 3");
}

#[tokio::test]
async fn test_decorator_stack_withIntermittentProvider_shouldRecover() {
    let provider = MockProvider::intermittent(2);
    let stack = Cached::new(
        Retrying::new(
            ConcurrencyLimited::new(ProviderTranslator::new(provider.clone(), "Translate."), 1),
            3,
            1,
        ),
        TranslationCache::new(true),
    );
    let job = TranslationJob::new("One. Two. Three.", "en", "fr");

    let result = orchestrate_translation(&job, &stack).await;

    assert!(result.is_success(), "{:?}", result.error());
    assert!(provider.request_count() > 3);
}
