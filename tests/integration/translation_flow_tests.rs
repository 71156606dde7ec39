/*!
 * End-to-end translation through providers, decorators and documents
 */

use std::sync::Arc;

use doctrans::document::{DocumentTranslator, join_pages, split_pages};
use doctrans::providers::mock::MockProvider;
use doctrans::segmentation::NoLocaleSegmenter;
use doctrans::translation::{
    Cached, ConcurrencyLimited, ProviderTranslator, Retrying, TranslationCache, TranslationJob,
    TranslationOrchestrator, TranslationResult, orchestrate_translation,
};

use crate::common::{SAMPLE_DOCUMENT, init_logger};

fn mock_stack(provider: MockProvider) -> Cached<Retrying<ConcurrencyLimited<ProviderTranslator<MockProvider>>>> {
    Cached::new(
        Retrying::new(
            ConcurrencyLimited::new(ProviderTranslator::new(provider, "Translate from {source_language} to {target_language}."), 4),
            2,
            1,
        ),
        TranslationCache::new(true),
    )
}

#[tokio::test]
async fn test_job_withJitteryProvider_shouldReassembleInSourceOrder() {
    init_logger();
    let stack = mock_stack(MockProvider::jitter(25));
    let text = "One. Two. Three. Four. Five. Six. Seven. Eight.";
    let job = TranslationJob::new(text, "en", "fr");

    // Echo provider with random delays: output must equal input every time
    for _ in 0..5 {
        let result = orchestrate_translation(&job, &stack).await;
        assert_eq!(result, TranslationResult::success(text));
        stack.cache().clear();
    }
}

#[tokio::test]
async fn test_job_withFailingProvider_shouldReportProviderError() {
    init_logger();
    let provider = MockProvider::failing();
    let stack = mock_stack(provider.clone());
    let job = TranslationJob::new("Hello. World.", "en", "fr");

    let result = orchestrate_translation(&job, &stack).await;

    assert!(!result.is_success());
    assert_eq!(
        result.error(),
        Some("API responded with error: 500 - Simulated provider failure")
    );
    // Each segment tried once plus two retries, fan-in stops at the first exhausted one
    assert!(provider.request_count() >= 3);
}

#[tokio::test]
async fn test_document_withMockProvider_shouldTranslateEveryPage() {
    init_logger();
    let stack = mock_stack(MockProvider::uppercase());
    let translator = DocumentTranslator::new(TranslationOrchestrator::default(), 2);

    let document = translator
        .translate_document(SAMPLE_DOCUMENT, "en", "de", &stack, |_, _| {})
        .await;

    let expected: Vec<String> = split_pages(SAMPLE_DOCUMENT)
        .into_iter()
        .map(|page| page.content.to_uppercase())
        .collect();
    assert_eq!(document.pages.len(), 2);
    assert_eq!(document.into_text().unwrap(), join_pages(&expected));
}

#[tokio::test]
async fn test_document_withFallbackSegmenter_shouldMatchLocaleOutput() {
    let stack = mock_stack(MockProvider::uppercase());
    let locale = DocumentTranslator::new(TranslationOrchestrator::default(), 1);
    let fallback = DocumentTranslator::new(
        TranslationOrchestrator::with_locale_segmenter(Arc::new(NoLocaleSegmenter)),
        1,
    );

    let a = locale.translate_document(SAMPLE_DOCUMENT, "en", "fr", &stack, |_, _| {}).await;
    let b = fallback.translate_document(SAMPLE_DOCUMENT, "en", "fr", &stack, |_, _| {}).await;

    // Segment boundaries differ, the uppercased document does not
    assert_eq!(a.to_result(), b.to_result());
}

#[tokio::test]
async fn test_translation_result_json_shouldUseCamelCase() {
    let stack = mock_stack(MockProvider::uppercase());
    let job = TranslationJob::new("Hola.", "es", "en");

    let result = orchestrate_translation(&job, &stack).await;
    let json = serde_json::to_string(&result).unwrap();

    assert_eq!(json, r#"{"success":true,"translatedText":"HOLA."}"#);
}
