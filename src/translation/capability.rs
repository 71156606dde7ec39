/*!
 * The per-segment translation capability and its decorators.
 *
 * The orchestrator only knows `SegmentTranslator`. Throttling, retrying and
 * caching are policies of the capability, layered here as wrappers:
 *
 * ```text
 * Cached<Retrying<ConcurrencyLimited<ProviderTranslator<P>>>>
 * ```
 */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::Semaphore;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::segmentation::{TextSegment, TranslatedSegment};

use super::cache::TranslationCache;

/// Translates one segment.
///
/// Implementations must return the input segment's `id` unchanged and must
/// report failure as `Err`, never as an empty translation.
#[async_trait]
pub trait SegmentTranslator: Send + Sync {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment>;
}

#[async_trait]
impl<T: SegmentTranslator + ?Sized> SegmentTranslator for &T {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        (**self).translate_segment(segment, source_language, target_language).await
    }
}

#[async_trait]
impl<T: SegmentTranslator + ?Sized> SegmentTranslator for Arc<T> {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        (**self).translate_segment(segment, source_language, target_language).await
    }
}

#[async_trait]
impl<T: SegmentTranslator + ?Sized> SegmentTranslator for Box<T> {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        (**self).translate_segment(segment, source_language, target_language).await
    }
}

/// Adapts an async function into a `SegmentTranslator`
pub struct FnTranslator<F> {
    f: F,
}

/// Use `f(segment, source_language, target_language)` as the capability
pub fn from_fn<F, Fut>(f: F) -> FnTranslator<F>
where
    F: Fn(TextSegment, String, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TranslatedSegment>> + Send,
{
    FnTranslator { f }
}

#[async_trait]
impl<F, Fut> SegmentTranslator for FnTranslator<F>
where
    F: Fn(TextSegment, String, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TranslatedSegment>> + Send,
{
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        (self.f)(segment, source_language.to_string(), target_language.to_string()).await
    }
}

/// Bounds the number of calls in flight against the inner translator
pub struct ConcurrencyLimited<T> {
    inner: T,
    semaphore: Semaphore,
    max_concurrent_requests: usize,
}

impl<T> ConcurrencyLimited<T> {
    pub fn new(inner: T, max_concurrent_requests: usize) -> Self {
        let max_concurrent_requests = max_concurrent_requests.max(1);
        Self {
            inner,
            semaphore: Semaphore::new(max_concurrent_requests),
            max_concurrent_requests,
        }
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

#[async_trait]
impl<T: SegmentTranslator> SegmentTranslator for ConcurrencyLimited<T> {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| anyhow!("Concurrency limiter closed: {}", e))?;

        self.inner.translate_segment(segment, source_language, target_language).await
    }
}

/// Retries failed calls with exponential backoff
pub struct Retrying<T> {
    inner: T,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl<T> Retrying<T> {
    /// `max_retries` extra attempts, waiting `backoff_base_ms * 2^n` before attempt n+1
    pub fn new(inner: T, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            backoff_base_ms,
        }
    }
}

#[async_trait]
impl<T: SegmentTranslator> SegmentTranslator for Retrying<T> {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        let mut attempt = 0;

        loop {
            match self
                .inner
                .translate_segment(segment.clone(), source_language, target_language)
                .await
            {
                Ok(translated) => return Ok(translated),
                Err(e) if attempt < self.max_retries => {
                    let delay_ms = self.backoff_base_ms.saturating_mul(1u64 << attempt.min(16));
                    warn!(
                        "Segment {} failed (attempt {}/{}): {}. Retrying in {}ms",
                        segment.id,
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay_ms
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Serves repeated segments from a `TranslationCache`
pub struct Cached<T> {
    inner: T,
    cache: TranslationCache,
}

impl<T> Cached<T> {
    pub fn new(inner: T, cache: TranslationCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }
}

#[async_trait]
impl<T: SegmentTranslator> SegmentTranslator for Cached<T> {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        if let Some(hit) = self.cache.get(&segment.text, source_language, target_language) {
            return Ok(segment.translated(hit));
        }

        let translated = self
            .inner
            .translate_segment(segment, source_language, target_language)
            .await?;
        self.cache.store(
            &translated.text,
            source_language,
            target_language,
            &translated.translated_text,
        );

        Ok(translated)
    }
}

/// Turns an LLM `Provider` into a segment translator
pub struct ProviderTranslator<P> {
    provider: P,
    system_prompt: String,
}

impl<P: Provider> ProviderTranslator<P> {
    /// `system_prompt` may contain `{source_language}` and `{target_language}`
    pub fn new(provider: P, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn render_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        self.system_prompt
            .replace("{source_language}", &language_label(source_language))
            .replace("{target_language}", &language_label(target_language))
    }
}

#[async_trait]
impl<P: Provider> SegmentTranslator for ProviderTranslator<P> {
    async fn translate_segment(
        &self,
        segment: TextSegment,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedSegment> {
        let (leading, core, trailing) = split_whitespace_edges(&segment.text);

        // Nothing to translate; keep spacing intact without a round trip
        if core.is_empty() {
            let text = segment.text.clone();
            return Ok(segment.translated(text));
        }

        let system = self.render_system_prompt(source_language, target_language);
        let request = self.provider.build_request(&system, core);

        debug!("Translating segment {} ({} chars)", segment.id, core.chars().count());
        let response = self.provider.complete(request).await?;
        let translated = P::extract_text(&response);
        let translated = translated.trim();

        if translated.is_empty() {
            return Err(ProviderError::EmptyResponse { segment_id: segment.id }.into());
        }

        let text = format!("{}{}{}", leading, translated, trailing);
        Ok(segment.translated(text))
    }
}

/// Split text into leading whitespace, content and trailing whitespace
fn split_whitespace_edges(text: &str) -> (&str, &str, &str) {
    let core_start = text.len() - text.trim_start().len();
    let core_end = text.trim_end().len().max(core_start);
    (&text[..core_start], &text[core_start..core_end], &text[core_end..])
}

fn language_label(code: &str) -> String {
    crate::language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
}
