/*!
 * Translation orchestrator.
 *
 * Runs one job end to end:
 * 1. Segment the source text
 * 2. Dispatch every segment to the capability at once
 * 3. Wait for all of them, failing on the first error
 * 4. Reassemble the translations in segment id order
 *
 * Every failure becomes the `error` of the returned `TranslationResult`.
 */

use std::future::{self, Future};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::future::try_join_all;
use log::{debug, error};

use crate::errors::TranslationError;
use crate::segmentation::{LocaleSegmenter, Segmenter, TranslatedSegment};

use super::capability::SegmentTranslator;
use super::core::{JobPhase, TranslationJob, TranslationResult};

/// Orchestrates translation jobs with a fixed segmenter
#[derive(Debug, Clone, Default)]
pub struct TranslationOrchestrator {
    segmenter: Segmenter,
}

impl TranslationOrchestrator {
    /// Create an orchestrator around the given segmenter
    pub fn new(segmenter: Segmenter) -> Self {
        Self { segmenter }
    }

    /// Create an orchestrator whose segmenter uses the given locale facility
    pub fn with_locale_segmenter(facility: Arc<dyn LocaleSegmenter>) -> Self {
        Self::new(Segmenter::new(facility))
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Translate a job, never failing outward
    pub async fn orchestrate<T>(&self, job: &TranslationJob, capability: &T) -> TranslationResult
    where
        T: SegmentTranslator + ?Sized,
    {
        self.orchestrate_with_cancel(job, capability, future::pending::<()>()).await
    }

    /// Translate a job unless `cancel` resolves first.
    ///
    /// On cancellation every in-flight capability call is dropped and the
    /// result is a failure.
    pub async fn orchestrate_with_cancel<T, C>(
        &self,
        job: &TranslationJob,
        capability: &T,
        cancel: C,
    ) -> TranslationResult
    where
        T: SegmentTranslator + ?Sized,
        C: Future<Output = ()>,
    {
        let started = Instant::now();
        let mut tracker = PhaseTracker::new();

        let outcome = self.run(job, capability, cancel, &mut tracker).await;

        let result = match outcome {
            Ok(text) => {
                tracker.advance(JobPhase::AllSucceeded);
                TranslationResult::success(text)
            }
            Err(e) => {
                tracker.advance(JobPhase::AnyFailed);
                let message = failure_message(&e);
                error!(
                    "Translation {} -> {} failed: {}",
                    job.source_language, job.target_language, message
                );
                TranslationResult::failure(message)
            }
        };

        tracker.advance(JobPhase::Resolved);
        debug!("Job resolved in {:?}", started.elapsed());
        result
    }

    async fn run<T, C>(
        &self,
        job: &TranslationJob,
        capability: &T,
        cancel: C,
        tracker: &mut PhaseTracker,
    ) -> Result<String>
    where
        T: SegmentTranslator + ?Sized,
        C: Future<Output = ()>,
    {
        tracker.advance(JobPhase::Segmenting);
        let segments = self.segmenter.segment(&job.source_text, &job.source_language);
        let expected = segments.len();

        tracker.advance(JobPhase::Dispatching);
        debug!(
            "Dispatching {} segments ({} -> {})",
            expected, job.source_language, job.target_language
        );

        let dispatch = try_join_all(segments.into_iter().map(|segment| {
            capability.translate_segment(segment, &job.source_language, &job.target_language)
        }));

        let translated = tokio::select! {
            biased;
            () = cancel => return Err(TranslationError::Cancelled.into()),
            translated = dispatch => translated?,
        };

        verify_segment_ids(expected, &translated)?;
        Ok(reassemble_segments(translated))
    }
}

/// Join translations in ascending id order, without separator
pub fn reassemble_segments(mut segments: Vec<TranslatedSegment>) -> String {
    segments.sort_by_key(|segment| segment.id);
    segments
        .into_iter()
        .map(|segment| segment.translated_text)
        .collect()
}

/// Returned ids must be exactly `0..expected`, in any order
fn verify_segment_ids(expected: usize, translated: &[TranslatedSegment]) -> Result<(), TranslationError> {
    let mut ids: Vec<usize> = translated.iter().map(|segment| segment.id).collect();
    ids.sort_unstable();

    if ids.iter().copied().eq(0..expected) {
        Ok(())
    } else {
        Err(TranslationError::SegmentIdMismatch { expected, actual: ids })
    }
}

/// The error's message, or the first non-blank message among its causes
fn failure_message(error: &anyhow::Error) -> String {
    error
        .chain()
        .map(|cause| cause.to_string())
        .find(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "Translation failed without an error message".to_string())
}

struct PhaseTracker {
    phase: JobPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self { phase: JobPhase::Pending }
    }

    fn advance(&mut self, next: JobPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal job transition {} -> {}",
            self.phase,
            next
        );
        debug!("Job phase {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// Translate a job with the default segmenter
pub async fn orchestrate_translation<T>(job: &TranslationJob, capability: &T) -> TranslationResult
where
    T: SegmentTranslator + ?Sized,
{
    TranslationOrchestrator::default().orchestrate(job, capability).await
}

/// Translate a job with the default segmenter unless `cancel` resolves first
pub async fn orchestrate_translation_with_cancel<T, C>(
    job: &TranslationJob,
    capability: &T,
    cancel: C,
) -> TranslationResult
where
    T: SegmentTranslator + ?Sized,
    C: Future<Output = ()>,
{
    TranslationOrchestrator::default()
        .orchestrate_with_cancel(job, capability, cancel)
        .await
}
