/*!
 * Scriptable segment translators for tests
 *
 * Each translator records what it was asked to do so tests can check call
 * counts and completion order without touching a real provider.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use doctrans::segmentation::{TextSegment, TranslatedSegment};
use doctrans::translation::SegmentTranslator;

/// Uppercases text after a per-segment delay and records completion order
#[derive(Debug, Default)]
pub struct DelayedTranslator {
    delays_ms: HashMap<usize, u64>,
    completed: Mutex<Vec<usize>>,
}

impl DelayedTranslator {
    pub fn new(delays_ms: impl IntoIterator<Item = (usize, u64)>) -> Self {
        Self {
            delays_ms: delays_ms.into_iter().collect(),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Segment ids in the order they finished
    pub fn completion_order(&self) -> Vec<usize> {
        self.completed.lock().clone()
    }
}

#[async_trait]
impl SegmentTranslator for DelayedTranslator {
    async fn translate_segment(&self, segment: TextSegment, _source: &str, _target: &str) -> Result<TranslatedSegment> {
        let delay = self.delays_ms.get(&segment.id).copied().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.completed.lock().push(segment.id);
        let text = segment.text.to_uppercase();
        Ok(segment.translated(text))
    }
}

/// Fails on one segment id, after an optional delay; counts calls and completions
#[derive(Debug)]
pub struct FailingOnSegment {
    failing_id: usize,
    message: String,
    fail_after_ms: u64,
    others_take_ms: u64,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl FailingOnSegment {
    pub fn new(failing_id: usize, message: impl Into<String>) -> Self {
        Self {
            failing_id,
            message: message.into(),
            fail_after_ms: 0,
            others_take_ms: 0,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn with_timing(mut self, fail_after_ms: u64, others_take_ms: u64) -> Self {
        self.fail_after_ms = fail_after_ms;
        self.others_take_ms = others_take_ms;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Segments that ran to completion successfully
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SegmentTranslator for FailingOnSegment {
    async fn translate_segment(&self, segment: TextSegment, _source: &str, _target: &str) -> Result<TranslatedSegment> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if segment.id == self.failing_id {
            tokio::time::sleep(Duration::from_millis(self.fail_after_ms)).await;
            return Err(anyhow!("{}", self.message));
        }

        tokio::time::sleep(Duration::from_millis(self.others_take_ms)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        let text = segment.text.to_uppercase();
        Ok(segment.translated(text))
    }
}

/// Returns every segment with a shifted id
#[derive(Debug, Default)]
pub struct IdShiftingTranslator {
    pub shift: usize,
}

#[async_trait]
impl SegmentTranslator for IdShiftingTranslator {
    async fn translate_segment(&self, segment: TextSegment, _source: &str, _target: &str) -> Result<TranslatedSegment> {
        Ok(TranslatedSegment {
            id: segment.id + self.shift,
            text: segment.text.clone(),
            translated_text: segment.text,
        })
    }
}

/// Tags each segment with the languages it was called with
#[derive(Debug, Default, Clone)]
pub struct LanguageTagger {
    calls: Arc<AtomicUsize>,
}

impl LanguageTagger {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SegmentTranslator for LanguageTagger {
    async fn translate_segment(&self, segment: TextSegment, source: &str, target: &str) -> Result<TranslatedSegment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = format!("<{}>{}</{}>", source, segment.text, target);
        Ok(segment.translated(text))
    }
}

/// Returns segment 0 as id 1 and segment 1 as id 0; other ids unchanged
#[derive(Debug, Default)]
pub struct IdSwappingTranslator;

#[async_trait]
impl SegmentTranslator for IdSwappingTranslator {
    async fn translate_segment(&self, segment: TextSegment, _source: &str, _target: &str) -> Result<TranslatedSegment> {
        let id = match segment.id {
            0 => 1,
            1 => 0,
            other => other,
        };
        Ok(TranslatedSegment {
            id,
            translated_text: segment.text.to_uppercase(),
            text: segment.text,
        })
    }
}
