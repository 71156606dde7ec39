/*!
 * Multi-page documents.
 *
 * Ingestion hands over raw text with pages separated by form feeds (`\f`).
 * Each page is translated as its own job so page structure survives, and a
 * failed page fails the document as a whole.
 */

use anyhow::{Result, anyhow};
use futures::stream::{self, StreamExt};
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::translation::{
    SegmentTranslator, TranslationJob, TranslationOrchestrator, TranslationResult,
};

/// Separator between pages in extracted text (form feed)
pub const PAGE_SEPARATOR: &str = "\u{000C}";

/// One page of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based page number
    pub page_number: usize,
    /// Page text
    pub content: String,
}

/// Split extracted text into pages; empty text is a single empty page
pub fn split_pages(text: &str) -> Vec<Page> {
    text.split(PAGE_SEPARATOR)
        .enumerate()
        .map(|(index, content)| Page {
            page_number: index + 1,
            content: content.to_string(),
        })
        .collect()
}

/// Join page contents back into a single text
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| page.as_ref())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Result of translating one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTranslation {
    pub page_number: usize,
    pub result: TranslationResult,
}

/// Per-page results of a document translation, in page order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTranslation {
    pub pages: Vec<PageTranslation>,
}

impl DocumentTranslation {
    /// Whether every page translated successfully
    pub fn is_complete(&self) -> bool {
        self.pages.iter().all(|page| page.result.is_success())
    }

    /// Pages that failed, with their error messages
    pub fn failed_pages(&self) -> Vec<(usize, &str)> {
        self.pages
            .iter()
            .filter_map(|page| page.result.error().map(|e| (page.page_number, e)))
            .collect()
    }

    /// The translated document, or the first page failure
    pub fn into_text(self) -> Result<String> {
        let mut texts = Vec::with_capacity(self.pages.len());
        for page in self.pages {
            let text = page
                .result
                .into_result()
                .map_err(|e| anyhow!("Page {} failed: {}", page.page_number, e))?;
            texts.push(text);
        }
        Ok(join_pages(&texts))
    }

    /// Collapse into a single job-level result
    pub fn to_result(&self) -> TranslationResult {
        match self.clone().into_text() {
            Ok(text) => TranslationResult::success(text),
            Err(e) => TranslationResult::failure(e.to_string()),
        }
    }
}

/// Translates documents page by page
#[derive(Debug, Clone)]
pub struct DocumentTranslator {
    orchestrator: TranslationOrchestrator,
    max_concurrent_pages: usize,
}

impl DocumentTranslator {
    /// Create a translator that keeps at most `max_concurrent_pages` jobs running
    pub fn new(orchestrator: TranslationOrchestrator, max_concurrent_pages: usize) -> Self {
        Self {
            orchestrator,
            max_concurrent_pages: max_concurrent_pages.max(1),
        }
    }

    /// Translate every page of `text`, reporting `(done, total)` after each page
    pub async fn translate_document<T>(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        capability: &T,
        progress_callback: impl Fn(usize, usize),
    ) -> DocumentTranslation
    where
        T: SegmentTranslator + ?Sized,
    {
        let pages = split_pages(text);
        let total_pages = pages.len();
        let processed_pages = Arc::new(AtomicUsize::new(0));
        let start_time = Instant::now();

        let mut results = stream::iter(pages)
            .map(|page| {
                let orchestrator = &self.orchestrator;
                let processed_pages = processed_pages.clone();
                let progress_callback = &progress_callback;
                let page_number = page.page_number;
                let job = TranslationJob::new(page.content, source_language, target_language);

                async move {
                    let result = orchestrator.orchestrate(&job, capability).await;

                    if let Some(e) = result.error() {
                        error!("Page {} of {} failed: {}", page_number, total_pages, e);
                    }

                    let current = processed_pages.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_pages);

                    PageTranslation { page_number, result }
                }
            })
            .buffer_unordered(self.max_concurrent_pages)
            .collect::<Vec<_>>()
            .await;

        // Restore page order
        results.sort_by_key(|page| page.page_number);

        info!(
            "Translated {} page(s) {} -> {} in {:?}",
            total_pages,
            source_language,
            target_language,
            start_time.elapsed()
        );

        DocumentTranslation { pages: results }
    }
}

impl Default for DocumentTranslator {
    fn default() -> Self {
        Self::new(TranslationOrchestrator::default(), 2)
    }
}
