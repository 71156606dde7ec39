use anyhow::{Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, TranslationProvider};
use crate::document::{DocumentTranslator, split_pages};
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::providers::mock::MockProvider;
use crate::providers::ollama::Ollama;
use crate::segmentation::Segmenter;
use crate::translation::{
    Cached, ConcurrencyLimited, ProviderTranslator, Retrying, SegmentTranslator, TranslationCache,
    TranslationOrchestrator, TranslationResult,
};

// @module: Application controller for document translation

/// Extension of the plain-text documents the controller reads and writes
pub const TEXT_EXTENSION: &str = "txt";

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum FileOutcome {
    /// Translated and written to `output`
    Translated {
        input: PathBuf,
        output: PathBuf,
        result: TranslationResult,
    },
    /// Translation failed; nothing was written
    Failed { input: PathBuf, result: TranslationResult },
    /// Output already existed and overwriting was not requested
    Skipped { input: PathBuf, output: PathBuf },
}

impl FileOutcome {
    /// The translation result, if a translation was attempted
    pub fn result(&self) -> Option<&TranslationResult> {
        match self {
            Self::Translated { result, .. } | Self::Failed { result, .. } => Some(result),
            Self::Skipped { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Counts for a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Segment cache shared across files
    cache: TranslationCache,
    // @field: Draw progress bars
    show_progress: bool,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.translation.provider = TranslationProvider::Mock;
        Ok(Self::with_config(config)?.with_progress(false))
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let cache = TranslationCache::new(config.translation.common.cache_enabled);

        Ok(Self {
            config,
            cache,
            show_progress: true,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Orchestrator configured from the segmentation settings
    pub fn build_orchestrator(&self) -> TranslationOrchestrator {
        if self.config.segmentation.locale_aware {
            TranslationOrchestrator::default()
        } else {
            TranslationOrchestrator::new(Segmenter::fallback_only())
        }
    }

    /// Capability stack for the configured provider
    pub fn build_translator(&self) -> Arc<dyn SegmentTranslator> {
        let translation = &self.config.translation;
        match translation.provider {
            TranslationProvider::Mock => self.wrap_provider(MockProvider::uppercase()),
            TranslationProvider::Ollama => {
                let ollama = Ollama::new(
                    translation.get_endpoint(),
                    translation.get_model(),
                    translation.get_timeout_secs(),
                )
                .with_temperature(translation.common.temperature);
                self.wrap_provider(ollama)
            }
        }
    }

    // Cache hits skip the semaphore; retries wait outside it
    fn wrap_provider<P: Provider + 'static>(&self, provider: P) -> Arc<dyn SegmentTranslator> {
        let translation = &self.config.translation;
        let common = &translation.common;

        let translator = ProviderTranslator::new(provider, common.system_prompt.clone());
        let translator = ConcurrencyLimited::new(translator, translation.optimal_concurrent_requests());
        let translator = Retrying::new(translator, common.retry_count, common.retry_backoff_ms);
        Arc::new(Cached::new(translator, self.cache.clone()))
    }

    /// Check that the configured provider is reachable
    pub async fn test_connection(&self) -> Result<()> {
        let translation = &self.config.translation;
        let outcome = match translation.provider {
            TranslationProvider::Mock => MockProvider::uppercase().test_connection().await,
            TranslationProvider::Ollama => {
                Ollama::new(translation.get_endpoint(), translation.get_model(), translation.get_timeout_secs())
                    .test_connection()
                    .await
            }
        };

        outcome.map_err(|e| {
            anyhow!(
                "Cannot reach {} at {}: {}",
                translation.provider.display_name(),
                translation.get_endpoint(),
                e
            )
        })
    }

    /// Translate a whole text, page by page
    pub async fn translate_text(&self, text: &str) -> TranslationResult {
        let multi_progress = MultiProgress::new();
        self.translate_text_with_progress(text, &multi_progress).await
    }

    async fn translate_text_with_progress(&self, text: &str, multi_progress: &MultiProgress) -> TranslationResult {
        let total_pages = split_pages(text).len() as u64;
        let progress_bar = if self.show_progress {
            multi_progress.add(ProgressBar::new(total_pages))
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg} {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        info!(
            "{} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        let translator = self.build_translator();
        let document_translator = DocumentTranslator::new(
            self.build_orchestrator(),
            self.config.translation.common.max_concurrent_pages,
        );

        let pb = progress_bar.clone();
        let document = document_translator
            .translate_document(
                text,
                &self.config.source_language,
                &self.config.target_language,
                translator.as_ref(),
                move |done, _total| pb.set_position(done as u64),
            )
            .await;

        progress_bar.finish_and_clear();

        for (page_number, message) in document.failed_pages() {
            error!("Page {} could not be translated: {}", page_number, message);
        }

        document.to_result()
    }

    /// Translate one file into `output_dir`
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<FileOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(input_file, output_dir, &multi_progress, force_overwrite).await
    }

    async fn run_with_progress(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = self.output_path_for(&input_file, &output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(FileOutcome::Skipped {
                input: input_file,
                output: output_path,
            });
        }

        let text = FileManager::read_to_string(&input_file)?;
        let result = self.translate_text_with_progress(&text, multi_progress).await;

        let Some(translated) = result.translated_text() else {
            return Ok(FileOutcome::Failed {
                input: input_file,
                result,
            });
        };

        FileManager::write_to_file(&output_path, translated)?;
        info!(
            "Translation completed in {}: {:?}",
            Self::format_duration(start_time.elapsed()),
            output_path
        );

        Ok(FileOutcome::Translated {
            input: input_file,
            output: output_path,
            result,
        })
    }

    /// Translate every text file below `input_dir`, writing next to each input.
    /// Files that already have a translation are skipped.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files: Vec<PathBuf> = FileManager::find_files(&input_dir, TEXT_EXTENSION)?
            .into_iter()
            .filter(|path| !FileManager::is_translated_output(path))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No text files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = if self.show_progress {
            multi_progress.add(ProgressBar::new(files.len() as u64))
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for file in files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_dir = file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_dir.clone());

            match self.run_with_progress(file, output_dir, &multi_progress, force_overwrite).await {
                Ok(FileOutcome::Translated { .. }) => summary.translated += 1,
                Ok(FileOutcome::Skipped { .. }) => summary.skipped += 1,
                Ok(FileOutcome::Failed { result, .. }) => {
                    error!("Error processing file {}: {}", file_name, result.error().unwrap_or_default());
                    summary.failed += 1;
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let stats = self.cache.stats();
        info!(
            "Folder processing completed in {}: {} translated, {} skipped, {} errors (cache hit rate {:.0}%)",
            Self::format_duration(start_time.elapsed()),
            summary.translated,
            summary.skipped,
            summary.failed,
            stats.hit_rate() * 100.0
        );

        Ok(summary)
    }

    fn output_path_for(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| TEXT_EXTENSION.to_string());
        FileManager::generate_output_path(input_file, output_dir, &self.config.target_language, &extension)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
