/*!
 * Translation orchestration.
 *
 * This module turns a `TranslationJob` into a `TranslationResult` using an
 * injected per-segment capability. It is split into several submodules:
 *
 * - `core`: job, result and job phase types
 * - `capability`: the `SegmentTranslator` contract and its decorators
 * - `orchestrator`: segmentation, fan-out, fan-in and reassembly
 * - `cache`: segment translation cache used by the `Cached` decorator
 */

// Re-export main types for easier usage
pub use self::capability::{
    Cached, ConcurrencyLimited, FnTranslator, ProviderTranslator, Retrying, SegmentTranslator,
    from_fn,
};
pub use self::cache::{CacheStats, TranslationCache};
pub use self::core::{JobPhase, TranslationJob, TranslationResult};
pub use self::orchestrator::{
    TranslationOrchestrator, orchestrate_translation, orchestrate_translation_with_cancel,
    reassemble_segments,
};

// Submodules
pub mod cache;
pub mod capability;
pub mod core;
pub mod orchestrator;
