/*!
 * Provider implementations for translation backends.
 *
 * A provider is the outermost layer of a translation capability: it sends one
 * prompt to a model and returns the completion. `ProviderTranslator` adapts
 * any provider into a `SegmentTranslator`.
 * - Ollama: Local LLM server
 * - Mock: Deterministic provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably behind `ProviderTranslator`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Build a request from a system prompt and the text to translate
    fn build_request(&self, system_prompt: &str, text: &str) -> Self::Request;

    /// Complete a request using this provider
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

pub mod mock;
pub mod ollama;
