use async_trait::async_trait;

use crate::error::AppError;
use crate::models::ChatMessage;

/// Defines the public interface for an AI delegate.
///
/// This trait abstracts the specific backend, allowing a remote
/// OpenAI-compatible API and in-process test doubles to be used
/// interchangeably by the engine.
#[async_trait]
pub trait AiDelegate: Send + Sync + 'static {
    /// Generates a reply for an utterance no rule matched, given the recent
    /// conversation history for context.
    async fn generate(
        &self,
        utterance: String,
        history: Vec<ChatMessage>,
    ) -> Result<String, AppError>;
}
