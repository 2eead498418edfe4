use tokio::sync::oneshot;

use crate::models::ChatMessage;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Clone)]
pub enum ActorError {
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the delegate actor.
#[derive(Debug)]
pub enum DelegateMessage {
    /// A request to generate a reply for an unmatched utterance.
    Generate {
        utterance: String,
        /// Recent conversation history for context.
        history: Vec<ChatMessage>,
        /// A channel to send the final `String` result back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}
