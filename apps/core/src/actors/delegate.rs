use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::actors::messages::{ActorError, AppError, DelegateMessage};
use crate::actors::traits::AiDelegate;
use crate::config::DelegateSettings;
use crate::models::{ChatMessage, Speaker};

// --- Constants ---
/// Budget for a single HTTP round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Budget for the whole generate call, retries included.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(35);
/// Transient failures are retried this many times before giving up.
const MAX_RETRIES: usize = 2;
/// Only the most recent messages are forwarded for context.
const HISTORY_WINDOW: usize = 8;
/// Replies shorter than this are treated as a failed generation.
const MIN_REPLY_CHARS: usize = 10;

/// A handle to the delegate actor.
///
/// This struct provides a public, cloneable interface for sending messages to
/// the running delegate actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct HttpDelegateHandle {
    sender: mpsc::Sender<DelegateMessage>,
}

impl HttpDelegateHandle {
    /// Creates a new delegate actor and returns a handle to it.
    ///
    /// This will spawn the `DelegateRunner` in a new Tokio task.
    pub fn new(settings: DelegateSettings, scope_instruction: String) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = DelegateRunner::new(receiver, settings, scope_instruction);
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }
}

#[async_trait::async_trait]
impl AiDelegate for HttpDelegateHandle {
    async fn generate(
        &self,
        utterance: String,
        history: Vec<ChatMessage>,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = DelegateMessage::Generate {
            utterance,
            history,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?;
        timeout(GENERATE_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?
    }
}

/// Outcome of one HTTP attempt, split so the retry loop knows what is
/// worth retrying.
enum AttemptError {
    /// Timeouts, connection failures, 429 and 5xx responses.
    Transient(AppError),
    /// Everything else, including a usable response with a bad body.
    Fatal(AppError),
}

// --- Actor Runner (Internal Logic) ---
struct DelegateRunner {
    receiver: mpsc::Receiver<DelegateMessage>,
    settings: DelegateSettings,
    scope_instruction: String,
    client: Client,
}

impl DelegateRunner {
    fn new(
        receiver: mpsc::Receiver<DelegateMessage>,
        settings: DelegateSettings,
        scope_instruction: String,
    ) -> Self {
        Self {
            receiver,
            settings,
            scope_instruction,
            client: Client::new(),
        }
    }

    async fn run(mut self) {
        info!("Delegate actor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("Delegate actor stopped");
    }

    async fn handle_message(&self, msg: DelegateMessage) {
        match msg {
            DelegateMessage::Generate {
                utterance,
                history,
                responder,
            } => {
                let result = self.generate_reply(&utterance, &history).await;
                let _ = responder.send(result);
            }
        }
    }

    /// Runs the chat completion with retries on transient failures.
    async fn generate_reply(
        &self,
        utterance: &str,
        history: &[ChatMessage],
    ) -> Result<String, AppError> {
        let payload = self.build_payload(utterance, history);

        let mut attempt = 0;
        loop {
            match self.request_once(&payload).await {
                Ok(reply) => return Ok(reply),
                Err(AttemptError::Transient(err)) if attempt < MAX_RETRIES => {
                    attempt += 1;
                    warn!(attempt, "transient delegate failure, retrying: {}", err);
                }
                Err(AttemptError::Transient(err)) | Err(AttemptError::Fatal(err)) => {
                    return Err(err)
                }
            }
        }
    }

    fn build_payload(&self, utterance: &str, history: &[ChatMessage]) -> serde_json::Value {
        let mut messages = vec![json!({
            "role": "system",
            "content": self.scope_instruction,
        })];
        for msg in windowed(history) {
            let role = match msg.speaker {
                Speaker::User => "user",
                Speaker::Butler => "assistant",
            };
            messages.push(json!({ "role": role, "content": msg.text }));
        }
        messages.push(json!({ "role": "user", "content": utterance }));

        json!({
            "model": self.settings.model,
            "messages": messages,
        })
    }

    async fn request_once(&self, payload: &serde_json::Value) -> Result<String, AttemptError> {
        let endpoint = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let request_future = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(payload)
            .send();

        let res = timeout(REQUEST_TIMEOUT, request_future)
            .await
            .map_err(|e| AttemptError::Transient(AppError::from(e)))?
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AttemptError::Transient(AppError::from(e))
                } else {
                    AttemptError::Fatal(AppError::from(e))
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let err = AppError::Delegate(format!(
                "Completion request failed with status {}: {}",
                status, body
            ));
            return if status.as_u16() == 429 || status.is_server_error() {
                Err(AttemptError::Transient(err))
            } else {
                Err(AttemptError::Fatal(err))
            };
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(AppError::Delegate(e.to_string())))?;

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        if reply.chars().count() < MIN_REPLY_CHARS {
            return Err(AttemptError::Fatal(AppError::Delegate(format!(
                "reply too short ({} chars)",
                reply.chars().count()
            ))));
        }

        Ok(reply)
    }
}

/// Truncates the history to the most recent window.
fn windowed(history: &[ChatMessage]) -> &[ChatMessage] {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    &history[start..]
}
