//! Engine Tests
//!
//! End-to-end conversation scenarios: rule path, delegate path, local
//! recovery, and history bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;

use crate::actors::traits::AiDelegate;
use crate::config::RuleSet;
use crate::engine::ChatEngine;
use crate::error::AppError;
use crate::models::{ChatMessage, ResponseCategory, Speaker, Tone};

/// Delegate double that records the history it was handed.
struct RecordingDelegate {
    reply: Result<String, AppError>,
    seen_history: std::sync::Mutex<Vec<usize>>,
}

impl RecordingDelegate {
    fn new(reply: Result<String, AppError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen_history: std::sync::Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AiDelegate for RecordingDelegate {
    async fn generate(
        &self,
        _utterance: String,
        history: Vec<ChatMessage>,
    ) -> Result<String, AppError> {
        self.seen_history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(history.len());
        self.reply.clone()
    }
}

fn engine(delegate: Option<Arc<dyn AiDelegate>>) -> ChatEngine {
    ChatEngine::new(RuleSet::load().unwrap(), delegate).unwrap()
}

#[tokio::test]
async fn test_full_conversation_flow() {
    let mut engine = engine(None);

    let location = engine.process_message("Where is the next event?").await;
    assert_eq!(location.category, ResponseCategory::Location);
    assert!(location.text.contains("LONDON"));

    let safety = engine.process_message("Okay but is it safe?").await;
    assert_eq!(safety.category, ResponseCategory::Safety);

    let prize = engine.process_message("And what can I win?").await;
    assert_eq!(prize.category, ResponseCategory::Prize);
    assert!(!prize.text.contains("310"));

    assert_eq!(engine.history().len(), 6);
    assert_eq!(engine.history()[0].speaker, Speaker::User);
    assert_eq!(engine.history()[0].text, "Where is the next event?");
    assert_eq!(engine.history()[1].speaker, Speaker::Butler);
}

#[tokio::test]
async fn test_frustrated_user_gets_playful_reset() {
    let mut engine = engine(None);

    let payload = engine
        .process_message("ugh, this whole thing is so confusing!!")
        .await;

    assert_eq!(payload.category, ResponseCategory::Frustration);
    assert_eq!(payload.tone, Tone::Playful);
}

#[tokio::test]
async fn test_same_utterance_same_reply() {
    let mut engine = engine(None);

    let first = engine.process_message("Is it dangerous?").await;
    let second = engine.process_message("Is it dangerous?").await;

    assert_eq!(first.text, second.text);
    assert_eq!(first.category, second.category);
}

#[tokio::test]
async fn test_delegate_receives_prior_history() {
    let mock = RecordingDelegate::new(Ok("A fine question, Agent.".to_string()));
    let mut engine = engine(Some(mock.clone()));

    engine.process_message("Where is the next event?").await;
    engine.process_message("Can I bring my dog?").await;

    let seen = mock.seen_history.lock().unwrap_or_else(|e| e.into_inner());
    // One delegate call, with the single prior exchange (2 messages) attached.
    assert_eq!(seen.as_slice(), &[2]);
}

#[tokio::test]
async fn test_delegate_failure_never_surfaces() {
    let mock = RecordingDelegate::new(Err(AppError::Timeout("10s elapsed".to_string())));
    let mut engine = engine(Some(mock));

    let payload = engine.process_message("Can I bring my dog?").await;

    // The user sees a calm local reply, not an error.
    assert_eq!(payload.category, ResponseCategory::Default);
    assert!(payload.text.contains("The Butler"));
    assert_eq!(engine.history().len(), 2);
}

#[tokio::test]
async fn test_broken_form_gets_tech_support_locally() {
    let mut engine = engine(None);

    let payload = engine
        .process_message("the registration form is broken, help")
        .await;

    assert_eq!(payload.category, ResponseCategory::Default);
    assert!(payload.text.contains("Quick diagnostic protocol"));
    assert!(payload.text.contains("support@scaters.com"));
}

#[tokio::test]
async fn test_clear_starts_fresh() {
    let mut engine = engine(None);

    engine.process_message("Where is the next event?").await;
    engine.clear_history();
    engine.process_message("Is it safe?").await;

    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.history()[0].text, "Is it safe?");
}

#[tokio::test]
async fn test_empty_and_whitespace_input() {
    let mut engine = engine(None);

    for input in ["", "   ", "\t"] {
        let payload = engine.process_message(input).await;
        assert!(payload.text.contains("Radio silence"), "input {:?}", input);
    }
    assert!(engine.history().is_empty());
}
