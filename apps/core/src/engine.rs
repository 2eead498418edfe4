//! The conversation engine.
//!
//! One engine owns one conversation. Every utterance takes the same path:
//! classify locally, answer from a template when a rule fires, otherwise ask
//! the delegate and recover locally if it fails. The engine itself never
//! returns an error from message processing; whatever goes wrong downstream,
//! the user still gets a reply.

use std::sync::Arc;

use tracing::{info, warn};

use crate::actors::traits::AiDelegate;
use crate::brain::BrainAnalyzer;
use crate::config::RuleSet;
use crate::error::AppError;
use crate::models::{ChatMessage, Conversation, ResponsePayload};
use crate::responder::Responder;

pub struct ChatEngine {
    analyzer: BrainAnalyzer,
    responder: Responder,
    delegate: Option<Arc<dyn AiDelegate>>,
    conversation: Conversation,
}

impl ChatEngine {
    /// Builds an engine from a validated rule set. `delegate` is optional;
    /// without one the engine answers from rules and canned topics only.
    pub fn new(rules: RuleSet, delegate: Option<Arc<dyn AiDelegate>>) -> Result<Self, AppError> {
        let analyzer = BrainAnalyzer::new(&rules)?;
        let responder = Responder::new(rules.templates, rules.fallback_topics, rules.event);
        Ok(Self {
            analyzer,
            responder,
            delegate,
            conversation: Conversation::new(),
        })
    }

    /// Produces exactly one reply for one utterance.
    ///
    /// Empty input gets the no-input nudge and is not recorded; every other
    /// utterance appends one exchange to the history.
    pub async fn process_message(&mut self, utterance: &str) -> ResponsePayload {
        let trimmed = utterance.trim();
        if trimmed.is_empty() {
            return self.responder.no_input();
        }

        let classification = self.analyzer.classify(trimmed);
        let payload = match classification.intent {
            Some(intent) => {
                info!(intent = intent.label(), "rule matched");
                self.responder.respond(intent, &classification)
            }
            None => self.delegate_or_recover(trimmed).await,
        };

        self.conversation.push_exchange(trimmed, &payload.text);
        payload
    }

    /// Consults the delegate for an unmatched utterance. Any delegate failure
    /// is absorbed into a local recovery reply.
    async fn delegate_or_recover(&self, utterance: &str) -> ResponsePayload {
        let Some(delegate) = &self.delegate else {
            return self.responder.recover(utterance);
        };

        let history = self.conversation.messages().to_vec();
        match delegate.generate(utterance.to_string(), history).await {
            Ok(text) => self.responder.delegate_reply(text),
            Err(err) => {
                warn!("delegate failed, recovering locally: {}", err);
                self.responder.recover(utterance)
            }
        }
    }

    pub fn clear_history(&mut self) {
        self.conversation.clear();
    }

    pub fn history(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }
}
