//! Response construction.
//!
//! Turns a classification into the final text: picks the template for the
//! winning intent, substitutes event data, and prepends the empathetic
//! lead-in when the user sounded negative. Also owns the canned fallback
//! topics used when no rule matched and no delegate reply is available.

use crate::brain::sentiment::SentimentLabel;
use crate::brain::{Classification, IntentKind};
use crate::config::{EventInfo, FallbackTopic, Template, Templates};
use crate::models::{ResponseCategory, ResponsePayload, Tone};

/// Builds every reply the Butler produces locally.
pub struct Responder {
    templates: Templates,
    fallback_topics: Vec<FallbackTopic>,
    event: EventInfo,
}

impl Responder {
    pub fn new(templates: Templates, fallback_topics: Vec<FallbackTopic>, event: EventInfo) -> Self {
        Self {
            templates,
            fallback_topics,
            event,
        }
    }

    /// Renders the reply for a classified utterance with a recognized intent.
    ///
    /// The empathetic prefix is only attached when the utterance's sentiment
    /// is negative; frustration replies already carry their own softer
    /// framing and define no prefix.
    pub fn respond(&self, intent: IntentKind, classification: &Classification) -> ResponsePayload {
        let template = self.template_for(intent);
        let mut text = self.event.render(&template.text);

        if classification.sentiment.label == SentimentLabel::Negative {
            if let Some(prefix) = &template.empathetic_prefix {
                text = format!("{}\n\n{}", prefix, text);
            }
        }

        ResponsePayload {
            category: intent.category(),
            text,
            tone: tone_for(intent.category()),
        }
    }

    /// The reply for an empty or whitespace-only utterance.
    pub fn no_input(&self) -> ResponsePayload {
        ResponsePayload {
            category: ResponseCategory::Default,
            text: self.event.render(&self.templates.no_input.text),
            tone: Tone::Neutral,
        }
    }

    /// Local recovery when no rule matched: scans the canned topic answers,
    /// falling through to the capability overview.
    pub fn recover(&self, utterance: &str) -> ResponsePayload {
        let normalized = utterance.to_lowercase();
        for topic in &self.fallback_topics {
            if topic.keywords.iter().any(|kw| normalized.contains(kw.as_str())) {
                return ResponsePayload {
                    category: ResponseCategory::Default,
                    text: self.event.render(&topic.text),
                    tone: Tone::Neutral,
                };
            }
        }
        self.default_reply()
    }

    /// The capability overview used when nothing else applies.
    pub fn default_reply(&self) -> ResponsePayload {
        ResponsePayload {
            category: ResponseCategory::Default,
            text: self.event.render(&self.templates.fallback.text),
            tone: Tone::Neutral,
        }
    }

    /// Wraps a delegate-produced reply in the standard payload shape.
    pub fn delegate_reply(&self, text: String) -> ResponsePayload {
        ResponsePayload {
            category: ResponseCategory::Default,
            text,
            tone: Tone::Neutral,
        }
    }

    fn template_for(&self, intent: IntentKind) -> &Template {
        match intent {
            IntentKind::Location => &self.templates.location,
            IntentKind::Safety => &self.templates.safety,
            IntentKind::Prize => &self.templates.prize,
            IntentKind::Frustration => &self.templates.frustration,
        }
    }
}

/// Fixed intent-to-tone mapping.
fn tone_for(category: ResponseCategory) -> Tone {
    match category {
        ResponseCategory::Location => Tone::Tactical,
        ResponseCategory::Safety => Tone::Reassuring,
        ResponseCategory::Prize => Tone::Fomo,
        ResponseCategory::Frustration => Tone::Playful,
        ResponseCategory::Default => Tone::Neutral,
    }
}
