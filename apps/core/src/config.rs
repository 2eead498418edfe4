//! Static configuration for the Butler.
//!
//! The rule set, response templates, sentiment lexicon, and event data live in
//! a single embedded JSON document so that any sibling runtime can consume the
//! exact same data and keyword lists cannot drift apart. The file is parsed
//! and validated exactly once at startup; a missing template or an empty
//! keyword list is a packaging error and aborts startup.
//!
//! Delegate connection settings come from environment variables (loaded via
//! dotenv in the binary) and are optional: without them the chatbot runs in
//! rule-only mode.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::brain::intent::IntentKind;
use crate::error::AppError;

/// The embedded rule/template/lexicon data file.
const RULES_JSON: &str = include_str!("../assets/rules.json");

/// One named intent with its trigger keywords, in priority order.
///
/// Rules are evaluated in the order they appear in the data file; the first
/// matching rule wins.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IntentRuleConfig {
    /// The intent this rule recognizes.
    pub intent: IntentKind,
    /// When set, the rule only fires if the utterance's sentiment is negative.
    #[serde(default)]
    pub requires_negative_sentiment: bool,
    /// Trigger keywords or phrases, matched at a word boundary.
    #[validate(length(min = 1, message = "intent rule needs at least one keyword"))]
    pub keywords: Vec<String>,
    /// Phrases that veto this rule even when a keyword matches.
    #[serde(default)]
    pub exclusions: Vec<String>,
}

/// A parameterizable response text for one intent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Template {
    #[validate(length(min = 1))]
    pub text: String,
    /// Gentler lead-in prepended when the utterance's sentiment is negative.
    #[serde(default)]
    pub empathetic_prefix: Option<String>,
}

/// The complete template family, one entry per response category.
///
/// Every field is mandatory in the data file; serde rejects a missing
/// template at startup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Templates {
    #[validate(nested)]
    pub location: Template,
    #[validate(nested)]
    pub safety: Template,
    #[validate(nested)]
    pub prize: Template,
    #[validate(nested)]
    pub frustration: Template,
    #[serde(rename = "default")]
    #[validate(nested)]
    pub fallback: Template,
    #[validate(nested)]
    pub no_input: Template,
}

/// A canned answer used when no rule matched and no delegate is reachable.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackTopic {
    pub keywords: Vec<String>,
    pub text: String,
}

/// Immutable token-to-weight mapping plus negation/intensifier word lists.
#[derive(Debug, Clone, Deserialize)]
pub struct LexiconConfig {
    pub tokens: HashMap<String, f32>,
    pub negators: Vec<String>,
    pub intensifiers: HashMap<String, f32>,
}

/// One stop on the roadshow tour.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventStop {
    #[validate(length(min = 1))]
    pub city: String,
    pub date: String,
    pub venue: String,
    pub codename: String,
    pub objective: String,
}

/// Static event data substituted into templates by the responder.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventInfo {
    #[validate(length(min = 1))]
    pub name: String,
    pub registration_url: String,
    pub support_email: String,
    pub prize_pool: String,
    #[validate(length(min = 1), nested)]
    pub stops: Vec<EventStop>,
}

impl EventInfo {
    /// Renders the per-city schedule block used by templates and the delegate
    /// scope instruction.
    pub fn schedule_block(&self) -> String {
        let mut out = String::new();
        for stop in &self.stops {
            out.push_str(&format!(
                "{} - {}\n  Venue: {} (\"{}\")\n  Objective: {}\n\n",
                stop.city.to_uppercase(),
                stop.date,
                stop.venue,
                stop.codename,
                stop.objective
            ));
        }
        out
    }

    /// Substitutes event placeholders into a template string.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{event_name}", &self.name)
            .replace("{registration_url}", &self.registration_url)
            .replace("{support_email}", &self.support_email)
            .replace("{prize_pool}", &self.prize_pool)
            .replace("{schedule}", &self.schedule_block())
    }
}

/// The full static configuration surface consumed by the core.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RuleSet {
    #[validate(length(min = 1), nested)]
    pub intents: Vec<IntentRuleConfig>,
    #[validate(nested)]
    pub templates: Templates,
    #[serde(default)]
    pub fallback_topics: Vec<FallbackTopic>,
    pub lexicon: LexiconConfig,
    pub delegate_scope: String,
    #[validate(nested)]
    pub event: EventInfo,
}

impl RuleSet {
    /// Parses and validates the embedded rule file.
    pub fn load() -> Result<Self, AppError> {
        Self::from_json(RULES_JSON)
    }

    /// Parses and validates a rule file from raw JSON. Fails fast on any
    /// structural problem so a broken package never reaches a user.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let rules: RuleSet = serde_json::from_str(raw)?;
        rules.validate()?;

        if rules.lexicon.tokens.is_empty() {
            return Err(AppError::Config("sentiment lexicon is empty".to_string()));
        }

        let mut seen: Vec<IntentKind> = Vec::new();
        for rule in &rules.intents {
            if seen.contains(&rule.intent) {
                return Err(AppError::Config(format!(
                    "duplicate rule for intent '{}'",
                    rule.intent.label()
                )));
            }
            seen.push(rule.intent);
        }

        Ok(rules)
    }

    /// The scope-limiting instruction forwarded to the AI delegate.
    pub fn scope_instruction(&self) -> String {
        self.event.render(&self.delegate_scope)
    }
}

// --- Delegate environment configuration ---

const API_KEY_VAR: &str = "BUTLER_API_KEY";
const API_BASE_VAR: &str = "BUTLER_API_BASE";
const MODEL_VAR: &str = "BUTLER_MODEL";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Obvious non-keys people paste from setup guides.
const PLACEHOLDER_KEYS: &[&str] = &["your_api_key_here", "placeholder", "changeme"];

/// Connection settings for the optional AI delegate.
#[derive(Debug, Clone)]
pub struct DelegateSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl DelegateSettings {
    /// Reads delegate settings from the environment. Returns `None` when no
    /// usable API key is configured; the chatbot then runs rule-only.
    pub fn from_env() -> Option<Self> {
        let key = env::var(API_KEY_VAR).ok()?;
        let key = key.trim();
        if key.is_empty() || PLACEHOLDER_KEYS.contains(&key.to_lowercase().as_str()) {
            warn!("{} is empty or a placeholder value, delegate disabled", API_KEY_VAR);
            return None;
        }
        Some(Self {
            base_url: env::var(API_BASE_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            api_key: key.to_string(),
            model: env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_rules_load() {
        let rules = RuleSet::load().expect("embedded rules.json must be valid");

        assert_eq!(rules.intents.len(), 4);
        assert_eq!(rules.intents[0].intent, IntentKind::Frustration);
        assert!(rules.intents[0].requires_negative_sentiment);
        assert!(!rules.lexicon.tokens.is_empty());
        assert!(!rules.fallback_topics.is_empty());
    }

    #[test]
    fn test_missing_template_fails_fast() {
        // Strip the prize template from the embedded file.
        let mut doc: serde_json::Value = serde_json::from_str(RULES_JSON).unwrap();
        doc["templates"]
            .as_object_mut()
            .unwrap()
            .remove("prize");

        let result = RuleSet::from_json(&doc.to_string());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_keyword_list_fails_fast() {
        let mut doc: serde_json::Value = serde_json::from_str(RULES_JSON).unwrap();
        doc["intents"][1]["keywords"] = serde_json::json!([]);

        let result = RuleSet::from_json(&doc.to_string());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_duplicate_intent_fails_fast() {
        let mut doc: serde_json::Value = serde_json::from_str(RULES_JSON).unwrap();
        let dup = doc["intents"][1].clone();
        doc["intents"].as_array_mut().unwrap().push(dup);

        let result = RuleSet::from_json(&doc.to_string());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_schedule_block_lists_every_city() {
        let rules = RuleSet::load().unwrap();
        let schedule = rules.event.schedule_block();

        assert!(schedule.contains("LONDON"));
        assert!(schedule.contains("MANCHESTER"));
        assert!(schedule.contains("GLASGOW"));
        assert!(schedule.contains("March 12, 2026"));
    }

    #[test]
    fn test_scope_instruction_renders_placeholders() {
        let rules = RuleSet::load().unwrap();
        let scope = rules.scope_instruction();

        assert!(!scope.contains('{'));
        assert!(scope.contains("scaters.com/register"));
        assert!(scope.contains("£310,000"));
    }

    #[test]
    fn test_delegate_settings_reject_placeholder_key() {
        temp_env::with_vars(
            [
                (API_KEY_VAR, Some("your_api_key_here")),
                (API_BASE_VAR, None),
                (MODEL_VAR, None),
            ],
            || {
                assert!(DelegateSettings::from_env().is_none());
            },
        );
    }

    #[test]
    fn test_delegate_settings_defaults() {
        temp_env::with_vars(
            [
                (API_KEY_VAR, Some("sk-test-123")),
                (API_BASE_VAR, None),
                (MODEL_VAR, None),
            ],
            || {
                let settings = DelegateSettings::from_env().expect("key is set");
                assert_eq!(settings.base_url, DEFAULT_API_BASE);
                assert_eq!(settings.model, DEFAULT_MODEL);
            },
        );
    }
}
