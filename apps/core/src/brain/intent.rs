//! Intent rules and ordered rule evaluation.
//!
//! Rules come from the shared data file and are compiled once at startup into
//! word-boundary regexes. Evaluation is a plain top-to-bottom walk over the
//! rule list: the first rule whose trigger matches (and whose gate and
//! exclusions allow it) wins, which keeps the priority order explicit and
//! testable.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::brain::sentiment::SentimentLabel;
use crate::config::IntentRuleConfig;
use crate::error::AppError;
use crate::models::ResponseCategory;

/// A discrete category of user purpose the classifier recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    /// Where/when the roadshow happens.
    Location,
    /// Safety or fear concerns about participating.
    Safety,
    /// Prize, bounty, or reward questions.
    Prize,
    /// The user is irritated or lost.
    Frustration,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl IntentKind {
    /// Returns a human-readable label for the intent.
    pub fn label(&self) -> &'static str {
        match self {
            IntentKind::Location => "location",
            IntentKind::Safety => "safety",
            IntentKind::Prize => "prize",
            IntentKind::Frustration => "frustration",
        }
    }

    /// The response category this intent maps to.
    pub fn category(&self) -> ResponseCategory {
        match self {
            IntentKind::Location => ResponseCategory::Location,
            IntentKind::Safety => ResponseCategory::Safety,
            IntentKind::Prize => ResponseCategory::Prize,
            IntentKind::Frustration => ResponseCategory::Frustration,
        }
    }
}

/// Evidence for a winning rule: which intent fired and on which keywords.
#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub intent: IntentKind,
    pub matched_keywords: Vec<String>,
}

/// One rule with its triggers compiled to regexes.
struct CompiledRule {
    intent: IntentKind,
    requires_negative_sentiment: bool,
    triggers: Vec<(String, Regex)>,
    exclusions: Vec<Regex>,
}

/// The ordered rule list. Order in the data file is priority order.
pub struct RuleBook {
    rules: Vec<CompiledRule>,
}

impl RuleBook {
    /// Compiles the configured rules. A keyword that fails to compile is a
    /// configuration error and aborts startup.
    pub fn compile(configs: &[IntentRuleConfig]) -> Result<Self, AppError> {
        let mut rules = Vec::with_capacity(configs.len());
        for cfg in configs {
            let triggers = cfg
                .keywords
                .iter()
                .map(|kw| keyword_regex(kw).map(|re| (kw.clone(), re)))
                .collect::<Result<Vec<_>, AppError>>()?;
            let exclusions = cfg
                .exclusions
                .iter()
                .map(|kw| keyword_regex(kw))
                .collect::<Result<Vec<_>, AppError>>()?;
            rules.push(CompiledRule {
                intent: cfg.intent,
                requires_negative_sentiment: cfg.requires_negative_sentiment,
                triggers,
                exclusions,
            });
        }
        Ok(Self { rules })
    }

    /// Walks the rules in priority order and returns the first match.
    ///
    /// `text` must already be normalized (lowercased and trimmed). Multiple
    /// keyword hits inside one rule only add evidence; they never change
    /// which intent wins.
    pub fn first_match(&self, text: &str, sentiment: SentimentLabel) -> Option<RuleMatch> {
        for rule in &self.rules {
            if rule.requires_negative_sentiment && sentiment != SentimentLabel::Negative {
                continue;
            }
            if rule.exclusions.iter().any(|re| re.is_match(text)) {
                continue;
            }
            let matched: Vec<String> = rule
                .triggers
                .iter()
                .filter(|(_, re)| re.is_match(text))
                .map(|(kw, _)| kw.clone())
                .collect();
            if !matched.is_empty() {
                return Some(RuleMatch {
                    intent: rule.intent,
                    matched_keywords: matched,
                });
            }
        }
        None
    }
}

/// Compiles one keyword into a word-boundary pattern.
///
/// The keyword must start at a word boundary but may continue into a longer
/// word, so stems like "confus" cover "confusing" and "confused", while
/// "where" does not match inside "somewhere". Phrases work the same way.
fn keyword_regex(keyword: &str) -> Result<Regex, AppError> {
    Regex::new(&format!(r"\b{}", regex::escape(keyword))).map_err(AppError::from)
}
