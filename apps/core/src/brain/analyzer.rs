//! The composed classifier: sentiment first, then the ordered rule walk.

use tracing::debug;

use crate::brain::intent::{IntentKind, RuleBook};
use crate::brain::sentiment::{SentimentAnalyzer, SentimentScore};
use crate::config::RuleSet;
use crate::error::AppError;

/// Everything the classifier learned about one utterance.
#[derive(Debug, Clone)]
pub struct Classification {
    /// The winning intent, or `None` when no rule matched.
    pub intent: Option<IntentKind>,
    /// Keywords of the winning rule that were present in the utterance.
    pub matched_keywords: Vec<String>,
    pub sentiment: SentimentScore,
}

/// Owns the compiled rules and the sentiment model.
pub struct BrainAnalyzer {
    rules: RuleBook,
    sentiment: SentimentAnalyzer,
}

impl BrainAnalyzer {
    pub fn new(rules: &RuleSet) -> Result<Self, AppError> {
        Ok(Self {
            rules: RuleBook::compile(&rules.intents)?,
            sentiment: SentimentAnalyzer::new(rules.lexicon.clone()),
        })
    }

    /// Classifies one raw utterance.
    ///
    /// Sentiment is computed before the rule walk because the frustration
    /// rule is gated on it. Classification never mutates state, so scoring
    /// the same text twice yields the same result.
    pub fn classify(&self, utterance: &str) -> Classification {
        let trimmed = utterance.trim();
        if trimmed.is_empty() {
            return Classification {
                intent: None,
                matched_keywords: Vec::new(),
                sentiment: SentimentScore::neutral(),
            };
        }

        let sentiment = self.sentiment.score(trimmed);
        let normalized = trimmed.to_lowercase();
        let hit = self.rules.first_match(&normalized, sentiment.label);

        debug!(
            intent = hit.as_ref().map(|m| m.intent.label()).unwrap_or("none"),
            polarity = sentiment.polarity,
            label = %sentiment.label,
            "classified utterance"
        );

        match hit {
            Some(m) => Classification {
                intent: Some(m.intent),
                matched_keywords: m.matched_keywords,
                sentiment,
            },
            None => Classification {
                intent: None,
                matched_keywords: Vec::new(),
                sentiment,
            },
        }
    }
}
