//! Lexicon-based sentiment scoring.
//!
//! A small weighted-token model: each known token contributes its weight,
//! a negator within the two preceding tokens flips the contribution, and an
//! intensifier in the same window scales it up. Repeated exclamation marks
//! amplify the final polarity. This is deliberately cheap; it only has to be
//! good enough to gate the frustration rule and pick an empathetic prefix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LexiconConfig;

/// Flipping factor applied when a negator precedes a scored token.
const NEGATION_FACTOR: f32 = -0.74;
/// Amplifier applied once when the raw text carries two or more '!'.
const EXCLAMATION_BOOST: f32 = 1.25;
/// How many tokens back a negator or intensifier still applies.
const CONTEXT_WINDOW: usize = 2;
/// Polarity beyond which the utterance stops being neutral.
const NEUTRAL_BAND: f32 = 0.05;

/// Coarse classification of an utterance's emotional polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        };
        write!(f, "{}", s)
    }
}

/// The numeric polarity plus its discrete label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub polarity: f32,
    pub label: SentimentLabel,
}

impl SentimentScore {
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            label: SentimentLabel::Neutral,
        }
    }

    fn from_polarity(polarity: f32) -> Self {
        let label = if polarity <= -NEUTRAL_BAND {
            SentimentLabel::Negative
        } else if polarity >= NEUTRAL_BAND {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Neutral
        };
        Self { polarity, label }
    }
}

/// Scores utterances against the configured lexicon.
pub struct SentimentAnalyzer {
    lexicon: LexiconConfig,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: LexiconConfig) -> Self {
        Self { lexicon }
    }

    /// Scores one raw utterance. Unknown tokens contribute nothing, so text
    /// with no lexicon hits comes out neutral.
    pub fn score(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScore::neutral();
        }

        let mut polarity = 0.0f32;
        for (idx, token) in tokens.iter().enumerate() {
            let Some(&weight) = self.lexicon.tokens.get(token.as_str()) else {
                continue;
            };
            let mut contribution = weight;

            let window_start = idx.saturating_sub(CONTEXT_WINDOW);
            for prior in &tokens[window_start..idx] {
                if let Some(&boost) = self.lexicon.intensifiers.get(prior.as_str()) {
                    contribution *= 1.0 + boost;
                }
                if self.lexicon.negators.iter().any(|n| n == prior) {
                    contribution *= NEGATION_FACTOR;
                }
            }
            polarity += contribution;
        }

        if text.matches('!').count() >= 2 {
            polarity *= EXCLAMATION_BOOST;
        }

        SentimentScore::from_polarity(polarity)
    }
}

/// Lowercases and splits on whitespace, trimming surrounding punctuation but
/// keeping apostrophes so contractions like "don't" survive as one token.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_string()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSet;

    fn analyzer() -> SentimentAnalyzer {
        let rules = RuleSet::load().unwrap();
        SentimentAnalyzer::new(rules.lexicon)
    }

    #[test]
    fn test_positive_utterance() {
        let score = analyzer().score("This event looks amazing, thanks!");
        assert_eq!(score.label, SentimentLabel::Positive);
        assert!(score.polarity > 0.0);
    }

    #[test]
    fn test_negative_utterance() {
        let score = analyzer().score("This registration is terrible");
        assert_eq!(score.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_no_lexicon_hits_is_neutral() {
        let score = analyzer().score("Tell me about the tour schedule");
        assert_eq!(score.label, SentimentLabel::Neutral);
        assert_eq!(score.polarity, 0.0);
    }

    #[test]
    fn test_empty_input_is_neutral() {
        assert_eq!(analyzer().score("").label, SentimentLabel::Neutral);
        assert_eq!(analyzer().score("   ").label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_negation_flips_positive_token() {
        // "understand" alone is mildly positive; "don't understand" flips it
        // negative, which is what lets the frustration rule fire on it.
        let positive = analyzer().score("I understand");
        assert_eq!(positive.label, SentimentLabel::Positive);

        let negated = analyzer().score("I don't understand");
        assert_eq!(negated.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_intensifier_scales_contribution() {
        let plain = analyzer().score("this is confusing");
        let boosted = analyzer().score("this is so confusing");
        assert!(boosted.polarity < plain.polarity);
    }

    #[test]
    fn test_exclamations_amplify() {
        let calm = analyzer().score("this is so confusing");
        let shouted = analyzer().score("this is so confusing!!");
        assert!(shouted.polarity < calm.polarity);
        assert_eq!(shouted.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_single_exclamation_not_amplified() {
        let one = analyzer().score("this is confusing!");
        let none = analyzer().score("this is confusing");
        assert_eq!(one.polarity, none.polarity);
    }
}
