//! # Brain Module
//!
//! Fast, fully local analysis of user input. No model calls happen here;
//! everything is rules and a weighted lexicon, so classification is cheap
//! enough to run on every utterance before any delegate is consulted.
//!
//! ## Components
//! - `intent`: Ordered keyword rules compiled to word-boundary regexes
//! - `sentiment`: Lexicon scoring with negation and intensifier handling
//! - `analyzer`: Main orchestrator combining both

pub mod analyzer;
pub mod intent;
pub mod sentiment;

pub use analyzer::{BrainAnalyzer, Classification};
pub use intent::IntentKind;
pub use sentiment::{SentimentLabel, SentimentScore};
