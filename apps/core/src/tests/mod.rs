//! Test Module
//!
//! Scenario-level test suite for the Butler core.
//!
//! ## Test Categories
//! - `brain_tests`: Intent classification and sentiment over realistic utterances
//! - `responder_tests`: Template rendering, tone mapping, empathy prefixes
//! - `engine_tests`: End-to-end conversations, delegate fallback, history

pub mod engine_tests;
