// The Butler - mission support chatbot for the Raptor Roadshow

mod actors;
mod brain;
mod config;
mod engine;
mod error;
mod models;
mod responder;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;
use tracing_subscriber::EnvFilter;

use actors::delegate::HttpDelegateHandle;
use actors::traits::AiDelegate;
use config::{DelegateSettings, RuleSet};
use engine::ChatEngine;
use models::Tone;

/// Column budget for butler output.
const WRAP_WIDTH: usize = 70;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let rules = RuleSet::load()?;

    let delegate: Option<Arc<dyn AiDelegate>> = match DelegateSettings::from_env() {
        Some(settings) => {
            info!(model = %settings.model, "AI delegate enabled");
            let scope = rules.scope_instruction();
            Some(Arc::new(HttpDelegateHandle::new(settings, scope)))
        }
        None => {
            println!(
                "{}",
                "Note: no API key configured, running in rule-only mode.".bright_black()
            );
            None
        }
    };

    let mut engine = ChatEngine::new(rules, delegate)?;

    println!("{}", "=== THE BUTLER ===".bright_magenta().bold());
    println!(
        "{}",
        "Mission support for the Raptor Roadshow 2026.".bright_black()
    );
    println!(
        "{}",
        "Ask about locations, safety, or prizes. 'clear' resets, 'quit' exits.".bright_black()
    );
    println!();

    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = format!("[{}] YOU: ", Local::now().format("%H:%M:%S"));

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                match trimmed {
                    "quit" | "exit" | "q" => {
                        println!("{}", "Mission complete. Stay sharp, Agent!".bright_green());
                        break;
                    }
                    "clear" => {
                        engine.clear_history();
                        println!("{}", "Conversation history cleared.".bright_black());
                        continue;
                    }
                    _ => {}
                }

                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(&line);
                }

                let payload = engine.process_message(trimmed).await;
                print_reply(&payload.text, payload.tone);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Mission complete. Stay sharp, Agent!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Input error: {}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Prints a butler reply, wrapped and colored by tone.
fn print_reply(text: &str, tone: Tone) {
    println!();
    for line in wrap(text, WRAP_WIDTH).lines() {
        let styled = match tone {
            Tone::Tactical => line.bright_cyan(),
            Tone::Reassuring => line.bright_green(),
            Tone::Fomo => line.bright_yellow(),
            Tone::Playful => line.bright_magenta(),
            Tone::Neutral => line.bright_blue(),
        };
        println!("{} {}", "BUTLER:".bold(), styled);
    }
    println!();
}

/// Re-wraps text to the given width, preserving intentional blank lines and
/// list items. A single word longer than the width is hard-split.
fn wrap(text: &str, width: usize) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if line.len() <= width {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > width {
                out.push_str(&current);
                out.push('\n');
                current.clear();
            }
            if word.len() > width {
                for chunk in char_chunks(word, width) {
                    out.push_str(&chunk);
                    out.push('\n');
                }
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            out.push_str(&current);
            out.push('\n');
        }
    }
    out
}

/// Splits a word into chunks of at most `width` characters, on char
/// boundaries.
fn char_chunks(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

#[cfg(test)]
mod wrap_tests {
    use super::wrap;

    #[test]
    fn test_short_lines_untouched() {
        assert_eq!(wrap("hello world", 70), "hello world\n");
    }

    #[test]
    fn test_long_line_wraps_at_width() {
        let long = "word ".repeat(40);
        for line in wrap(&long, 20).lines() {
            assert!(line.len() <= 20);
        }
    }

    #[test]
    fn test_blank_lines_preserved() {
        let text = "first\n\nsecond";
        assert_eq!(wrap(text, 70), "first\n\nsecond\n");
    }

    #[test]
    fn test_oversized_word_is_hard_split() {
        let long_url = format!("see {} now", "x".repeat(95));
        for line in wrap(&long_url, 20).lines() {
            assert!(line.len() <= 20, "line too long: {}", line);
        }
        // Nothing is dropped in the split.
        let rejoined: String = wrap(&long_url, 20).replace('\n', " ");
        assert!(rejoined.contains(&"x".repeat(20)));
        assert!(rejoined.trim_end().ends_with("now"));
    }
}
