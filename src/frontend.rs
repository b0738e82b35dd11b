//! Line-oriented terminal front-end
//!
//! Turns typed lines into controller intents and renders view models as
//! plain text.

use crate::location::AgentId;
use crate::view::ViewModel;
use std::fmt::Write;

/// What a line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ChangeLocation,
    Talk(AgentId),
    Say(String),
    Quit,
    /// Recognised command with bad arguments
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    match parts.next() {
        Some("/go") => Command::ChangeLocation,
        Some("/quit") => Command::Quit,
        Some("/talk") => match parts.next().map(str::parse::<AgentId>) {
            Some(Ok(agent)) => Command::Talk(agent),
            _ => Command::Invalid("usage: /talk <agent id>".to_string()),
        },
        // The controller decides what to do with blank lines
        _ => Command::Say(line.to_string()),
    }
}

pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ({}) ==", view.location_key, view.background);

    if view.roster_portraits.is_empty() {
        let _ = writeln!(out, "Nobody is here.");
    } else {
        let roster: Vec<String> = view
            .roster_portraits
            .iter()
            .map(|p| {
                if p.talking {
                    format!("[{}]*", p.agent)
                } else {
                    format!("[{}]", p.agent)
                }
            })
            .collect();
        let _ = writeln!(out, "Here: {}", roster.join(" "));
    }

    if let Some(text) = &view.dialogue_text {
        let speaker = view
            .talking_agent
            .map_or_else(|| "?".to_string(), |a| a.to_string());
        let _ = writeln!(out, "{speaker}: {text}");
    }

    if view.input_disabled {
        let _ = writeln!(out, "(waiting for a reply to {:?})", view.input_text);
    } else {
        let _ = writeln!(out, "> type to talk, /talk <id>, /go to {}", view.location_button);
    }
    out
}
