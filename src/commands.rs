//! Chat command handling.
//!
//! Recognized commands, after the configured prefix (`!` by default):
//!
//! - `word war 20 [in 5 | at 3:15 | now]` (also `wordwar`)
//! - `war cancel <room | --all>` (admin)
//! - `war list` (admin)
//! - `war help`
//!
//! Everything else is ignored so the bot stays quiet in normal chatter.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::WarError;
use crate::request::{parse_war_request, WarRequest};
use crate::service::{CancelTarget, WarService};
use crate::war::RoomId;
use crate::Result;

const HELP: &str = "Start a word war with: word war 20 | word war 20 in 5 | \
                    word war 20 at 3:15 | word war 20 now";

/// An incoming chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Group room the line was posted in; `None` for a direct message.
    pub room: Option<RoomId>,
    /// Nick of the person who wrote it.
    pub sender: String,
    pub text: String,
}

/// A recognized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartWar(WarRequest),
    Cancel(CancelTarget),
    List,
    Help,
}

/// Recognize a command in `text`.
///
/// Returns `None` if the text is not addressed to the bot at all, and
/// `Some(Err(_))` if it is but cannot be understood.
pub fn parse_command(text: &str, prefix: &str) -> Option<Result<Command>> {
    let body = text.trim().strip_prefix(prefix)?.trim();
    let words: Vec<&str> = body.split_whitespace().collect();

    let first = words.first()?.to_lowercase();
    let second = words.get(1).map(|w| w.to_lowercase());

    let starts_war = first == "wordwar"
        || first == "word-war"
        || (first == "word" && second.as_deref() == Some("war"));
    if starts_war {
        return Some(parse_war_request(body).map(Command::StartWar));
    }

    if first != "war" {
        return None;
    }

    let command = match (second.as_deref(), &words[2.min(words.len())..]) {
        (None, _) | (Some("help"), []) => Ok(Command::Help),
        (Some("list"), []) => Ok(Command::List),
        (Some("cancel"), [target]) => target.parse().map(Command::Cancel),
        (Some("cancel"), []) => Err(WarError::Unparseable(
            "war cancel needs a room name or --all".to_string(),
        )),
        _ => Err(WarError::Unparseable(format!("unknown command: {}", body))),
    };
    Some(command)
}

/// Turns chat lines into service calls and replies.
pub struct CommandDispatcher {
    service: Arc<WarService>,
    prefix: String,
    admins: HashSet<String>,
}

impl CommandDispatcher {
    pub fn new(
        service: Arc<WarService>,
        prefix: impl Into<String>,
        admins: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            service,
            prefix: prefix.into(),
            admins: admins.into_iter().collect(),
        }
    }

    /// Handle one chat line.
    ///
    /// Returns the reply lines, or `None` if the line was not a command.
    /// Errors become polite replies; nothing here is fatal.
    pub fn handle(&self, message: &ChatMessage) -> Option<Vec<String>> {
        let command = parse_command(&message.text, &self.prefix)?;

        debug!(sender = %message.sender, text = %message.text, "chat command");

        let replies = command
            .and_then(|c| self.execute(c, message))
            .unwrap_or_else(|e| {
                debug!(sender = %message.sender, error = %e, "command rejected");
                vec![e.user_message()]
            });
        Some(replies)
    }

    fn execute(&self, command: Command, message: &ChatMessage) -> Result<Vec<String>> {
        match command {
            Command::StartWar(request) => {
                let started = self.service.start_war(
                    message.room.as_ref(),
                    request.duration,
                    request.time,
                    &message.sender,
                )?;
                Ok(vec![started.message])
            }
            Command::Cancel(target) => {
                self.require_admin(&message.sender)?;
                let reply = self.service.cancel_war(&target, &message.sender)?;
                Ok(vec![reply])
            }
            Command::List => {
                self.require_admin(&message.sender)?;
                let wars = self.service.list_wars()?;
                if wars.is_empty() {
                    return Ok(vec!["No word wars are active".to_string()]);
                }
                let mut lines = vec!["The following wars are active:".to_string()];
                lines.extend(wars.iter().map(|w| {
                    format!(
                        "{}: {} min(s) in {} min(s)",
                        w.room, w.duration, w.countdown
                    )
                }));
                Ok(lines)
            }
            Command::Help => Ok(vec![HELP.to_string()]),
        }
    }

    fn require_admin(&self, actor: &str) -> Result<()> {
        if self.admins.is_empty() || self.admins.contains(actor) {
            Ok(())
        } else {
            Err(WarError::NotAuthorized(actor.to_string()))
        }
    }
}
