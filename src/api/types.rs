//! API request and response types.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::WarError;
use crate::service::StartedWar;
use crate::war::WarSummary;

/// Actor name used when an API caller does not give one.
pub const DEFAULT_ACTOR: &str = "api";

/// A chat line forwarded by a gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageRequest {
    /// Group room; omit for a direct message.
    #[serde(default)]
    pub room: Option<String>,
    /// Nick of the person who wrote it.
    pub sender: String,
    /// The chat line.
    pub text: String,
}

/// Replies to a forwarded chat line.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    /// Whether the line was a command at all.
    pub handled: bool,
    /// Lines to post back.
    pub replies: Vec<String>,
}

/// Request to start a war.
#[derive(Debug, Clone, Deserialize)]
pub struct StartWarRequest {
    pub room: String,
    /// Writing phase length in minutes.
    pub duration: u32,
    /// Start phrase such as `in 5`, `at 3:15` or `now`.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// A war that was started.
#[derive(Debug, Clone, Serialize)]
pub struct StartWarResponse {
    pub room: String,
    pub duration: u32,
    pub countdown: u32,
    pub message: String,
}

impl From<StartedWar> for StartWarResponse {
    fn from(war: StartedWar) -> Self {
        Self {
            room: war.room.to_string(),
            duration: war.duration,
            countdown: war.countdown,
            message: war.message,
        }
    }
}

/// One active war.
#[derive(Debug, Clone, Serialize)]
pub struct WarSummaryResponse {
    pub room: String,
    pub duration: u32,
    pub countdown: u32,
    pub phase: &'static str,
}

impl From<&WarSummary> for WarSummaryResponse {
    fn from(war: &WarSummary) -> Self {
        Self {
            room: war.room.to_string(),
            duration: war.duration,
            countdown: war.countdown,
            phase: war.phase.label(),
        }
    }
}

/// List wars response.
#[derive(Debug, Clone, Serialize)]
pub struct ListWarsResponse {
    pub count: usize,
    pub wars: Vec<WarSummaryResponse>,
}

/// Result of a cancel.
#[derive(Debug, Clone, Serialize)]
pub struct CancelWarResponse {
    pub message: String,
}

/// Optional `?actor=` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorQuery {
    #[serde(default)]
    pub actor: Option<String>,
}

impl ActorQuery {
    pub fn actor(&self) -> &str {
        self.actor.as_deref().unwrap_or(DEFAULT_ACTOR)
    }
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "ALREADY_ACTIVE").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Status code and body for a war error.
    pub fn from_war_error(err: &WarError) -> (StatusCode, Self) {
        let (status, code) = match err {
            WarError::AlreadyActive(_) => (StatusCode::CONFLICT, "ALREADY_ACTIVE"),
            WarError::WrongContext => (StatusCode::BAD_REQUEST, "WRONG_CONTEXT"),
            WarError::TooFarOut { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "TOO_FAR_OUT"),
            WarError::NotFound(_) => (StatusCode::NOT_FOUND, "WAR_NOT_FOUND"),
            WarError::Unparseable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNPARSEABLE"),
            WarError::InvalidDuration => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_DURATION"),
            WarError::NotAuthorized(_) => (StatusCode::FORBIDDEN, "NOT_AUTHORIZED"),
            WarError::InvalidRoom(_) => (StatusCode::BAD_REQUEST, "INVALID_ROOM"),
            WarError::Delivery { .. } => (StatusCode::BAD_GATEWAY, "DELIVERY_FAILED"),
            WarError::Transport(_) | WarError::LockPoisoned | WarError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        (
            status,
            Self::new(code, err.user_message()).with_details(err.to_string()),
        )
    }
}

/// WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Client forwards a chat line posted in the room.
    Chat { sender: String, text: String },
    /// Server reply to a chat line.
    Reply { text: String },
    /// Server relays a room announcement.
    Announcement { room: String, text: String },
    /// Error message.
    Error { code: String, message: String },
    /// Ping/pong for connection health.
    Ping,
    Pong,
}
