//! Error types for wordwar.

use thiserror::Error;

/// Main error type for word war operations.
#[derive(Error, Debug)]
pub enum WarError {
    /// A war is already running (or counting down) in the room.
    #[error("word war already active in room: {0}")]
    AlreadyActive(String),

    /// Start requested outside of a group chat.
    #[error("word wars can only run in group chats")]
    WrongContext,

    /// Resolved countdown exceeds the configured ceiling.
    #[error("countdown of {countdown} minutes exceeds the {max} minute limit")]
    TooFarOut { countdown: u32, max: u32 },

    /// No war exists for the room.
    #[error("no word war found for room: {0}")]
    NotFound(String),

    /// Request text does not match the war grammar.
    #[error("unparseable request: {0}")]
    Unparseable(String),

    /// Requested duration is zero.
    #[error("war duration must be at least one minute")]
    InvalidDuration,

    /// Actor is not allowed to run an admin command.
    #[error("{0} is not allowed to do that")]
    NotAuthorized(String),

    /// Room name failed validation.
    #[error("invalid room name: {0:?}")]
    InvalidRoom(String),

    /// The transport rejected a room lookup or a message.
    #[error("transport error: {0}")]
    Transport(String),

    /// One or more announcements could not be delivered.
    #[error("{failed} announcement(s) not delivered: {reason}")]
    Delivery { failed: usize, reason: String },

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WarError {
    /// Reply text shown to the person who issued the command.
    pub fn user_message(&self) -> String {
        match self {
            Self::AlreadyActive(_) => "We're already word warring!".to_string(),
            Self::WrongContext => "Sorry, I only run word wars in chat rooms".to_string(),
            Self::TooFarOut { max, .. } => format!(
                "Sorry, that's too far out. Word wars must start within {} minutes",
                max
            ),
            Self::NotFound(_) => "No matching word war found".to_string(),
            Self::Unparseable(_) => {
                "Sorry, I didn't understand that. Try: word war 20 in 5".to_string()
            }
            Self::InvalidDuration => "A word war needs to last at least a minute".to_string(),
            Self::NotAuthorized(_) => "Sorry, only bot admins can do that".to_string(),
            Self::InvalidRoom(name) => format!("I don't know a room called {:?}", name),
            Self::Delivery { .. } => "Done, but I couldn't tell the room about it".to_string(),
            Self::Transport(_) | Self::LockPoisoned | Self::Io(_) => {
                "Sorry, something went wrong on my end".to_string()
            }
        }
    }
}

/// Convenience Result type for wordwar operations.
pub type Result<T> = std::result::Result<T, WarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_active_display() {
        let err = WarError::AlreadyActive("writers".into());
        assert!(err.to_string().contains("writers"));
        assert_eq!(err.user_message(), "We're already word warring!");
    }

    #[test]
    fn test_too_far_out_display() {
        let err = WarError::TooFarOut {
            countdown: 61,
            max: 60,
        };
        assert!(err.to_string().contains("61"));
        assert!(err.user_message().contains("60 minutes"));
    }

    #[test]
    fn test_not_found_message() {
        let err = WarError::NotFound("lobby".into());
        assert!(err.to_string().contains("lobby"));
        assert_eq!(err.user_message(), "No matching word war found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WarError = io_err.into();
        assert!(matches!(err, WarError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = WarError::Transport("socket closed".into());
        assert!(!err.user_message().contains("socket"));
    }
}
