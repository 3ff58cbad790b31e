//! Room announcements.
//!
//! [`Announcement`] is the closed set of messages the war state machine can
//! produce; its `Display` impl holds the wording. [`Announcer`] renders an
//! announcement and hands it to the transport without retrying.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::transport::Transport;
use crate::war::RoomHandle;
use crate::Result;

/// Render a minute count with the right plural.
pub fn minutes(n: u32) -> String {
    if n == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", n)
    }
}

/// A message the bot sends into a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// Five minutes of countdown left.
    Warning { duration: u32 },
    /// One minute of countdown left.
    GetReady { duration: u32 },
    /// Two minutes of countdown left.
    TwoMinutes,
    /// Three minutes of countdown left.
    StartsIn { countdown: u32 },
    /// Countdown reached zero; writing starts.
    Begins { duration: u32 },
    /// Sent right after [`Announcement::Begins`].
    Encouragement,
    /// Writing phase finished.
    Over,
    /// War cancelled by someone.
    Cancelled { by: String },
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning { duration } => {
                write!(f, "5 minute warning for our {} minute word war", duration)
            }
            Self::GetReady { duration } => {
                write!(f, "Get ready! {} minute word war starts in 1 minute", duration)
            }
            Self::TwoMinutes => f.write_str("2 minutes to go"),
            Self::StartsIn { countdown } => {
                write!(f, "Word war starts in {}", minutes(*countdown))
            }
            Self::Begins { duration } => {
                write!(f, "Word war for {} begins now!", minutes(*duration))
            }
            Self::Encouragement => f.write_str("Go go go! Get those words down!"),
            Self::Over => f.write_str("Word war over!"),
            Self::Cancelled { by } => write!(f, "Word war cancelled by {}!", by),
        }
    }
}

/// Renders announcements and sends them through a transport.
#[derive(Clone)]
pub struct Announcer {
    transport: Arc<dyn Transport>,
}

impl Announcer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send one announcement. Transport failures are returned as-is.
    pub fn announce(&self, room: &RoomHandle, announcement: &Announcement) -> Result<()> {
        let text = announcement.to_string();
        debug!(room = %room.room(), %text, "announcing");
        self.transport.send(room, &text)
    }

    /// Hand a finished war's room back to the transport.
    pub fn release(&self, room: &RoomHandle) -> Result<()> {
        self.transport.release_room(room)
    }
}
