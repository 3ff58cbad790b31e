//! Room identifiers and transport handles.

use std::fmt;
use std::str::FromStr;

use crate::error::WarError;

/// Name of a group chat room, the unit of war isolation.
///
/// Room names are non-empty and contain no whitespace. They order
/// lexically so listings come out stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Validate and wrap a room name.
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(WarError::InvalidRoom(name));
        }
        Ok(Self(name))
    }

    /// Get the room name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomId {
    type Err = WarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque room reference issued by a [`Transport`](crate::transport::Transport).
///
/// The war core stores it alongside a session and hands it back to the
/// transport when announcing; only the transport interprets `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomHandle {
    room: RoomId,
    slot: u64,
}

impl RoomHandle {
    /// Create a handle. Intended for transport implementations.
    pub fn new(room: RoomId, slot: u64) -> Self {
        Self { room, slot }
    }

    /// The room this handle was resolved from.
    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Transport-defined slot.
    pub fn slot(&self) -> u64 {
        self.slot
    }
}

impl fmt::Display for RoomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.room, self.slot)
    }
}
