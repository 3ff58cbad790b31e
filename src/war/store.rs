//! War storage and ticking.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::info;

use super::{RoomHandle, RoomId, Session, WarPhase};
use crate::announce::Announcement;
use crate::error::WarError;
use crate::Result;

/// Listing entry for one active war.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarSummary {
    pub room: RoomId,
    pub duration: u32,
    pub countdown: u32,
    pub phase: WarPhase,
}

/// Result of advancing every active war by one minute.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Wars that were advanced.
    pub advanced: usize,
    /// Rooms whose war finished on this tick and was dropped.
    pub finished: Vec<RoomHandle>,
    /// Messages to deliver, in room order.
    pub announcements: Vec<(RoomHandle, Announcement)>,
}

/// Thread-safe map from room to its single war.
///
/// All mutation goes through one lock, so a start, cancel and tick never
/// interleave.
pub struct WarStore {
    wars: RwLock<BTreeMap<RoomId, Session>>,
}

impl WarStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            wars: RwLock::new(BTreeMap::new()),
        }
    }

    /// Install a new war for the handle's room.
    ///
    /// Fails with [`WarError::AlreadyActive`] if the room has an active war.
    /// A stale inactive entry is replaced.
    pub fn start(&self, room: RoomHandle, duration: u32, countdown: u32) -> Result<()> {
        if duration == 0 {
            return Err(WarError::InvalidDuration);
        }

        let mut wars = self.wars.write().map_err(|_| WarError::LockPoisoned)?;

        let key = room.room().clone();
        if wars.get(&key).is_some_and(|s| s.active) {
            return Err(WarError::AlreadyActive(key.to_string()));
        }

        wars.insert(key, Session::new(room, duration, countdown));
        Ok(())
    }

    /// Cancel the room's war and remove it.
    ///
    /// Returns the cancelled session so the caller can announce it. A room
    /// with no war, or only a finished one, is [`WarError::NotFound`].
    pub fn cancel(&self, room: &RoomId) -> Result<Session> {
        let mut wars = self.wars.write().map_err(|_| WarError::LockPoisoned)?;

        match wars.remove(room) {
            Some(mut session) if session.active => {
                session.deactivate();
                Ok(session)
            }
            _ => Err(WarError::NotFound(room.to_string())),
        }
    }

    /// Drop every war. Returns the ones that were still active.
    pub fn cancel_all(&self) -> Result<Vec<Session>> {
        let mut wars = self.wars.write().map_err(|_| WarError::LockPoisoned)?;
        Ok(std::mem::take(&mut *wars)
            .into_values()
            .filter(|s| s.active)
            .map(|mut s| {
                s.deactivate();
                s
            })
            .collect())
    }

    /// Get a clone of the room's session.
    pub fn get(&self, room: &RoomId) -> Result<Option<Session>> {
        let wars = self.wars.read().map_err(|_| WarError::LockPoisoned)?;
        Ok(wars.get(room).cloned())
    }

    /// Active wars ordered by room.
    pub fn list_active(&self) -> Result<Vec<WarSummary>> {
        let wars = self.wars.read().map_err(|_| WarError::LockPoisoned)?;
        Ok(wars
            .iter()
            .filter(|(_, s)| s.active)
            .map(|(room, s)| WarSummary {
                room: room.clone(),
                duration: s.duration,
                countdown: s.countdown,
                phase: s.phase(),
            })
            .collect())
    }

    /// Advance every active war by one minute.
    ///
    /// Finished wars are removed before the lock is released. Announcements
    /// are returned rather than sent so delivery happens outside the lock.
    pub fn tick(&self) -> Result<TickOutcome> {
        let mut wars = self.wars.write().map_err(|_| WarError::LockPoisoned)?;
        let mut outcome = TickOutcome::default();

        for session in wars.values_mut().filter(|s| s.active) {
            outcome.advanced += 1;
            for announcement in session.advance() {
                outcome
                    .announcements
                    .push((session.room.clone(), announcement));
            }
            if !session.active {
                info!(room = %session.room.room(), "word war finished");
                outcome.finished.push(session.room.clone());
            }
        }

        wars.retain(|_, s| s.active);
        Ok(outcome)
    }

    /// Number of stored wars.
    pub fn count(&self) -> Result<usize> {
        let wars = self.wars.read().map_err(|_| WarError::LockPoisoned)?;
        Ok(wars.len())
    }
}

impl Default for WarStore {
    fn default() -> Self {
        Self::new()
    }
}
