//! In-memory transport that records sent messages.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use super::Transport;
use crate::error::WarError;
use crate::war::{RoomHandle, RoomId};
use crate::Result;

/// Transport double for tests and dry runs.
///
/// Every successful send is recorded in order. [`set_failing`] makes
/// subsequent sends fail without recording anything.
///
/// [`set_failing`]: MemoryTransport::set_failing
#[derive(Debug, Default)]
pub struct MemoryTransport {
    slots: Mutex<HashMap<RoomId, u64>>,
    sent: Mutex<Vec<(String, String)>>,
    next_slot: AtomicU64,
    failing: AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All recorded `(room, text)` pairs, oldest first.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Recorded texts for one room, oldest first.
    pub fn messages_for(&self, room: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(r, _)| r == room)
            .map(|(_, text)| text)
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.clear();
        }
    }
}

impl Transport for MemoryTransport {
    fn resolve_room(&self, room: &RoomId) -> Result<RoomHandle> {
        let mut slots = self.slots.lock().map_err(|_| WarError::LockPoisoned)?;
        let slot = *slots
            .entry(room.clone())
            .or_insert_with(|| self.next_slot.fetch_add(1, Ordering::Relaxed));
        Ok(RoomHandle::new(room.clone(), slot))
    }

    fn send(&self, room: &RoomHandle, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(WarError::Transport(format!(
                "send to {} refused",
                room.room()
            )));
        }

        let mut sent = self.sent.lock().map_err(|_| WarError::LockPoisoned)?;
        sent.push((room.room().to_string(), text.to_string()));
        Ok(())
    }
}
