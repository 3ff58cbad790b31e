//! Broadcast-channel transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::{debug, info};

use super::Transport;
use crate::error::WarError;
use crate::war::{RoomHandle, RoomId};
use crate::Result;

/// Messages buffered per room before slow subscribers start lagging.
const ROOM_CHANNEL_CAPACITY: usize = 64;

struct RoomChannel {
    slot: u64,
    sender: broadcast::Sender<String>,
    /// Handles resolved and not yet released.
    holds: usize,
}

impl RoomChannel {
    fn is_unused(&self) -> bool {
        self.holds == 0 && self.sender.receiver_count() == 0
    }
}

/// Transport that publishes each room's messages on a broadcast channel.
///
/// Sending to a room nobody is subscribed to succeeds; the message is
/// simply not seen by anyone. A room's channel is dropped once every handle
/// for it has been released and no subscriber is left.
pub struct BroadcastTransport {
    rooms: RwLock<HashMap<RoomId, RoomChannel>>,
    next_slot: AtomicU64,
}

impl BroadcastTransport {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            next_slot: AtomicU64::new(1),
        }
    }

    /// Subscribe to every message sent to `room` from now on.
    pub fn subscribe(&self, room: &RoomId) -> Result<broadcast::Receiver<String>> {
        let mut rooms = self.rooms.write().map_err(|_| WarError::LockPoisoned)?;
        let channel = rooms
            .entry(room.clone())
            .or_insert_with(|| self.open_channel());
        Ok(channel.sender.subscribe())
    }

    /// Forget `room` if a subscriber just left and nothing else uses it.
    ///
    /// Call after dropping the receiver from [`BroadcastTransport::subscribe`].
    pub fn unsubscribe(&self, room: &RoomId) -> Result<()> {
        let mut rooms = self.rooms.write().map_err(|_| WarError::LockPoisoned)?;
        if rooms.get(room).is_some_and(RoomChannel::is_unused) {
            rooms.remove(room);
            debug!(%room, "room channel closed");
        }
        Ok(())
    }

    /// Number of rooms with an open channel.
    pub fn room_count(&self) -> Result<usize> {
        let rooms = self.rooms.read().map_err(|_| WarError::LockPoisoned)?;
        Ok(rooms.len())
    }

    fn open_channel(&self) -> RoomChannel {
        let (sender, _) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
        RoomChannel {
            slot: self.next_slot.fetch_add(1, Ordering::Relaxed),
            sender,
            holds: 0,
        }
    }
}

impl Default for BroadcastTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for BroadcastTransport {
    fn resolve_room(&self, room: &RoomId) -> Result<RoomHandle> {
        let mut rooms = self.rooms.write().map_err(|_| WarError::LockPoisoned)?;
        let channel = rooms
            .entry(room.clone())
            .or_insert_with(|| self.open_channel());
        channel.holds += 1;
        Ok(RoomHandle::new(room.clone(), channel.slot))
    }

    fn send(&self, room: &RoomHandle, text: &str) -> Result<()> {
        let rooms = self.rooms.read().map_err(|_| WarError::LockPoisoned)?;
        let channel = rooms
            .get(room.room())
            .filter(|c| c.slot == room.slot())
            .ok_or_else(|| WarError::Transport(format!("unknown room handle {}", room)))?;

        info!(room = %room.room(), text, "room message");
        if channel.sender.send(text.to_string()).is_err() {
            debug!(room = %room.room(), "no subscribers for room message");
        }
        Ok(())
    }

    fn release_room(&self, room: &RoomHandle) -> Result<()> {
        let mut rooms = self.rooms.write().map_err(|_| WarError::LockPoisoned)?;
        let Some(channel) = rooms
            .get_mut(room.room())
            .filter(|c| c.slot == room.slot())
        else {
            return Ok(());
        };

        channel.holds = channel.holds.saturating_sub(1);
        if channel.is_unused() {
            rooms.remove(room.room());
            debug!(room = %room.room(), "room channel closed");
        }
        Ok(())
    }
}
