//! Chat transport collaborators.
//!
//! The war core never talks to a chat network directly. It asks a
//! [`Transport`] to turn a room name into an opaque [`RoomHandle`] and later
//! to deliver text to that handle. Sends are never retried.
//!
//! - [`BroadcastTransport`] fans messages out to per-room tokio broadcast
//!   channels, which the WebSocket API streams to connected gateways.
//! - [`MemoryTransport`] records everything it is asked to send, for tests.

mod broadcast;
mod memory;

pub use broadcast::BroadcastTransport;
pub use memory::MemoryTransport;

use crate::war::{RoomHandle, RoomId};
use crate::Result;

/// Room resolution and message delivery.
///
/// Implementations must not block: both calls run inside the tick handler
/// and the request path.
pub trait Transport: Send + Sync {
    /// Resolve a room name to a handle the transport can deliver to.
    fn resolve_room(&self, room: &RoomId) -> Result<RoomHandle>;

    /// Deliver text to a room.
    fn send(&self, room: &RoomHandle, text: &str) -> Result<()>;

    /// Give back a handle from [`Transport::resolve_room`] once its war has
    /// finished or been cancelled. The handle must not be sent to afterwards.
    fn release_room(&self, _room: &RoomHandle) -> Result<()> {
        Ok(())
    }
}
