//! Word war management.
//!
//! This module holds the per-room war record, its countdown/writing state
//! machine, and the store that keeps at most one war per room.

mod room;
mod session;
mod state;
mod store;

pub use room::{RoomHandle, RoomId};
pub use session::Session;
pub use state::WarPhase;
pub use store::{TickOutcome, WarStore, WarSummary};
