//! # wordwar
//!
//! Word war (group writing sprint) timer service for chat rooms.
//!
//! Someone in a room asks for a war ("word war 20 in 5"); the service counts
//! down, announces the start, times the writing phase and announces the end.
//! Each room runs at most one war at a time, and one shared ticker advances
//! every war once per minute.
//!
//! ## Features
//!
//! - **Natural requests**: relative ("in 5"), clock time ("at 3:15") or "now"
//! - **Pluggable transport**: anything that can post a line to a room
//! - **HTTP gateway**: REST and WebSocket endpoints for chat bridges
//! - **Deterministic tests**: injectable clock and a manual tick
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use wordwar::{
//!     CountdownLimits, MemoryTransport, SystemClock, Ticker, TimeSpec, WarService, WarStore,
//!     RoomId,
//! };
//!
//! # fn main() -> wordwar::Result<()> {
//! let transport = Arc::new(MemoryTransport::new());
//! let service = WarService::new(
//!     Arc::new(WarStore::new()),
//!     transport.clone(),
//!     Arc::new(SystemClock),
//!     CountdownLimits::default(),
//! );
//!
//! let room = RoomId::new("lobby")?;
//! let started = service.start_war(Some(&room), 20, Some(TimeSpec::Relative(1)), "ana")?;
//! assert_eq!(started.message, "20 minute word war will begin in 1 minute");
//!
//! let ticker = Ticker::new(service.store().clone(), service.announcer().clone());
//! ticker.tick()?;
//! assert_eq!(
//!     transport.messages_for("lobby"),
//!     vec!["Word war for 20 minutes begins now!", "Go go go! Get those words down!"]
//! );
//! # Ok(())
//! # }
//! ```

pub mod announce;
pub mod api;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod request;
pub mod security;
pub mod service;
pub mod ticker;
pub mod transport;
pub mod war;

pub use announce::{Announcement, Announcer};
pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::{ChatMessage, Command, CommandDispatcher};
pub use error::{Result, WarError};
pub use request::{CountdownLimits, TimeSpec, WarRequest};
pub use service::{CancelTarget, StartedWar, WarService, WarSettings};
pub use ticker::{TickReport, Ticker, TickerHandle};
pub use transport::{BroadcastTransport, MemoryTransport, Transport};
pub use war::{RoomHandle, RoomId, Session, WarPhase, WarStore, WarSummary};
