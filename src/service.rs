//! Word war service: the surface the command layer and the API call into.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::announce::{minutes, Announcement, Announcer};
use crate::clock::Clock;
use crate::error::WarError;
use crate::request::{resolve, CountdownLimits, TimeSpec};
use crate::transport::Transport;
use crate::war::{RoomHandle, RoomId, WarStore, WarSummary};
use crate::Result;

/// Runtime settings for wars, derived from configuration.
#[derive(Debug, Clone)]
pub struct WarSettings {
    /// Countdown default and ceiling.
    pub limits: CountdownLimits,
    /// Time between ticks; one tick is one war minute.
    pub tick: Duration,
    /// Prefix chat commands must start with.
    pub command_prefix: String,
    /// Actors allowed to cancel and list wars. Empty means everyone.
    pub admins: Vec<String>,
}

impl Default for WarSettings {
    fn default() -> Self {
        Self {
            limits: CountdownLimits::default(),
            tick: Duration::from_secs(60),
            command_prefix: "!".to_string(),
            admins: Vec::new(),
        }
    }
}

/// Which war(s) a cancel applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelTarget {
    Room(RoomId),
    /// Every war, silently.
    All,
}

impl FromStr for CancelTarget {
    type Err = WarError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "--all" => Ok(CancelTarget::All),
            room => Ok(CancelTarget::Room(room.parse()?)),
        }
    }
}

impl fmt::Display for CancelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelTarget::Room(room) => write!(f, "{}", room),
            CancelTarget::All => f.write_str("--all"),
        }
    }
}

/// A war that was just installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedWar {
    pub room: RoomId,
    pub duration: u32,
    pub countdown: u32,
    /// Acknowledgment for the requester.
    pub message: String,
}

/// Starts, cancels and lists wars.
pub struct WarService {
    store: Arc<WarStore>,
    transport: Arc<dyn Transport>,
    announcer: Announcer,
    clock: Arc<dyn Clock>,
    limits: CountdownLimits,
}

impl WarService {
    pub fn new(
        store: Arc<WarStore>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        limits: CountdownLimits,
    ) -> Self {
        let announcer = Announcer::new(Arc::clone(&transport));
        Self {
            store,
            transport,
            announcer,
            clock,
            limits,
        }
    }

    /// The store this service writes to.
    pub fn store(&self) -> &Arc<WarStore> {
        &self.store
    }

    /// The announcer used for cancellation notices.
    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    /// The clock requests are resolved against.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn release(&self, room: &RoomHandle) {
        if let Err(e) = self.announcer.release(room) {
            warn!(room = %room.room(), error = %e, "room not released");
        }
    }

    /// Start a war in `room`.
    ///
    /// `room` is `None` for a direct message, which is rejected with
    /// [`WarError::WrongContext`]. Nothing is stored unless every check
    /// passes.
    pub fn start_war(
        &self,
        room: Option<&RoomId>,
        duration: u32,
        time: Option<TimeSpec>,
        actor: &str,
    ) -> Result<StartedWar> {
        let room = room.ok_or(WarError::WrongContext)?;
        if duration == 0 {
            return Err(WarError::InvalidDuration);
        }

        let countdown = resolve(time, self.clock.now(), &self.limits)?;
        let handle = self.transport.resolve_room(room)?;
        if let Err(e) = self.store.start(handle.clone(), duration, countdown) {
            self.release(&handle);
            return Err(e);
        }

        info!(%room, duration, countdown, actor, "word war started");

        let message = if countdown == 0 {
            format!("{} minute word war begins now!", duration)
        } else {
            format!(
                "{} minute word war will begin in {}",
                duration,
                minutes(countdown)
            )
        };

        Ok(StartedWar {
            room: room.clone(),
            duration,
            countdown,
            message,
        })
    }

    /// Cancel one room's war, announcing who did it, or all wars silently.
    ///
    /// The cancellation stands even if the room announcement fails; that
    /// case is reported as [`WarError::Delivery`].
    pub fn cancel_war(&self, target: &CancelTarget, actor: &str) -> Result<String> {
        match target {
            CancelTarget::All => {
                let cancelled = self.store.cancel_all()?;
                for session in &cancelled {
                    self.release(&session.room);
                }
                info!(cancelled = cancelled.len(), actor, "all word wars cancelled");
                Ok("All word wars cancelled".to_string())
            }
            CancelTarget::Room(room) => {
                let session = self.store.cancel(room)?;
                info!(%room, actor, "word war cancelled");

                let announced = self.announcer.announce(
                    &session.room,
                    &Announcement::Cancelled {
                        by: actor.to_string(),
                    },
                );
                self.release(&session.room);
                announced.map_err(|e| WarError::Delivery {
                    failed: 1,
                    reason: e.to_string(),
                })?;

                Ok("Word war cancelled".to_string())
            }
        }
    }

    /// Active wars ordered by room.
    pub fn list_wars(&self) -> Result<Vec<WarSummary>> {
        self.store.list_active()
    }
}
