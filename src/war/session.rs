//! Per-room war record and its tick rule.

use super::{RoomHandle, WarPhase};
use crate::announce::Announcement;

/// One room's pending or running word war.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Where announcements go.
    pub room: RoomHandle,
    /// Cleared on completion or cancellation; inactive sessions are never ticked.
    pub active: bool,
    /// Minutes left in the writing phase.
    pub duration: u32,
    /// Minutes left before the writing phase starts.
    pub countdown: u32,
}

impl Session {
    /// Create an active session. `countdown == 0` starts straight in the
    /// writing phase.
    pub fn new(room: RoomHandle, duration: u32, countdown: u32) -> Self {
        debug_assert!(duration > 0, "war duration must be positive");
        Self {
            room,
            active: true,
            duration,
            countdown,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> WarPhase {
        if !self.active {
            WarPhase::Idle
        } else if self.countdown > 0 {
            WarPhase::Countdown
        } else {
            WarPhase::Active
        }
    }

    /// Mark the session finished. Idempotent.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Advance by one minute and return what should be announced.
    ///
    /// A countdown tick never touches `duration`. Inactive sessions do not
    /// change and produce nothing.
    pub fn advance(&mut self) -> Vec<Announcement> {
        if !self.active {
            return Vec::new();
        }

        let before = self.phase();
        debug_assert!(!before.is_terminal(), "active war in {} is idle", self.room);

        let announcements = if self.countdown > 0 {
            self.countdown -= 1;
            if self.countdown == 0 {
                vec![
                    Announcement::Begins {
                        duration: self.duration,
                    },
                    Announcement::Encouragement,
                ]
            } else {
                countdown_notice(self.countdown, self.duration)
                    .into_iter()
                    .collect()
            }
        } else {
            assert!(
                self.duration > 0,
                "active war in {} has no time left",
                self.room
            );
            self.duration -= 1;
            if self.duration == 0 {
                self.active = false;
                vec![Announcement::Over]
            } else {
                Vec::new()
            }
        };

        let after = self.phase();
        debug_assert!(before == after || before.can_transition_to(after));

        announcements
    }
}

/// Countdown progress message for the remaining minutes, if any.
///
/// Only 5, 3, 2 and 1 minutes left are announced, to keep the room quiet.
fn countdown_notice(remaining: u32, duration: u32) -> Option<Announcement> {
    match remaining {
        1 => Some(Announcement::GetReady { duration }),
        5 => Some(Announcement::Warning { duration }),
        2 => Some(Announcement::TwoMinutes),
        0..=3 => Some(Announcement::StartsIn {
            countdown: remaining,
        }),
        _ => None,
    }
}
