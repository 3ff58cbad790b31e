//! War phase state machine.

/// Lifecycle phase of a room's word war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarPhase {
    /// Waiting for the writing phase to start.
    Countdown,
    /// Writing phase is running.
    Active,
    /// Finished or cancelled; no longer ticked.
    #[default]
    Idle,
}

impl WarPhase {
    /// Check if transition to target phase is valid.
    ///
    /// Valid transitions:
    /// - Countdown -> Active
    /// - Countdown -> Idle (cancelled)
    /// - Active -> Idle
    pub fn can_transition_to(&self, target: WarPhase) -> bool {
        use WarPhase::*;
        matches!(
            (*self, target),
            (Countdown, Active) | (Countdown, Idle) | (Active, Idle)
        )
    }

    /// Check if this is a terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WarPhase::Idle)
    }

    /// Human readable label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            WarPhase::Countdown => "countdown",
            WarPhase::Active => "active",
            WarPhase::Idle => "idle",
        }
    }
}
