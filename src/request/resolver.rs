//! Countdown resolution.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::error::WarError;
use crate::Result;

/// When a war should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    /// In `n` minutes.
    Relative(u32),
    /// Right away; skips the countdown.
    Immediate,
    /// At a wall-clock time, AM/PM unspecified.
    Clock { hour: u32, minute: u32 },
}

/// Default and ceiling for countdowns, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownLimits {
    pub default_countdown: u32,
    pub max_countdown: u32,
}

impl Default for CountdownLimits {
    fn default() -> Self {
        Self {
            default_countdown: 5,
            max_countdown: 60,
        }
    }
}

/// Whole minutes from `now` until the next `hour:minute` on a 12-hour dial.
///
/// The candidate is moved in 12-hour steps until it lies in
/// `[now, now + 12h]`. Partial minutes round up, so the war never starts
/// before the requested instant.
pub fn minutes_until(hour: u32, minute: u32, now: NaiveDateTime) -> Result<u32> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        WarError::Unparseable(format!("{}:{:02} is not a time of day", hour, minute))
    })?;

    let half_day = Duration::hours(12);
    let mut candidate = now.date().and_time(time);

    while candidate < now {
        candidate += half_day;
    }
    while candidate > now + half_day {
        candidate -= half_day;
    }

    let until = candidate - now;
    let mut minutes = until.num_minutes();
    if until > Duration::minutes(minutes) {
        minutes += 1;
    }

    // At most 720 after the loops above.
    Ok(minutes as u32)
}

/// Resolve a start time to a countdown in minutes.
///
/// `None` uses the default countdown. Anything past the ceiling is
/// [`WarError::TooFarOut`].
pub fn resolve(time: Option<TimeSpec>, now: NaiveDateTime, limits: &CountdownLimits) -> Result<u32> {
    let countdown = match time.unwrap_or(TimeSpec::Relative(limits.default_countdown)) {
        TimeSpec::Relative(n) => n,
        TimeSpec::Immediate => 0,
        TimeSpec::Clock { hour, minute } => minutes_until(hour, minute, now)?,
    };

    if countdown > limits.max_countdown {
        return Err(WarError::TooFarOut {
            countdown,
            max: limits.max_countdown,
        });
    }

    Ok(countdown)
}
