//! The shared war ticker.
//!
//! One recurring timer advances every room's war by one minute per tick.
//! The store is advanced under its lock first; announcements go out
//! afterwards, so a slow or failing transport never holds the lock and
//! never rolls a war back.
//!
//! A ticker with a one-minute period fires on the wall-clock minute, so a
//! war requested "at 3:15" begins at 3:15 and not somewhere inside 3:14.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::announce::Announcer;
use crate::clock::{Clock, SystemClock};
use crate::error::WarError;
use crate::war::WarStore;
use crate::Result;

const MINUTE: Duration = Duration::from_secs(60);

/// Time left until the next wall-clock minute starts.
fn until_next_minute(now: NaiveDateTime) -> Duration {
    // nanosecond() exceeds 1e9 during a leap second
    let into_minute = Duration::new(
        u64::from(now.second()),
        now.nanosecond() % 1_000_000_000,
    );
    MINUTE.saturating_sub(into_minute)
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub advanced: usize,
    pub completed: usize,
    pub delivered: usize,
}

/// Advances all wars and delivers their announcements.
#[derive(Clone)]
pub struct Ticker {
    store: Arc<WarStore>,
    announcer: Announcer,
    clock: Arc<dyn Clock>,
}

impl Ticker {
    pub fn new(store: Arc<WarStore>, announcer: Announcer) -> Self {
        Self {
            store,
            announcer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Align spawned ticks to this clock's minutes instead of the system's.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run one tick.
    ///
    /// Every announcement is attempted even if an earlier one fails. Any
    /// failures are reported together as [`WarError::Delivery`] after the
    /// fact; the wars themselves have already moved on.
    pub fn tick(&self) -> Result<TickReport> {
        let outcome = self.store.tick()?;

        let mut report = TickReport {
            advanced: outcome.advanced,
            completed: outcome.finished.len(),
            delivered: 0,
        };
        let mut failed = 0;
        let mut last_error = None;

        for (room, announcement) in &outcome.announcements {
            match self.announcer.announce(room, announcement) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(room = %room.room(), error = %e, "announcement not delivered");
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        for room in &outcome.finished {
            if let Err(e) = self.announcer.release(room) {
                warn!(room = %room.room(), error = %e, "room not released");
            }
        }

        debug!(
            advanced = report.advanced,
            completed = report.completed,
            delivered = report.delivered,
            "tick"
        );

        match last_error {
            Some(e) => Err(WarError::Delivery {
                failed,
                reason: e.to_string(),
            }),
            None => Ok(report),
        }
    }

    /// Tick every `period`.
    ///
    /// A one-minute period first fires at the start of the next minute on
    /// the ticker's clock; any other period first fires one full period from
    /// now. Must be called from within a tokio runtime.
    pub fn spawn(self, period: Duration) -> TickerHandle {
        let first = if period == MINUTE {
            until_next_minute(self.clock.now())
        } else {
            period
        };
        debug!(?period, ?first, "war ticker started");

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if let Err(e) = self.tick() {
                    warn!(error = %e, "war tick incomplete");
                }
            }
        });

        TickerHandle { task }
    }
}

/// Registration of a running ticker.
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Unregister the ticker. No tick runs after this returns.
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::request::{CountdownLimits, TimeSpec};
    use crate::service::WarService;
    use crate::transport::{BroadcastTransport, MemoryTransport, Transport};
    use crate::war::RoomId;
    use chrono::NaiveDate;
    use tokio_test::{assert_err, assert_ok};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn setup() -> (Ticker, Arc<WarStore>, Arc<MemoryTransport>) {
        let store = Arc::new(WarStore::new());
        let transport = Arc::new(MemoryTransport::new());
        let ticker = Ticker::new(Arc::clone(&store), Announcer::new(transport.clone()))
            .with_clock(Arc::new(FixedClock::new(at(14, 5, 0))));
        (ticker, store, transport)
    }

    fn start(store: &WarStore, transport: &MemoryTransport, room: &str, duration: u32, countdown: u32) {
        let handle = transport.resolve_room(&RoomId::new(room).unwrap()).unwrap();
        store.start(handle, duration, countdown).unwrap();
    }

    #[test]
    fn test_full_lifecycle() {
        let (ticker, store, transport) = setup();
        start(&store, &transport, "lobby", 3, 2);

        ticker.tick().unwrap();
        ticker.tick().unwrap();
        ticker.tick().unwrap();
        ticker.tick().unwrap();
        let report = ticker.tick().unwrap();

        assert_eq!(report.completed, 1);
        assert_eq!(
            transport.messages_for("lobby"),
            vec![
                "Get ready! 3 minute word war starts in 1 minute",
                "Word war for 3 minutes begins now!",
                "Go go go! Get those words down!",
                "Word war over!",
            ]
        );
        assert_eq!(store.count().unwrap(), 0);

        // Nothing left to tick
        assert_eq!(ticker.tick().unwrap(), TickReport::default());
    }

    #[test]
    fn test_failed_delivery_still_advances() {
        let (ticker, store, transport) = setup();
        start(&store, &transport, "lobby", 1, 0);
        start(&store, &transport, "attic", 1, 0);

        transport.set_failing(true);
        let err = assert_err!(ticker.tick());
        assert!(matches!(err, WarError::Delivery { failed: 2, .. }));

        // Both wars finished anyway; nothing is re-announced
        assert_eq!(store.count().unwrap(), 0);
        transport.set_failing(false);
        assert_ok!(ticker.tick());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_ticker_runs_once_per_period() {
        let (ticker, store, transport) = setup();
        start(&store, &transport, "lobby", 1, 1);

        let handle = ticker.spawn(Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(transport.sent().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(
            transport.messages_for("lobby"),
            vec![
                "Word war for 1 minute begins now!",
                "Go go go! Get those words down!"
            ]
        );

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.messages_for("lobby").last().unwrap(), "Word war over!");
        assert!(handle.is_running());
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_ticker_does_nothing() {
        let (ticker, store, transport) = setup();
        start(&store, &transport, "lobby", 5, 1);

        let handle = ticker.spawn(Duration::from_secs(60));
        handle.stop();

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert!(transport.sent().is_empty());
        assert_eq!(store.get(&RoomId::new("lobby").unwrap()).unwrap().unwrap().countdown, 1);
    }

    #[test]
    fn test_until_next_minute() {
        assert_eq!(until_next_minute(at(14, 5, 0)), MINUTE);
        assert_eq!(until_next_minute(at(14, 5, 30)), Duration::from_secs(30));
        assert_eq!(until_next_minute(at(14, 5, 59)), Duration::from_secs(1));

        let almost = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(14, 5, 59, 750)
            .unwrap();
        assert_eq!(until_next_minute(almost), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_minute_ticks_follow_the_wall_clock() {
        let clock = Arc::new(FixedClock::new(at(14, 5, 30)));
        let transport = Arc::new(MemoryTransport::new());
        let service = WarService::new(
            Arc::new(WarStore::new()),
            transport.clone(),
            clock.clone(),
            CountdownLimits::default(),
        );
        let handle = Ticker::new(service.store().clone(), service.announcer().clone())
            .with_clock(clock.clone())
            .spawn(MINUTE);

        // First tick lands on 14:06:00, thirty seconds in
        tokio::time::sleep(Duration::from_secs(31)).await;
        clock.set(at(14, 6, 1));

        let started = service
            .start_war(
                Some(&RoomId::new("lobby").unwrap()),
                10,
                Some(TimeSpec::Clock { hour: 14, minute: 7 }),
                "ana",
            )
            .unwrap();
        assert_eq!(started.countdown, 1);

        // Nothing may begin before 14:07:00
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(transport.sent().is_empty());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(
            transport.messages_for("lobby"),
            vec![
                "Word war for 10 minutes begins now!",
                "Go go go! Get those words down!"
            ]
        );
        handle.stop();
    }

    #[test]
    fn test_finished_war_releases_room_channel() {
        let store = Arc::new(WarStore::new());
        let transport = Arc::new(BroadcastTransport::new());
        let ticker = Ticker::new(Arc::clone(&store), Announcer::new(transport.clone()));

        let handle = transport.resolve_room(&RoomId::new("lobby").unwrap()).unwrap();
        store.start(handle, 2, 0).unwrap();
        assert_eq!(transport.room_count().unwrap(), 1);

        ticker.tick().unwrap();
        assert_eq!(transport.room_count().unwrap(), 1);

        let report = ticker.tick().unwrap();
        assert_eq!(report.completed, 1);
        assert_eq!(transport.room_count().unwrap(), 0);
    }
}
