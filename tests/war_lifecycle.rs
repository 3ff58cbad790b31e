//! War lifecycle tests.
//!
//! Drive the service and the ticker together against an in-memory transport
//! and a fixed clock, checking what each room actually hears.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use wordwar::{
    BroadcastTransport, CancelTarget, CountdownLimits, FixedClock, MemoryTransport, RoomId,
    Ticker, TimeSpec, WarError, WarPhase, WarService, WarStore,
};

struct World {
    service: WarService,
    transport: Arc<MemoryTransport>,
    ticker: Ticker,
}

fn world() -> World {
    let now = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(14, 5, 0)
        .unwrap();
    let transport = Arc::new(MemoryTransport::new());
    let clock = Arc::new(FixedClock::new(now));
    let service = WarService::new(
        Arc::new(WarStore::new()),
        transport.clone(),
        clock.clone(),
        CountdownLimits::default(),
    );
    let ticker =
        Ticker::new(service.store().clone(), service.announcer().clone()).with_clock(clock);
    World {
        service,
        transport,
        ticker,
    }
}

fn room(name: &str) -> RoomId {
    RoomId::new(name).unwrap()
}

#[test]
fn test_one_war_per_room() {
    let w = world();
    let lobby = room("lobby");

    w.service.start_war(Some(&lobby), 25, None, "ana").unwrap();
    for actor in ["bo", "cy", "di"] {
        let err = w
            .service
            .start_war(Some(&lobby), 10, Some(TimeSpec::Immediate), actor)
            .unwrap_err();
        assert!(matches!(err, WarError::AlreadyActive(_)));
    }

    let wars = w.service.list_wars().unwrap();
    assert_eq!(wars.len(), 1);
    assert_eq!(wars[0].duration, 25);

    // Another room is independent.
    w.service
        .start_war(Some(&room("attic")), 10, None, "bo")
        .unwrap();
    assert_eq!(w.service.list_wars().unwrap().len(), 2);
}

#[test]
fn test_full_war_from_five_minute_countdown() {
    let w = world();
    let lobby = room("lobby");

    let started = w
        .service
        .start_war(Some(&lobby), 3, Some(TimeSpec::Relative(5)), "ana")
        .unwrap();
    assert_eq!(started.message, "3 minute word war will begin in 5 minutes");

    for _ in 0..5 {
        w.ticker.tick().unwrap();
    }
    assert_eq!(
        w.transport.messages_for("lobby"),
        vec![
            "Word war starts in 3 minutes",
            "2 minutes to go",
            "Get ready! 3 minute word war starts in 1 minute",
            "Word war for 3 minutes begins now!",
            "Go go go! Get those words down!",
        ]
    );

    let war = w.service.list_wars().unwrap().remove(0);
    assert_eq!(war.phase, WarPhase::Active);
    assert_eq!((war.countdown, war.duration), (0, 3));

    w.transport.clear();
    for _ in 0..3 {
        w.ticker.tick().unwrap();
    }
    assert_eq!(w.transport.messages_for("lobby"), vec!["Word war over!"]);
    assert!(w.service.list_wars().unwrap().is_empty());

    // Nothing more is said once the war is gone.
    w.ticker.tick().unwrap();
    assert_eq!(w.transport.messages_for("lobby").len(), 1);
}

#[test]
fn test_five_minute_warning() {
    let w = world();
    w.service
        .start_war(Some(&room("lobby")), 30, Some(TimeSpec::Relative(6)), "ana")
        .unwrap();

    w.ticker.tick().unwrap();
    assert_eq!(
        w.transport.messages_for("lobby"),
        vec!["5 minute warning for our 30 minute word war"]
    );
}

#[test]
fn test_room_can_war_again_after_completion() {
    let w = world();
    let lobby = room("lobby");

    w.service
        .start_war(Some(&lobby), 1, Some(TimeSpec::Immediate), "ana")
        .unwrap();
    w.ticker.tick().unwrap();

    let started = w
        .service
        .start_war(Some(&lobby), 10, Some(TimeSpec::Immediate), "bo")
        .unwrap();
    assert_eq!(started.message, "10 minute word war begins now!");
}

#[test]
fn test_cancel_announces_once() {
    let w = world();
    let lobby = room("lobby");
    w.service.start_war(Some(&lobby), 25, None, "ana").unwrap();

    let reply = w
        .service
        .cancel_war(&CancelTarget::Room(lobby.clone()), "mod")
        .unwrap();
    assert_eq!(reply, "Word war cancelled");

    let err = w
        .service
        .cancel_war(&CancelTarget::Room(lobby), "mod")
        .unwrap_err();
    assert!(matches!(err, WarError::NotFound(_)));

    w.ticker.tick().unwrap();
    assert_eq!(
        w.transport.messages_for("lobby"),
        vec!["Word war cancelled by mod!"]
    );
}

#[test]
fn test_cancel_all_is_silent() {
    let w = world();
    for name in ["lobby", "attic", "porch"] {
        w.service.start_war(Some(&room(name)), 25, None, "ana").unwrap();
    }

    let reply = w.service.cancel_war(&CancelTarget::All, "mod").unwrap();
    assert_eq!(reply, "All word wars cancelled");
    assert!(w.service.list_wars().unwrap().is_empty());

    w.ticker.tick().unwrap();
    assert!(w.transport.sent().is_empty());
}

#[test]
fn test_clock_time_wraps_forward() {
    let w = world();
    let err = w
        .service
        .start_war(
            Some(&room("lobby")),
            25,
            Some(TimeSpec::Clock { hour: 14, minute: 0 }),
            "ana",
        )
        .unwrap_err();
    assert!(matches!(err, WarError::TooFarOut { countdown: 715, .. }));

    let started = w
        .service
        .start_war(
            Some(&room("lobby")),
            25,
            Some(TimeSpec::Clock { hour: 2, minute: 10 }),
            "ana",
        )
        .unwrap();
    assert_eq!(started.countdown, 5);
}

#[test]
fn test_too_far_out_creates_nothing() {
    let w = world();
    let err = w
        .service
        .start_war(Some(&room("lobby")), 25, Some(TimeSpec::Relative(61)), "ana")
        .unwrap_err();
    assert!(matches!(err, WarError::TooFarOut { countdown: 61, max: 60 }));
    assert!(w.service.list_wars().unwrap().is_empty());
}

#[test]
fn test_failed_delivery_does_not_stall_wars() {
    let w = world();
    w.service
        .start_war(Some(&room("lobby")), 2, Some(TimeSpec::Immediate), "ana")
        .unwrap();
    w.service
        .start_war(Some(&room("attic")), 1, Some(TimeSpec::Immediate), "bo")
        .unwrap();

    w.transport.set_failing(true);
    let err = w.ticker.tick().unwrap_err();
    assert!(matches!(err, WarError::Delivery { failed: 1, .. }));

    // The attic war finished despite the lost "over" message.
    let wars = w.service.list_wars().unwrap();
    assert_eq!(wars.len(), 1);
    assert_eq!(wars[0].duration, 1);

    w.transport.set_failing(false);
    let report = w.ticker.tick().unwrap();
    assert_eq!(report.completed, 1);
    assert_eq!(w.transport.messages_for("lobby"), vec!["Word war over!"]);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_ticker_runs_war_to_completion() {
    let w = world();
    w.service
        .start_war(Some(&room("lobby")), 2, Some(TimeSpec::Relative(1)), "ana")
        .unwrap();

    let handle = w.ticker.clone().spawn(Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert!(w.transport.sent().is_empty());

    tokio::time::sleep(Duration::from_secs(3 * 60)).await;
    assert_eq!(
        w.transport.messages_for("lobby"),
        vec![
            "Word war for 2 minutes begins now!",
            "Go go go! Get those words down!",
            "Word war over!",
        ]
    );
    assert!(w.service.list_wars().unwrap().is_empty());

    handle.stop();
}

#[test]
fn test_room_channels_close_when_wars_end() {
    let transport = Arc::new(BroadcastTransport::new());
    let service = WarService::new(
        Arc::new(WarStore::new()),
        transport.clone(),
        Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
        )),
        CountdownLimits::default(),
    );
    let ticker = Ticker::new(service.store().clone(), service.announcer().clone());

    for name in ["lobby", "attic", "porch", "cellar"] {
        service
            .start_war(Some(&room(name)), 1, Some(TimeSpec::Immediate), "ana")
            .unwrap();
    }
    assert_eq!(transport.room_count().unwrap(), 4);

    // A refused second war holds nothing open
    let err = service
        .start_war(Some(&room("lobby")), 5, None, "bo")
        .unwrap_err();
    assert!(matches!(err, WarError::AlreadyActive(_)));
    assert_eq!(transport.room_count().unwrap(), 4);

    service
        .cancel_war(&CancelTarget::Room(room("attic")), "mod")
        .unwrap();
    assert_eq!(transport.room_count().unwrap(), 3);

    ticker.tick().unwrap();
    assert_eq!(transport.room_count().unwrap(), 0);

    service
        .start_war(Some(&room("lobby")), 10, None, "ana")
        .unwrap();
    service
        .start_war(Some(&room("porch")), 10, None, "ana")
        .unwrap();
    service.cancel_war(&CancelTarget::All, "mod").unwrap();
    assert_eq!(transport.room_count().unwrap(), 0);
}
