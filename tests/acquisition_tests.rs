use gpslogger::core::acquisition::{self, AcquisitionLoop, ExitStatus, LoopOptions, LoopState};
use gpslogger::core::limiter::{LimitReached, Limits, RuntimeLimiter};
use gpslogger::db::SessionStore;
use gpslogger::db::queries::{count_records, load_events, load_records, load_sessions};
use gpslogger::errors::AppError;
use gpslogger::gps::GpsReceiver;
use gpslogger::gps::receiver::STARTUP_COMMANDS;
use gpslogger::models::{FixSnapshot, LifecycleEvent};
use gpslogger::sink::{ConsoleFormat, ConsoleSink, StoreSink};
use rusqlite::Connection;
use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

mod common;
use common::{ScriptedReceiver, fix_absent, fix_present, setup_test_db};

fn options(limits: Limits) -> LoopOptions {
    LoopOptions {
        limits,
        tick_interval: Duration::ZERO,
        runtime_tick: Duration::from_secs(5),
    }
}

fn store_sink(db_path: &str) -> (StoreSink, i64) {
    let store = SessionStore::open(db_path, false).expect("open store");
    let sink = StoreSink::begin(store).expect("begin session");
    let id = sink.session_id();
    (sink, id)
}

fn event_names(db_path: &str, session_id: i64) -> Vec<LifecycleEvent> {
    let conn = Connection::open(db_path).unwrap();
    load_events(&conn, session_id)
        .unwrap()
        .into_iter()
        .map(|e| e.event)
        .collect()
}

#[test]
fn test_records_limit_stops_after_third_record() {
    let db_path = setup_test_db("acq_records_limit");
    let (sink, id) = store_sink(&db_path);

    let script = (0..5).map(fix_present).collect();
    let receiver = ScriptedReceiver::new(script);

    let status = acquisition::start(
        &options(Limits {
            max_runtime: None,
            max_records: Some(3),
        }),
        sink,
        move || Ok(receiver),
        Arc::new(AtomicBool::new(false)),
    );

    assert_eq!(status, ExitStatus::LimitReached);
    assert_eq!(status.code(), 0);

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count_records(&conn, id).unwrap(), 3);

    assert_eq!(
        event_names(&db_path, id),
        vec![
            LifecycleEvent::SessionInitialize,
            LifecycleEvent::SessionStart,
            LifecycleEvent::SessionEnd,
        ]
    );

    let sessions = load_sessions(&conn).unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].is_closed());
}

#[test]
fn test_records_carry_fix_fields_and_sentence_code() {
    let db_path = setup_test_db("acq_record_fields");
    let (sink, id) = store_sink(&db_path);

    let receiver = ScriptedReceiver::new(vec![fix_present(30)]);
    let status = acquisition::start(
        &options(Limits {
            max_runtime: None,
            max_records: Some(1),
        }),
        sink,
        move || Ok(receiver),
        Arc::new(AtomicBool::new(false)),
    );
    assert_eq!(status, ExitStatus::LimitReached);

    let conn = Connection::open(&db_path).unwrap();
    let records = load_records(&conn, id).unwrap();
    assert_eq!(records.len(), 1);

    let r = &records[0];
    assert_eq!(r.timestamp.as_deref(), Some("2024-05-17 10:20:30"));
    assert_eq!(r.code.as_deref(), Some("$GPGGA"));
    assert_eq!(r.latitude, fix_present(30).latitude);
    assert_eq!(r.fix_quality, Some(1));
    assert_eq!(r.satellites, Some(7));
    assert_eq!(r.height_geoid, Some(-35.0));
}

#[test]
fn test_fix_transitions_are_persisted_in_order() {
    let db_path = setup_test_db("acq_transitions");
    let (sink, id) = store_sink(&db_path);

    let mut script: Vec<FixSnapshot> = (0..7).map(|_| fix_absent()).collect();
    script.push(fix_present(1));
    script.push(fix_present(2));
    let receiver = ScriptedReceiver::new(script);

    let status = acquisition::start(
        &options(Limits {
            max_runtime: None,
            max_records: Some(2),
        }),
        sink,
        move || Ok(receiver),
        Arc::new(AtomicBool::new(false)),
    );
    assert_eq!(status, ExitStatus::LimitReached);

    assert_eq!(
        event_names(&db_path, id),
        vec![
            LifecycleEvent::SessionInitialize,
            LifecycleEvent::SessionStart,
            LifecycleEvent::FixLost,
            LifecycleEvent::FixWait,
            LifecycleEvent::FixFound,
            LifecycleEvent::SessionEnd,
        ]
    );

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count_records(&conn, id).unwrap(), 2);
}

#[test]
fn test_serial_open_failure_closes_session() {
    let db_path = setup_test_db("acq_serial_failure");
    let (sink, id) = store_sink(&db_path);

    let status = acquisition::start(
        &options(Limits::default()),
        sink,
        || -> Result<ScriptedReceiver, AppError> {
            Err(AppError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )))
        },
        Arc::new(AtomicBool::new(false)),
    );

    assert_eq!(status, ExitStatus::Failed);
    assert_ne!(status.code(), 0);

    assert_eq!(
        event_names(&db_path, id),
        vec![LifecycleEvent::SessionInitialize, LifecycleEvent::SessionEnd]
    );

    let conn = Connection::open(&db_path).unwrap();
    assert!(load_sessions(&conn).unwrap()[0].is_closed());
    assert_eq!(count_records(&conn, id).unwrap(), 0);
}

#[test]
fn test_interrupt_closes_session_with_nonzero_status() {
    let db_path = setup_test_db("acq_interrupt");
    let (sink, id) = store_sink(&db_path);

    let interrupt = Arc::new(AtomicBool::new(false));
    let receiver = ScriptedReceiver::new(vec![fix_absent(), fix_absent()])
        .interrupt_when_done(Arc::clone(&interrupt));

    let status = acquisition::start(
        &options(Limits::default()),
        sink,
        move || Ok(receiver),
        interrupt,
    );

    assert_eq!(status, ExitStatus::Interrupted);
    assert_eq!(status.code(), 130);

    assert_eq!(
        event_names(&db_path, id),
        vec![
            LifecycleEvent::SessionInitialize,
            LifecycleEvent::SessionStart,
            LifecycleEvent::FixLost,
            LifecycleEvent::SessionEnd,
        ]
    );
}

#[test]
fn test_store_failure_mid_run_still_attempts_close() {
    let db_path = setup_test_db("acq_store_failure");
    let (sink, id) = store_sink(&db_path);

    // make every insert into logs fail
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_logs BEFORE INSERT ON logs
             BEGIN SELECT RAISE(ABORT, 'disk says no'); END;",
        )
        .unwrap();
    }

    let receiver = ScriptedReceiver::new(vec![fix_present(0)]);
    let status = acquisition::start(
        &options(Limits::default()),
        sink,
        move || Ok(receiver),
        Arc::new(AtomicBool::new(false)),
    );

    assert_eq!(status, ExitStatus::Failed);
    assert_eq!(
        event_names(&db_path, id).last(),
        Some(&LifecycleEvent::SessionEnd)
    );
}

#[test]
fn test_manual_tick_then_run_with_console_sink() {
    let mut out = ConsoleSink::new(Vec::new(), ConsoleFormat::Raw);
    let receiver = ScriptedReceiver::new(vec![fix_present(0)]);

    let limiter = RuntimeLimiter::new(Limits {
        max_runtime: None,
        max_records: Some(1),
    });
    let mut acq = AcquisitionLoop::new(
        receiver,
        &mut out,
        limiter,
        Duration::ZERO,
        Arc::new(AtomicBool::new(false)),
    );
    assert_eq!(acq.state(), LoopState::Initializing);

    // tick before any poll: empty snapshot has no fix
    assert_eq!(acq.tick().unwrap(), None);
    assert_eq!(acq.limiter().counters().processed_records(), 0);
    assert_eq!(acq.run(), ExitStatus::LimitReached);

    let sentence = fix_present(0).nmea_sentence.unwrap();
    let text = String::from_utf8(out.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "FIX_LOST",
            "SESSION_START",
            "FIX_FOUND",
            sentence.as_str(),
            "SESSION_END",
        ]
    );
}

#[test]
fn test_startup_commands_sent_on_configure() {
    let mut receiver = ScriptedReceiver::new(Vec::new());
    receiver.configure().unwrap();

    assert_eq!(receiver.commands, STARTUP_COMMANDS.to_vec());
}

#[test]
fn test_parsed_console_output() {
    let mut out = ConsoleSink::new(Vec::new(), ConsoleFormat::Parsed);
    let absent = fix_absent();

    let status = acquisition::start(
        &options(Limits {
            max_runtime: None,
            max_records: Some(1),
        }),
        &mut out,
        move || Ok(ScriptedReceiver::new(vec![absent, fix_present(5)])),
        Arc::new(AtomicBool::new(false)),
    );
    assert_eq!(status, ExitStatus::LimitReached);

    let text = String::from_utf8(out.into_inner()).unwrap();
    assert!(text.starts_with("SESSION_INITIALIZE\nSESSION_START\nFIX_LOST\nFIX_FOUND\n"));
    assert!(text.contains(&"=".repeat(40)));
    assert!(text.contains("timestamp: 2024-05-17 10:20:05"));
    assert!(text.contains("latitude: 45.505000 degrees"));
    assert!(text.contains("longitude: -122.250000 degrees"));
    assert!(text.contains("satellites: 7"));
    assert!(text.ends_with("SESSION_END\n"));
}

#[test]
fn test_limit_reported_by_tick() {
    let db_path = setup_test_db("acq_tick_limit");
    let (sink, _) = store_sink(&db_path);

    let mut receiver = ScriptedReceiver::new(vec![fix_present(0)]);
    receiver.update().unwrap();

    let limiter = RuntimeLimiter::new(Limits {
        max_runtime: None,
        max_records: Some(1),
    });
    let mut acq = AcquisitionLoop::new(
        receiver,
        sink,
        limiter,
        Duration::ZERO,
        Arc::new(AtomicBool::new(false)),
    );

    assert_eq!(acq.tick().unwrap(), Some(LimitReached::Records(1)));
}

#[test]
fn test_runtime_limit_stops_loop_without_fix() {
    let db_path = setup_test_db("acq_runtime_limit");
    let (sink, id) = store_sink(&db_path);

    let receiver = ScriptedReceiver::new(vec![fix_absent(); 3]);
    let opts = LoopOptions {
        limits: Limits {
            max_runtime: Some(1),
            max_records: None,
        },
        tick_interval: Duration::from_millis(50),
        runtime_tick: Duration::from_millis(200),
    };

    let started = Instant::now();
    let status = acquisition::start(
        &opts,
        sink,
        move || Ok(receiver),
        Arc::new(AtomicBool::new(false)),
    );

    assert_eq!(status, ExitStatus::LimitReached);
    assert!(started.elapsed() >= Duration::from_secs(1));

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count_records(&conn, id).unwrap(), 0);

    let events = event_names(&db_path, id);
    assert_eq!(
        events[..3],
        [
            LifecycleEvent::SessionInitialize,
            LifecycleEvent::SessionStart,
            LifecycleEvent::FixLost,
        ]
    );
    assert_eq!(events.last(), Some(&LifecycleEvent::SessionEnd));
    assert!(load_sessions(&conn).unwrap()[0].is_closed());
}
