#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use gpslogger::errors::AppResult;
use gpslogger::gps::GpsReceiver;
use gpslogger::models::FixSnapshot;
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn gpsl() -> Command {
    cargo_bin_cmd!("gpslogger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_gpslogger.db", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Path to a config file that is guaranteed not to exist (forces defaults)
pub fn missing_config(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_missing_gpslogger.conf", name));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn fix_present(n: usize) -> FixSnapshot {
    FixSnapshot {
        has_fix: true,
        timestamp_utc: chrono::NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(10, 20, n as u32 % 60)),
        latitude: Some(45.5 + n as f64 / 1000.0),
        longitude: Some(-122.25),
        altitude_m: Some(198.5),
        speed_knots: Some(1.95),
        fix_quality: Some(1),
        satellites: Some(7),
        track_angle_deg: Some(120.35),
        horizontal_dilution: Some(0.9),
        height_geoid: Some(-35.0),
        nmea_sentence: Some(format!(
            "$GPGGA,1020{:02},4530.000,N,12215.000,W,1,07,0.9,198.5,M,-35.0,M,,*47",
            n % 60
        )),
    }
}

pub fn fix_absent() -> FixSnapshot {
    FixSnapshot {
        has_fix: false,
        nmea_sentence: Some("$GPRMC,,V,,,,,,,,,,N*53".to_string()),
        ..FixSnapshot::default()
    }
}

/// Receiver replaying a fixed list of snapshots, one per poll.
///
/// Once the script runs out the last snapshot stays current and, if an
/// interrupt flag was given, it is raised.
pub struct ScriptedReceiver {
    script: VecDeque<FixSnapshot>,
    current: FixSnapshot,
    pub commands: Vec<String>,
    interrupt_when_done: Option<Arc<AtomicBool>>,
}

impl ScriptedReceiver {
    pub fn new(script: Vec<FixSnapshot>) -> Self {
        Self {
            script: script.into(),
            current: FixSnapshot::default(),
            commands: Vec::new(),
            interrupt_when_done: None,
        }
    }

    pub fn interrupt_when_done(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt_when_done = Some(flag);
        self
    }
}

impl GpsReceiver for ScriptedReceiver {
    fn send_command(&mut self, body: &str) -> AppResult<()> {
        self.commands.push(body.to_string());
        Ok(())
    }

    fn update(&mut self) -> AppResult<bool> {
        match self.script.pop_front() {
            Some(next) => {
                self.current = next;
                Ok(true)
            }
            None => {
                if let Some(flag) = &self.interrupt_when_done {
                    flag.store(true, Ordering::Relaxed);
                }
                Ok(false)
            }
        }
    }

    fn snapshot(&self) -> &FixSnapshot {
        &self.current
    }
}
