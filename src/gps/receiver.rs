use crate::config::SerialConfig;
use crate::errors::AppResult;
use crate::gps::nmea::{NmeaState, frame_command};
use crate::models::FixSnapshot;
use serialport::SerialPort;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Output only RMC and GGA sentences.
pub const CMD_SENTENCES_RMC_GGA: &str = "PMTK314,0,1,0,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0";
/// 1 Hz position updates.
pub const CMD_UPDATE_RATE_1HZ: &str = "PMTK220,1000";
/// Ask the receiver for its firmware release.
pub const CMD_QUERY_RELEASE: &str = "PMTK605";

pub const STARTUP_COMMANDS: &[&str] = &[
    CMD_SENTENCES_RMC_GGA,
    CMD_UPDATE_RATE_1HZ,
    CMD_QUERY_RELEASE,
];

/// Source of fix snapshots, polled by the acquisition loop.
pub trait GpsReceiver {
    /// Send one command body (without `$`, checksum or line ending).
    fn send_command(&mut self, body: &str) -> AppResult<()>;

    /// Read at most one sentence and fold it into the snapshot.
    /// Returns `true` if a sentence was consumed.
    fn update(&mut self) -> AppResult<bool>;

    fn snapshot(&self) -> &FixSnapshot;

    fn configure(&mut self) -> AppResult<()> {
        for cmd in STARTUP_COMMANDS {
            debug!(command = cmd, "serial: sending");
            self.send_command(cmd)?;
        }
        Ok(())
    }
}

/// NMEA receiver over any bidirectional byte stream.
pub struct NmeaReceiver<P: Read + Write> {
    port: BufReader<P>,
    state: NmeaState,
    fix: FixSnapshot,
    line: String,
}

impl<P: Read + Write> NmeaReceiver<P> {
    pub fn new(port: P) -> Self {
        Self {
            port: BufReader::new(port),
            state: NmeaState::new(),
            fix: FixSnapshot::default(),
            line: String::new(),
        }
    }
}

impl<P: Read + Write> GpsReceiver for NmeaReceiver<P> {
    fn send_command(&mut self, body: &str) -> AppResult<()> {
        let port = self.port.get_mut();
        port.write_all(frame_command(body).as_bytes())?;
        port.flush()?;
        Ok(())
    }

    fn update(&mut self) -> AppResult<bool> {
        match self.port.read_line(&mut self.line) {
            Ok(0) => Ok(false),
            Ok(_) => {
                if !self.line.ends_with('\n') {
                    // partial line, keep it for the next read
                    return Ok(false);
                }
                let sentence = self.line.trim();
                if !sentence.starts_with('$') {
                    self.line.clear();
                    return Ok(false);
                }
                trace!(sentence, "serial: received");
                self.state.apply(&mut self.fix, sentence);
                self.line.clear();
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                // garbage bytes on the line, drop them
                self.line.clear();
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn snapshot(&self) -> &FixSnapshot {
        &self.fix
    }
}

pub type SerialReceiver = NmeaReceiver<Box<dyn SerialPort>>;

/// Open the configured serial device. Failure here is fatal for the run.
pub fn open_serial(cfg: &SerialConfig) -> AppResult<SerialReceiver> {
    debug!(
        port = %cfg.port,
        baudrate = cfg.baudrate,
        timeout_ms = cfg.timeout_ms,
        "serial: initializing"
    );

    let port = serialport::new(cfg.port.as_str(), cfg.baudrate)
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .open()?;

    Ok(NmeaReceiver::new(port))
}
