use crate::errors::AppResult;
use crate::models::{FixSnapshot, LifecycleEvent};
use crate::sink::Sink;
use crate::utils::time::format_timestamp;
use std::fmt::Display;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFormat {
    Raw,
    Parsed,
}

/// Prints to a writer (stdout in production). Nothing is persisted.
pub struct ConsoleSink<W: Write> {
    out: W,
    format: ConsoleFormat,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, format: ConsoleFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}

fn degrees(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.6}"))
        .unwrap_or_else(|| "n/a".to_string())
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn emit_event(&mut self, event: LifecycleEvent) -> AppResult<()> {
        if event == LifecycleEvent::FixWait {
            writeln!(self.out, "waiting for a fix")?;
        } else {
            writeln!(self.out, "{event}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn emit_record(&mut self, fix: &FixSnapshot) -> AppResult<()> {
        let sentence = fix.nmea_sentence.as_deref().unwrap_or("");

        match self.format {
            ConsoleFormat::Raw => {
                writeln!(self.out, "{sentence}")?;
            }
            ConsoleFormat::Parsed => {
                let o = &mut self.out;
                writeln!(o, "{}", "=".repeat(40))?;
                writeln!(o, "{sentence}")?;
                writeln!(
                    o,
                    "timestamp: {}",
                    or_na(fix.timestamp_utc.as_ref().map(format_timestamp))
                )?;
                writeln!(o, "latitude: {} degrees", degrees(fix.latitude))?;
                writeln!(o, "longitude: {} degrees", degrees(fix.longitude))?;
                writeln!(o, "altitude: {} meters", or_na(fix.altitude_m))?;
                writeln!(o, "speed: {} knots", or_na(fix.speed_knots))?;
                writeln!(o, "fix quality: {}", or_na(fix.fix_quality))?;
                writeln!(o, "satellites: {}", or_na(fix.satellites))?;
                writeln!(o, "track angle: {} degrees", or_na(fix.track_angle_deg))?;
                writeln!(o, "horizontal dilution: {}", or_na(fix.horizontal_dilution))?;
                writeln!(o, "height geoid: {} meters", or_na(fix.height_geoid))?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> AppResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
