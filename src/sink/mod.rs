//! Output sinks: where lifecycle events and accepted fixes go.

use crate::errors::AppResult;
use crate::models::{FixSnapshot, LifecycleEvent};
use clap::ValueEnum;

pub mod console;
pub mod store;

pub use console::{ConsoleFormat, ConsoleSink};
pub use store::StoreSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Print raw NMEA sentences
    Raw,
    /// Print labelled fix fields
    Parsed,
    /// Persist sessions, events and records to SQLite
    #[default]
    Database,
}

impl OutputMode {
    pub fn is_console(&self) -> bool {
        !matches!(self, OutputMode::Database)
    }
}

/// Uniform interface the acquisition loop talks to, whatever the output.
pub trait Sink {
    fn emit_event(&mut self, event: LifecycleEvent) -> AppResult<()>;

    /// Emit one accepted sample while a fix is held.
    fn emit_record(&mut self, fix: &FixSnapshot) -> AppResult<()>;

    /// Release resources. Called once, after SESSION_END.
    fn finish(&mut self) -> AppResult<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit_event(&mut self, event: LifecycleEvent) -> AppResult<()> {
        (**self).emit_event(event)
    }

    fn emit_record(&mut self, fix: &FixSnapshot) -> AppResult<()> {
        (**self).emit_record(fix)
    }

    fn finish(&mut self) -> AppResult<()> {
        (**self).finish()
    }
}
