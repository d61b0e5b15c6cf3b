//! Logging configuration and initialization.
//!
//! The verbosity flags map onto a small set of presets; `RUST_LOG`, when set,
//! replaces the preset filter entirely.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Lifecycle events, limits and errors
    #[default]
    Normal,
    /// Debug level: per-record and FIX_WAIT messages included
    Verbose,
    /// Errors only
    Quiet,
    /// Nothing at all
    Silent,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogTarget {
    #[default]
    Stdout,
    /// Used when stdout carries GPS output
    Stderr,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub preset: LogPreset,
    pub target: LogTarget,
}

impl LogConfig {
    /// Create a LogConfig from the mutually exclusive verbosity flags.
    pub fn from_cli(verbose: bool, quiet: bool, silent: bool, target: LogTarget) -> Self {
        let preset = if silent {
            LogPreset::Silent
        } else if quiet {
            LogPreset::Quiet
        } else if verbose {
            LogPreset::Verbose
        } else {
            LogPreset::Normal
        };

        Self { preset, target }
    }

    pub fn filter_directive(&self) -> &'static str {
        match self.preset {
            LogPreset::Normal => "gpslogger=info",
            LogPreset::Verbose => "gpslogger=debug",
            LogPreset::Quiet => "gpslogger=error",
            LogPreset::Silent => "off",
        }
    }

    /// Build an EnvFilter from this configuration.
    pub fn build_filter(&self) -> EnvFilter {
        if self.preset != LogPreset::Silent
            && let Ok(env_filter) = EnvFilter::try_from_default_env()
        {
            return env_filter;
        }
        EnvFilter::new(self.filter_directive())
    }
}

/// Initialize the tracing subscriber. Silent mode installs nothing.
pub fn init(config: &LogConfig) {
    if config.preset == LogPreset::Silent {
        return;
    }

    let writer = match config.target {
        LogTarget::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    // try_init: a subscriber may already be installed (tests)
    let _ = tracing_subscriber::registry()
        .with(config.build_filter())
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_thread_ids(false)
                .with_ansi(false),
        )
        .try_init();
}
