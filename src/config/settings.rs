//! Run settings: configuration file and command line folded into one value
//! handed to the orchestrator.

use crate::cli::parser::Cli;
use crate::config::{Config, SerialConfig};
use crate::core::limiter::Limits;
use crate::logging::{LogConfig, LogTarget};
use crate::sink::OutputMode;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub output: OutputMode,
    pub database_file: PathBuf,
    pub overwrite_file: bool,
    pub limits: Limits,
    pub serial: SerialConfig,
    /// Sleep/advance period of the runtime counter.
    pub runtime_tick: Duration,
    /// Fix-state evaluation period.
    pub tick_interval: Duration,
    pub log: LogConfig,
}

impl Settings {
    /// CLI flags win over the configuration file.
    pub fn resolve(cli: &Cli, cfg: Config) -> Self {
        let database_file = cli
            .database_file
            .clone()
            .unwrap_or_else(|| cfg.database_path());

        let mut serial = cfg.serial;
        if let Some(port) = &cli.serial_port {
            serial.port = port.clone();
        }

        let target = if cli.output.is_console() {
            LogTarget::Stderr
        } else {
            LogTarget::Stdout
        };

        Self {
            output: cli.output,
            database_file,
            overwrite_file: cli.overwrite_file,
            limits: Limits {
                max_runtime: cli.max_runtime,
                max_records: cli.max_records,
            },
            serial,
            runtime_tick: Duration::from_secs(cfg.runtime_tick_seconds.max(1)),
            tick_interval: Duration::from_secs(1),
            log: LogConfig::from_cli(cli.verbose, cli.quiet, cli.silent, target),
        }
    }
}
