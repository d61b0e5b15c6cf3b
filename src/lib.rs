//! gpslogger library root.
//! Exposes the CLI parser, the high-level run() function and the engine modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod gps;
pub mod logging;
pub mod models;
pub mod sink;
pub mod utils;

use clap::Parser;
use cli::parser::Cli;
use config::{Config, DEFAULT_DATABASE, Settings};
use core::{ExitStatus, LoopOptions, acquisition};
use db::SessionStore;
use errors::AppResult;
use signal_hook::consts::{SIGINT, SIGTERM};
use sink::{ConsoleFormat, ConsoleSink, OutputMode, StoreSink};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::debug;

/// Run one acquisition session with resolved settings.
///
/// Store problems (invalid schema, unwritable file) are returned as errors
/// before any session exists; everything after that ends in an ExitStatus.
pub fn execute(settings: &Settings) -> AppResult<ExitStatus> {
    let interrupt = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&interrupt))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&interrupt))?;

    let options = LoopOptions::from(settings);
    let open_receiver = || gps::open_serial(&settings.serial);

    debug!(output = ?settings.output, "settings");

    let status = match settings.output {
        OutputMode::Database => {
            if settings.database_file == Path::new(DEFAULT_DATABASE) {
                debug!("database: using default sqlite3 database file");
            } else {
                debug!("database: using supplied sqlite3 database file");
            }

            let store = SessionStore::open(&settings.database_file, settings.overwrite_file)?;
            let sink = StoreSink::begin(store)?;
            acquisition::start(&options, sink, open_receiver, interrupt)
        }
        OutputMode::Raw | OutputMode::Parsed => {
            if settings.overwrite_file {
                debug!("database: --overwrite-file ignored without database output");
            }
            let format = match settings.output {
                OutputMode::Raw => ConsoleFormat::Raw,
                _ => ConsoleFormat::Parsed,
            };
            let sink = ConsoleSink::new(io::stdout(), format);
            acquisition::start(&options, sink, open_receiver, interrupt)
        }
    };

    Ok(status)
}

/// Entry point used by main.rs
pub fn run() -> AppResult<ExitStatus> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once, CLI overrides on top
    let cfg = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, cfg);

    // 3️⃣ logging
    logging::init(&settings.log);
    debug!("process: initializing");

    // 4️⃣ run
    execute(&settings)
}
