use crate::sink::OutputMode;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Command-line interface definition for gpslogger
/// Polls a serial GPS receiver and logs fixes to SQLite
#[derive(Parser, Debug)]
#[command(
    name = "gpslogger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Poll a serial GPS receiver, track fix state and log positions to SQLite",
    long_about = None
)]
#[command(group(ArgGroup::new("verbosity").args(["verbose", "quiet", "silent"]).multiple(false)))]
pub struct Cli {
    /// Log all messages and increase verbosity
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Suppress non-error logging messages
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Suppress all logging messages
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Processed data output handling
    #[arg(short = 'o', long = "output", value_enum, default_value = "database")]
    pub output: OutputMode,

    /// Use a configuration file other than ~/.gpslogger/gpslogger.conf
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Specify a database file to either load or create
    #[arg(
        long = "database-file",
        value_name = "DATABASE_FILE",
        help_heading = "Database arguments"
    )]
    pub database_file: Option<PathBuf>,

    /// Overwrite database files that potentially exist
    #[arg(long = "overwrite-file", help_heading = "Database arguments")]
    pub overwrite_file: bool,

    /// Serial device the receiver is attached to
    #[arg(long = "serial-port", value_name = "PORT")]
    pub serial_port: Option<String>,

    /// Maximum program runtime in seconds before exiting
    #[arg(long = "max-runtime", value_name = "SECONDS", help_heading = "Other arguments")]
    pub max_runtime: Option<u64>,

    /// Maximum number of records to fetch from device before exiting
    #[arg(long = "max-records", value_name = "COUNT", help_heading = "Other arguments")]
    pub max_records: Option<u64>,
}
