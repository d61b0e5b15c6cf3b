//! gpslogger main entrypoint.

use gpslogger::run;

fn main() {
    match run() {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
