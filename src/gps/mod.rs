//! GPS collaborator: NMEA sentence handling and receiver transport.

pub mod nmea;
pub mod receiver;

pub use receiver::{GpsReceiver, NmeaReceiver, SerialReceiver, open_serial};
