// src/feed/mod.rs
//! Feed adapters translating raw source data into aggregator events

pub mod gpsd;
pub mod nmea;

pub use nmea::NmeaParser;
