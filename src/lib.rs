// src/lib.rs
//! GNSS Status Monitor Library
//!
//! Maintains a live per-satellite status table reconciled from two
//! asynchronous event streams (status snapshots and SNR measurements),
//! with feed adapters for gpsd and NMEA serial receivers.

pub mod config;
pub mod display;
pub mod error;
pub mod feed;
pub mod gnss;
pub mod monitor;

// Re-export main types for convenience
pub use error::{Result, StatusError};
pub use gnss::{
    Constellation, FixData, Measurement, SatelliteKey, SatelliteRecord, SnapshotEntry,
    SnapshotSource, StatusAggregator,
};
pub use monitor::{FeedSource, StatusMonitor};
