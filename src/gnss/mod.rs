// src/gnss/mod.rs
//! GNSS data model, event types, and the status aggregator

pub mod aggregator;
pub mod data;
pub mod events;

pub use aggregator::{SessionState, StatusAggregator};
pub use data::{Constellation, FixData, SatelliteKey, SatelliteRecord};
pub use events::{Measurement, SnapshotEntry, SnapshotSource};
