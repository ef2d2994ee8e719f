// src/gnss/events.rs
//! Event types delivered to the aggregator by feed adapters

use super::data::{Constellation, SatelliteKey};

/// Which generation of satellite-status reporting a session uses.
///
/// Decided once at startup by probing the feed's capabilities and fixed for
/// the lifetime of the session: modern sources report SNR through a separate
/// measurement stream, legacy sources carry SNR inside the snapshot itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Modern,
    Legacy,
}

/// Raw per-satellite fields from one snapshot event.
///
/// `snr` is `Some` only for legacy sources; modern sources never populate it
/// and the aggregator ignores it in modern mode.
#[derive(Debug, Clone, Default)]
pub struct SnapshotEntry {
    pub svid: u16,
    pub constellation: Constellation,
    pub snr: Option<f32>,
    pub elevation_deg: f32,
    pub azimuth_deg: f32,
    pub has_ephemeris: bool,
    pub has_almanac: bool,
    pub used_in_fix: bool,
}

/// One per-satellite SNR reading from a measurement event.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub svid: u16,
    pub constellation: Constellation,
    pub snr_db: f64,
}

impl Measurement {
    pub fn key(&self) -> SatelliteKey {
        SatelliteKey {
            svid: self.svid,
            constellation: self.constellation,
        }
    }
}
