// src/gnss/aggregator.rs
//! Satellite status aggregator
//!
//! Reconciles two independently-arriving event streams into one ordered
//! per-satellite table: snapshot events rebuild the table wholesale, and
//! measurement events join SNR values into it by (svid, constellation) key.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

use super::data::{FixData, SatelliteKey, SatelliteRecord};
use super::events::{Measurement, SnapshotEntry, SnapshotSource};

/// Invoked after every successful ingest. Pull model: the listener re-reads
/// the full table rather than receiving a diff.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Acquisition lifecycle, driven by external start/stop signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Stopped,
    Started,
}

pub struct StatusAggregator {
    source: SnapshotSource,
    table: Vec<SatelliteRecord>,
    session: SessionState,
    session_started_at: Option<DateTime<Utc>>,
    fix: FixData,
    time_to_first_fix: Option<Duration>,
    on_change: Option<ChangeCallback>,
}

impl StatusAggregator {
    /// Create an aggregator for the given source generation. The generation
    /// is fixed for the life of the session.
    pub fn new(source: SnapshotSource) -> Self {
        Self {
            source,
            table: Vec::new(),
            session: SessionState::Stopped,
            session_started_at: None,
            fix: FixData::new(),
            time_to_first_fix: None,
            on_change: None,
        }
    }

    /// Register the table-changed notification callback.
    pub fn set_on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// The current status table, in feed report order.
    pub fn table(&self) -> &[SatelliteRecord] {
        &self.table
    }

    pub fn fix(&self) -> &FixData {
        &self.fix
    }

    /// Elapsed time between session start and the first fix, once both
    /// have been observed.
    pub fn time_to_first_fix(&self) -> Option<Duration> {
        self.time_to_first_fix
    }

    /// Count of satellites used in the current position solution.
    pub fn used_in_fix_count(&self) -> usize {
        self.table.iter().filter(|sat| sat.used_in_fix).count()
    }

    /// Ingest one satellite-status snapshot, rebuilding the table to exactly
    /// the reported satellite count, in report order.
    ///
    /// In modern mode every record's SNR starts at 0.0 each refresh; the
    /// value arrives solely through [`ingest_measurements`]. In legacy mode
    /// the snapshot carries SNR itself.
    ///
    /// [`ingest_measurements`]: StatusAggregator::ingest_measurements
    pub fn ingest_snapshot(&mut self, entries: &[SnapshotEntry]) {
        self.set_started(true);

        self.table.clear();
        self.table.reserve(entries.len());
        for entry in entries {
            let snr = match self.source {
                SnapshotSource::Modern => 0.0,
                SnapshotSource::Legacy => entry.snr.unwrap_or(0.0),
            };
            self.table.push(SatelliteRecord {
                svid: entry.svid,
                constellation: entry.constellation,
                snr,
                elevation_deg: entry.elevation_deg,
                azimuth_deg: entry.azimuth_deg,
                has_ephemeris: entry.has_ephemeris,
                has_almanac: entry.has_almanac,
                used_in_fix: entry.used_in_fix,
            });
        }

        debug!("snapshot ingested: {} satellites", self.table.len());
        self.notify();
    }

    /// Join a measurement event's SNR readings into the current table.
    ///
    /// A no-op before the first snapshot. Table records absent from the
    /// measurement set keep their current SNR (signal may be lost
    /// mid-cycle); measurement keys with no table record are ignored.
    pub fn ingest_measurements(&mut self, measurements: &[Measurement]) {
        if self.table.is_empty() {
            // No snapshot observed yet, nothing to join against.
            return;
        }

        let snr_by_sat: HashMap<SatelliteKey, f64> = measurements
            .iter()
            .map(|m| (m.key(), m.snr_db))
            .collect();

        for record in &mut self.table {
            if let Some(&snr) = snr_by_sat.get(&record.key()) {
                record.snr = snr as f32;
            }
        }

        debug!("measurements joined: {} readings", snr_by_sat.len());
        self.notify();
    }

    /// Merge a location-fix update, stamping time-to-first-fix on the first
    /// fix of the session.
    pub fn update_fix(&mut self, update: &FixData) {
        self.fix.merge(update);
        if self.time_to_first_fix.is_none() && self.fix.has_fix() {
            if let Some(started_at) = self.session_started_at {
                let ttff = Utc::now().signed_duration_since(started_at);
                info!("first fix after {} ms", ttff.num_milliseconds());
                self.time_to_first_fix = Some(ttff);
            }
        }
        self.notify();
    }

    /// Clear the satellite table and fix state. The next snapshot
    /// reallocates as needed.
    pub fn reset(&mut self) {
        self.table.clear();
        self.fix.clear();
        self.time_to_first_fix = None;
    }

    /// Drive the acquisition lifecycle. Stopping runs [`reset`]; starting
    /// begins tracking time to first fix.
    ///
    /// [`reset`]: StatusAggregator::reset
    pub fn set_started(&mut self, started: bool) {
        match (self.session, started) {
            (SessionState::Stopped, true) => {
                info!("acquisition started");
                self.session = SessionState::Started;
                self.session_started_at = Some(Utc::now());
                self.time_to_first_fix = None;
            }
            (SessionState::Started, false) => {
                info!("acquisition stopped");
                self.session = SessionState::Stopped;
                self.session_started_at = None;
                self.reset();
                self.notify();
            }
            _ => {}
        }
    }

    fn notify(&self) {
        if let Some(callback) = &self.on_change {
            callback();
        }
    }
}
