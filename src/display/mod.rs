// src/display/mod.rs
//! Rendering surface for the satellite status table
//!
//! The row model here is pure data: row 0 is a fixed header, rows 1..N are
//! satellite records in table order. Renderers (terminal or otherwise)
//! consume the rows and own all presentation decisions.

pub mod terminal;

use crate::gnss::SatelliteRecord;

pub const ID_COLUMN: usize = 0;
pub const FLAG_COLUMN: usize = 1;
pub const SNR_COLUMN: usize = 2;
pub const ELEVATION_COLUMN: usize = 3;
pub const AZIMUTH_COLUMN: usize = 4;
pub const FLAGS_COLUMN: usize = 5;
pub const COLUMN_COUNT: usize = 6;

pub const COLUMN_LABELS: [&str; COLUMN_COUNT] = ["ID", "Flag", "SNR", "Elev", "Az", "EAU"];

/// Build the full render-row set: header row plus one row per record.
///
/// SNR renders blank when 0.0 (no measurement seen this cycle). The flag
/// column carries the constellation's flag-icon selector; renderers without
/// image support fall back to the constellation label.
pub fn table_rows(records: &[SatelliteRecord]) -> Vec<[String; COLUMN_COUNT]> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(COLUMN_LABELS.map(String::from));

    for record in records {
        rows.push([
            record.svid.to_string(),
            record.constellation.label().to_string(),
            if record.snr != 0.0 {
                format!("{:.1}", record.snr)
            } else {
                String::new()
            },
            format!("{:.1}", record.elevation_deg),
            format!("{:.1}", record.azimuth_deg),
            record.status_flags_string(),
        ]);
    }

    rows
}
