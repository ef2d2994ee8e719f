// src/gnss/data.rs
//! GNSS satellite data structures and utilities

use chrono::{DateTime, Utc};

/// GNSS constellation a satellite belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Constellation {
    Gps,
    Glonass,
    Qzss,
    Beidou,
    Galileo,
    #[default]
    Unknown,
}

impl Constellation {
    /// Map a platform constellation-type identifier (modern status sources)
    /// to a constellation.
    pub fn from_type_id(type_id: i32) -> Self {
        match type_id {
            1 => Constellation::Gps,
            3 => Constellation::Glonass,
            4 => Constellation::Qzss,
            5 => Constellation::Beidou,
            6 => Constellation::Galileo,
            _ => Constellation::Unknown,
        }
    }

    /// Map a PRN number to a constellation (legacy sources, where the
    /// satellite ID encodes the system).
    pub fn from_prn(prn: u16) -> Self {
        match prn {
            1..=32 => Constellation::Gps,
            65..=96 => Constellation::Glonass,
            193..=200 => Constellation::Qzss,
            201..=235 => Constellation::Beidou,
            301..=336 => Constellation::Galileo,
            _ => Constellation::Unknown,
        }
    }

    /// Display label for the constellation column.
    pub fn label(&self) -> &'static str {
        match self {
            Constellation::Gps => "GPS",
            Constellation::Glonass => "GLONASS",
            Constellation::Qzss => "QZSS",
            Constellation::Beidou => "BEIDOU",
            Constellation::Galileo => "GALILEO",
            Constellation::Unknown => "UNKNOWN",
        }
    }

    /// Flag-icon selector for the renderer. Pure data lookup; the renderer
    /// decides what asset (or text) the selector maps to.
    pub fn flag_icon(&self) -> Option<&'static str> {
        match self {
            Constellation::Gps => Some("flag_usa"),
            Constellation::Glonass => Some("flag_russia"),
            Constellation::Qzss => Some("flag_japan"),
            Constellation::Beidou => Some("flag_china"),
            Constellation::Galileo => Some("flag_galileo"),
            Constellation::Unknown => None,
        }
    }
}

/// Composite satellite identifier: numeric ID plus constellation.
///
/// Unique per active satellite within a snapshot. Used only for transient
/// lookups when joining measurement SNRs against the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SatelliteKey {
    pub svid: u16,
    pub constellation: Constellation,
}

/// One tracked satellite slot in the status table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SatelliteRecord {
    pub svid: u16,               // Satellite ID (PRN in legacy mode)
    pub constellation: Constellation,
    pub snr: f32,                // dB; 0.0 = no measurement seen this cycle
    pub elevation_deg: f32,
    pub azimuth_deg: f32,
    pub has_ephemeris: bool,
    pub has_almanac: bool,
    pub used_in_fix: bool,
}

impl SatelliteRecord {
    pub fn key(&self) -> SatelliteKey {
        SatelliteKey {
            svid: self.svid,
            constellation: self.constellation,
        }
    }

    /// Three-character E/A/U status flags: ephemeris, almanac, used-in-fix.
    /// Unset positions render as spaces.
    pub fn status_flags(&self) -> [char; 3] {
        [
            if self.has_ephemeris { 'E' } else { ' ' },
            if self.has_almanac { 'A' } else { ' ' },
            if self.used_in_fix { 'U' } else { ' ' },
        ]
    }

    pub fn status_flags_string(&self) -> String {
        self.status_flags().iter().collect()
    }
}

/// Current position fix, fed by the location stream.
#[derive(Debug, Clone, Default)]
pub struct FixData {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,   // meters
    pub accuracy: Option<f64>,   // meters
    pub speed: Option<f64>,      // m/s
    pub bearing: Option<f64>,    // degrees
    pub fix_time: Option<DateTime<Utc>>,
}

impl FixData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the data represents a valid position fix
    pub fn has_fix(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Merge another fix update into this one, keeping existing fields
    /// that the update leaves unset.
    pub fn merge(&mut self, update: &FixData) {
        if update.latitude.is_some() {
            self.latitude = update.latitude;
        }
        if update.longitude.is_some() {
            self.longitude = update.longitude;
        }
        if update.altitude.is_some() {
            self.altitude = update.altitude;
        }
        if update.accuracy.is_some() {
            self.accuracy = update.accuracy;
        }
        if update.speed.is_some() {
            self.speed = update.speed;
        }
        if update.bearing.is_some() {
            self.bearing = update.bearing;
        }
        if update.fix_time.is_some() {
            self.fix_time = update.fix_time;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Format coordinate for display
    pub fn format_coordinate(coord: Option<f64>) -> String {
        match coord {
            Some(val) => format!("{:>12.7}", val),
            None => "No fix".to_string(),
        }
    }

    /// Format value with unit for display
    pub fn format_value(value: Option<f64>, unit: &str) -> String {
        match value {
            Some(val) => format!("{:>10.1} {}", val, unit),
            None => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constellation_from_type_id() {
        assert_eq!(Constellation::from_type_id(1), Constellation::Gps);
        assert_eq!(Constellation::from_type_id(3), Constellation::Glonass);
        assert_eq!(Constellation::from_type_id(4), Constellation::Qzss);
        assert_eq!(Constellation::from_type_id(5), Constellation::Beidou);
        assert_eq!(Constellation::from_type_id(6), Constellation::Galileo);
        assert_eq!(Constellation::from_type_id(0), Constellation::Unknown);
        assert_eq!(Constellation::from_type_id(99), Constellation::Unknown);
    }

    #[test]
    fn test_constellation_from_prn() {
        assert_eq!(Constellation::from_prn(12), Constellation::Gps);
        assert_eq!(Constellation::from_prn(70), Constellation::Glonass);
        assert_eq!(Constellation::from_prn(195), Constellation::Qzss);
        assert_eq!(Constellation::from_prn(210), Constellation::Beidou);
        assert_eq!(Constellation::from_prn(310), Constellation::Galileo);
        assert_eq!(Constellation::from_prn(500), Constellation::Unknown);
    }

    #[test]
    fn test_status_flags_rendering() {
        let record = SatelliteRecord {
            svid: 7,
            constellation: Constellation::Gps,
            has_ephemeris: true,
            has_almanac: false,
            used_in_fix: true,
            ..Default::default()
        };
        assert_eq!(record.status_flags(), ['E', ' ', 'U']);
        assert_eq!(record.status_flags_string(), "E U");
    }

    #[test]
    fn test_status_flags_all_unset() {
        let record = SatelliteRecord::default();
        assert_eq!(record.status_flags_string(), "   ");
    }

    #[test]
    fn test_flag_icon_selector() {
        assert_eq!(Constellation::Gps.flag_icon(), Some("flag_usa"));
        assert_eq!(Constellation::Glonass.flag_icon(), Some("flag_russia"));
        assert_eq!(Constellation::Qzss.flag_icon(), Some("flag_japan"));
        assert_eq!(Constellation::Beidou.flag_icon(), Some("flag_china"));
        assert_eq!(Constellation::Galileo.flag_icon(), Some("flag_galileo"));
        assert_eq!(Constellation::Unknown.flag_icon(), None);
    }

    #[test]
    fn test_satellite_key_equality() {
        let a = SatelliteKey { svid: 5, constellation: Constellation::Gps };
        let b = SatelliteKey { svid: 5, constellation: Constellation::Gps };
        let c = SatelliteKey { svid: 5, constellation: Constellation::Glonass };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fix_merge_keeps_existing_fields() {
        let mut fix = FixData {
            latitude: Some(48.1),
            longitude: Some(11.5),
            altitude: Some(540.0),
            ..Default::default()
        };
        let update = FixData {
            latitude: Some(48.2),
            longitude: Some(11.6),
            speed: Some(1.5),
            ..Default::default()
        };
        fix.merge(&update);
        assert_eq!(fix.latitude, Some(48.2));
        assert_eq!(fix.speed, Some(1.5));
        // not present in the update, kept from before
        assert_eq!(fix.altitude, Some(540.0));
    }
}
