// src/feed/nmea.rs
//! NMEA sentence parsing
//!
//! NMEA is a legacy-form source: GSV sentences carry SNR inline, so the
//! whole snapshot (including SNR) comes from the status stream. GSV groups
//! span several sentences per constellation; the parser accumulates the
//! group and hands the aggregator a complete snapshot when it closes.

use crate::gnss::{Constellation, FixData, SnapshotEntry, StatusAggregator};

const KNOTS_TO_MS: f64 = 0.514444;

/// Stateful NMEA parser, one per feed connection.
#[derive(Default)]
pub struct NmeaParser {
    satellites: Vec<SnapshotEntry>,
}

impl NmeaParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single NMEA sentence, feeding the aggregator as events
    /// complete.
    pub fn parse_sentence(&mut self, aggregator: &mut StatusAggregator, line: &str) {
        let parts: Vec<&str> = line.split(',').collect();

        if line.starts_with("$GPGGA") || line.starts_with("$GNGGA") {
            parse_gga(aggregator, &parts);
        } else if line.starts_with("$GPRMC") || line.starts_with("$GNRMC") {
            parse_rmc(aggregator, &parts);
        } else if line.starts_with("$GPGSV")
            || line.starts_with("$GLGSV")
            || line.starts_with("$GAGSV")
            || line.starts_with("$GBGSV")
            || line.starts_with("$GQGSV")
        {
            self.parse_gsv(aggregator, &parts, line);
        }
    }

    /// Parse GSV (Satellites in View), emitting a snapshot when the
    /// sentence group for this constellation completes.
    fn parse_gsv(&mut self, aggregator: &mut StatusAggregator, parts: &[&str], line: &str) {
        if parts.len() < 4 {
            return;
        }

        let constellation = if line.starts_with("$GPGSV") {
            Constellation::Gps
        } else if line.starts_with("$GLGSV") {
            Constellation::Glonass
        } else if line.starts_with("$GAGSV") {
            Constellation::Galileo
        } else if line.starts_with("$GBGSV") {
            Constellation::Beidou
        } else if line.starts_with("$GQGSV") {
            Constellation::Qzss
        } else {
            Constellation::Unknown
        };

        let total_messages = parts[1].parse::<u8>().unwrap_or(0);
        let message_num = parts[2].parse::<u8>().unwrap_or(0);

        // First message of a group replaces this constellation's entries
        if message_num == 1 {
            self.satellites.retain(|sat| sat.constellation != constellation);
        }

        // Up to 4 satellites per sentence
        let mut sat_index = 4;
        while sat_index + 3 < parts.len() {
            if let Ok(svid) = parts[sat_index].parse::<u16>() {
                let mut entry = SnapshotEntry {
                    svid,
                    constellation,
                    ..Default::default()
                };

                if let Ok(elevation) = parts[sat_index + 1].parse::<f32>() {
                    entry.elevation_deg = elevation;
                }
                if let Ok(azimuth) = parts[sat_index + 2].parse::<f32>() {
                    entry.azimuth_deg = azimuth;
                }
                // SNR may be empty (satellite in view but not tracked);
                // the field may also carry the sentence checksum
                let snr_str = parts[sat_index + 3]
                    .split('*')
                    .next()
                    .unwrap_or(parts[sat_index + 3]);
                entry.snr = snr_str.parse::<f32>().ok();

                self.satellites.push(entry);
            }

            sat_index += 4;
        }

        if message_num == total_messages {
            aggregator.ingest_snapshot(&self.satellites);
        }
    }
}

/// Parse GGA (fix data): position, altitude
fn parse_gga(aggregator: &mut StatusAggregator, parts: &[&str]) {
    if parts.len() < 15 {
        return;
    }

    let mut update = FixData::new();

    // Latitude (fields 2 and 3, ddmm.mmmm + hemisphere)
    if !parts[2].is_empty() && !parts[3].is_empty() {
        if let Ok(raw) = parts[2].parse::<f64>() {
            let degrees = (raw / 100.0).trunc();
            let minutes = raw % 100.0;
            let mut latitude = degrees + minutes / 60.0;
            if parts[3] == "S" {
                latitude = -latitude;
            }
            update.latitude = Some(latitude);
        }
    }

    // Longitude (fields 4 and 5)
    if !parts[4].is_empty() && !parts[5].is_empty() {
        if let Ok(raw) = parts[4].parse::<f64>() {
            let degrees = (raw / 100.0).trunc();
            let minutes = raw % 100.0;
            let mut longitude = degrees + minutes / 60.0;
            if parts[5] == "W" {
                longitude = -longitude;
            }
            update.longitude = Some(longitude);
        }
    }

    // Altitude (field 9)
    if !parts[9].is_empty() {
        if let Ok(altitude) = parts[9].parse::<f64>() {
            update.altitude = Some(altitude);
        }
    }

    update.fix_time = Some(chrono::Utc::now());
    aggregator.update_fix(&update);
}

/// Parse RMC (recommended minimum): speed and course
fn parse_rmc(aggregator: &mut StatusAggregator, parts: &[&str]) {
    if parts.len() < 10 {
        return;
    }

    let mut update = FixData::new();

    // Speed over ground in knots (field 7)
    if !parts[7].is_empty() {
        if let Ok(speed_knots) = parts[7].parse::<f64>() {
            update.speed = Some(speed_knots * KNOTS_TO_MS);
        }
    }

    // Course over ground in degrees (field 8)
    if !parts[8].is_empty() {
        if let Ok(course) = parts[8].parse::<f64>() {
            update.bearing = Some(course);
        }
    }

    aggregator.update_fix(&update);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnss::SnapshotSource;

    fn aggregator() -> StatusAggregator {
        StatusAggregator::new(SnapshotSource::Legacy)
    }

    #[test]
    fn test_gga_parsing() {
        let mut agg = aggregator();
        let mut parser = NmeaParser::new();
        let gga = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";

        parser.parse_sentence(&mut agg, gga);

        assert!(agg.fix().has_fix());
        assert!((agg.fix().latitude.unwrap() - 48.1173).abs() < 0.0001);
        assert!((agg.fix().longitude.unwrap() - 11.5167).abs() < 0.0001);
        assert_eq!(agg.fix().altitude, Some(545.4));
    }

    #[test]
    fn test_rmc_parsing() {
        let mut agg = aggregator();
        let mut parser = NmeaParser::new();
        let rmc = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";

        parser.parse_sentence(&mut agg, rmc);

        // Speed converted from knots to m/s
        assert!((agg.fix().speed.unwrap() - 11.52).abs() < 0.01);
        assert_eq!(agg.fix().bearing, Some(84.4));
    }

    #[test]
    fn test_gsv_single_message_snapshot() {
        let mut agg = aggregator();
        let mut parser = NmeaParser::new();
        let gsv = "$GPGSV,1,1,04,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75";

        parser.parse_sentence(&mut agg, gsv);

        assert_eq!(agg.table().len(), 4);
        assert_eq!(agg.table()[0].svid, 1);
        assert_eq!(agg.table()[0].constellation, Constellation::Gps);
        assert_eq!(agg.table()[0].elevation_deg, 40.0);
        assert_eq!(agg.table()[0].azimuth_deg, 83.0);
        assert_eq!(agg.table()[0].snr, 46.0);
    }

    #[test]
    fn test_gsv_group_emits_once_complete() {
        let mut agg = aggregator();
        let mut parser = NmeaParser::new();

        parser.parse_sentence(
            &mut agg,
            "$GPGSV,2,1,08,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75",
        );
        // Group not complete yet, no snapshot ingested
        assert!(agg.table().is_empty());

        parser.parse_sentence(
            &mut agg,
            "$GPGSV,2,2,08,18,09,113,38,22,52,042,44,24,31,089,40,27,83,270,47*71",
        );
        assert_eq!(agg.table().len(), 8);
    }

    #[test]
    fn test_gsv_replaces_constellation_on_new_group() {
        let mut agg = aggregator();
        let mut parser = NmeaParser::new();

        parser.parse_sentence(
            &mut agg,
            "$GPGSV,1,1,04,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75",
        );
        parser.parse_sentence(&mut agg, "$GLGSV,1,1,02,65,30,100,33,66,45,200,28*60");
        // GPS group + GLONASS group
        assert_eq!(agg.table().len(), 6);

        // A fresh, smaller GPS group replaces only the GPS entries
        parser.parse_sentence(&mut agg, "$GPGSV,1,1,02,01,41,084,47,02,18,309,42*7B");
        assert_eq!(agg.table().len(), 4);
        let glonass_count = agg
            .table()
            .iter()
            .filter(|sat| sat.constellation == Constellation::Glonass)
            .count();
        assert_eq!(glonass_count, 2);
    }

    #[test]
    fn test_gsv_empty_snr_field() {
        let mut agg = aggregator();
        let mut parser = NmeaParser::new();
        // Last satellite in view but not tracked: SNR field empty
        let gsv = "$GPGSV,1,1,02,01,40,083,46,02,17,308,*79";

        parser.parse_sentence(&mut agg, gsv);

        assert_eq!(agg.table().len(), 2);
        assert_eq!(agg.table()[0].snr, 46.0);
        assert_eq!(agg.table()[1].snr, 0.0);
    }

    #[test]
    fn test_invalid_sentence() {
        let mut agg = aggregator();
        let mut parser = NmeaParser::new();

        parser.parse_sentence(&mut agg, "$INVALID,123,456");

        assert!(!agg.fix().has_fix());
        assert!(agg.table().is_empty());
    }
}
