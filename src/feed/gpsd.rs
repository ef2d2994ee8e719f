// src/feed/gpsd.rs
//! gpsd client implementation
//!
//! gpsd is a legacy-form source: SKY reports carry per-satellite signal
//! strength inline, so each SKY message maps to one complete snapshot.

use crate::error::{Result, StatusError};
use crate::gnss::{Constellation, FixData, SnapshotEntry, StatusAggregator};
use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::TcpStream,
};

#[derive(Debug, Deserialize)]
struct GpsdMessage {
    class: String,
    #[serde(flatten)]
    data: HashMap<String, serde_json::Value>,
}

/// Connect to a gpsd daemon and return a stream reader
pub async fn connect_gpsd(host: &str, port: u16) -> Result<BufReader<TcpStream>> {
    let mut stream = TcpStream::connect(format!("{}:{}", host, port))
        .await
        .map_err(|e| {
            StatusError::Connection(format!(
                "Failed to connect to gpsd at {}:{}: {}",
                host, port, e
            ))
        })?;

    // Send WATCH command to start receiving JSON data
    let watch_cmd = "?WATCH={\"enable\":true,\"json\":true}\n";
    stream
        .write_all(watch_cmd.as_bytes())
        .await
        .map_err(|e| StatusError::Connection(format!("Failed to send WATCH command: {}", e)))?;

    Ok(BufReader::new(stream))
}

/// Parse a single line of gpsd JSON, feeding the aggregator
pub fn parse_gpsd_line(aggregator: &mut StatusAggregator, line: &str) -> Result<()> {
    let msg: GpsdMessage = serde_json::from_str(line)
        .map_err(|e| StatusError::Parse(format!("Failed to parse gpsd JSON: {}", e)))?;

    match msg.class.as_str() {
        "TPV" => parse_tpv_message(aggregator, &msg.data),
        "SKY" => parse_sky_message(aggregator, &msg.data),
        "VERSION" => parse_version_message(&msg.data),
        "DEVICES" => parse_devices_message(&msg.data),
        _ => {
            // Ignore unknown message types
        }
    }

    Ok(())
}

/// Parse TPV (Time Position Velocity) into a fix update
fn parse_tpv_message(aggregator: &mut StatusAggregator, msg_data: &HashMap<String, serde_json::Value>) {
    let mut update = FixData::new();

    if let Some(lat) = msg_data.get("lat").and_then(|v| v.as_f64()) {
        update.latitude = Some(lat);
    }

    if let Some(lon) = msg_data.get("lon").and_then(|v| v.as_f64()) {
        update.longitude = Some(lon);
    }

    if let Some(alt) = msg_data.get("alt").and_then(|v| v.as_f64()) {
        update.altitude = Some(alt);
    }

    if let Some(speed) = msg_data.get("speed").and_then(|v| v.as_f64()) {
        update.speed = Some(speed); // already m/s
    }

    if let Some(track) = msg_data.get("track").and_then(|v| v.as_f64()) {
        update.bearing = Some(track);
    }

    if let Some(eph) = msg_data.get("eph").and_then(|v| v.as_f64()) {
        update.accuracy = Some(eph);
    }

    if let Some(time) = msg_data.get("time").and_then(|v| v.as_str()) {
        if let Ok(fix_time) = time.parse::<DateTime<Utc>>() {
            update.fix_time = Some(fix_time);
        }
    }

    aggregator.update_fix(&update);
}

/// Parse SKY (satellite report) into one snapshot event
fn parse_sky_message(aggregator: &mut StatusAggregator, msg_data: &HashMap<String, serde_json::Value>) {
    if let Some(satellites) = msg_data.get("satellites").and_then(|v| v.as_array()) {
        let mut entries = Vec::with_capacity(satellites.len());

        for sat_value in satellites {
            if let Some(sat_obj) = sat_value.as_object() {
                if let Some(prn) = sat_obj.get("PRN").and_then(|v| v.as_u64()) {
                    let svid = prn as u16;
                    let mut entry = SnapshotEntry {
                        svid,
                        constellation: Constellation::from_prn(svid),
                        ..Default::default()
                    };

                    if let Some(el) = sat_obj.get("el").and_then(|v| v.as_f64()) {
                        entry.elevation_deg = el as f32;
                    }

                    if let Some(az) = sat_obj.get("az").and_then(|v| v.as_f64()) {
                        entry.azimuth_deg = az as f32;
                    }

                    if let Some(ss) = sat_obj.get("ss").and_then(|v| v.as_f64()) {
                        entry.snr = Some(ss as f32);
                    }

                    if let Some(used) = sat_obj.get("used").and_then(|v| v.as_bool()) {
                        entry.used_in_fix = used;
                    }

                    entries.push(entry);
                }
            }
        }

        aggregator.ingest_snapshot(&entries);
    }
}

/// VERSION message (informational)
fn parse_version_message(msg_data: &HashMap<String, serde_json::Value>) {
    if let Some(version) = msg_data.get("release").and_then(|v| v.as_str()) {
        info!("connected to gpsd version {}", version);
    }
}

/// DEVICES message (informational)
fn parse_devices_message(msg_data: &HashMap<String, serde_json::Value>) {
    if let Some(devices) = msg_data.get("devices").and_then(|v| v.as_array()) {
        info!("gpsd managing {} device(s)", devices.len());
        for device in devices {
            if let Some(path) = device.get("path").and_then(|v| v.as_str()) {
                info!("  device: {}", path);
            }
        }
    }
}
