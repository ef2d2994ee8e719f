// src/monitor.rs
/// Main GNSS status monitor coordination

use crate::{
    display::terminal::TerminalDisplay,
    error::{Result, StatusError},
    feed::{gpsd, NmeaParser},
    gnss::{SatelliteRecord, SnapshotSource, StatusAggregator},
};
use log::{debug, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_serial::SerialPortBuilderExt;

/// GNSS data feed configuration
#[derive(Debug, Clone)]
pub enum FeedSource {
    Serial { port: String, baudrate: u32 },
    Gpsd { host: String, port: u16 },
}

impl FeedSource {
    /// Probe the source generation. Both wire feeds carry SNR inside the
    /// satellite report, so they are legacy-form; the tag is fixed for the
    /// session.
    pub fn snapshot_source(&self) -> SnapshotSource {
        match self {
            FeedSource::Serial { .. } | FeedSource::Gpsd { .. } => SnapshotSource::Legacy,
        }
    }
}

/// Coordinates a feed task, the shared aggregator, and the display
pub struct StatusMonitor {
    aggregator: Arc<RwLock<StatusAggregator>>,
    running: Arc<AtomicBool>,
}

impl StatusMonitor {
    /// Create a monitor for the given source. The aggregator's snapshot
    /// generation is probed here, once.
    pub fn new(source_kind: SnapshotSource) -> Self {
        Self {
            aggregator: Arc::new(RwLock::new(StatusAggregator::new(source_kind))),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Clone the monitor (shares aggregator and running flag)
    pub fn clone(&self) -> Self {
        Self {
            aggregator: Arc::clone(&self.aggregator),
            running: Arc::clone(&self.running),
        }
    }

    /// Start collecting from the specified source
    pub async fn start(&self, source: FeedSource) -> Result<()> {
        match source {
            FeedSource::Serial { port, baudrate } => {
                self.connect_serial(&port, baudrate).await?;
            }
            FeedSource::Gpsd { host, port } => {
                self.connect_gpsd(&host, port).await?;
            }
        }
        Ok(())
    }

    /// Start the terminal display
    pub async fn run_display(&self) -> Result<()> {
        let terminal_display = TerminalDisplay::new();
        terminal_display
            .run(Arc::clone(&self.aggregator), Arc::clone(&self.running))
            .await
    }

    /// Connect to a GNSS receiver via serial port (NMEA)
    async fn connect_serial(&self, port: &str, baudrate: u32) -> Result<()> {
        debug!("connecting to receiver on {} at {} baud", port, baudrate);

        let serial = tokio_serial::new(port, baudrate)
            .timeout(Duration::from_millis(1000))
            .open_native_async()
            .map_err(|e| {
                StatusError::Connection(format!("Failed to open serial port {}: {}", port, e))
            })?;

        let aggregator = Arc::clone(&self.aggregator);
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            let mut reader = BufReader::new(serial);
            let mut line = String::new();
            let mut parser = NmeaParser::new();

            while running.load(Ordering::Relaxed) {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break, // EOF
                    Ok(_) => {
                        let line = line.trim();
                        if !line.is_empty() {
                            match aggregator.write() {
                                Ok(mut agg) => parser.parse_sentence(&mut agg, line),
                                Err(_) => break,
                            }
                        }
                    }
                    Err(e) => {
                        warn!("error reading from serial port: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    /// Connect to gpsd daemon
    async fn connect_gpsd(&self, host: &str, port: u16) -> Result<()> {
        debug!("connecting to gpsd at {}:{}", host, port);

        let mut reader = gpsd::connect_gpsd(host, port).await?;

        let aggregator = Arc::clone(&self.aggregator);
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            let mut line = String::new();

            while running.load(Ordering::Relaxed) {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break, // EOF
                    Ok(_) => {
                        let line = line.trim();
                        if !line.is_empty() {
                            let result = match aggregator.write() {
                                Ok(mut agg) => gpsd::parse_gpsd_line(&mut agg, line),
                                Err(_) => break,
                            };
                            if let Err(e) = result {
                                warn!("error parsing gpsd JSON: {}", e);
                            }
                        }
                    }
                    Err(e) => {
                        warn!("error reading from gpsd: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    /// Stop the monitor: signals the session stop (which resets the table)
    /// and ends the feed and display loops.
    pub fn stop(&self) {
        if let Ok(mut agg) = self.aggregator.write() {
            agg.set_started(false);
        }
        self.running.store(false, Ordering::Relaxed);
    }

    /// Check if the monitor is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Take an immutable snapshot of the current satellite table
    pub fn table_snapshot(&self) -> Vec<SatelliteRecord> {
        match self.aggregator.read() {
            Ok(agg) => agg.table().to_vec(),
            Err(_) => Vec::new(),
        }
    }

    /// Shared access to the aggregator, for callers wiring their own
    /// change notifications or renderers.
    pub fn aggregator(&self) -> Arc<RwLock<StatusAggregator>> {
        Arc::clone(&self.aggregator)
    }
}

impl Default for StatusMonitor {
    fn default() -> Self {
        Self::new(SnapshotSource::Legacy)
    }
}

/// List available serial ports
pub async fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| StatusError::Other(format!("Failed to list serial ports: {}", e)))?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}
