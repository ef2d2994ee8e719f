// src/main.rs
//! GNSS Status Monitor - live satellite status table in the terminal

use clap::{Parser, Subcommand};
use gnss_status::{
    config::MonitorConfig,
    error::{Result, StatusError},
    monitor::{self, FeedSource, StatusMonitor},
};
use log::info;

#[derive(Parser)]
#[command(name = "gnss-status", about = "Live GNSS satellite status monitor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Save the selected source as the default
    #[arg(long)]
    save: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Read from a gpsd daemon
    Gpsd {
        #[arg(long, default_value = "localhost")]
        host: String,
        #[arg(long, default_value_t = 2947)]
        port: u16,
    },
    /// Read NMEA from a serial receiver
    Serial {
        /// Serial device path, e.g. /dev/ttyUSB0
        port: String,
        #[arg(long, default_value_t = 9600)]
        baudrate: u32,
    },
    /// List available serial ports
    ListPorts,
}

fn source_from_config(config: &MonitorConfig) -> Result<FeedSource> {
    match config.source_type.as_str() {
        "serial" => {
            let port = config
                .serial_port
                .clone()
                .ok_or_else(|| StatusError::Config("no serial port configured".to_string()))?;
            Ok(FeedSource::Serial {
                port,
                baudrate: config.serial_baudrate.unwrap_or(9600),
            })
        }
        _ => Ok(FeedSource::Gpsd {
            host: config
                .gpsd_host
                .clone()
                .unwrap_or_else(|| "localhost".to_string()),
            port: config.gpsd_port.unwrap_or(2947),
        }),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = MonitorConfig::load().unwrap_or_default();

    let source = match cli.command {
        Some(Command::Gpsd { host, port }) => {
            config.update_gpsd(host.clone(), port);
            FeedSource::Gpsd { host, port }
        }
        Some(Command::Serial { port, baudrate }) => {
            config.update_serial(port.clone(), baudrate);
            FeedSource::Serial { port, baudrate }
        }
        Some(Command::ListPorts) => {
            return monitor::list_serial_ports().await;
        }
        None => source_from_config(&config)?,
    };

    if cli.save {
        config.save()?;
    }

    info!("starting monitor with source {:?}", source);

    let monitor = StatusMonitor::new(source.snapshot_source());
    monitor.start(source).await?;
    monitor.run_display().await
}
