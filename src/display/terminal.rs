// src/display/terminal.rs
//! Terminal-based display implementation

use crate::{
    display,
    error::{Result, StatusError},
    gnss::{FixData, SessionState, StatusAggregator},
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::time::sleep;

pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    /// Start the terminal display loop. Pull model: the full table is
    /// re-read from the shared aggregator on every refresh.
    pub async fn run(
        &self,
        aggregator: Arc<RwLock<StatusAggregator>>,
        running: Arc<AtomicBool>,
    ) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, DisableLineWrap).map_err(StatusError::Io)?;

        // Set up Ctrl+C handler
        let running_clone = Arc::clone(&running);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                running_clone.store(false, Ordering::Relaxed);
            }
        });

        while running.load(Ordering::Relaxed) {
            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)).map_err(StatusError::Io)?;

            let (fix, session, ttff_ms, rows) = {
                let agg = aggregator
                    .read()
                    .map_err(|_| StatusError::Other("aggregator lock poisoned".to_string()))?;
                (
                    agg.fix().clone(),
                    agg.session(),
                    agg.time_to_first_fix().map(|d| d.num_milliseconds()),
                    display::table_rows(agg.table()),
                )
            };
            self.render_display(&mut stdout, &fix, session, ttff_ms, &rows)?;

            stdout.flush().map_err(StatusError::Io)?;
            sleep(Duration::from_secs(1)).await;
        }

        execute!(stdout, Show, EnableLineWrap).map_err(StatusError::Io)?;
        println!("\nShutting down...");
        Ok(())
    }

    fn render_display(
        &self,
        stdout: &mut impl Write,
        fix: &FixData,
        session: SessionState,
        ttff_ms: Option<i64>,
        rows: &[[String; display::COLUMN_COUNT]],
    ) -> Result<()> {
        // Header
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("GNSS Status Monitor"),
            Print("\n"),
            Print("=".repeat(60)),
            Print("\n"),
            ResetColor
        )
        .map_err(StatusError::Io)?;

        let state = match session {
            SessionState::Started => "acquiring",
            SessionState::Stopped => "stopped",
        };
        execute!(stdout, Print(format!("Session: {}\n\n", state))).map_err(StatusError::Io)?;

        self.render_fix_section(stdout, fix, ttff_ms)?;
        self.render_satellite_section(stdout, rows)?;

        // Footer
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("Press Ctrl+C to exit"),
            Print("\n"),
            ResetColor
        )
        .map_err(StatusError::Io)?;

        Ok(())
    }

    fn render_fix_section(
        &self,
        stdout: &mut impl Write,
        fix: &FixData,
        ttff_ms: Option<i64>,
    ) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("POSITION:\n"),
            ResetColor
        )
        .map_err(StatusError::Io)?;

        execute!(
            stdout,
            Print(format!("  Latitude:  {}\n", FixData::format_coordinate(fix.latitude))),
            Print(format!("  Longitude: {}\n", FixData::format_coordinate(fix.longitude))),
            Print(format!("  Altitude:  {}\n", FixData::format_value(fix.altitude, "m"))),
            Print(format!("  Speed:     {}\n", FixData::format_value(fix.speed, "m/s"))),
            Print(format!("  Bearing:   {}\n", FixData::format_value(fix.bearing, "deg")))
        )
        .map_err(StatusError::Io)?;

        if let Some(acc) = fix.accuracy {
            execute!(stdout, Print(format!("  Accuracy:  {:>10.1} m\n", acc)))
                .map_err(StatusError::Io)?;
        }

        if let Some(fix_time) = fix.fix_time {
            execute!(
                stdout,
                Print(format!("  Fix time:  {}\n", fix_time.format("%Y-%m-%d %H:%M:%S UTC")))
            )
            .map_err(StatusError::Io)?;
        }

        if let Some(ttff) = ttff_ms {
            execute!(stdout, Print(format!("  TTFF:      {:>10} ms\n", ttff)))
                .map_err(StatusError::Io)?;
        }

        execute!(stdout, Print("\n")).map_err(StatusError::Io)?;
        Ok(())
    }

    fn render_satellite_section(
        &self,
        stdout: &mut impl Write,
        rows: &[[String; display::COLUMN_COUNT]],
    ) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Magenta),
            Print(format!("SATELLITES ({}):\n", rows.len().saturating_sub(1))),
            ResetColor
        )
        .map_err(StatusError::Io)?;

        for (i, row) in rows.iter().enumerate() {
            let line = format!(
                "  {:>4} {:<8} {:>6} {:>6} {:>6}  {}\n",
                row[display::ID_COLUMN],
                row[display::FLAG_COLUMN],
                row[display::SNR_COLUMN],
                row[display::ELEVATION_COLUMN],
                row[display::AZIMUTH_COLUMN],
                row[display::FLAGS_COLUMN],
            );
            if i == 0 {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Cyan),
                    Print(line),
                    ResetColor
                )
                .map_err(StatusError::Io)?;
            } else {
                execute!(stdout, Print(line)).map_err(StatusError::Io)?;
            }
        }

        execute!(stdout, Print("\n")).map_err(StatusError::Io)?;
        Ok(())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}
