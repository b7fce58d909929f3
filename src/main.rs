//! RayOS Gesture - Phase 2b: The Hands
//!
//! Main entry point for the gesture controller.
//! This application:
//! - Receives hand landmarks from an external pose estimator
//! - Recognizes held poses, swipes and two-hand gestures
//! - Drives the pointer with the index finger
//! - Fires desktop actions (tones, browser, tabs, screenshots)

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use rayos_gesture::actions::{ActionSurface, DesktopActions, DryRunSurface};
use rayos_gesture::vision::{udp_hands_addr_from_env, FrameSource};
use rayos_gesture::{GestureConfig, GestureController};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Frames buffered between the source task and the frame loop
const FRAME_QUEUE: usize = 64;

#[derive(Parser)]
#[command(name = "rayos-gesture")]
#[command(about = "RayOS Gesture - hand landmarks to desktop actions", long_about = None)]
struct Cli {
    /// Path to configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen for landmark frames on this UDP address
    #[arg(long, value_name = "ADDR", conflicts_with_all = ["replay", "stdin"])]
    udp: Option<SocketAddr>,

    /// Replay a JSON-lines file of recorded frames
    #[arg(long, value_name = "FILE", conflicts_with = "stdin")]
    replay: Option<PathBuf>,

    /// Replay rate in frames per second
    #[arg(long, default_value = "30", requires = "replay")]
    fps: f32,

    /// Read JSON-lines frames from stdin
    #[arg(long)]
    stdin: bool,

    /// Log actions instead of performing them
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn frame_source(&self) -> Result<FrameSource> {
        if let Some(addr) = self.udp {
            return Ok(FrameSource::Udp(addr));
        }
        if let Some(ref path) = self.replay {
            return Ok(FrameSource::Replay {
                path: path.clone(),
                fps: self.fps,
            });
        }
        if self.stdin {
            return Ok(FrameSource::Stdin);
        }
        match udp_hands_addr_from_env() {
            Some(addr) => Ok(FrameSource::Udp(addr)),
            None => bail!(
                "no frame source: pass --udp, --replay or --stdin, or set {}",
                rayos_gesture::vision::source::UDP_ADDR_ENV
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    log::info!("═══════════════════════════════════════");
    log::info!("  RayOS Gesture - Phase 2b: The Hands");
    log::info!("═══════════════════════════════════════");

    let config = match cli.config {
        Some(ref path) => GestureConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            log::info!("No config file given, using defaults");
            GestureConfig::default()
        }
    };

    let source = cli.frame_source()?;

    let surface: Box<dyn ActionSurface> = if cli.dry_run {
        log::info!("Dry run: actions are logged, not performed");
        let screen = config.screen_width.zip(config.screen_height);
        Box::new(DryRunSurface::new(screen))
    } else {
        Box::new(DesktopActions::new(&config, tokio::runtime::Handle::current()))
    };

    let mut controller = GestureController::new(config, surface);

    let (frame_tx, frame_rx) = tokio::sync::mpsc::channel(FRAME_QUEUE);
    source
        .spawn(frame_tx)
        .await
        .context("starting frame source")?;

    // Set up Ctrl+C handler
    let (stop_tx, stop_rx) = tokio::sync::mpsc::channel::<()>(1);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal...");
        let _ = stop_tx.blocking_send(());
    })?;

    log::info!("Gesture controller running. Press Ctrl+C to exit");
    log::info!("───────────────────────────────────────");

    if let Err(e) = controller.run(frame_rx, stop_rx).await {
        log::error!("Frame loop error: {}", e);
    }

    controller.shutdown().await?;

    log::info!("Gesture controller shutdown complete. Goodbye!");
    Ok(())
}
