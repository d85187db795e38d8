//! Photobooth GPIO worker, standalone entry point.
//!
//! ```text
//!  stdin (one state per line) ──▶ GpioController ──▶ stdout (JSON events)
//!                                      │
//!                                      ▼
//!                          RppalBackend / SimBackend
//! ```
//!
//! Usage: `photobooth-gpio [config.json]`.  Logs go to stderr; set
//! `RUST_LOG=debug` to see every lamp and flash write.

use std::io;
use std::thread;

use anyhow::{Context, Result, anyhow};
use log::info;
use tracing_subscriber::EnvFilter;

use photobooth_gpio::GpioController;
use photobooth_gpio::adapters::json_config::JsonConfig;
use photobooth_gpio::adapters::stdio::{JsonLinesEvents, LineStates};
use photobooth_gpio::config::GpioConfig;
use photobooth_gpio::error::HwError;

#[cfg(feature = "rpi")]
use photobooth_gpio::drivers::rpi::RppalBackend as Backend;
#[cfg(not(feature = "rpi"))]
use photobooth_gpio::drivers::sim::SimBackend as Backend;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    info!("photobooth-gpio v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let port = match std::env::args().nth(1) {
        Some(path) => JsonConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => {
            info!("no config file given, using defaults");
            JsonConfig::empty()
        }
    };
    let config = GpioConfig::from_port(&port).context("resolving [Gpio] config")?;

    // ── 3. Controller ─────────────────────────────────────────
    let events = JsonLinesEvents::new(io::stdout());
    let mut controller = GpioController::new(config, open_backend, events)
        .context("GPIO setup failed; fix the wiring or set Gpio.enable=false")?;

    // ── 4. Dispatch loop on its own thread ────────────────────
    let worker = thread::Builder::new()
        .name("gpio".into())
        .spawn(move || {
            let mut states = LineStates::new(io::stdin().lock());
            controller.run(&mut states)
        })
        .context("spawning GPIO worker")?;

    worker
        .join()
        .map_err(|_| anyhow!("GPIO worker panicked"))?
        .context("GPIO worker failed")?;

    info!("bye");
    Ok(())
}

#[cfg(feature = "rpi")]
fn open_backend() -> Result<Backend, HwError> {
    Backend::new()
}

#[cfg(not(feature = "rpi"))]
fn open_backend() -> Result<Backend, HwError> {
    Ok(Backend::new())
}
