//! Photobooth GPIO controller library.
//!
//! Bridges the booth's application state machine to buttons, indicator
//! lamps and a PWM flash.  Real Raspberry Pi access lives behind the
//! `rpi` feature; everything else builds and tests on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod drivers;
pub mod error;
pub mod pins;

pub use app::controller::GpioController;
pub use error::{Error, Result};
