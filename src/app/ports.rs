//! Port traits: the boundary between the controller and the outside world.
//!
//! ```text
//!   ConfigPort ──▶ ┌────────────────┐ ──▶ EventSender (master)
//!  StateSource ──▶ │ GpioController │
//!                  └───────┬────────┘
//!                          ▼
//!                     GpioBackend ──▶ pins, edge interrupts, PWM
//! ```
//!
//! Adapters implement these traits.  The controller consumes them via
//! generics, so it never names a concrete GPIO library or transport.

use embedded_hal::digital::StatefulOutputPin;

use crate::drivers::flash::PwmDriver;
use crate::error::HwError;

use super::events::{AppEvent, Worker};
use super::states::State;

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Typed lookups into a sectioned configuration store.
pub trait ConfigPort {
    fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError>;

    fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Channel ports
// ───────────────────────────────────────────────────────────────

/// Inbound side of the state stream.
pub trait StateSource {
    /// Block until the state machine publishes its next state.
    fn recv_state(&mut self) -> Result<State, ChannelError>;
}

/// Outbound side: deliver an event to another worker.
///
/// Called from button interrupt threads, hence `Sync`.
pub trait EventSender: Send + Sync + 'static {
    fn send(&self, target: Worker, event: AppEvent) -> Result<(), ChannelError>;
}

// ───────────────────────────────────────────────────────────────
// GPIO backend port
// ───────────────────────────────────────────────────────────────

/// Handler invoked on every falling edge of a watched input.
pub type PressHandler = Box<dyn FnMut() + Send + 'static>;

/// Claims physical pins.
///
/// Every returned handle owns its pin; dropping it releases the pin.
pub trait GpioBackend: Send {
    /// Binary output, initially low.
    type Output: StatefulOutputPin + Send;
    /// Keeps an edge-watched input (and its interrupt) alive.
    type Input: Send;
    /// Flash driver.
    type Pwm: PwmDriver + Send;

    fn claim_output(&mut self, pin: u8) -> Result<Self::Output, HwError>;

    /// Configure `pin` as a pulled-up input and call `handler` on each
    /// falling edge (button press).  No debounce is applied.
    fn watch_falling(&mut self, pin: u8, handler: PressHandler) -> Result<Self::Input, HwError>;

    /// Configure `pin` for PWM.  Never fails: a broken PWM path only
    /// degrades the flash.
    fn claim_pwm(&mut self, pin: u8) -> Self::Pwm;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] lookups and config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The key is absent and has no built-in default.
    Missing,
    /// The key exists but holds a value of the wrong type.
    WrongType,
    /// The value does not fit the named key's range.
    OutOfRange(&'static str),
    /// The named key reuses a pin already assigned to another role.
    DuplicatePin(&'static str),
    /// The backing document could not be parsed.
    Corrupted,
    /// The backing file could not be read.
    IoError,
}

/// Errors from the state stream and the outbound event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The peer hung up; no further states or events can flow.
    Closed,
    /// The outbound queue is full.
    Full,
    /// The underlying transport failed.
    Io,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Missing => write!(f, "key missing"),
            Self::WrongType => write!(f, "value has wrong type"),
            Self::OutOfRange(key) => write!(f, "{} out of range", key),
            Self::DuplicatePin(key) => write!(f, "{} reuses an assigned pin", key),
            Self::Corrupted => write!(f, "config document corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Closed => write!(f, "channel closed"),
            Self::Full => write!(f, "channel full"),
            Self::Io => write!(f, "channel I/O error"),
        }
    }
}

impl std::error::Error for ChannelError {}
