//! Unified error types for the GPIO controller.
//!
//! A single `Error` enum that every layer converts into, keeping the
//! dispatch loop's error handling uniform. All variants are `Copy` so
//! they can be latched from interrupt callbacks and handed across
//! threads without allocation.

use core::fmt;

use crate::app::ports::{ChannelError, ConfigError};

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration could not be resolved or failed validation.
    Config(ConfigError),
    /// A GPIO resource could not be claimed or written.
    Hardware(HwError),
    /// The state stream or the outbound event channel failed.
    Channel(ChannelError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Channel(e) => write!(f, "channel: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Self::Hardware(e)
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

/// Failures raised by a [`GpioBackend`](crate::app::ports::GpioBackend)
/// or by the lamp table.  Pin numbers are BCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// The GPIO peripheral could not be opened (unknown board, no driver).
    Unavailable,
    /// The pin is already claimed by this process or another one.
    PinBusy(u8),
    /// The process may not open the GPIO peripheral at all
    /// (`/dev/gpiomem` not readable by this user).
    AccessDenied,
    /// The process lacks permission to access the pin.
    PermissionDenied(u8),
    /// The pin number does not exist on this board.
    InvalidPin(u8),
    /// Writing an output level failed.
    WriteFailed(u8),
    /// Registering the edge interrupt failed.
    InterruptFailed(u8),
    /// The fixed-capacity lamp or button table is full.
    TableFull,
    /// A lamp handle does not belong to this hardware instance.
    UnknownLamp,
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "GPIO peripheral unavailable"),
            Self::PinBusy(pin) => write!(f, "pin {pin} already in use"),
            Self::AccessDenied => write!(f, "GPIO access denied (check /dev/gpiomem permissions)"),
            Self::PermissionDenied(pin) => write!(f, "permission denied for pin {pin}"),
            Self::InvalidPin(pin) => write!(f, "pin {pin} does not exist"),
            Self::WriteFailed(pin) => write!(f, "write to pin {pin} failed"),
            Self::InterruptFailed(pin) => write!(f, "edge interrupt on pin {pin} failed"),
            Self::TableFull => write!(f, "pin table full"),
            Self::UnknownLamp => write!(f, "unknown lamp handle"),
        }
    }
}

impl std::error::Error for HwError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
