//! Outbound application events.
//!
//! Button presses become these events and are delivered through the
//! [`EventSender`](super::ports::EventSender) port to the master worker,
//! which owns the application state machine.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Addressable workers of the booth application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Worker {
    /// Owner of the application state machine.
    Master,
    Gui,
    Camera,
    Gpio,
    Postprocess,
}

/// Why the application is asked to tear down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownReason {
    /// Quit the application.
    Exit,
    /// Return to the welcome screen.
    Welcome,
    /// Power off the machine.
    Shutdown,
    /// Reboot the machine.
    Reboot,
}

impl TeardownReason {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exit" => Some(Self::Exit),
            "welcome" => Some(Self::Welcome),
            "shutdown" => Some(Self::Shutdown),
            "reboot" => Some(Self::Reboot),
            _ => None,
        }
    }
}

impl fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exit => "exit",
            Self::Welcome => "welcome",
            Self::Shutdown => "shutdown",
            Self::Reboot => "reboot",
        };
        f.write_str(name)
    }
}

/// Events the controller sends to [`Worker::Master`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppEvent {
    /// Capture trigger pressed while armed.
    Trigger,
    /// Print button pressed.
    Print,
    /// Start-over button pressed: return to idle.
    Idle,
    /// Exit button pressed.
    Teardown(TeardownReason),
}
