//! Inbound application states.
//!
//! The external state machine publishes one of these on every
//! transition.  Only [`State::Teardown`] carries a payload.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::events::TeardownReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Idle,
    Greeter,
    Countdown,
    Capture,
    Assemble,
    Review,
    Postprocess,
    Printing,
    Teardown(TeardownReason),
}

impl State {
    pub fn is_teardown(&self) -> bool {
        matches!(self, Self::Teardown(_))
    }
}

/// Error returned when a textual state name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStateError(pub String);

impl fmt::Display for ParseStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised state `{}`", self.0)
    }
}

impl std::error::Error for ParseStateError {}

impl FromStr for State {
    type Err = ParseStateError;

    /// Parse `idle`, `capture`, ... or `teardown [reason]`.  Case-insensitive;
    /// a bare `teardown` means [`TeardownReason::Exit`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let mut words = lower.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();
        let unknown = || ParseStateError(s.trim().to_owned());

        if words.next().is_some() {
            return Err(unknown());
        }

        let state = match (name, arg) {
            ("idle", None) => Self::Idle,
            ("greeter", None) => Self::Greeter,
            ("countdown", None) => Self::Countdown,
            ("capture", None) => Self::Capture,
            ("assemble", None) => Self::Assemble,
            ("review", None) => Self::Review,
            ("postprocess", None) => Self::Postprocess,
            ("printing", None) => Self::Printing,
            ("teardown", None) => Self::Teardown(TeardownReason::Exit),
            ("teardown", Some(reason)) => {
                Self::Teardown(TeardownReason::parse(reason).ok_or_else(unknown)?)
            }
            _ => return Err(unknown()),
        };
        Ok(state)
    }
}
