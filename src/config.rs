//! GPIO configuration (section `Gpio`).
//!
//! Resolved once at startup through a [`ConfigPort`] and validated before
//! any pin is claimed.  The serialised form uses the same keys as the
//! resolver, so a `Gpio` JSON object deserialises straight into
//! [`GpioConfig`].

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::pins::{BCM_MAX_PIN, PinRole};

/// Configuration section holding every key below.
pub const SECTION: &str = "Gpio";
/// Key of the master enable flag.
pub const ENABLE_KEY: &str = "enable";

/// BCM pin assignment for every [`PinRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinMap {
    #[serde(rename = "lamp_pin")]
    pub lamp: u8,
    #[serde(rename = "flash_pin")]
    pub flash: u8,
    #[serde(rename = "trigger_pin")]
    pub trigger: u8,
    #[serde(rename = "exit_pin")]
    pub exit: u8,
    #[serde(rename = "startover_pin")]
    pub startover_button: u8,
    #[serde(rename = "startover_led")]
    pub startover_lamp: u8,
    #[serde(rename = "print_pin")]
    pub print_button: u8,
    #[serde(rename = "print_led")]
    pub print_lamp: u8,
}

impl PinMap {
    pub fn get(&self, role: PinRole) -> u8 {
        match role {
            PinRole::Lamp => self.lamp,
            PinRole::Flash => self.flash,
            PinRole::Trigger => self.trigger,
            PinRole::Exit => self.exit,
            PinRole::StartoverButton => self.startover_button,
            PinRole::StartoverLamp => self.startover_lamp,
            PinRole::PrintButton => self.print_button,
            PinRole::PrintLamp => self.print_lamp,
        }
    }

    pub fn set(&mut self, role: PinRole, pin: u8) {
        let slot = match role {
            PinRole::Lamp => &mut self.lamp,
            PinRole::Flash => &mut self.flash,
            PinRole::Trigger => &mut self.trigger,
            PinRole::Exit => &mut self.exit,
            PinRole::StartoverButton => &mut self.startover_button,
            PinRole::StartoverLamp => &mut self.startover_lamp,
            PinRole::PrintButton => &mut self.print_button,
            PinRole::PrintLamp => &mut self.print_lamp,
        };
        *slot = pin;
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            lamp: 4,
            // BCM 18 carries hardware PWM0.
            flash: 18,
            trigger: 17,
            exit: 21,
            startover_button: 22,
            startover_lamp: 23,
            print_button: 24,
            print_lamp: 25,
        }
    }
}

/// Everything the controller reads from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    /// When false the controller never touches hardware.
    pub enable: bool,
    #[serde(flatten)]
    pub pins: PinMap,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            enable: false,
            pins: PinMap::default(),
        }
    }
}

impl GpioConfig {
    /// Resolve the configuration from `port`.
    ///
    /// Pin keys are only read when `enable` is set, so a disabled booth
    /// needs no pin configuration at all.
    pub fn from_port(port: &impl ConfigPort) -> Result<Self, ConfigError> {
        let enable = port.get_bool(SECTION, ENABLE_KEY)?;
        if !enable {
            return Ok(Self::default());
        }

        let mut pins = PinMap::default();
        for role in PinRole::ALL {
            let raw = port.get_int(SECTION, role.key())?;
            let pin = u8::try_from(raw).map_err(|_| ConfigError::OutOfRange(role.key()))?;
            pins.set(role, pin);
        }

        let config = Self { enable, pins };
        config.validate()?;
        Ok(config)
    }

    /// Reject pin numbers the header does not have and roles that share a pin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enable {
            return Ok(());
        }

        let mut seen: u32 = 0;
        for role in PinRole::ALL {
            let pin = self.pins.get(role);
            if pin > BCM_MAX_PIN {
                return Err(ConfigError::OutOfRange(role.key()));
            }
            let bit = 1u32 << pin;
            if seen & bit != 0 {
                return Err(ConfigError::DuplicatePin(role.key()));
            }
            seen |= bit;
        }
        Ok(())
    }
}
