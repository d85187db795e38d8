//! In-memory GPIO backend.
//!
//! Used when the crate is built without the `rpi` feature: outputs track
//! their level in memory, inputs never fire, and flash levels are only
//! logged.  Double claims are still rejected so that pin-map mistakes
//! surface on a workstation too.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use log::info;

use crate::app::ports::{GpioBackend, PressHandler};
use crate::drivers::flash::{FlashLevel, PwmDriver};
use crate::error::HwError;
use crate::pins::BCM_MAX_PIN;

/// Simulated output pin.
#[derive(Debug)]
pub struct SimPin {
    pin: u8,
    high: bool,
}

impl SimPin {
    pub fn new(pin: u8) -> Self {
        Self { pin, high: false }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

/// Simulated button; keeps its handler alive but never calls it.
pub struct SimButton {
    pin: u8,
    _handler: PressHandler,
}

impl SimButton {
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

/// Simulated flash; records the level only.
#[derive(Debug)]
pub struct SimPwm {
    pin: u8,
    level: FlashLevel,
}

impl PwmDriver for SimPwm {
    fn set_duty(&mut self, level: FlashLevel) {
        info!("flash(sim): BCM {} duty {}", self.pin, level.duty());
        self.level = level;
    }

    fn level(&self) -> FlashLevel {
        self.level
    }
}

/// Backend that claims pins in memory.
#[derive(Debug, Default)]
pub struct SimBackend {
    claimed: u32,
}

impl SimBackend {
    pub fn new() -> Self {
        Self { claimed: 0 }
    }

    pub fn is_claimed(&self, pin: u8) -> bool {
        pin <= BCM_MAX_PIN && self.claimed & (1 << pin) != 0
    }

    fn claim(&mut self, pin: u8) -> Result<(), HwError> {
        if pin > BCM_MAX_PIN {
            return Err(HwError::InvalidPin(pin));
        }
        if self.is_claimed(pin) {
            return Err(HwError::PinBusy(pin));
        }
        self.claimed |= 1 << pin;
        Ok(())
    }
}

impl GpioBackend for SimBackend {
    type Output = SimPin;
    type Input = SimButton;
    type Pwm = SimPwm;

    fn claim_output(&mut self, pin: u8) -> Result<SimPin, HwError> {
        self.claim(pin)?;
        Ok(SimPin::new(pin))
    }

    fn watch_falling(&mut self, pin: u8, handler: PressHandler) -> Result<SimButton, HwError> {
        self.claim(pin)?;
        Ok(SimButton {
            pin,
            _handler: handler,
        })
    }

    fn claim_pwm(&mut self, pin: u8) -> SimPwm {
        // Both the hardware PWM and WiringPi paths tolerate a re-claim,
        // so a busy pin is only logged here.
        if let Err(e) = self.claim(pin) {
            info!("flash(sim): {}", e);
        }
        SimPwm {
            pin,
            level: FlashLevel::Off,
        }
    }
}
