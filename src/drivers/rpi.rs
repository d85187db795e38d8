//! Raspberry Pi GPIO backend (`rpi` feature).
//!
//! Buttons are pulled-up inputs with an asynchronous falling-edge
//! interrupt; rppal runs each callback on its own interrupt thread.
//! Lamps are rppal output pins used through their `embedded-hal` impls.
//! The flash goes through the WiringPi `gpio` utility, since rppal's
//! software PWM cannot reproduce the mark-space hardware setup.

use log::error;
use rppal::gpio::{self, Gpio, InputPin, OutputPin, Trigger};

use crate::app::ports::{GpioBackend, PressHandler};
use crate::drivers::flash::{ProcessRunner, UtilityPwm};
use crate::error::HwError;

pub struct RppalBackend {
    gpio: Gpio,
}

impl RppalBackend {
    /// Open the GPIO peripheral.
    pub fn new() -> Result<Self, HwError> {
        let gpio = Gpio::new().map_err(|e| map_error(None, &e))?;
        Ok(Self { gpio })
    }

    fn pin(&self, pin: u8) -> Result<gpio::Pin, HwError> {
        self.gpio.get(pin).map_err(|e| map_error(Some(pin), &e))
    }
}

impl GpioBackend for RppalBackend {
    type Output = OutputPin;
    type Input = InputPin;
    type Pwm = UtilityPwm<ProcessRunner>;

    fn claim_output(&mut self, pin: u8) -> Result<OutputPin, HwError> {
        Ok(self.pin(pin)?.into_output_low())
    }

    fn watch_falling(&mut self, pin: u8, mut handler: PressHandler) -> Result<InputPin, HwError> {
        let mut input = self.pin(pin)?.into_input_pullup();
        input
            .set_async_interrupt(Trigger::FallingEdge, None, move |_event| handler())
            .map_err(|_| HwError::InterruptFailed(pin))?;
        Ok(input)
    }

    fn claim_pwm(&mut self, pin: u8) -> UtilityPwm<ProcessRunner> {
        UtilityPwm::setup(pin, ProcessRunner::new())
    }
}

fn map_error(pin: Option<u8>, e: &gpio::Error) -> HwError {
    error!("gpio: {}", e);
    match (e, pin) {
        (gpio::Error::PinUsed(p) | gpio::Error::PinNotAvailable(p), _) => HwError::PinBusy(*p),
        (gpio::Error::PermissionDenied(_), Some(p)) => HwError::PermissionDenied(p),
        (gpio::Error::PermissionDenied(_), None) => HwError::AccessDenied,
        _ => HwError::Unavailable,
    }
}
