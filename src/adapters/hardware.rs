//! Hardware abstraction. Owns every claimed pin.
//!
//! Wraps a [`GpioBackend`] and keeps the handles it returns: watched
//! buttons, the lamp table and the single flash output.  This is the only
//! module that writes outputs; it knows nothing about application states.
//!
//! Dropping a [`Hardware`] releases all pins and interrupts, so a setup
//! that fails halfway leaves nothing claimed.

use heapless::Vec;
use log::debug;

use crate::app::ports::GpioBackend;
use crate::drivers::flash::{FlashLevel, PwmDriver};
use crate::drivers::lamp::{LampBank, LampId};
use crate::error::HwError;

/// Most buttons a single [`Hardware`] can watch.
pub const MAX_BUTTONS: usize = 8;

/// Handle to the configured flash output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashId(u8);

impl FlashId {
    pub fn pin(self) -> u8 {
        self.0
    }
}

struct Button<I> {
    pin: u8,
    _input: I,
}

struct Flash<P> {
    pin: u8,
    driver: P,
}

pub struct Hardware<B: GpioBackend> {
    backend: B,
    buttons: Vec<Button<B::Input>, MAX_BUTTONS>,
    lamps: LampBank<B::Output>,
    flash: Option<Flash<B::Pwm>>,
}

impl<B: GpioBackend> Hardware<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            buttons: Vec::new(),
            lamps: LampBank::new(),
            flash: None,
        }
    }

    // ── Buttons ───────────────────────────────────────────────

    /// Watch `pin` and call `handler` on every press (falling edge).
    pub fn set_button(
        &mut self,
        pin: u8,
        handler: impl FnMut() + Send + 'static,
    ) -> Result<(), HwError> {
        if self.buttons.is_full() {
            return Err(HwError::TableFull);
        }
        let input = self.backend.watch_falling(pin, Box::new(handler))?;
        self.buttons
            .push(Button { pin, _input: input })
            .map_err(|_| HwError::TableFull)?;
        debug!("hw: button on BCM {}", pin);
        Ok(())
    }

    /// BCM pins of all watched buttons, in registration order.
    pub fn button_pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.buttons.iter().map(|b| b.pin)
    }

    // ── Lamps ─────────────────────────────────────────────────

    /// Claim `pin` as a lamp output (initially off).
    pub fn set_lamp(&mut self, pin: u8) -> Result<LampId, HwError> {
        let output = self.backend.claim_output(pin)?;
        let id = self.lamps.add(pin, output)?;
        debug!("hw: lamp {} on BCM {}", id.index(), pin);
        Ok(id)
    }

    pub fn lamp_on(&mut self, id: LampId) -> Result<(), HwError> {
        self.lamps.on(id)
    }

    pub fn lamp_off(&mut self, id: LampId) -> Result<(), HwError> {
        self.lamps.off(id)
    }

    pub fn lamp_toggle(&mut self, id: LampId) -> Result<(), HwError> {
        self.lamps.toggle(id)
    }

    pub fn lamp_is_on(&mut self, id: LampId) -> Result<bool, HwError> {
        self.lamps.is_on(id)
    }

    // ── Flash ─────────────────────────────────────────────────

    /// Configure `pin` as the flash output.  Only one flash is supported.
    pub fn set_flash(&mut self, pin: u8) -> Result<FlashId, HwError> {
        if let Some(flash) = &self.flash {
            return Err(HwError::PinBusy(flash.pin));
        }
        let driver = self.backend.claim_pwm(pin);
        self.flash = Some(Flash { pin, driver });
        Ok(FlashId(pin))
    }

    pub fn flash_off(&mut self, id: FlashId) {
        self.set_flash_level(id, FlashLevel::Off);
    }

    pub fn flash_low(&mut self, id: FlashId) {
        self.set_flash_level(id, FlashLevel::Low);
    }

    pub fn flash_full(&mut self, id: FlashId) {
        self.set_flash_level(id, FlashLevel::Full);
    }

    /// Level last requested of flash `id`, if it is configured.
    pub fn flash_level(&self, id: FlashId) -> Option<FlashLevel> {
        match &self.flash {
            Some(flash) if flash.pin == id.0 => Some(flash.driver.level()),
            _ => None,
        }
    }

    fn set_flash_level(&mut self, id: FlashId, level: FlashLevel) {
        match &mut self.flash {
            Some(flash) if flash.pin == id.0 => {
                debug!("hw: flash {:?}", level);
                flash.driver.set_duty(level);
            }
            _ => debug!("hw: no flash on BCM {}", id.0),
        }
    }
}
