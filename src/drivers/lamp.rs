//! Binary indicator lamps.
//!
//! Lamps are `embedded-hal` stateful outputs held in a fixed-capacity
//! table and addressed by the [`LampId`] returned when they are added.

use embedded_hal::digital::StatefulOutputPin;
use heapless::Vec;
use log::debug;

use crate::error::HwError;

/// Most lamps a single [`LampBank`] can hold.
pub const MAX_LAMPS: usize = 8;

/// Opaque handle to a lamp in a [`LampBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LampId(usize);

impl LampId {
    pub fn index(self) -> usize {
        self.0
    }
}

struct Lamp<P> {
    pin: u8,
    output: P,
}

pub struct LampBank<P: StatefulOutputPin> {
    lamps: Vec<Lamp<P>, MAX_LAMPS>,
}

impl<P: StatefulOutputPin> LampBank<P> {
    pub fn new() -> Self {
        Self { lamps: Vec::new() }
    }

    /// Take ownership of `output` (wired to BCM `pin`) and return its handle.
    pub fn add(&mut self, pin: u8, output: P) -> Result<LampId, HwError> {
        let id = LampId(self.lamps.len());
        self.lamps
            .push(Lamp { pin, output })
            .map_err(|_| HwError::TableFull)?;
        Ok(id)
    }

    pub fn on(&mut self, id: LampId) -> Result<(), HwError> {
        let lamp = self.lamp(id)?;
        debug!("lamp: BCM {} on", lamp.pin);
        lamp.output.set_high().map_err(|_| HwError::WriteFailed(lamp.pin))
    }

    pub fn off(&mut self, id: LampId) -> Result<(), HwError> {
        let lamp = self.lamp(id)?;
        debug!("lamp: BCM {} off", lamp.pin);
        lamp.output.set_low().map_err(|_| HwError::WriteFailed(lamp.pin))
    }

    pub fn toggle(&mut self, id: LampId) -> Result<(), HwError> {
        let lamp = self.lamp(id)?;
        debug!("lamp: BCM {} toggle", lamp.pin);
        lamp.output.toggle().map_err(|_| HwError::WriteFailed(lamp.pin))
    }

    pub fn is_on(&mut self, id: LampId) -> Result<bool, HwError> {
        let lamp = self.lamp(id)?;
        lamp.output
            .is_set_high()
            .map_err(|_| HwError::WriteFailed(lamp.pin))
    }

    pub fn pin(&self, id: LampId) -> Option<u8> {
        self.lamps.get(id.0).map(|l| l.pin)
    }

    pub fn len(&self) -> usize {
        self.lamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lamps.is_empty()
    }

    fn lamp(&mut self, id: LampId) -> Result<&mut Lamp<P>, HwError> {
        self.lamps.get_mut(id.0).ok_or(HwError::UnknownLamp)
    }
}

impl<P: StatefulOutputPin> Default for LampBank<P> {
    fn default() -> Self {
        Self::new()
    }
}
