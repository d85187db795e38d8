//! GPIO controller.
//!
//! [`GpioController`] maps application states to hardware actions and
//! button presses to application events.  All I/O flows through port
//! traits, so the whole controller is testable with mock adapters.
//!
//! ```text
//!  StateSource ──▶ ┌──────────────────────┐
//!                  │    GpioController     │──▶ Hardware (lamps, flash)
//!                  │  ActionTable · Gate   │
//!   button IRQ ──▶ │    ButtonHandlers     │──▶ EventSender (master)
//!                  └──────────────────────┘
//! ```
//!
//! ## Threads
//!
//! [`GpioController::run`] owns the hardware and is the only writer of
//! lamps and the flash.  Button callbacks run on interrupt threads and
//! only touch [`ButtonHandlers`]: the atomic arming gate and the event
//! sender.  A send failure inside a callback is latched and returned by
//! the dispatch loop on its next iteration.

use std::sync::{Arc, OnceLock};

use log::{debug, info, warn};

use crate::adapters::hardware::{FlashId, Hardware};
use crate::config::GpioConfig;
use crate::dispatch::{ActionTable, HwAction, Indicator, StateKind};
use crate::drivers::flash::FlashLevel;
use crate::error::{HwError, Result};

use super::events::{AppEvent, TeardownReason, Worker};
use super::gate::ArmingGate;
use super::ports::{ChannelError, ConfigPort, EventSender, GpioBackend, StateSource};
use super::states::State;
use crate::drivers::lamp::LampId;

// ───────────────────────────────────────────────────────────────
// Button handlers (interrupt side)
// ───────────────────────────────────────────────────────────────

/// Press handlers shared between the controller and interrupt callbacks.
pub struct ButtonHandlers<S: EventSender> {
    enabled: bool,
    gate: ArmingGate,
    sender: S,
    fault: OnceLock<ChannelError>,
}

impl<S: EventSender> ButtonHandlers<S> {
    fn new(enabled: bool, sender: S) -> Self {
        Self {
            enabled,
            gate: ArmingGate::new(),
            sender,
            fault: OnceLock::new(),
        }
    }

    /// Emit [`AppEvent::Trigger`] if the gate is armed, disarming it.
    pub fn trigger(&self) -> core::result::Result<(), ChannelError> {
        if !self.enabled {
            return Ok(());
        }
        if self.gate.take() {
            info!("button: trigger");
            self.emit(AppEvent::Trigger)
        } else {
            debug!("button: trigger ignored, not armed");
            Ok(())
        }
    }

    pub fn print(&self) -> core::result::Result<(), ChannelError> {
        if !self.enabled {
            return Ok(());
        }
        info!("button: print");
        self.emit(AppEvent::Print)
    }

    pub fn startover(&self) -> core::result::Result<(), ChannelError> {
        if !self.enabled {
            return Ok(());
        }
        info!("button: start over");
        self.emit(AppEvent::Idle)
    }

    pub fn exit(&self) -> core::result::Result<(), ChannelError> {
        if !self.enabled {
            return Ok(());
        }
        info!("button: exit");
        self.emit(AppEvent::Teardown(TeardownReason::Welcome))
    }

    pub fn is_armed(&self) -> bool {
        self.gate.is_armed()
    }

    /// First send failure raised inside an interrupt callback, if any.
    pub fn fault(&self) -> Option<ChannelError> {
        self.fault.get().copied()
    }

    fn emit(&self, event: AppEvent) -> core::result::Result<(), ChannelError> {
        self.sender.send(Worker::Master, event)
    }

    /// Entry point for interrupt callbacks: there is no caller to return
    /// an error to, so it is latched for the dispatch loop.
    fn on_press(&self, handler: fn(&Self) -> core::result::Result<(), ChannelError>) {
        if let Err(e) = handler(self) {
            warn!("button: event send failed: {}", e);
            let _ = self.fault.set(e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// Claimed hardware plus the handles the controller writes to.
struct Rig<B: GpioBackend> {
    hw: Hardware<B>,
    lamp: LampId,
    startover_lamp: LampId,
    print_lamp: LampId,
    flash: FlashId,
}

pub struct GpioController<B: GpioBackend, S: EventSender> {
    config: GpioConfig,
    rig: Option<Rig<B>>,
    table: ActionTable,
    buttons: Arc<ButtonHandlers<S>>,
}

impl<B: GpioBackend, S: EventSender> GpioController<B, S> {
    /// Resolve the configuration from `port`, then build as [`Self::new`].
    pub fn from_port(
        port: &impl ConfigPort,
        open_backend: impl FnOnce() -> core::result::Result<B, HwError>,
        sender: S,
    ) -> Result<Self> {
        let config = GpioConfig::from_port(port)?;
        Self::new(config, open_backend, sender)
    }

    /// Build the controller.
    ///
    /// With `config.enable` unset, `open_backend` is never called and the
    /// controller stays a no-op.  Otherwise every pin is claimed or the
    /// whole construction fails, releasing whatever was claimed.
    pub fn new(
        config: GpioConfig,
        open_backend: impl FnOnce() -> core::result::Result<B, HwError>,
        sender: S,
    ) -> Result<Self> {
        let buttons = Arc::new(ButtonHandlers::new(config.enable, sender));

        let rig = if config.enable {
            config.validate()?;
            Some(Self::setup(&config, open_backend()?, &buttons)?)
        } else {
            info!("GPIO disabled");
            None
        };

        Ok(Self {
            config,
            rig,
            table: ActionTable::new(),
            buttons,
        })
    }

    fn setup(
        config: &GpioConfig,
        backend: B,
        buttons: &Arc<ButtonHandlers<S>>,
    ) -> core::result::Result<Rig<B>, HwError> {
        let pins = &config.pins;
        info!(
            "GPIO enabled (lamp_pin={}, trigger_pin={}, exit_pin={})",
            pins.lamp, pins.trigger, pins.exit
        );

        let mut hw = Hardware::new(backend);

        let handlers: [(u8, fn(&ButtonHandlers<S>) -> core::result::Result<(), ChannelError>); 4] = [
            (pins.trigger, ButtonHandlers::trigger),
            (pins.exit, ButtonHandlers::exit),
            (pins.startover_button, ButtonHandlers::startover),
            (pins.print_button, ButtonHandlers::print),
        ];
        for (pin, handler) in handlers {
            let shared = Arc::clone(buttons);
            hw.set_button(pin, move || shared.on_press(handler))?;
        }

        let lamp = hw.set_lamp(pins.lamp)?;
        let flash = hw.set_flash(pins.flash)?;
        let startover_lamp = hw.set_lamp(pins.startover_lamp)?;
        let print_lamp = hw.set_lamp(pins.print_lamp)?;

        Ok(Rig {
            hw,
            lamp,
            startover_lamp,
            print_lamp,
            flash,
        })
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_enabled(&self) -> bool {
        self.rig.is_some()
    }

    pub fn is_trigger_armed(&self) -> bool {
        self.buttons.is_armed()
    }

    /// Level last requested of the flash; `None` when disabled.
    pub fn flash_level(&self) -> Option<FlashLevel> {
        let rig = self.rig.as_ref()?;
        rig.hw.flash_level(rig.flash)
    }

    pub fn config(&self) -> &GpioConfig {
        &self.config
    }

    /// Shared press handlers, for wiring presses that do not come from
    /// this controller's own backend.
    pub fn handlers(&self) -> Arc<ButtonHandlers<S>> {
        Arc::clone(&self.buttons)
    }

    // ── Dispatch loop ─────────────────────────────────────────

    /// Block on `source` and dispatch every state until Teardown.
    ///
    /// Returns `Ok(())` after handling Teardown.  Channel failures, both
    /// from `source` and latched from button callbacks, end the loop.
    pub fn run(&mut self, source: &mut impl StateSource) -> Result<()> {
        info!("GPIO worker running");
        loop {
            self.check_fault()?;
            let state = source.recv_state()?;
            self.check_fault()?;
            self.handle_state(state)?;

            if state.is_teardown() {
                info!("GPIO worker stopped ({:?})", state);
                return Ok(());
            }
        }
    }

    /// Apply the hardware actions for one state.
    pub fn handle_state(&mut self, state: State) -> Result<()> {
        let kind = StateKind::of(&state);
        debug!("dispatch: {}", self.table.row(kind).name);
        for action in self.table.actions(kind) {
            self.apply(*action)?;
        }
        Ok(())
    }

    fn apply(&mut self, action: HwAction) -> Result<()> {
        match action {
            HwAction::ArmTrigger => self.enable_trigger(),
            HwAction::DisarmTrigger => self.disable_trigger(),
            HwAction::IndicatorOn(indicator) => self.with_rig(|rig| {
                let id = rig.indicator(indicator);
                rig.hw.lamp_on(id)
            }),
            HwAction::IndicatorOff(indicator) => self.with_rig(|rig| {
                let id = rig.indicator(indicator);
                rig.hw.lamp_off(id)
            }),
            HwAction::Flash(level) => self.with_rig(|rig| {
                match level {
                    FlashLevel::Off => rig.hw.flash_off(rig.flash),
                    FlashLevel::Low => rig.hw.flash_low(rig.flash),
                    FlashLevel::Full => rig.hw.flash_full(rig.flash),
                }
                Ok(())
            }),
        }
    }

    // ── Arming gate ───────────────────────────────────────────

    /// Arm the trigger and light the trigger lamp.
    ///
    /// A trigger press only disarms the gate; the lamp is written from
    /// this thread alone, so it stays lit while disarmed until the next
    /// [`Self::disable_trigger`] (Greeter).
    pub fn enable_trigger(&mut self) -> Result<()> {
        let Some(rig) = self.rig.as_mut() else {
            return Ok(());
        };
        self.buttons.gate.arm();
        rig.hw.lamp_on(rig.lamp)?;
        Ok(())
    }

    /// Disarm the trigger and extinguish the trigger lamp.
    pub fn disable_trigger(&mut self) -> Result<()> {
        let Some(rig) = self.rig.as_mut() else {
            return Ok(());
        };
        self.buttons.gate.disarm();
        rig.hw.lamp_off(rig.lamp)?;
        Ok(())
    }

    // ── Button events ─────────────────────────────────────────

    pub fn trigger(&self) -> Result<()> {
        Ok(self.buttons.trigger()?)
    }

    pub fn print(&self) -> Result<()> {
        Ok(self.buttons.print()?)
    }

    pub fn startover(&self) -> Result<()> {
        Ok(self.buttons.startover()?)
    }

    pub fn exit(&self) -> Result<()> {
        Ok(self.buttons.exit()?)
    }

    // ── Internal ──────────────────────────────────────────────

    fn with_rig(
        &mut self,
        f: impl FnOnce(&mut Rig<B>) -> core::result::Result<(), HwError>,
    ) -> Result<()> {
        match self.rig.as_mut() {
            Some(rig) => Ok(f(rig)?),
            None => Ok(()),
        }
    }

    fn check_fault(&self) -> Result<()> {
        match self.buttons.fault() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl<B: GpioBackend> Rig<B> {
    fn indicator(&self, indicator: Indicator) -> LampId {
        match indicator {
            Indicator::Startover => self.startover_lamp,
            Indicator::Print => self.print_lamp,
        }
    }
}
