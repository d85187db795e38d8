//! PWM flash driver.
//!
//! The flash is driven at three discrete duty levels through the
//! WiringPi `gpio` command-line utility: once for setup, once per level
//! change.
//!
//! ## Setup sequence
//!
//! | # | Invocation                  |
//! |---|-----------------------------|
//! | 1 | `gpio -g mode <pin> pwm`    |
//! | 2 | `gpio pwm-ms`               |
//! | 3 | `gpio pwmc 64`              |
//! | 4 | `gpio pwmr 1023`            |
//! | 5 | `gpio -g pwm <pin> 0`       |
//!
//! The order matters on BCM283x: the clock and range registers are only
//! honoured once the pin is in PWM mode and the channel is mark-space.
//!
//! ## Failure handling
//!
//! A failing invocation (utility missing, no permission) is logged and
//! otherwise ignored.  The flash is a secondary cue; lamps and buttons
//! keep working without it.

use std::io;
use std::process::Command;

use log::{debug, warn};

use crate::pins::{
    FLASH_DUTY_FULL, FLASH_DUTY_LOW, FLASH_DUTY_OFF, PWM_CLOCK_DIVISOR, PWM_RANGE,
};

/// Name of the WiringPi control utility.
pub const GPIO_UTILITY: &str = "gpio";

/// Discrete flash intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Off,
    Low,
    Full,
}

impl FlashLevel {
    /// PWM duty for this level, out of [`PWM_RANGE`].
    pub const fn duty(self) -> u16 {
        match self {
            Self::Off => FLASH_DUTY_OFF,
            Self::Low => FLASH_DUTY_LOW,
            Self::Full => FLASH_DUTY_FULL,
        }
    }
}

/// Anything that can put the flash at a duty level.
pub trait PwmDriver {
    fn set_duty(&mut self, level: FlashLevel);

    /// Last level requested (not necessarily reached if degraded).
    fn level(&self) -> FlashLevel;
}

// ── Command runner seam ───────────────────────────────────────

/// Runs one invocation of the control utility with positional arguments.
pub trait CommandRunner {
    fn run(&mut self, args: &[&str]) -> io::Result<()>;
}

/// Spawns the real utility and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::with_program(GPIO_UTILITY)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, args: &[&str]) -> io::Result<()> {
        let status = Command::new(&self.program).args(args).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", self.program, status)))
        }
    }
}

// ── Utility-driven PWM ────────────────────────────────────────

/// Flash on one BCM pin, driven through a [`CommandRunner`].
pub struct UtilityPwm<R: CommandRunner> {
    pin: u8,
    runner: R,
    level: FlashLevel,
    failures: u32,
}

impl<R: CommandRunner> UtilityPwm<R> {
    /// Run the five-step setup sequence and leave the flash at duty 0.
    pub fn setup(pin: u8, runner: R) -> Self {
        let mut pwm = Self {
            pin,
            runner,
            level: FlashLevel::Off,
            failures: 0,
        };

        let pin_arg = pin.to_string();
        let divisor = PWM_CLOCK_DIVISOR.to_string();
        let range = PWM_RANGE.to_string();

        pwm.invoke(&["-g", "mode", &pin_arg, "pwm"]);
        pwm.invoke(&["pwm-ms"]);
        pwm.invoke(&["pwmc", &divisor]);
        pwm.invoke(&["pwmr", &range]);
        pwm.set_duty(FlashLevel::Off);

        debug!("flash: configured on BCM {}", pin);
        pwm
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// True once any invocation has failed.
    pub fn is_degraded(&self) -> bool {
        self.failures > 0
    }

    fn invoke(&mut self, args: &[&str]) {
        if let Err(e) = self.runner.run(args) {
            self.failures = self.failures.saturating_add(1);
            // First failure is loud; the rest would repeat on every state.
            if self.failures == 1 {
                warn!(
                    "flash: `{} {}` failed: {} (flash effects disabled)",
                    GPIO_UTILITY,
                    args.join(" "),
                    e
                );
            } else {
                debug!("flash: `{}` failed again: {}", args.join(" "), e);
            }
        }
    }
}

impl<R: CommandRunner> PwmDriver for UtilityPwm<R> {
    fn set_duty(&mut self, level: FlashLevel) {
        let pin_arg = self.pin.to_string();
        let duty = level.duty().to_string();
        self.invoke(&["-g", "pwm", &pin_arg, &duty]);
        self.level = level;
    }

    fn level(&self) -> FlashLevel {
        self.level
    }
}
