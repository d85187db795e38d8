//! Pin roles and PWM constants for the booth I/O board.
//!
//! Pin numbers use the Broadcom (BCM) scheme throughout.  The actual
//! assignment comes from configuration; this module only names the roles
//! and holds the fixed electrical parameters.

// ---------------------------------------------------------------------------
// Pin roles
// ---------------------------------------------------------------------------

/// Highest BCM GPIO exposed on the 40-pin header.
pub const BCM_MAX_PIN: u8 = 27;

/// Every pin the controller claims, keyed by what it is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    /// "Ready to trigger" lamp, lit while the trigger is armed.
    Lamp,
    /// PWM flash output.
    Flash,
    /// Capture trigger button.
    Trigger,
    /// Exit button (returns to the welcome screen).
    Exit,
    /// Start-over button.
    StartoverButton,
    /// Lamp next to the start-over button.
    StartoverLamp,
    /// Print button.
    PrintButton,
    /// Lamp next to the print button.
    PrintLamp,
}

impl PinRole {
    pub const ALL: [Self; 8] = [
        Self::Lamp,
        Self::Flash,
        Self::Trigger,
        Self::Exit,
        Self::StartoverButton,
        Self::StartoverLamp,
        Self::PrintButton,
        Self::PrintLamp,
    ];

    /// Configuration key holding this role's pin.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Lamp => "lamp_pin",
            Self::Flash => "flash_pin",
            Self::Trigger => "trigger_pin",
            Self::Exit => "exit_pin",
            Self::StartoverButton => "startover_pin",
            Self::StartoverLamp => "startover_led",
            Self::PrintButton => "print_pin",
            Self::PrintLamp => "print_led",
        }
    }
}

// ---------------------------------------------------------------------------
// PWM configuration (flash)
// ---------------------------------------------------------------------------

/// PWM output range; duty values are `0..=PWM_RANGE`.
pub const PWM_RANGE: u16 = 1023;
/// PWM clock divisor.
pub const PWM_CLOCK_DIVISOR: u16 = 64;

/// Flash extinguished.
pub const FLASH_DUTY_OFF: u16 = 0;
/// Dimmed flash used as fill light between captures.
pub const FLASH_DUTY_LOW: u16 = 200;
/// Full flash pulse during capture.
pub const FLASH_DUTY_FULL: u16 = PWM_RANGE;
