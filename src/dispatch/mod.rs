//! State → hardware action table.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ActionTable                                             │
//! │  ┌─────────────┬─────────────────────────────────────┐   │
//! │  │ StateKind   │ actions                             │   │
//! │  ├─────────────┼─────────────────────────────────────┤   │
//! │  │ Idle        │ arm, startover off, print off, low  │   │
//! │  │ Greeter     │ disarm                              │   │
//! │  │ Countdown   │ low                                 │   │
//! │  │ Capture     │ full                                │   │
//! │  │ Assemble    │ low                                 │   │
//! │  │ Review      │ none                                │   │
//! │  │ Postprocess │ startover on, print on              │   │
//! │  │ Printing    │ startover off, print off            │   │
//! │  │ Teardown    │ off                                 │   │
//! │  └─────────────┴─────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each incoming [`State`] is reduced to its [`StateKind`] by an
//! exhaustive match, so a new state variant does not compile until it
//! gets a row.  The controller then executes the row's [`HwAction`]s in
//! order.

pub mod table;

use crate::app::states::State;
use crate::drivers::flash::FlashLevel;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Payload-free discriminant of [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateKind {
    Idle = 0,
    Greeter = 1,
    Countdown = 2,
    Capture = 3,
    Assemble = 4,
    Review = 5,
    Postprocess = 6,
    Printing = 7,
    Teardown = 8,
}

impl StateKind {
    /// Number of kinds; sizes the table array.
    pub const COUNT: usize = 9;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Idle,
        Self::Greeter,
        Self::Countdown,
        Self::Capture,
        Self::Assemble,
        Self::Review,
        Self::Postprocess,
        Self::Printing,
        Self::Teardown,
    ];

    pub fn of(state: &State) -> Self {
        match state {
            State::Idle => Self::Idle,
            State::Greeter => Self::Greeter,
            State::Countdown => Self::Countdown,
            State::Capture => Self::Capture,
            State::Assemble => Self::Assemble,
            State::Review => Self::Review,
            State::Postprocess => Self::Postprocess,
            State::Printing => Self::Printing,
            State::Teardown(_) => Self::Teardown,
        }
    }
}

// ---------------------------------------------------------------------------
// Hardware actions
// ---------------------------------------------------------------------------

/// Lamps other than the trigger lamp, which belongs to the arming gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Startover,
    Print,
}

/// One hardware effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwAction {
    /// Arm the trigger gate and light the trigger lamp.
    ArmTrigger,
    /// Disarm the trigger gate and extinguish the trigger lamp.
    DisarmTrigger,
    IndicatorOn(Indicator),
    IndicatorOff(Indicator),
    Flash(FlashLevel),
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// One row of the table.
pub struct StateDescriptor {
    pub kind: StateKind,
    pub name: &'static str,
    pub actions: &'static [HwAction],
}

/// Fixed-size table indexed by `StateKind as usize`.
pub struct ActionTable {
    rows: [StateDescriptor; StateKind::COUNT],
}

impl ActionTable {
    pub fn new() -> Self {
        Self {
            rows: table::build_action_table(),
        }
    }

    pub fn row(&self, kind: StateKind) -> &StateDescriptor {
        &self.rows[kind as usize]
    }

    pub fn actions(&self, kind: StateKind) -> &'static [HwAction] {
        self.rows[kind as usize].actions
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new()
    }
}
