//! Concrete table rows.
//!
//! ```text
//!  IDLE ──▶ GREETER ──▶ COUNTDOWN ──▶ CAPTURE ──▶ ASSEMBLE ──▶ REVIEW
//!   ▲ (armed)  (disarmed)  (low)        (full)      (low)         │
//!   │                                                             ▼
//!   └──────────── PRINTING (lamps off) ◀── POSTPROCESS (lamps on)
//!
//!  any ──▶ TEARDOWN (flash off, loop ends)
//! ```
//!
//! The transitions belong to the external state machine; the diagram
//! only shows the usual order to make the lamp and flash rows readable.

use super::{HwAction, Indicator, StateDescriptor, StateKind};
use crate::drivers::flash::FlashLevel;

const IDLE: &[HwAction] = &[
    HwAction::ArmTrigger,
    HwAction::IndicatorOff(Indicator::Startover),
    HwAction::IndicatorOff(Indicator::Print),
    HwAction::Flash(FlashLevel::Low),
];

const GREETER: &[HwAction] = &[HwAction::DisarmTrigger];

const COUNTDOWN: &[HwAction] = &[HwAction::Flash(FlashLevel::Low)];

const CAPTURE: &[HwAction] = &[HwAction::Flash(FlashLevel::Full)];

const ASSEMBLE: &[HwAction] = &[HwAction::Flash(FlashLevel::Low)];

const REVIEW: &[HwAction] = &[];

const POSTPROCESS: &[HwAction] = &[
    HwAction::IndicatorOn(Indicator::Startover),
    HwAction::IndicatorOn(Indicator::Print),
];

const PRINTING: &[HwAction] = &[
    HwAction::IndicatorOff(Indicator::Startover),
    HwAction::IndicatorOff(Indicator::Print),
];

const TEARDOWN: &[HwAction] = &[HwAction::Flash(FlashLevel::Off)];

/// Build the table.  Called once per controller.
pub fn build_action_table() -> [StateDescriptor; StateKind::COUNT] {
    [
        StateDescriptor {
            kind: StateKind::Idle,
            name: "Idle",
            actions: IDLE,
        },
        StateDescriptor {
            kind: StateKind::Greeter,
            name: "Greeter",
            actions: GREETER,
        },
        StateDescriptor {
            kind: StateKind::Countdown,
            name: "Countdown",
            actions: COUNTDOWN,
        },
        StateDescriptor {
            kind: StateKind::Capture,
            name: "Capture",
            actions: CAPTURE,
        },
        StateDescriptor {
            kind: StateKind::Assemble,
            name: "Assemble",
            actions: ASSEMBLE,
        },
        StateDescriptor {
            kind: StateKind::Review,
            name: "Review",
            actions: REVIEW,
        },
        StateDescriptor {
            kind: StateKind::Postprocess,
            name: "Postprocess",
            actions: POSTPROCESS,
        },
        StateDescriptor {
            kind: StateKind::Printing,
            name: "Printing",
            actions: PRINTING,
        },
        StateDescriptor {
            kind: StateKind::Teardown,
            name: "Teardown",
            actions: TEARDOWN,
        },
    ]
}
