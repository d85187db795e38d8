//! One-shot arming gate for the capture trigger.
//!
//! Armed by the dispatch loop, consumed by the trigger button's interrupt
//! callback.  [`ArmingGate::take`] is a single compare-and-swap, so any
//! number of racing presses consume one arm cycle exactly once.

use core::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ArmingGate {
    armed: AtomicBool,
}

impl ArmingGate {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Disarm and report whether the gate was armed.
    pub fn take(&self) -> bool {
        self.armed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
