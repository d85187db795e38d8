//! Property tests: arbitrary interleavings of states and button presses.

use photobooth_gpio::app::events::{AppEvent, TeardownReason};
use photobooth_gpio::app::states::State;
use photobooth_gpio::config::GpioConfig;
use photobooth_gpio::drivers::flash::FlashLevel;
use photobooth_gpio::GpioController;
use proptest::prelude::*;

use crate::mock_hw::{EXIT, MockBackend, Outbox, PRINT, STARTOVER, TRIGGER, enabled_config};

#[derive(Debug, Clone, Copy)]
enum Op {
    Enter(State),
    Press(u8),
}

fn any_state() -> impl Strategy<Value = State> {
    prop_oneof![
        Just(State::Idle),
        Just(State::Greeter),
        Just(State::Countdown),
        Just(State::Capture),
        Just(State::Assemble),
        Just(State::Review),
        Just(State::Postprocess),
        Just(State::Printing),
        Just(State::Teardown(TeardownReason::Exit)),
        Just(State::Teardown(TeardownReason::Welcome)),
    ]
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any_state().prop_map(Op::Enter),
        2 => Just(Op::Press(TRIGGER)),
        1 => prop_oneof![Just(EXIT), Just(PRINT), Just(STARTOVER)].prop_map(Op::Press),
    ]
}

/// Duty the flash should show after `state`, if the state touches it.
fn flash_duty(state: State) -> Option<&'static str> {
    match state {
        State::Idle | State::Countdown | State::Assemble => Some("200"),
        State::Capture => Some("1023"),
        State::Teardown(_) => Some("0"),
        _ => None,
    }
}

proptest! {
    #[test]
    fn disabled_controller_never_touches_hardware(
        ops in proptest::collection::vec(any_op(), 0..64),
    ) {
        let (backend, rig) = MockBackend::new();
        let outbox = Outbox::default();
        let mut ctl = GpioController::new(GpioConfig::default(), move || Ok(backend), outbox.clone())
            .unwrap();

        for op in ops {
            match op {
                Op::Enter(state) => ctl.handle_state(state).unwrap(),
                Op::Press(TRIGGER) => ctl.trigger().unwrap(),
                Op::Press(EXIT) => ctl.exit().unwrap(),
                Op::Press(PRINT) => ctl.print().unwrap(),
                Op::Press(_) => ctl.startover().unwrap(),
            }
        }

        prop_assert!(rig.log.is_empty());
        prop_assert!(outbox.sent().is_empty());
    }

    #[test]
    fn trigger_count_matches_arming_model(
        ops in proptest::collection::vec(any_op(), 0..64),
    ) {
        let (backend, rig) = MockBackend::new();
        let outbox = Outbox::default();
        let mut ctl = GpioController::new(enabled_config(), move || Ok(backend), outbox.clone())
            .unwrap();

        let mut armed = false;
        let mut triggers = 0usize;
        let mut others = 0usize;

        for op in ops {
            match op {
                Op::Enter(state) => {
                    ctl.handle_state(state).unwrap();
                    match state {
                        State::Idle => armed = true,
                        State::Greeter => armed = false,
                        _ => {}
                    }
                }
                Op::Press(TRIGGER) => {
                    rig.buttons.press(TRIGGER);
                    if armed {
                        armed = false;
                        triggers += 1;
                    }
                }
                Op::Press(pin) => {
                    rig.buttons.press(pin);
                    others += 1;
                }
            }
            prop_assert_eq!(ctl.is_trigger_armed(), armed);
        }

        prop_assert_eq!(outbox.count(AppEvent::Trigger), triggers);
        prop_assert_eq!(outbox.sent().len(), triggers + others);
    }

    #[test]
    fn flash_ends_at_last_flash_state(
        states in proptest::collection::vec(any_state(), 1..32),
    ) {
        let (backend, rig) = MockBackend::new();
        let mut ctl = GpioController::new(enabled_config(), move || Ok(backend), Outbox::default())
            .unwrap();

        for state in &states {
            ctl.handle_state(*state).unwrap();
        }

        let expected = states.iter().rev().find_map(|s| flash_duty(*s)).unwrap_or("0");
        let last = rig.log.gpio_calls().pop().unwrap_or_default();
        prop_assert_eq!(last, format!("-g pwm 18 {expected}"));

        let level = ctl.flash_level().map(FlashLevel::duty).map(|d| d.to_string());
        prop_assert_eq!(level.as_deref(), Some(expected));
    }
}
