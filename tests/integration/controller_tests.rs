//! Integration tests for the state → hardware and button → event paths.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Barrier};
use std::thread;

use photobooth_gpio::app::events::{AppEvent, TeardownReason, Worker};
use photobooth_gpio::app::ports::{ChannelError, ConfigError};
use photobooth_gpio::app::states::State;
use photobooth_gpio::config::GpioConfig;
use photobooth_gpio::drivers::flash::FlashLevel;
use photobooth_gpio::error::{Error, HwError};
use photobooth_gpio::GpioController;

use crate::mock_hw::{
    EXIT, FLASH, HwCall, LAMP, MockBackend, MockRig, Outbox, PRINT, PRINT_LED, STARTOVER,
    STARTOVER_LED, ScriptedStates, TRIGGER, enabled_config, gpio,
};

type Controller = GpioController<MockBackend, Outbox>;

fn make_controller() -> (Controller, MockRig, Outbox) {
    let (backend, rig) = MockBackend::new();
    let outbox = Outbox::default();
    let ctl = GpioController::new(enabled_config(), move || Ok(backend), outbox.clone())
        .expect("setup with default pins");
    rig.log.clear();
    (ctl, rig, outbox)
}

/// Hardware calls produced by handling `state` on a fresh controller.
fn calls_for(state: State) -> Vec<HwCall> {
    let (mut ctl, rig, _) = make_controller();
    ctl.handle_state(state).unwrap();
    rig.log.calls()
}

// ── Setup ─────────────────────────────────────────────────────

#[test]
fn setup_claims_buttons_then_outputs() {
    let (backend, rig) = MockBackend::new();
    let _ctl = GpioController::new(enabled_config(), move || Ok(backend), Outbox::default())
        .unwrap();

    assert_eq!(
        rig.log.calls(),
        [
            HwCall::WatchFalling(TRIGGER),
            HwCall::WatchFalling(EXIT),
            HwCall::WatchFalling(STARTOVER),
            HwCall::WatchFalling(PRINT),
            HwCall::ClaimOutput(LAMP),
            HwCall::ClaimPwm(FLASH),
            gpio("-g mode 18 pwm"),
            gpio("pwm-ms"),
            gpio("pwmc 64"),
            gpio("pwmr 1023"),
            gpio("-g pwm 18 0"),
            HwCall::ClaimOutput(STARTOVER_LED),
            HwCall::ClaimOutput(PRINT_LED),
        ]
    );
    assert_eq!(rig.buttons.len(), 4);
}

#[test]
fn setup_failure_releases_every_button() {
    let (backend, rig) = MockBackend::new();
    let backend = backend.with_busy_pin(PRINT_LED);

    let result = GpioController::new(enabled_config(), move || Ok(backend), Outbox::default());

    assert!(matches!(
        result,
        Err(Error::Hardware(HwError::PinBusy(PRINT_LED)))
    ));
    assert_eq!(rig.buttons.len(), 0, "no interrupt may outlive a failed setup");
}

#[test]
fn invalid_config_never_opens_backend() {
    let mut config = enabled_config();
    config.pins.flash = config.pins.lamp;

    let result = Controller::new(
        config,
        || panic!("backend opened for an invalid config"),
        Outbox::default(),
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::DuplicatePin(_)))
    ));
}

#[test]
fn unavailable_backend_is_fatal() {
    let result = Controller::new(
        enabled_config(),
        || Err(HwError::Unavailable),
        Outbox::default(),
    );
    assert!(matches!(result, Err(Error::Hardware(HwError::Unavailable))));
}

// ── State → hardware ──────────────────────────────────────────

#[test]
fn idle_arms_and_resets_indicators() {
    assert_eq!(
        calls_for(State::Idle),
        [
            HwCall::LampOn(LAMP),
            HwCall::LampOff(STARTOVER_LED),
            HwCall::LampOff(PRINT_LED),
            gpio("-g pwm 18 200"),
        ]
    );
}

#[test]
fn every_state_writes_its_row() {
    let cases = [
        (State::Greeter, vec![HwCall::LampOff(LAMP)]),
        (State::Countdown, vec![gpio("-g pwm 18 200")]),
        (State::Capture, vec![gpio("-g pwm 18 1023")]),
        (State::Assemble, vec![gpio("-g pwm 18 200")]),
        (State::Review, vec![]),
        (
            State::Postprocess,
            vec![HwCall::LampOn(STARTOVER_LED), HwCall::LampOn(PRINT_LED)],
        ),
        (
            State::Printing,
            vec![HwCall::LampOff(STARTOVER_LED), HwCall::LampOff(PRINT_LED)],
        ),
        (
            State::Teardown(TeardownReason::Exit),
            vec![gpio("-g pwm 18 0")],
        ),
    ];

    for (state, expected) in cases {
        assert_eq!(calls_for(state), expected, "state {:?}", state);
    }
}

#[test]
fn photo_session_arms_exactly_once() {
    let (mut ctl, rig, _) = make_controller();
    let mut states = ScriptedStates::new([
        State::Idle,
        State::Capture,
        State::Assemble,
        State::Teardown(TeardownReason::Exit),
    ]);

    ctl.run(&mut states).unwrap();

    assert_eq!(ctl.flash_level(), Some(FlashLevel::Off));
    assert_eq!(rig.log.count(&HwCall::LampOn(LAMP)), 1);
    assert_eq!(
        rig.log.gpio_calls(),
        ["-g pwm 18 200", "-g pwm 18 1023", "-g pwm 18 200", "-g pwm 18 0"]
    );
}

#[test]
fn run_stops_after_teardown() {
    let (mut ctl, _, _) = make_controller();
    let mut states = ScriptedStates::new([
        State::Idle,
        State::Teardown(TeardownReason::Shutdown),
        State::Capture,
    ]);

    assert_eq!(ctl.run(&mut states), Ok(()));
    assert_eq!(states.remaining(), 1, "states after Teardown are not read");
}

#[test]
fn closed_stream_ends_run_with_error() {
    let (mut ctl, _, _) = make_controller();
    let mut states = ScriptedStates::new([State::Idle, State::Greeter]);

    assert_eq!(
        ctl.run(&mut states),
        Err(Error::Channel(ChannelError::Closed))
    );
}

// ── Buttons → events ──────────────────────────────────────────

#[test]
fn trigger_fires_once_per_arm() {
    let (mut ctl, rig, outbox) = make_controller();
    ctl.handle_state(State::Idle).unwrap();

    rig.buttons.press(TRIGGER);
    rig.buttons.press(TRIGGER);
    assert_eq!(outbox.sent(), [(Worker::Master, AppEvent::Trigger)]);
    assert!(!ctl.is_trigger_armed());

    ctl.handle_state(State::Idle).unwrap();
    rig.buttons.press(TRIGGER);
    assert_eq!(outbox.count(AppEvent::Trigger), 2);
}

#[test]
fn unarmed_trigger_is_ignored() {
    let (mut ctl, rig, outbox) = make_controller();
    rig.buttons.press(TRIGGER);
    assert!(outbox.sent().is_empty());

    ctl.handle_state(State::Idle).unwrap();
    ctl.handle_state(State::Greeter).unwrap();
    rig.buttons.press(TRIGGER);
    assert!(outbox.sent().is_empty());
}

#[test]
fn trigger_press_leaves_lamps_alone() {
    let (mut ctl, rig, _) = make_controller();
    ctl.handle_state(State::Idle).unwrap();
    rig.log.clear();

    rig.buttons.press(TRIGGER);
    assert!(rig.log.is_empty());
}

#[test]
fn other_buttons_always_emit() {
    let (_ctl, rig, outbox) = make_controller();
    rig.buttons.press(EXIT);
    rig.buttons.press(PRINT);
    rig.buttons.press(STARTOVER);
    rig.buttons.press(PRINT);

    assert_eq!(
        outbox.sent(),
        [
            (Worker::Master, AppEvent::Teardown(TeardownReason::Welcome)),
            (Worker::Master, AppEvent::Print),
            (Worker::Master, AppEvent::Idle),
            (Worker::Master, AppEvent::Print),
        ]
    );
}

#[test]
fn concurrent_presses_trigger_once() {
    const PRESSERS: usize = 8;

    let (mut ctl, _, outbox) = make_controller();
    ctl.handle_state(State::Idle).unwrap();

    let handlers = ctl.handlers();
    let barrier = Arc::new(Barrier::new(PRESSERS));
    let threads: Vec<_> = (0..PRESSERS)
        .map(|_| {
            let handlers = Arc::clone(&handlers);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                handlers.trigger().unwrap();
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    assert_eq!(outbox.count(AppEvent::Trigger), 1);
    assert!(!ctl.is_trigger_armed());
}

#[test]
fn callback_send_failure_ends_run() {
    let (mut ctl, rig, outbox) = make_controller();
    ctl.handle_state(State::Idle).unwrap();

    outbox.fail.store(true, Ordering::SeqCst);
    rig.buttons.press(PRINT);
    assert_eq!(ctl.handlers().fault(), Some(ChannelError::Closed));

    let mut states = ScriptedStates::new([State::Greeter, State::Teardown(TeardownReason::Exit)]);
    assert_eq!(
        ctl.run(&mut states),
        Err(Error::Channel(ChannelError::Closed))
    );
    assert_eq!(states.remaining(), 2, "a latched fault stops before the next state");
}

#[test]
fn direct_send_failure_is_returned() {
    let (ctl, _, outbox) = make_controller();
    outbox.fail.store(true, Ordering::SeqCst);
    assert_eq!(ctl.exit(), Err(Error::Channel(ChannelError::Closed)));
    // Returned to the caller, not latched.
    assert_eq!(ctl.handlers().fault(), None);
}

// ── Degraded and disabled modes ───────────────────────────────

#[test]
fn lamps_work_without_flash_utility() {
    let (backend, rig) = MockBackend::new();
    rig.pwm_fail.store(true, Ordering::SeqCst);
    let mut ctl =
        GpioController::new(enabled_config(), move || Ok(backend), Outbox::default()).unwrap();
    rig.log.clear();

    ctl.handle_state(State::Idle).unwrap();
    ctl.handle_state(State::Capture).unwrap();

    let calls = rig.log.calls();
    assert!(calls.contains(&HwCall::LampOn(LAMP)));
    assert!(calls.contains(&gpio("-g pwm 18 1023")));
    assert!(ctl.is_trigger_armed());
}

#[test]
fn disabled_controller_touches_nothing() {
    let (backend, rig) = MockBackend::new();
    let outbox = Outbox::default();
    let mut ctl =
        GpioController::new(GpioConfig::default(), move || Ok(backend), outbox.clone()).unwrap();
    assert!(!ctl.is_enabled());

    for state in [State::Idle, State::Capture, State::Postprocess] {
        ctl.handle_state(state).unwrap();
    }
    ctl.trigger().unwrap();
    ctl.print().unwrap();
    ctl.startover().unwrap();
    ctl.exit().unwrap();
    let mut states = ScriptedStates::new([State::Teardown(TeardownReason::Reboot)]);
    ctl.run(&mut states).unwrap();

    assert!(rig.log.is_empty());
    assert_eq!(ctl.flash_level(), None);
    assert_eq!(rig.buttons.len(), 0);
    assert!(outbox.sent().is_empty());
    assert!(!ctl.is_trigger_armed());
}
