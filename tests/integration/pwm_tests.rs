//! Flash PWM sequencing as seen by the `gpio` utility.

use std::sync::atomic::Ordering;

use photobooth_gpio::app::events::TeardownReason;
use photobooth_gpio::app::ports::GpioBackend;
use photobooth_gpio::app::states::State;
use photobooth_gpio::drivers::flash::{FlashLevel, PwmDriver};
use photobooth_gpio::GpioController;

use crate::mock_hw::{MockBackend, Outbox, enabled_config};

const SETUP: [&str; 4] = ["-g mode 18 pwm", "pwm-ms", "pwmc 64", "pwmr 1023"];

#[test]
fn setup_runs_once_before_any_duty() {
    let (backend, rig) = MockBackend::new();
    let mut ctl =
        GpioController::new(enabled_config(), move || Ok(backend), Outbox::default()).unwrap();

    for state in [
        State::Idle,
        State::Countdown,
        State::Capture,
        State::Assemble,
        State::Idle,
        State::Capture,
        State::Teardown(TeardownReason::Exit),
    ] {
        ctl.handle_state(state).unwrap();
    }

    let calls = rig.log.gpio_calls();
    assert_eq!(&calls[..4], SETUP);
    for step in SETUP {
        assert_eq!(
            calls.iter().filter(|c| *c == step).count(),
            1,
            "`gpio {step}` must run exactly once"
        );
    }
    assert!(calls[4..].iter().all(|c| c.starts_with("-g pwm 18 ")));
    assert_eq!(calls.last().map(String::as_str), Some("-g pwm 18 0"));
}

#[test]
fn flash_pin_follows_config() {
    let (backend, rig) = MockBackend::new();
    let mut config = enabled_config();
    config.pins.flash = 12;
    let mut ctl = GpioController::new(config, move || Ok(backend), Outbox::default()).unwrap();
    ctl.handle_state(State::Capture).unwrap();

    assert_eq!(
        rig.log.gpio_calls(),
        [
            "-g mode 12 pwm",
            "pwm-ms",
            "pwmc 64",
            "pwmr 1023",
            "-g pwm 12 0",
            "-g pwm 12 1023",
        ]
    );
}

#[test]
fn failing_utility_still_attempts_every_step() {
    let (mut backend, rig) = MockBackend::new();
    rig.pwm_fail.store(true, Ordering::SeqCst);

    let mut pwm = backend.claim_pwm(18);
    assert!(pwm.is_degraded());
    pwm.set_duty(FlashLevel::Low);

    assert_eq!(pwm.level(), FlashLevel::Low);
    assert_eq!(rig.log.gpio_calls().len(), 6);
}

#[test]
fn utility_recovering_keeps_driving_duty() {
    let (mut backend, rig) = MockBackend::new();
    rig.pwm_fail.store(true, Ordering::SeqCst);
    let mut pwm = backend.claim_pwm(18);

    rig.pwm_fail.store(false, Ordering::SeqCst);
    rig.log.clear();
    pwm.set_duty(FlashLevel::Full);

    assert_eq!(rig.log.gpio_calls(), ["-g pwm 18 1023"]);
    // Degraded is sticky: the earlier failures are still reported.
    assert!(pwm.is_degraded());
}
