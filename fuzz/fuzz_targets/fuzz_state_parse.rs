//! Fuzz target: `State::from_str`
//!
//! Arbitrary UTF-8 lines from the state stream must parse or be rejected,
//! never panic.  Anything accepted must survive a trip through its own
//! lowercase name.
//!
//! cargo fuzz run fuzz_state_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use photobooth_gpio::app::states::State;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(state) = line.parse::<State>() {
        let name = match state {
            State::Teardown(reason) => format!("teardown {reason}"),
            other => format!("{other:?}"),
        };
        assert_eq!(name.parse::<State>(), Ok(state));
    }
});
