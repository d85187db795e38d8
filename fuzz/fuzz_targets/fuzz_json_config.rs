//! Fuzz target: `JsonConfig::parse` → `GpioConfig::from_port`
//!
//! Any document that resolves to an enabled configuration must pass
//! validation; malformed documents are errors, never panics.
//!
//! cargo fuzz run fuzz_json_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use photobooth_gpio::adapters::json_config::JsonConfig;
use photobooth_gpio::config::GpioConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(port) = JsonConfig::parse(text) else {
        return;
    };
    if let Ok(config) = GpioConfig::from_port(&port) {
        assert!(config.validate().is_ok());
    }
});
