//! Output drivers and GPIO backends.

pub mod flash;
pub mod lamp;
#[cfg(feature = "rpi")]
pub mod rpi;
pub mod sim;
