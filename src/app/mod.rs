//! Application core: states in, events out, ports in between.

pub mod controller;
pub mod events;
pub mod gate;
pub mod ports;
pub mod states;
