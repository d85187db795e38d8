//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter       | Implements              | Connects to                  |
//! |---------------|-------------------------|------------------------------|
//! | `channel`     | StateSource, EventSender| embassy-sync channels        |
//! | `hardware`    | (uses GpioBackend)      | any GpioBackend              |
//! | `json_config` | ConfigPort              | JSON config file             |
//! | `stdio`       | StateSource, EventSender| stdin lines / JSON on stdout |

pub mod channel;
pub mod hardware;
pub mod json_config;
pub mod stdio;
