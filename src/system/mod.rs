//! System-level modules
//!
//! Logging setup lives here; the server lifecycle is in `runtime`.

pub mod logging;
