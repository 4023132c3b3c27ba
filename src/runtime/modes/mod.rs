//! Mode routing
//!
//! The server is the only long-running mode; `config generate` is handled
//! directly by the CLI dispatcher.

pub mod server;

pub use server::run_server;
