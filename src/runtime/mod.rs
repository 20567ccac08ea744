//! Application lifecycle: startup wiring, the HTTP server, shutdown

pub mod lifetime;
pub mod modes;

pub use modes::run_server;
