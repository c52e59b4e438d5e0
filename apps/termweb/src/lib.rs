pub mod client;
pub mod config;
pub mod remote;
pub mod session;
pub mod telemetry;
pub mod terminal;
