pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod stats;
pub mod types;

// Application layer (use cases, ports, intent dispatch) and its adapters
pub mod app;
pub mod infra;
