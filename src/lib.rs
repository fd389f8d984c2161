pub mod common;
pub mod config;
pub mod logging;
pub mod pipeline;

// Application use cases and the adapters that back their ports
pub mod app;
pub mod infra;
