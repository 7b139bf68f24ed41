//! Command implementations for the carzone CLI

pub mod serve;

pub use serve::run_serve;
