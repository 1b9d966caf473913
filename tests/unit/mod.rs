//! Unit tests for individual components

pub mod session_scenarios;
pub mod wire_format;
