//! F1 Telemetry Server Library
//!
//! Exposes server components for integration testing.

pub mod config;
pub mod engine;
pub mod forward;
pub mod listener;
pub mod state;
pub mod throttle;
