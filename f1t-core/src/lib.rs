//! F1 Telemetry Core Library
//!
//! This crate provides the typed race-state snapshot model shared by the
//! packet decoders and the UDP server, plus the decode error taxonomy and
//! human-readable label tables for the protocol's coded values.

pub mod codes;
pub mod error;
pub mod snapshot;

pub use error::DecodeError;
pub use snapshot::{SessionStatus, Snapshot};
