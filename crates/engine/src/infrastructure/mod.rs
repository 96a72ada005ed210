//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod content;
pub mod ports;
pub mod resilient_worker;
pub mod sqlite;
pub mod worker;
