//! ChronoQuest player
//!
//! Runs one chapter for one player: the scene state machine and stat engine
//! from the domain crate, progress saved locally and mirrored to the server,
//! and AI dialogue and images with offline fallbacks.

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod ui;
