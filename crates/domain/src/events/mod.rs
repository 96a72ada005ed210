//! Domain Events
//!
//! Return types from aggregate mutations, communicating what happened when
//! state was modified.

pub mod stat_events;

pub use stat_events::StatEvent;
