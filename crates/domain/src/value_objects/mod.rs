//! Value objects - Immutable objects defined by their attributes

mod stat_delta;
mod stats;

pub use stat_delta::{AppliedDelta, StatDelta};
pub use stats::{PlayerStats, StartingStats, DEFAULT_CURRENCY, DEFAULT_MAX_HEALTH};
