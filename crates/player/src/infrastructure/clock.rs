//! Clock implementations.

use chrono::Utc;

use crate::ports::outbound::TimeProvider;

/// System clock - uses real time.
#[derive(Clone, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Fixed clock for tests.
#[cfg(test)]
pub struct FixedTimeProvider(pub i64);

#[cfg(test)]
impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
