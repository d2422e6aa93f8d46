//! Injectable wall-clock seam, so expiry- and retry-timing tests can drive
//! time deterministically instead of sleeping for real. Not part of the
//! distilled spec; supplemented because P4/P5/S1/S2/S6 are otherwise
//! untestable without multi-second real sleeps.

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A source of "now". Defaults to the system clock; tests substitute a
/// `TestClock` to jump time instantly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub type SharedClock = Arc<dyn Clock>;

pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

/// A clock whose value is set explicitly, for deterministic tests.
#[derive(Clone)]
pub struct TestClock {
    inner: Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl TestClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(start)),
        }
    }

    pub fn set(&self, value: DateTime<Utc>) {
        *self.inner.lock().unwrap() = value;
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.inner.lock().unwrap();
        *guard += delta;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.inner.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances() {
        let start = Utc::now();
        let clock = TestClock::new(start);
        clock.advance(chrono::Duration::seconds(61));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(61));
    }
}
