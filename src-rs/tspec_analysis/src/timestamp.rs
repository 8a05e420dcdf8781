//! Compilation timestamps

use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque, totally ordered token identifying a check pass
///
/// A node checked at `T` is up to date for any request at a timestamp that
/// is not greater than `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilationTimestamp(u64);

impl CompilationTimestamp {
    /// Returns whether results stamped with `self` satisfy a request at
    /// `requested`
    #[must_use]
    pub fn is_current_for(self, requested: Self) -> bool {
        self >= requested
    }
}

/// A monotonically increasing source of timestamps
#[derive(Debug, Default)]
pub struct TimestampClock {
    last: AtomicU64,
}

impl TimestampClock {
    /// Creates a clock that has not ticked yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a timestamp greater than every timestamp returned before
    pub fn tick(&self) -> CompilationTimestamp {
        CompilationTimestamp(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_strictly_increasing() {
        let clock = TimestampClock::new();

        let first = clock.tick();
        let second = clock.tick();

        assert!(first < second);
        assert!(second.is_current_for(first));
        assert!(!first.is_current_for(second));
        assert!(first.is_current_for(first));
    }
}
