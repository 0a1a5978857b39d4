//! Record id generation.
//!
//! Records are keyed by the millisecond timestamp of their creation. Two
//! records created in the same millisecond would collide, so the generator
//! hands out `max(now, last + 1)` and never repeats an id within a process.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

pub type RecordId = i64;

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that will only issue ids above `floor`.
    pub fn starting_after(floor: RecordId) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }

    pub fn next_id(&self) -> RecordId {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }

    /// Raise the floor so ids loaded from storage are never reissued.
    pub fn observe(&self, id: RecordId) {
        self.last.fetch_max(id, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rapid_ids_are_unique_and_increasing() {
        let generator = IdGenerator::new();
        let ids: Vec<RecordId> = (0..1000).map(|_| generator.next_id()).collect();
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_look_like_timestamps() {
        let before = Utc::now().timestamp_millis();
        let id = IdGenerator::new().next_id();
        assert!(id >= before);
    }

    #[test]
    fn test_observe_raises_floor() {
        let generator = IdGenerator::new();
        let future = Utc::now().timestamp_millis() + 60_000;
        generator.observe(future);
        assert_eq!(generator.next_id(), future + 1);
    }

    #[test]
    fn test_starting_after() {
        let generator = IdGenerator::starting_after(i64::MAX - 10);
        assert_eq!(generator.next_id(), i64::MAX - 9);
    }
}
