//! Running score

/// Catch counter. Only `reset` lowers it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    value: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&mut self, n: u64) {
        self.value = self.value.saturating_add(n);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_increment_and_reset() {
        let mut score = ScoreTracker::new();
        assert_eq!(score.value(), 0);
        score.increment(2);
        score.increment(0);
        score.increment(1);
        assert_eq!(score.value(), 3);
        score.reset();
        assert_eq!(score.value(), 0);
    }

    proptest! {
        #[test]
        fn prop_monotonic_between_resets(increments in prop::collection::vec(0u64..100, 0..64)) {
            let mut score = ScoreTracker::new();
            let mut previous = 0;
            for n in increments {
                score.increment(n);
                prop_assert!(score.value() >= previous);
                previous = score.value();
            }
        }
    }
}
