//! Sustained-gesture counters
//!
//! One consecutive-frame count per gesture class, fed with the primary
//! hand's predicate flags each frame.

use super::pose::GestureFlags;
use crate::types::{GestureClass, GESTURE_COUNT};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SustainedCounters {
    counts: [u32; GESTURE_COUNT],
}

impl SustainedCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment every class whose predicate holds, zero the rest
    pub fn update(&mut self, flags: &GestureFlags) {
        for class in GestureClass::ALL {
            let count = &mut self.counts[class.index()];
            *count = if flags.get(class) {
                count.saturating_add(1)
            } else {
                0
            };
        }
    }

    pub fn count(&self, class: GestureClass) -> u32 {
        self.counts[class.index()]
    }

    pub fn is_eligible(&self, class: GestureClass, threshold: u32) -> bool {
        self.count(class) >= threshold
    }

    /// First discrete class at or above the threshold that `allow` accepts
    pub fn first_eligible(
        &self,
        threshold: u32,
        mut allow: impl FnMut(GestureClass) -> bool,
    ) -> Option<GestureClass> {
        GestureClass::DISCRETE_PRIORITY
            .into_iter()
            .find(|c| self.is_eligible(*c, threshold) && allow(*c))
    }

    pub fn reset(&mut self) {
        self.counts = [0; GESTURE_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::pose::{classify, fixtures};

    fn flags_for(class: Option<GestureClass>) -> GestureFlags {
        let mut f = GestureFlags::default();
        if let Some(c) = class {
            f.set(c, true);
        }
        f
    }

    #[test]
    fn counts_climb_and_reset() {
        let mut counters = SustainedCounters::new();
        let on = flags_for(Some(GestureClass::Peace));
        for expected in 1..=5 {
            counters.update(&on);
            assert_eq!(counters.count(GestureClass::Peace), expected);
        }
        counters.update(&flags_for(None));
        assert_eq!(counters.count(GestureClass::Peace), 0);
    }

    #[test]
    fn three_frames_then_release_is_eligible_once() {
        let mut counters = SustainedCounters::new();
        let on = flags_for(Some(GestureClass::Fist));
        let off = flags_for(None);
        let mut eligible_after = Vec::new();
        for (frame, flags) in [on, on, on, off].iter().enumerate() {
            counters.update(flags);
            if counters.is_eligible(GestureClass::Fist, 3) {
                eligible_after.push(frame + 1);
            }
        }
        assert_eq!(eligible_after, vec![3]);
    }

    #[test]
    fn priority_prefers_thumbs_up_over_fist() {
        let mut counters = SustainedCounters::new();
        let flags = classify(&fixtures::thumbs_up());
        for _ in 0..3 {
            counters.update(&flags);
        }
        assert_eq!(counters.first_eligible(3, |_| true), Some(GestureClass::ThumbsUp));
        assert_eq!(
            counters.first_eligible(3, |c| c != GestureClass::ThumbsUp),
            Some(GestureClass::Fist)
        );
    }

    #[test]
    fn index_up_is_never_a_discrete_candidate() {
        let mut counters = SustainedCounters::new();
        let flags = flags_for(Some(GestureClass::IndexUp));
        for _ in 0..10 {
            counters.update(&flags);
        }
        assert!(counters.is_eligible(GestureClass::IndexUp, 3));
        assert_eq!(counters.first_eligible(3, |_| true), None);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut counters = SustainedCounters::new();
        counters.update(&classify(&fixtures::open_palm()));
        counters.reset();
        assert_eq!(counters, SustainedCounters::new());
    }
}
