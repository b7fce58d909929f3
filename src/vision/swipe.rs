//! Swipe detection over a short history of hand centroids

use crate::types::SwipeDirection;
use std::collections::VecDeque;

/// Frames of centroid history evaluated per swipe
pub const SWIPE_WINDOW: usize = 8;

/// Net horizontal displacement (fraction of frame width) that counts as a swipe
pub const SWIPE_THRESHOLD: f32 = 0.25;

/// Result of evaluating the centroid window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeReading {
    /// Window not yet full
    Filling,
    /// Full window without enough net motion
    Still,
    Swipe(SwipeDirection),
}

impl SwipeReading {
    pub fn direction(self) -> Option<SwipeDirection> {
        match self {
            Self::Swipe(d) => Some(d),
            _ => None,
        }
    }
}

/// Rolling horizontal centroid history, oldest first
pub struct SwipeDetector {
    history: VecDeque<f32>,
}

impl SwipeDetector {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(SWIPE_WINDOW),
        }
    }

    pub fn push(&mut self, centroid_x: f32) {
        if self.history.len() == SWIPE_WINDOW {
            self.history.pop_front();
        }
        self.history.push_back(centroid_x);
    }

    pub fn is_full(&self) -> bool {
        self.history.len() == SWIPE_WINDOW
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Newest minus oldest entry, once the window is full
    pub fn displacement(&self) -> Option<f32> {
        if !self.is_full() {
            return None;
        }
        Some(self.history.back()? - self.history.front()?)
    }

    pub fn evaluate(&self) -> SwipeReading {
        match self.displacement() {
            None => SwipeReading::Filling,
            Some(dx) if dx > SWIPE_THRESHOLD => SwipeReading::Swipe(SwipeDirection::Right),
            Some(dx) if dx < -SWIPE_THRESHOLD => SwipeReading::Swipe(SwipeDirection::Left),
            Some(_) => SwipeReading::Still,
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new()
    }
}
