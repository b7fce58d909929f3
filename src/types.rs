//! Core data types for the gesture pipeline

use crate::error::{GestureError, Result};
use serde::{Deserialize, Serialize};

/// Number of points in a hand skeleton
pub const HAND_LANDMARKS: usize = 21;

/// Number of gesture classes
pub const GESTURE_COUNT: usize = 6;

/// Maximum number of hands considered per frame
pub const MAX_HANDS: usize = 2;

pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// A single skeletal point, normalized to the frame (0.0-1.0, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth estimate, unused by classification
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// The 21-point skeleton of one detected hand in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; HAND_LANDMARKS],
}

impl HandPose {
    /// Build a pose, rejecting anything that is not exactly 21 finite points
    pub fn new(points: &[Landmark]) -> Result<Self> {
        if points.len() != HAND_LANDMARKS {
            return Err(GestureError::Landmarks(format!(
                "expected {} landmarks, got {}",
                HAND_LANDMARKS,
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(GestureError::Landmarks(format!("landmark {i} is not finite")));
        }

        let mut landmarks = [Landmark::default(); HAND_LANDMARKS];
        landmarks.copy_from_slice(points);
        Ok(Self { landmarks })
    }

    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; HAND_LANDMARKS] {
        &self.landmarks
    }
}

/// Hands detected in one video frame (primary hand first)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandFrame {
    pub hands: Vec<HandPose>,
    /// Capture timestamp in milliseconds, when the producer supplies one.
    /// Informational only: cooldowns run on the receiver's monotonic clock.
    pub timestamp: Option<u64>,
}

impl HandFrame {
    pub fn new(mut hands: Vec<HandPose>) -> Self {
        hands.truncate(MAX_HANDS);
        Self {
            hands,
            timestamp: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<&HandPose> {
        self.hands.first()
    }
}

/// Static hand poses recognized by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureClass {
    ThumbsUp,
    Peace,
    Fist,
    OpenPalm,
    PinkyUp,
    IndexUp,
}

impl GestureClass {
    pub const ALL: [GestureClass; GESTURE_COUNT] = [
        Self::ThumbsUp,
        Self::Peace,
        Self::Fist,
        Self::OpenPalm,
        Self::PinkyUp,
        Self::IndexUp,
    ];

    /// Discrete triggers in tie-break order. `IndexUp` drives the pointer instead.
    pub const DISCRETE_PRIORITY: [GestureClass; 5] = [
        Self::ThumbsUp,
        Self::Peace,
        Self::Fist,
        Self::OpenPalm,
        Self::PinkyUp,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbs-up",
            Self::Peace => "peace",
            Self::Fist => "fist",
            Self::OpenPalm => "open-palm",
            Self::PinkyUp => "pinky-up",
            Self::IndexUp => "index-up",
        }
    }
}

/// Net horizontal hand motion across the centroid window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Browser tab navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabDirection {
    Next,
    Prev,
}
