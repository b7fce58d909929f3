//! Pose classifier
//!
//! Stateless predicates over a single `HandPose`. A finger counts as extended
//! when its tip sits strictly above its proximal joint in image coordinates
//! (smaller y is higher on screen).

use crate::types::{
    GestureClass, HandPose, GESTURE_COUNT, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP,
    PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, THUMB_MCP, THUMB_TIP, WRIST,
};

/// Minimum horizontal gap between index and middle tips for a peace sign
pub const PEACE_MIN_SEPARATION: f32 = 0.03;

/// (tip, joint) pairs: thumb, index, middle, ring, pinky
const FINGER_JOINTS: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_MCP),
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Extended/retracted state of each finger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub fn of(pose: &HandPose) -> Self {
        let ext = FINGER_JOINTS.map(|(tip, joint)| pose.landmark(tip).y < pose.landmark(joint).y);
        Self {
            thumb: ext[0],
            index: ext[1],
            middle: ext[2],
            ring: ext[3],
            pinky: ext[4],
        }
    }
}

/// Per-frame truth value of every gesture predicate for one hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureFlags([bool; GESTURE_COUNT]);

impl GestureFlags {
    pub fn get(&self, class: GestureClass) -> bool {
        self.0[class.index()]
    }

    pub fn set(&mut self, class: GestureClass, value: bool) {
        self.0[class.index()] = value;
    }

    /// Classes whose predicate holds
    pub fn active(&self) -> impl Iterator<Item = GestureClass> + '_ {
        GestureClass::ALL.into_iter().filter(|c| self.get(*c))
    }
}

/// Evaluate every predicate against one hand
pub fn classify(pose: &HandPose) -> GestureFlags {
    let mut flags = GestureFlags::default();
    for class in GestureClass::ALL {
        flags.set(class, matches(class, pose));
    }
    flags
}

pub fn matches(class: GestureClass, pose: &HandPose) -> bool {
    match class {
        GestureClass::ThumbsUp => is_thumbs_up(pose),
        GestureClass::Peace => is_peace(pose),
        GestureClass::Fist => is_fist(pose),
        GestureClass::OpenPalm => is_open_palm(pose),
        GestureClass::PinkyUp => is_pinky_up(pose),
        GestureClass::IndexUp => is_index_up(pose),
    }
}

pub fn is_thumbs_up(pose: &HandPose) -> bool {
    let f = FingerStates::of(pose);
    f.thumb
        && !f.index
        && !f.middle
        && !f.ring
        && !f.pinky
        && pose.landmark(THUMB_TIP).y < pose.landmark(WRIST).y
}

pub fn is_peace(pose: &HandPose) -> bool {
    let f = FingerStates::of(pose);
    // Crossed fingers keep the tips together
    let separated =
        (pose.landmark(INDEX_TIP).x - pose.landmark(MIDDLE_TIP).x).abs() > PEACE_MIN_SEPARATION;
    f.index && f.middle && !f.ring && !f.pinky && separated
}

pub fn is_fist(pose: &HandPose) -> bool {
    let f = FingerStates::of(pose);
    !f.index && !f.middle && !f.ring && !f.pinky
}

pub fn is_open_palm(pose: &HandPose) -> bool {
    let f = FingerStates::of(pose);
    f.index && f.middle && f.ring && f.pinky
}

pub fn is_pinky_up(pose: &HandPose) -> bool {
    let f = FingerStates::of(pose);
    f.pinky && !f.index && !f.middle
}

pub fn is_index_up(pose: &HandPose) -> bool {
    let f = FingerStates::of(pose);
    f.index && !f.middle
}

/// Mean (x, y) over all 21 landmarks
pub fn centroid(pose: &HandPose) -> (f32, f32) {
    let n = pose.landmarks().len() as f32;
    let (sx, sy) = pose
        .landmarks()
        .iter()
        .fold((0.0, 0.0), |(sx, sy), l| (sx + l.x, sy + l.y));
    (sx / n, sy / n)
}
