//! Vision pathway - turning landmark frames into gesture evidence
//!
//! Pose estimation itself happens upstream; this module classifies each
//! hand, tracks how long each gesture has been held, and watches the
//! primary hand's horizontal motion for swipes.

pub mod counter;
pub mod pose;
pub mod source;
pub mod swipe;

pub use counter::SustainedCounters;
pub use pose::{centroid, classify, is_open_palm, matches, FingerStates, GestureFlags};
pub use source::{parse_hands_message, udp_hands_addr_from_env, FrameSource};
pub use swipe::{SwipeDetector, SwipeReading};
