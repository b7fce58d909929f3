//! Error types for the gesture pipeline

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GestureError>;

#[derive(Debug, Error)]
pub enum GestureError {
    /// Invalid or unreadable configuration
    #[error("config error: {0}")]
    Config(String),

    /// Landmark data that cannot form a hand pose
    #[error("malformed landmarks: {0}")]
    Landmarks(String),

    /// An action reported failure
    #[error("action `{action}` failed: {reason}")]
    Action { action: &'static str, reason: String },

    /// A frame source could not be opened
    #[error("frame source unavailable: {0}")]
    Source(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GestureError {
    pub fn action(action: &'static str, reason: impl Into<String>) -> Self {
        Self::Action {
            action,
            reason: reason.into(),
        }
    }
}
