//! Runtime configuration, loaded once at startup

use crate::error::{GestureError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Browser executable launched by the peace sign
    pub chrome_path: Option<PathBuf>,
    /// Django project directory started by the pinky-up gesture
    pub django_path: Option<PathBuf>,
    /// Minimum time between two accepted triggers
    pub cooldown_seconds: f32,
    /// Consecutive frames a pose must hold before it triggers
    pub frames_required: u32,
    /// Consecutive frames both hands must show an open palm before a screenshot
    pub two_hand_frames_required: u32,
    pub screenshot_dir: PathBuf,
    /// Open each screenshot in the system viewer once saved
    pub open_screenshots: bool,
    /// Pointer mapping target; queried from the display when unset
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    /// Interpreter used for `manage.py runserver`
    pub python_bin: String,
    /// Audible feedback for tone actions
    pub tones: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            django_path: None,
            cooldown_seconds: 2.5,
            frames_required: 3,
            two_hand_frames_required: 1,
            screenshot_dir: PathBuf::from("screenshots"),
            open_screenshots: true,
            screen_width: None,
            screen_height: None,
            python_bin: "python3".to_string(),
            tones: true,
        }
    }
}

impl GestureConfig {
    /// Load from TOML, or JSON when the file ends in `.json`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GestureError::Config(format!("read {}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cooldown_seconds.is_finite() && self.cooldown_seconds > 0.0) {
            return Err(GestureError::Config(format!(
                "cooldown_seconds must be > 0, got {}",
                self.cooldown_seconds
            )));
        }
        if Duration::try_from_secs_f32(self.cooldown_seconds).is_err() {
            return Err(GestureError::Config(format!(
                "cooldown_seconds {} is out of range",
                self.cooldown_seconds
            )));
        }
        if self.frames_required == 0 {
            return Err(GestureError::Config("frames_required must be >= 1".into()));
        }
        if self.two_hand_frames_required == 0 {
            return Err(GestureError::Config(
                "two_hand_frames_required must be >= 1".into(),
            ));
        }
        if matches!(self.screen_width, Some(0)) || matches!(self.screen_height, Some(0)) {
            return Err(GestureError::Config("screen size must be non-zero".into()));
        }
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        // Only reachable out of range when built without `validate`
        Duration::try_from_secs_f32(self.cooldown_seconds).unwrap_or(Duration::MAX)
    }
}
