//! Action surface - the side effects triggers are bound to
//!
//! The arbiter never calls OS facilities directly. It builds an [`Action`]
//! and hands it to whatever [`ActionSurface`] the controller was given:
//! the real desktop, a dry-run logger, or a recorder in tests.

mod background;
mod desktop;
mod tone;

pub use background::{BackgroundTasks, TaskFailure};
pub use desktop::DesktopActions;
pub use tone::{Tone, ALERT_TONE, SAMPLE_RATE, SUCCESS_TONE};

use crate::error::{GestureError, Result};
use crate::types::TabDirection;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Closed set of actions a trigger can invoke
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PlaySuccessTone,
    PlayAlertTone,
    OpenBrowser { path: Option<PathBuf> },
    CloseBrowser,
    StartLocalServer { path: Option<PathBuf> },
    TakeScreenshot { dest_dir: PathBuf },
    SwitchTab(TabDirection),
    MoveCursor { x: i32, y: i32 },
    Click,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlaySuccessTone => "play_success_tone",
            Self::PlayAlertTone => "play_alert_tone",
            Self::OpenBrowser { .. } => "open_browser",
            Self::CloseBrowser => "close_browser",
            Self::StartLocalServer { .. } => "start_local_server",
            Self::TakeScreenshot { .. } => "take_screenshot",
            Self::SwitchTab(_) => "switch_tab",
            Self::MoveCursor { .. } => "move_cursor",
            Self::Click => "click",
        }
    }

    /// Short user-facing confirmation
    pub fn feedback(&self) -> &'static str {
        match self {
            Self::PlaySuccessTone => "Success Beep",
            Self::PlayAlertTone => "Alert Beep",
            Self::OpenBrowser { .. } => "Chrome Opened",
            Self::CloseBrowser => "Chrome Closed",
            Self::StartLocalServer { .. } => "Django Started",
            Self::TakeScreenshot { .. } => "Screenshot Saved",
            Self::SwitchTab(TabDirection::Next) => "Next Tab",
            Self::SwitchTab(TabDirection::Prev) => "Prev Tab",
            Self::MoveCursor { .. } => "Cursor Moved",
            Self::Click => "Click",
        }
    }

    /// Run this action against a surface
    pub fn perform(&self, surface: &mut dyn ActionSurface) -> Result<ActionOutput> {
        match self {
            Self::PlaySuccessTone => surface.play_success_tone()?,
            Self::PlayAlertTone => surface.play_alert_tone()?,
            Self::OpenBrowser { path } => surface.open_browser(path.as_deref())?,
            Self::CloseBrowser => surface.close_browser()?,
            Self::StartLocalServer { path } => surface.start_local_server(path.as_deref())?,
            Self::TakeScreenshot { dest_dir } => {
                return surface.take_screenshot(dest_dir).map(ActionOutput::Saved)
            }
            Self::SwitchTab(direction) => surface.switch_tab(*direction)?,
            Self::MoveCursor { x, y } => surface.move_cursor(*x, *y)?,
            Self::Click => surface.click()?,
        }
        Ok(ActionOutput::Done)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutput {
    Done,
    /// A file the action wrote (screenshots)
    Saved(PathBuf),
}

/// Capability interface the arbiter invokes actions through.
///
/// Every method reports failure through its `Result`; none may panic on an
/// unavailable tool or missing path.
pub trait ActionSurface {
    fn play_success_tone(&mut self) -> Result<()>;
    fn play_alert_tone(&mut self) -> Result<()>;
    fn open_browser(&mut self, path: Option<&Path>) -> Result<()>;
    fn close_browser(&mut self) -> Result<()>;
    fn start_local_server(&mut self, path: Option<&Path>) -> Result<()>;
    fn take_screenshot(&mut self, dest_dir: &Path) -> Result<PathBuf>;
    fn switch_tab(&mut self, direction: TabDirection) -> Result<()>;
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()>;
    fn click(&mut self) -> Result<()>;

    /// Display size in pixels, if the surface knows it
    fn screen_size(&self) -> Option<(u32, u32)> {
        None
    }

    /// Work the surface left running after an action returned
    fn background(&mut self) -> Option<&mut BackgroundTasks> {
        None
    }
}

/// Logs every action and touches nothing
#[derive(Debug, Default)]
pub struct DryRunSurface {
    screen: Option<(u32, u32)>,
}

impl DryRunSurface {
    pub fn new(screen: Option<(u32, u32)>) -> Self {
        Self { screen }
    }
}

impl ActionSurface for DryRunSurface {
    fn play_success_tone(&mut self) -> Result<()> {
        log::info!("[dry-run] success tone");
        Ok(())
    }

    fn play_alert_tone(&mut self) -> Result<()> {
        log::info!("[dry-run] alert tone");
        Ok(())
    }

    fn open_browser(&mut self, path: Option<&Path>) -> Result<()> {
        log::info!("[dry-run] open browser {:?}", path);
        Ok(())
    }

    fn close_browser(&mut self) -> Result<()> {
        log::info!("[dry-run] close browser");
        Ok(())
    }

    fn start_local_server(&mut self, path: Option<&Path>) -> Result<()> {
        log::info!("[dry-run] start local server in {:?}", path);
        Ok(())
    }

    fn take_screenshot(&mut self, dest_dir: &Path) -> Result<PathBuf> {
        let path = dest_dir.join("screenshot_dry_run.png");
        log::info!("[dry-run] screenshot to {}", path.display());
        Ok(path)
    }

    fn switch_tab(&mut self, direction: TabDirection) -> Result<()> {
        log::info!("[dry-run] switch tab {:?}", direction);
        Ok(())
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        log::debug!("[dry-run] cursor -> ({x}, {y})");
        Ok(())
    }

    fn click(&mut self) -> Result<()> {
        log::info!("[dry-run] click");
        Ok(())
    }

    fn screen_size(&self) -> Option<(u32, u32)> {
        self.screen
    }
}

/// Records every action in order; selected actions can be made to fail
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub performed: Vec<Action>,
    failing: HashSet<&'static str>,
    screen: Option<(u32, u32)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Some((width, height));
        self
    }

    /// Make every action with this name report failure (it is still recorded)
    pub fn fail_on(mut self, action_name: &'static str) -> Self {
        self.failing.insert(action_name);
        self
    }

    /// Recorded actions other than pointer moves
    pub fn triggered(&self) -> Vec<&Action> {
        self.performed
            .iter()
            .filter(|a| !matches!(a, Action::MoveCursor { .. }))
            .collect()
    }

    fn record(&mut self, action: Action) -> Result<()> {
        let name = action.name();
        self.performed.push(action);
        if self.failing.contains(name) {
            return Err(GestureError::action(name, "scripted failure"));
        }
        Ok(())
    }
}

impl ActionSurface for RecordingSurface {
    fn play_success_tone(&mut self) -> Result<()> {
        self.record(Action::PlaySuccessTone)
    }

    fn play_alert_tone(&mut self) -> Result<()> {
        self.record(Action::PlayAlertTone)
    }

    fn open_browser(&mut self, path: Option<&Path>) -> Result<()> {
        self.record(Action::OpenBrowser {
            path: path.map(Path::to_path_buf),
        })
    }

    fn close_browser(&mut self) -> Result<()> {
        self.record(Action::CloseBrowser)
    }

    fn start_local_server(&mut self, path: Option<&Path>) -> Result<()> {
        self.record(Action::StartLocalServer {
            path: path.map(Path::to_path_buf),
        })
    }

    fn take_screenshot(&mut self, dest_dir: &Path) -> Result<PathBuf> {
        self.record(Action::TakeScreenshot {
            dest_dir: dest_dir.to_path_buf(),
        })?;
        Ok(dest_dir.join("screenshot_0.png"))
    }

    fn switch_tab(&mut self, direction: TabDirection) -> Result<()> {
        self.record(Action::SwitchTab(direction))
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        self.record(Action::MoveCursor { x, y })
    }

    fn click(&mut self) -> Result<()> {
        self.record(Action::Click)
    }

    fn screen_size(&self) -> Option<(u32, u32)> {
        self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perform_dispatches_to_the_matching_method() {
        let mut surface = RecordingSurface::new();
        let actions = [
            Action::PlaySuccessTone,
            Action::OpenBrowser {
                path: Some(PathBuf::from("/opt/chrome")),
            },
            Action::SwitchTab(TabDirection::Prev),
            Action::MoveCursor { x: 3, y: 4 },
        ];
        for action in &actions {
            action.perform(&mut surface).unwrap();
        }
        assert_eq!(surface.performed, actions.to_vec());
        assert_eq!(surface.triggered().len(), 3);
    }

    #[test]
    fn screenshot_reports_saved_path() {
        let mut surface = RecordingSurface::new();
        let out = Action::TakeScreenshot {
            dest_dir: PathBuf::from("shots"),
        }
        .perform(&mut surface)
        .unwrap();
        assert_eq!(out, ActionOutput::Saved(PathBuf::from("shots/screenshot_0.png")));
    }

    #[test]
    fn scripted_failure_surfaces_as_action_error() {
        let mut surface = RecordingSurface::new().fail_on("close_browser");
        let err = Action::CloseBrowser.perform(&mut surface).unwrap_err();
        assert!(matches!(err, GestureError::Action { action: "close_browser", .. }));
        assert_eq!(surface.performed, vec![Action::CloseBrowser]);
    }

    #[test]
    fn dry_run_accepts_everything() {
        let mut surface = DryRunSurface::new(Some((800, 600)));
        assert!(Action::Click.perform(&mut surface).is_ok());
        assert_eq!(surface.screen_size(), Some((800, 600)));
    }
}
