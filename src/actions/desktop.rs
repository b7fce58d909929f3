//! Desktop action surface backed by system tools
//!
//! Every action spawns a child process and returns immediately; the child is
//! reaped on a background task so its exit status still ends up in the log.
//! Linux relies on `xdotool` for pointer and keyboard input, the same tool
//! the rest of RayOS uses to read the pointer.

use super::background::BackgroundTasks;
use super::tone::{self, ALERT_TONE, SUCCESS_TONE};
use super::ActionSurface;
use crate::config::GestureConfig;
use crate::error::{GestureError, Result};
use crate::types::TabDirection;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::process::Command;
use tokio::runtime::Handle;

const FALLBACK_URL: &str = "https://www.google.com";

/// Capture tools, tried in order; each takes the output path last
#[cfg(target_os = "macos")]
const SCREENSHOT_TOOLS: &[(&str, &[&str])] = &[("screencapture", &["-x"])];

#[cfg(not(target_os = "macos"))]
const SCREENSHOT_TOOLS: &[(&str, &[&str])] = &[
    ("grim", &[]),
    ("scrot", &["-o"]),
    ("import", &["-window", "root"]),
    ("gnome-screenshot", &["-f"]),
];

pub struct DesktopActions {
    tasks: BackgroundTasks,
    python_bin: String,
    tones: bool,
    open_screenshots: bool,
    screen: Option<(u32, u32)>,
    /// Last position sent to the pointer, to skip redundant moves
    last_cursor: Option<(i32, i32)>,
}

impl DesktopActions {
    pub fn new(config: &GestureConfig, handle: Handle) -> Self {
        let screen = match (config.screen_width, config.screen_height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => detect_screen_size(),
        };
        match screen {
            Some((w, h)) => log::info!("Pointer mapped to {w}x{h} screen"),
            None => log::warn!("Could not determine screen size, pointer will use defaults"),
        }

        Self {
            tasks: BackgroundTasks::new(handle),
            python_bin: config.python_bin.clone(),
            tones: config.tones,
            open_screenshots: config.open_screenshots,
            screen,
            last_cursor: None,
        }
    }

    /// Spawn `cmd` and reap it in the background
    fn launch(&mut self, label: &'static str, mut cmd: Command) -> std::io::Result<()> {
        let mut child = {
            let _rt = self.tasks.handle().enter();
            cmd.spawn()?
        };
        self.tasks.spawn(label, async move {
            let status = child.wait().await?;
            if status.success() {
                Ok(())
            } else {
                Err(GestureError::action(label, format!("exited with {status}")))
            }
        });
        Ok(())
    }

    /// Launch the first candidate whose program is installed
    fn launch_first(&mut self, label: &'static str, candidates: Vec<Command>) -> Result<()> {
        for cmd in candidates {
            match self.launch(label, cmd) {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(GestureError::action(label, e.to_string())),
            }
        }
        Err(GestureError::action(label, "no suitable program installed"))
    }

    fn xdotool(&mut self, label: &'static str, args: &[&str]) -> Result<()> {
        if !cfg!(target_os = "linux") {
            return Err(GestureError::action(
                label,
                "pointer and key input need xdotool (Linux)",
            ));
        }
        let mut cmd = quiet("xdotool");
        cmd.args(args);
        self.launch_first(label, vec![cmd])
    }

    fn play_tone(&mut self, label: &'static str, tone: tone::Tone) -> Result<()> {
        if !self.tones {
            log::debug!("Tones disabled, skipping {label}");
            return Ok(());
        }
        self.tasks.spawn(label, tone::play(tone));
        Ok(())
    }
}

impl ActionSurface for DesktopActions {
    fn play_success_tone(&mut self) -> Result<()> {
        self.play_tone("play_success_tone", SUCCESS_TONE)
    }

    fn play_alert_tone(&mut self) -> Result<()> {
        self.play_tone("play_alert_tone", ALERT_TONE)
    }

    fn open_browser(&mut self, path: Option<&Path>) -> Result<()> {
        if let Some(path) = path.filter(|p| p.exists()) {
            return self.launch_first("open_browser", vec![quiet(path)]);
        }
        if let Some(path) = path {
            log::warn!("Browser path {} not found, using system default", path.display());
        }
        self.launch_first("open_browser", browser_candidates())
    }

    fn close_browser(&mut self) -> Result<()> {
        let cmd = if cfg!(windows) {
            let mut cmd = quiet("taskkill");
            cmd.args(["/IM", "chrome.exe", "/F"]);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = quiet("pkill");
            cmd.arg("Google Chrome");
            cmd
        } else {
            let mut cmd = quiet("pkill");
            cmd.arg("chrome");
            cmd
        };
        self.launch_first("close_browser", vec![cmd])
    }

    fn start_local_server(&mut self, path: Option<&Path>) -> Result<()> {
        let dir =
            path.ok_or_else(|| GestureError::action("start_local_server", "django path not set"))?;
        let manage = dir.join("manage.py");
        if !manage.exists() {
            return Err(GestureError::action(
                "start_local_server",
                format!("manage.py not found in {}", dir.display()),
            ));
        }

        // Server output stays on the terminal
        let mut cmd = Command::new(&self.python_bin);
        cmd.args(["manage.py", "runserver"])
            .current_dir(dir)
            .stdin(Stdio::null());
        self.launch_first("start_local_server", vec![cmd])
    }

    fn take_screenshot(&mut self, dest_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dest_dir)?;
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let target = dest_dir.join(format!("screenshot_{secs}.png"));

        let mut capture = None;
        for mut cmd in screenshot_candidates(&target) {
            let spawned = {
                let _rt = self.tasks.handle().enter();
                cmd.spawn()
            };
            match spawned {
                Ok(child) => {
                    capture = Some(child);
                    break;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(GestureError::action("take_screenshot", e.to_string())),
            }
        }
        let mut child = capture
            .ok_or_else(|| GestureError::action("take_screenshot", "no screenshot tool installed"))?;

        let saved = target.clone();
        let open_after = self.open_screenshots;
        self.tasks.spawn("take_screenshot", async move {
            let status = child.wait().await?;
            if !status.success() || !saved.exists() {
                return Err(GestureError::action(
                    "take_screenshot",
                    format!("capture exited with {status}"),
                ));
            }
            log::info!("Screenshot saved to {}", saved.display());
            if open_after {
                if let Err(e) = viewer_command(&saved).spawn() {
                    log::debug!("Could not open screenshot viewer: {e}");
                }
            }
            Ok(())
        });

        Ok(target)
    }

    fn switch_tab(&mut self, direction: TabDirection) -> Result<()> {
        if cfg!(target_os = "macos") {
            let modifiers = match direction {
                TabDirection::Next => "{control down}",
                TabDirection::Prev => "{control down, shift down}",
            };
            let mut cmd = quiet("osascript");
            cmd.arg("-e").arg(format!(
                "tell application \"System Events\" to key code 48 using {modifiers}"
            ));
            return self.launch_first("switch_tab", vec![cmd]);
        }

        let keys = match direction {
            TabDirection::Next => "ctrl+Tab",
            TabDirection::Prev => "ctrl+shift+Tab",
        };
        self.xdotool("switch_tab", &["key", keys])
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        if self.last_cursor.replace((x, y)) == Some((x, y)) {
            return Ok(());
        }
        let (x, y) = (x.to_string(), y.to_string());
        self.xdotool("move_cursor", &["mousemove", x.as_str(), y.as_str()])
    }

    fn click(&mut self) -> Result<()> {
        self.xdotool("click", &["click", "1"])
    }

    fn screen_size(&self) -> Option<(u32, u32)> {
        self.screen
    }

    fn background(&mut self) -> Option<&mut BackgroundTasks> {
        Some(&mut self.tasks)
    }
}

fn quiet(program: impl AsRef<std::ffi::OsStr>) -> Command {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

fn browser_candidates() -> Vec<Command> {
    if cfg!(windows) {
        let mut cmd = quiet("cmd");
        cmd.args(["/C", "start", "", FALLBACK_URL]);
        vec![cmd]
    } else if cfg!(target_os = "macos") {
        let mut cmd = quiet("open");
        cmd.args(["-a", "Google Chrome"]);
        vec![cmd]
    } else {
        let mut candidates: Vec<Command> = [
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ]
        .into_iter()
        .map(quiet)
        .collect();
        let mut fallback = quiet("xdg-open");
        fallback.arg(FALLBACK_URL);
        candidates.push(fallback);
        candidates
    }
}

fn screenshot_candidates(target: &Path) -> Vec<Command> {
    SCREENSHOT_TOOLS
        .iter()
        .map(|&(program, args)| {
            let mut cmd = quiet(program);
            cmd.args(args).arg(target);
            cmd
        })
        .collect()
}

fn viewer_command(path: &Path) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut cmd = quiet("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else if cfg!(target_os = "macos") {
        quiet("open")
    } else {
        quiet("xdg-open")
    };
    cmd.arg(path);
    cmd
}

fn detect_screen_size() -> Option<(u32, u32)> {
    if !cfg!(target_os = "linux") {
        return None;
    }
    let output = std::process::Command::new("xdotool")
        .arg("getdisplaygeometry")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_geometry(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `xdotool getdisplaygeometry` output ("1920 1080")
fn parse_geometry(raw: &str) -> Option<(u32, u32)> {
    let mut parts = raw.split_whitespace();
    let w = parts.next()?.parse().ok()?;
    let h = parts.next()?.parse().ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}
