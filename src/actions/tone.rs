//! Audible feedback tones
//!
//! A tone is synthesised as a mono 16-bit sine, written to a temporary WAV
//! and handed to whichever system player is installed. Playback runs on a
//! background task which also removes the WAV afterwards.

use crate::error::{GestureError, Result};

pub const SAMPLE_RATE: u32 = 44_100;

/// Grace period before the temporary WAV is removed
#[cfg(all(not(windows), feature = "audio"))]
const CLEANUP_DELAY: std::time::Duration = std::time::Duration::from_secs(3);

/// Candidate players, tried in order
#[cfg(all(target_os = "macos", feature = "audio"))]
const WAV_PLAYERS: &[(&str, &[&str])] = &[("afplay", &[])];

#[cfg(all(not(windows), not(target_os = "macos"), feature = "audio"))]
const WAV_PLAYERS: &[(&str, &[&str])] = &[
    ("paplay", &[]),
    ("aplay", &["-q"]),
    ("play", &["-q"]),
    ("xdg-open", &[]),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    /// Amplitude as a fraction of full scale
    pub volume: f32,
}

pub const SUCCESS_TONE: Tone = Tone {
    frequency_hz: 700.0,
    duration_ms: 220,
    volume: 0.3,
};

pub const ALERT_TONE: Tone = Tone {
    frequency_hz: 480.0,
    duration_ms: 180,
    volume: 0.3,
};

impl Tone {
    pub fn sample_count(&self) -> usize {
        (SAMPLE_RATE as u64 * self.duration_ms as u64 / 1000) as usize
    }

    pub fn samples(&self) -> Vec<i16> {
        let amplitude = f32::from(i16::MAX) * self.volume.clamp(0.0, 1.0);
        (0..self.sample_count())
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                ((self.frequency_hz * t * std::f32::consts::TAU).sin() * amplitude) as i16
            })
            .collect()
    }

    #[cfg(feature = "audio")]
    pub fn write_wav(&self, path: &std::path::Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let wav_err = |e: hound::Error| GestureError::action("play_tone", e.to_string());

        let mut writer = hound::WavWriter::create(path, spec).map_err(wav_err)?;
        for sample in self.samples() {
            writer.write_sample(sample).map_err(wav_err)?;
        }
        writer.finalize().map_err(wav_err)
    }
}

/// Play a tone to completion. Meant to run as a background task.
#[cfg(windows)]
pub async fn play(tone: Tone) -> Result<()> {
    let script = format!(
        "[console]::beep({}, {})",
        tone.frequency_hz as u32, tone.duration_ms
    );
    let status = tokio::process::Command::new("powershell")
        .args(["-NoProfile", "-c", script.as_str()])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await?;
    if !status.success() {
        return Err(GestureError::action(
            "play_tone",
            format!("powershell exited with {status}"),
        ));
    }
    Ok(())
}

/// Play a tone to completion. Meant to run as a background task.
#[cfg(all(not(windows), feature = "audio"))]
pub async fn play(tone: Tone) -> Result<()> {
    let wav = tempfile::Builder::new()
        .prefix("rayos-tone-")
        .suffix(".wav")
        .tempfile()?
        .into_temp_path();
    tone.write_wav(&wav)?;

    let mut last_err = None;
    for &(program, args) in WAV_PLAYERS {
        let spawned = tokio::process::Command::new(program)
            .args(args.iter().copied())
            .arg(&*wav)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                last_err = Some(e.to_string());
                continue;
            }
        };

        let status = child.wait().await?;
        if status.success() {
            // Players like xdg-open return before the file is read
            tokio::time::sleep(CLEANUP_DELAY).await;
            return Ok(());
        }
        last_err = Some(format!("{program} exited with {status}"));
    }

    Err(GestureError::action(
        "play_tone",
        last_err.unwrap_or_else(|| "no audio player found".to_string()),
    ))
}

#[cfg(all(not(windows), not(feature = "audio")))]
pub async fn play(_tone: Tone) -> Result<()> {
    Err(GestureError::action("play_tone", "built without the `audio` feature"))
}
