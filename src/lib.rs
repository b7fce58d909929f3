//! # RayOS Gesture - Phase 2b: The Hands
//!
//! Turns per-frame hand landmarks into desktop actions. Frames come from an
//! external pose estimator (UDP, a replay file or stdin), are classified into
//! gestures, debounced over consecutive frames and cooldown windows, and
//! dispatched to an [`ActionSurface`].

pub mod actions;
pub mod arbiter;
pub mod config;
pub mod error;
pub mod types;
pub mod vision;

pub use actions::{
    Action, ActionOutput, ActionSurface, DesktopActions, DryRunSurface, RecordingSurface,
};
pub use arbiter::{FiredTrigger, FrameOutcome, Trigger, TriggerArbiter};
pub use config::GestureConfig;
pub use error::{GestureError, Result};
pub use types::*;

use crossbeam_channel::Sender;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Owns the arbiter and the action surface, and drives them from a frame channel
pub struct GestureController {
    arbiter: TriggerArbiter,
    surface: Box<dyn ActionSurface>,
    events_tx: Option<Sender<FiredTrigger>>,
    frames_seen: u64,
}

impl GestureController {
    pub fn new(config: GestureConfig, surface: Box<dyn ActionSurface>) -> Self {
        log::info!(
            "Gesture controller ready (cooldown {:.1}s, {} frames to trigger)",
            config.cooldown_seconds,
            config.frames_required
        );
        Self {
            arbiter: TriggerArbiter::new(config),
            surface,
            events_tx: None,
            frames_seen: 0,
        }
    }

    /// Forward every fired trigger (clicks included) to `tx`
    pub fn connect_events(&mut self, tx: Sender<FiredTrigger>) {
        log::info!("Connecting trigger event stream");
        self.events_tx = Some(tx);
    }

    pub fn arbiter(&self) -> &TriggerArbiter {
        &self.arbiter
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Run one frame through the arbiter at time `now`
    pub fn process_frame(&mut self, frame: &HandFrame, now: Instant) -> FrameOutcome {
        self.frames_seen += 1;
        let outcome = self.arbiter.process(frame, now, self.surface.as_mut());

        if let Some(ref tx) = self.events_tx {
            for fired in outcome.click.iter().chain(outcome.fired.iter()) {
                if let Err(e) = tx.send(fired.clone()) {
                    log::warn!("Failed to forward trigger event: {}", e);
                }
            }
        }
        outcome
    }

    /// Process frames until the source closes or `shutdown` receives a signal
    pub async fn run(
        &mut self,
        mut frames: mpsc::Receiver<HandFrame>,
        mut shutdown: mpsc::Receiver<()>,
    ) -> Result<()> {
        log::info!("Starting gesture frame loop...");

        loop {
            tokio::select! {
                biased;
                Some(()) = shutdown.recv() => {
                    log::info!("Frame loop stopping on shutdown signal");
                    break;
                }
                frame = frames.recv() => match frame {
                    Some(frame) => {
                        self.process_frame(&frame, Instant::now());
                        if let Some(tasks) = self.surface.background() {
                            tasks.reap().await;
                        }
                    }
                    None => {
                        log::info!("Frame source closed after {} frames", self.frames_seen);
                        break;
                    }
                },
            }
        }
        Ok(())
    }

    /// Give launched helpers (tone playback, screenshot viewers) a short grace period
    pub async fn shutdown(mut self) -> Result<()> {
        log::info!("Shutting down gesture controller...");
        if let Some(tasks) = self.surface.background() {
            let pending = tasks.pending();
            if pending > 0 {
                log::info!("Waiting on {pending} background task(s)");
            }
            if tokio::time::timeout(SHUTDOWN_GRACE, tasks.join_all()).await.is_err() {
                log::warn!("Background tasks still running after {SHUTDOWN_GRACE:?}, abandoning");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::pose::fixtures;

    #[test]
    fn events_are_forwarded() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut controller =
            GestureController::new(GestureConfig::default(), Box::new(RecordingSurface::new()));
        controller.connect_events(tx);

        let frame = HandFrame::new(vec![fixtures::fist()]);
        let start = Instant::now();
        for i in 0..3 {
            controller.process_frame(&frame, start + Duration::from_millis(33 * i));
        }

        let event = rx.try_recv().expect("one event");
        assert_eq!(event.trigger, Trigger::Gesture(GestureClass::Fist));
        assert!(rx.try_recv().is_err());
        assert_eq!(controller.frames_seen(), 3);
    }

    #[tokio::test]
    async fn run_stops_when_source_closes() {
        let (tx, rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = mpsc::channel(1);
        let mut controller =
            GestureController::new(GestureConfig::default(), Box::new(RecordingSurface::new()));

        for _ in 0..3 {
            tx.send(HandFrame::new(vec![fixtures::peace()])).await.unwrap();
        }
        drop(tx);

        controller.run(rx, stop_rx).await.unwrap();
        assert_eq!(controller.frames_seen(), 3);
        assert_eq!(
            controller.arbiter().state().last_fired(),
            Some(Trigger::Gesture(GestureClass::Peace))
        );
        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let (_tx, rx) = mpsc::channel::<HandFrame>(8);
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let mut controller =
            GestureController::new(GestureConfig::default(), Box::new(DryRunSurface::new(None)));

        stop_tx.send(()).await.unwrap();
        controller.run(rx, stop_rx).await.unwrap();
        assert_eq!(controller.frames_seen(), 0);
    }
}
