//! Scripted gesture session
//!
//! Feeds a short synthetic performance (peace sign, a swipe, two open palms)
//! through the controller with a dry-run surface, so nothing on the desktop
//! is touched.
//!
//! Run with: `cargo run --example scripted_session`

use rayos_gesture::{
    DryRunSurface, GestureConfig, GestureController, HandFrame, HandPose, Landmark,
};
use std::time::{Duration, Instant};

/// Fingers are (thumb, index, middle, ring, pinky) extended flags
fn hand(fingers: [bool; 5], x_offset: f32) -> anyhow::Result<HandPose> {
    let mut pts = [Landmark::new(0.5 + x_offset, 0.6); 21];
    pts[0] = Landmark::new(0.5 + x_offset, 0.9);
    for (i, (joint, tip)) in [(2, 4), (6, 8), (10, 12), (14, 16), (18, 20)]
        .into_iter()
        .enumerate()
    {
        let x = 0.4 + 0.05 * i as f32 + x_offset;
        pts[joint] = Landmark::new(x, 0.5);
        pts[tip] = Landmark::new(x, if fingers[i] { 0.2 } else { 0.8 });
    }
    Ok(HandPose::new(&pts)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = GestureConfig {
        cooldown_seconds: 1.0,
        ..GestureConfig::default()
    };
    let mut controller = GestureController::new(config, Box::new(DryRunSurface::new(None)));

    let peace = HandFrame::new(vec![hand([false, true, true, false, false], 0.0)?]);
    let mut script: Vec<HandFrame> = vec![peace; 5];
    script.push(HandFrame::empty());
    for i in 0..8 {
        let three = hand([false, true, true, true, false], -0.05 * i as f32)?;
        script.push(HandFrame::new(vec![three]));
    }
    script.push(HandFrame::empty());
    let open = [true; 5];
    script.push(HandFrame::new(vec![hand(open, 0.0)?, hand(open, 0.3)?]));

    // Frames half a second apart
    let start = Instant::now();
    for (i, frame) in script.iter().enumerate() {
        let now = start + Duration::from_millis(500 * i as u64);
        let outcome = controller.process_frame(frame, now);
        if let Some(fired) = outcome.fired {
            println!("frame {i:>2}: {} ({:?})", fired.trigger.name(), fired.result);
        }
    }
    Ok(())
}
