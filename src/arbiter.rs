//! Trigger arbiter
//!
//! Owns all per-session mutable state (gesture counters, centroid history,
//! last-fired bookkeeping, pointer smoothing) and decides once per frame
//! whether anything fires. At most one discrete trigger (swipe, held pose,
//! or two-hand pose) fires per frame, and never within the cooldown window
//! of the previous one. Pointer movement runs alongside and is not gated.

use crate::actions::{Action, ActionOutput, ActionSurface};
use crate::config::GestureConfig;
use crate::types::{
    GestureClass, HandFrame, HandPose, SwipeDirection, TabDirection, INDEX_TIP, THUMB_TIP,
};
use crate::vision::{
    centroid, classify, is_open_palm, GestureFlags, SustainedCounters, SwipeDetector,
    SwipeReading,
};
use std::time::{Duration, Instant};

/// Fraction of the remaining distance the pointer moves each frame
pub const POINTER_SMOOTHING: f32 = 0.35;

/// Thumb-to-index tip distance that counts as a click pinch
pub const PINCH_THRESHOLD: f32 = 0.03;

/// Screen size assumed when the action surface cannot report one
pub const DEFAULT_SCREEN: (u32, u32) = (1920, 1080);

/// Anything that can fire an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Gesture(GestureClass),
    Swipe(SwipeDirection),
    TwoHandScreenshot,
    IndexClick,
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gesture(GestureClass::ThumbsUp) => "Thumbs Up -> Success Beep",
            Self::Gesture(GestureClass::Peace) => "Peace Sign -> Open Chrome",
            Self::Gesture(GestureClass::Fist) => "Fist -> Close Chrome",
            Self::Gesture(GestureClass::OpenPalm) => "Open Palm -> Alert Beep",
            Self::Gesture(GestureClass::PinkyUp) => "Pinky Up -> Start Django",
            Self::Gesture(GestureClass::IndexUp) | Self::IndexClick => "Index Click",
            Self::Swipe(SwipeDirection::Right) => "Swipe Right -> Prev Tab",
            Self::Swipe(SwipeDirection::Left) => "Swipe Left -> Next Tab",
            Self::TwoHandScreenshot => "Two Hands -> Screenshot",
        }
    }

    /// The action bound to this trigger
    pub fn action(&self, config: &GestureConfig) -> Action {
        match self {
            Self::Gesture(GestureClass::ThumbsUp) => Action::PlaySuccessTone,
            Self::Gesture(GestureClass::Peace) => Action::OpenBrowser {
                path: config.chrome_path.clone(),
            },
            Self::Gesture(GestureClass::Fist) => Action::CloseBrowser,
            Self::Gesture(GestureClass::OpenPalm) => Action::PlayAlertTone,
            Self::Gesture(GestureClass::PinkyUp) => Action::StartLocalServer {
                path: config.django_path.clone(),
            },
            // Index-up only fires through the pinch click
            Self::Gesture(GestureClass::IndexUp) | Self::IndexClick => Action::Click,
            Self::Swipe(SwipeDirection::Right) => Action::SwitchTab(TabDirection::Prev),
            Self::Swipe(SwipeDirection::Left) => Action::SwitchTab(TabDirection::Next),
            Self::TwoHandScreenshot => Action::TakeScreenshot {
                dest_dir: config.screenshot_dir.clone(),
            },
        }
    }
}

/// What the current frame showed, for re-arming the last trigger
struct Observation {
    flags: Option<GestureFlags>,
    swipe: SwipeReading,
    two_open_palms: bool,
}

/// Cooldown and same-trigger suppression bookkeeping. Lives for the whole session.
#[derive(Debug, Clone, Default)]
pub struct TriggerState {
    last_fired_at: Option<Instant>,
    last_fired: Option<Trigger>,
    /// Set once the last trigger's condition has been seen released
    rearmed: bool,
}

impl TriggerState {
    pub fn last_fired(&self) -> Option<Trigger> {
        self.last_fired
    }

    pub fn last_fired_at(&self) -> Option<Instant> {
        self.last_fired_at
    }

    pub fn cooldown_elapsed(&self, now: Instant, cooldown: Duration) -> bool {
        self.last_fired_at
            .map_or(true, |at| now.saturating_duration_since(at) >= cooldown)
    }

    /// The previous trigger may not repeat until released or superseded.
    /// Clicks are only cooldown-gated.
    pub fn is_suppressed(&self, trigger: Trigger) -> bool {
        trigger != Trigger::IndexClick && self.last_fired == Some(trigger) && !self.rearmed
    }

    fn record(&mut self, trigger: Trigger, now: Instant) {
        self.last_fired_at = Some(now);
        self.last_fired = Some(trigger);
        self.rearmed = false;
    }

    fn observe(&mut self, obs: &Observation) {
        let Some(last) = self.last_fired else {
            return;
        };
        let released = match last {
            Trigger::Gesture(class) => !obs.flags.as_ref().map_or(false, |f| f.get(class)),
            Trigger::Swipe(dir) => match obs.swipe {
                SwipeReading::Filling => obs.flags.is_none(),
                SwipeReading::Still => true,
                SwipeReading::Swipe(seen) => seen != dir,
            },
            Trigger::TwoHandScreenshot => !obs.two_open_palms,
            Trigger::IndexClick => true,
        };
        if released {
            self.rearmed = true;
        }
    }
}

/// A trigger that passed the cooldown and had its action run
#[derive(Debug, Clone, PartialEq)]
pub struct FiredTrigger {
    pub trigger: Trigger,
    pub action: Action,
    /// Action failures are kept as text; they never abort the frame loop
    pub result: std::result::Result<ActionOutput, String>,
}

impl FiredTrigger {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Smoothed pointer position sent this frame
    pub pointer: Option<(i32, i32)>,
    pub click: Option<FiredTrigger>,
    pub fired: Option<FiredTrigger>,
}

/// Inputs each candidate evaluator sees
pub struct CandidateContext<'a> {
    pub counters: &'a SustainedCounters,
    pub swipe: SwipeReading,
    pub two_hand_frames: u32,
    pub config: &'a GestureConfig,
    pub state: &'a TriggerState,
}

/// Proposes at most one trigger for the frame
pub type CandidateEvaluator = fn(&CandidateContext<'_>) -> Option<Trigger>;

/// Evaluated left to right; the first proposal is the frame's attempt
pub const CANDIDATES: [CandidateEvaluator; 3] =
    [swipe_candidate, sustained_candidate, two_hand_candidate];

pub fn swipe_candidate(ctx: &CandidateContext<'_>) -> Option<Trigger> {
    let trigger = Trigger::Swipe(ctx.swipe.direction()?);
    (!ctx.state.is_suppressed(trigger)).then_some(trigger)
}

pub fn sustained_candidate(ctx: &CandidateContext<'_>) -> Option<Trigger> {
    ctx.counters
        .first_eligible(ctx.config.frames_required, |class| {
            !ctx.state.is_suppressed(Trigger::Gesture(class))
        })
        .map(Trigger::Gesture)
}

pub fn two_hand_candidate(ctx: &CandidateContext<'_>) -> Option<Trigger> {
    let trigger = Trigger::TwoHandScreenshot;
    (ctx.two_hand_frames >= ctx.config.two_hand_frames_required
        && !ctx.state.is_suppressed(trigger))
    .then_some(trigger)
}

pub struct TriggerArbiter {
    config: GestureConfig,
    counters: SustainedCounters,
    swipe: SwipeDetector,
    two_hand_frames: u32,
    state: TriggerState,
    /// Last smoothed pointer position in screen pixels
    pointer: Option<(f32, f32)>,
}

impl TriggerArbiter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            counters: SustainedCounters::new(),
            swipe: SwipeDetector::new(),
            two_hand_frames: 0,
            state: TriggerState::default(),
            pointer: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn counters(&self) -> &SustainedCounters {
        &self.counters
    }

    pub fn swipe(&self) -> &SwipeDetector {
        &self.swipe
    }

    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    /// Classify one frame and fire at most one trigger
    pub fn process(
        &mut self,
        frame: &HandFrame,
        now: Instant,
        surface: &mut dyn ActionSurface,
    ) -> FrameOutcome {
        let primary = frame.primary();
        let flags = primary.map(classify);

        match &flags {
            Some(f) => self.counters.update(f),
            None => self.counters.reset(),
        }
        match primary {
            Some(pose) => self.swipe.push(centroid(pose).0),
            None => self.swipe.clear(),
        }
        let two_open_palms = frame.hands.len() == 2 && frame.hands.iter().all(is_open_palm);
        self.two_hand_frames = if two_open_palms {
            self.two_hand_frames.saturating_add(1)
        } else {
            0
        };

        let swipe = self.swipe.evaluate();
        if log::log_enabled!(log::Level::Debug) {
            if let Some(f) = &flags {
                let active: Vec<&str> = f.active().map(GestureClass::as_str).collect();
                if !active.is_empty() {
                    log::debug!("Gestures: {}", active.join(", "));
                }
            }
            if let Some(dir) = swipe.direction() {
                log::debug!("Swipe {} in window", dir.as_str());
            }
        }

        self.state.observe(&Observation {
            flags,
            swipe,
            two_open_palms,
        });

        let mut outcome = FrameOutcome::default();

        if let Some(pose) = primary {
            if self
                .counters
                .is_eligible(GestureClass::IndexUp, self.config.frames_required)
            {
                outcome.pointer = Some(self.drive_pointer(pose, surface));
                if pinched(pose) {
                    outcome.click = self.attempt_fire(Trigger::IndexClick, now, surface);
                }
            }
        }

        // A click above may have cleared the swipe window
        let ctx = CandidateContext {
            counters: &self.counters,
            swipe: self.swipe.evaluate(),
            two_hand_frames: self.two_hand_frames,
            config: &self.config,
            state: &self.state,
        };
        let proposal = CANDIDATES.iter().find_map(|evaluate| evaluate(&ctx));
        if let Some(trigger) = proposal {
            outcome.fired = self.attempt_fire(trigger, now, surface);
        }

        outcome
    }

    /// Fire `trigger` if the cooldown allows, then clear per-gesture state
    fn attempt_fire(
        &mut self,
        trigger: Trigger,
        now: Instant,
        surface: &mut dyn ActionSurface,
    ) -> Option<FiredTrigger> {
        if !self.state.cooldown_elapsed(now, self.config.cooldown()) {
            log::debug!("{} held back by cooldown", trigger.name());
            return None;
        }

        log::info!("[ACTION] {} -> executing", trigger.name());
        let action = trigger.action(&self.config);
        let result = match action.perform(surface) {
            Ok(output) => {
                log::info!("{}", action.feedback());
                Ok(output)
            }
            Err(e) => {
                log::warn!("Action error: {e}");
                Err(e.to_string())
            }
        };

        // A failed action still consumes the cooldown window
        self.state.record(trigger, now);
        self.counters.reset();
        self.swipe.clear();
        self.two_hand_frames = 0;

        Some(FiredTrigger {
            trigger,
            action,
            result,
        })
    }

    /// Map the index tip to the screen with exponential smoothing
    fn drive_pointer(&mut self, pose: &HandPose, surface: &mut dyn ActionSurface) -> (i32, i32) {
        let (w, h) = surface.screen_size().unwrap_or(DEFAULT_SCREEN);
        let tip = pose.landmark(INDEX_TIP);
        let raw = (
            tip.x.clamp(0.0, 1.0) * w as f32,
            tip.y.clamp(0.0, 1.0) * h as f32,
        );
        let next = match self.pointer {
            None => raw,
            Some((px, py)) => (
                px + POINTER_SMOOTHING * (raw.0 - px),
                py + POINTER_SMOOTHING * (raw.1 - py),
            ),
        };
        self.pointer = Some(next);

        let (x, y) = (next.0.round() as i32, next.1.round() as i32);
        if let Err(e) = surface.move_cursor(x, y) {
            log::debug!("Pointer move failed: {e}");
        }
        (x, y)
    }
}

fn pinched(pose: &HandPose) -> bool {
    pose.landmark(THUMB_TIP).distance(&pose.landmark(INDEX_TIP)) < PINCH_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::RecordingSurface;
    use crate::types::Landmark;
    use crate::vision::pose::fixtures;

    const FRAME: Duration = Duration::from_millis(33);

    fn config() -> GestureConfig {
        GestureConfig {
            cooldown_seconds: 2.5,
            frames_required: 3,
            ..GestureConfig::default()
        }
    }

    fn one(pose: HandPose) -> HandFrame {
        HandFrame::new(vec![pose])
    }

    /// Index up with the thumb tip `gap` away from the index tip
    fn pointing(gap: f32) -> HandPose {
        let mut pts = *fixtures::index_up().landmarks();
        let tip = pts[INDEX_TIP];
        pts[THUMB_TIP] = Landmark::new(tip.x + gap, tip.y);
        HandPose::new(&pts).unwrap()
    }

    struct Session {
        arbiter: TriggerArbiter,
        surface: RecordingSurface,
        now: Instant,
    }

    impl Session {
        fn new() -> Self {
            Self {
                arbiter: TriggerArbiter::new(config()),
                surface: RecordingSurface::new().with_screen(1000, 500),
                now: Instant::now(),
            }
        }

        fn step(&mut self, frame: &HandFrame) -> FrameOutcome {
            self.now += FRAME;
            self.arbiter.process(frame, self.now, &mut self.surface)
        }

        fn wait(&mut self, d: Duration) {
            self.now += d;
        }
    }

    #[test]
    fn held_pose_fires_on_threshold_frame() {
        let mut s = Session::new();
        let frame = one(fixtures::peace());
        assert!(s.step(&frame).fired.is_none());
        assert!(s.step(&frame).fired.is_none());
        let fired = s.step(&frame).fired.expect("fires on third frame");
        assert_eq!(fired.trigger, Trigger::Gesture(GestureClass::Peace));
        assert_eq!(fired.action, Action::OpenBrowser { path: None });
        assert_eq!(s.arbiter.counters().count(GestureClass::Peace), 0);
    }

    #[test]
    fn thumbs_up_beats_fist() {
        let mut s = Session::new();
        let frame = one(fixtures::thumbs_up());
        let fired = (0..3).find_map(|_| s.step(&frame).fired).unwrap();
        assert_eq!(fired.trigger, Trigger::Gesture(GestureClass::ThumbsUp));
        assert_eq!(fired.action, Action::PlaySuccessTone);
    }

    #[test]
    fn cooldown_blocks_a_different_gesture() {
        let mut s = Session::new();
        let peace = one(fixtures::peace());
        let fist = one(fixtures::fist());
        for _ in 0..3 {
            s.step(&peace);
        }
        for _ in 0..10 {
            assert!(s.step(&fist).fired.is_none());
        }
        s.wait(Duration::from_secs(3));
        let fired = s.step(&fist).fired.expect("cooldown over");
        assert_eq!(fired.trigger, Trigger::Gesture(GestureClass::Fist));
    }

    #[test]
    fn held_gesture_does_not_repeat_until_released() {
        let mut s = Session::new();
        let palm = one(fixtures::open_palm());
        for _ in 0..3 {
            s.step(&palm);
        }
        s.wait(Duration::from_secs(5));
        for _ in 0..20 {
            assert!(s.step(&palm).fired.is_none());
        }

        // Releasing the pose re-arms it
        s.step(&HandFrame::empty());
        let refired = (0..3).find_map(|_| s.step(&palm).fired).expect("re-armed");
        assert_eq!(refired.trigger, Trigger::Gesture(GestureClass::OpenPalm));
        assert_eq!(
            s.surface.triggered(),
            vec![&Action::PlayAlertTone, &Action::PlayAlertTone]
        );
    }

    #[test]
    fn failed_action_still_consumes_cooldown() {
        let mut s = Session::new();
        s.surface = RecordingSurface::new().fail_on("close_browser");
        let fist = one(fixtures::fist());
        let fired = (0..3).find_map(|_| s.step(&fist).fired).unwrap();
        assert!(!fired.succeeded());
        assert_eq!(
            s.arbiter.state().last_fired(),
            Some(Trigger::Gesture(GestureClass::Fist))
        );

        let peace = one(fixtures::peace());
        for _ in 0..5 {
            assert!(s.step(&peace).fired.is_none());
        }
    }

    #[test]
    fn swipe_left_switches_to_next_tab() {
        let mut s = Session::new();
        let mut fired = None;
        for i in 0..8 {
            // Three fingers up matches no gesture class
            let pose = fixtures::hand([false, true, true, true, false], -0.05 * i as f32);
            if let Some(f) = s.step(&one(pose)).fired {
                fired = Some(f);
            }
        }
        let fired = fired.expect("swipe fired");
        assert_eq!(fired.trigger, Trigger::Swipe(SwipeDirection::Left));
        assert_eq!(fired.action, Action::SwitchTab(TabDirection::Next));
        assert!(s.arbiter.swipe().is_empty());
    }

    #[test]
    fn swipe_outranks_held_gesture() {
        let mut s = Session::new();
        let fist = one(fixtures::fist());
        for _ in 0..3 {
            s.step(&fist);
        }
        // Both the palm and the swipe become eligible inside the cooldown
        for i in 0..8 {
            let out = s.step(&one(fixtures::open_palm_at(0.05 * i as f32)));
            assert!(out.fired.is_none());
        }
        assert_eq!(s.arbiter.swipe().evaluate(), SwipeReading::Swipe(SwipeDirection::Right));

        s.wait(Duration::from_secs(3));
        let fired = s.step(&one(fixtures::open_palm_at(0.4))).fired.unwrap();
        assert_eq!(fired.trigger, Trigger::Swipe(SwipeDirection::Right));
        assert_eq!(fired.action, Action::SwitchTab(TabDirection::Prev));
    }

    #[test]
    fn two_open_palms_take_a_screenshot() {
        let mut s = Session::new();
        let both = HandFrame::new(vec![fixtures::open_palm(), fixtures::open_palm_at(0.3)]);
        let fired = s.step(&both).fired.expect("single frame is enough by default");
        assert_eq!(fired.trigger, Trigger::TwoHandScreenshot);
        assert_eq!(
            fired.result,
            Ok(ActionOutput::Saved("screenshots/screenshot_0.png".into()))
        );
    }

    #[test]
    fn one_open_palm_never_takes_a_screenshot() {
        let mut s = Session::new();
        let palm = one(fixtures::open_palm());
        for _ in 0..50 {
            s.wait(Duration::from_secs(3));
            if let Some(f) = s.step(&palm).fired {
                assert_ne!(f.trigger, Trigger::TwoHandScreenshot);
            }
        }
    }

    #[test]
    fn two_hands_need_both_palms_open() {
        let mut s = Session::new();
        let mixed = HandFrame::new(vec![fixtures::open_palm(), fixtures::fist()]);
        assert!(s.step(&mixed).fired.is_none());
    }

    #[test]
    fn two_hand_threshold_is_configurable() {
        let mut s = Session::new();
        s.arbiter = TriggerArbiter::new(GestureConfig {
            frames_required: 5,
            two_hand_frames_required: 3,
            ..config()
        });
        let both = HandFrame::new(vec![fixtures::open_palm(), fixtures::open_palm_at(0.3)]);
        assert!(s.step(&both).fired.is_none());
        assert!(s.step(&both).fired.is_none());
        let fired = s.step(&both).fired.unwrap();
        assert_eq!(fired.trigger, Trigger::TwoHandScreenshot);
    }

    fn three_fingers_at(x: f32) -> HandFrame {
        one(fixtures::hand([false, true, true, true, false], x))
    }

    #[test]
    fn swipe_does_not_repeat_until_the_hand_settles() {
        let mut s = Session::new();
        let mut fired = Vec::new();
        let mut x = -0.4;
        for _ in 0..8 {
            fired.extend(s.step(&three_fingers_at(x)).fired.map(|f| f.trigger));
            x += 0.05;
        }
        assert_eq!(fired, vec![Trigger::Swipe(SwipeDirection::Right)]);

        // Same-direction motion past the cooldown stays suppressed
        s.wait(Duration::from_secs(3));
        for _ in 0..16 {
            assert!(s.step(&three_fingers_at(x)).fired.is_none());
            x += 0.05;
        }
        assert_eq!(
            s.arbiter.swipe().evaluate(),
            SwipeReading::Swipe(SwipeDirection::Right)
        );

        // A still window re-arms it
        for _ in 0..8 {
            assert!(s.step(&three_fingers_at(x)).fired.is_none());
        }
        assert_eq!(s.arbiter.swipe().evaluate(), SwipeReading::Still);

        let mut refired = Vec::new();
        for _ in 0..8 {
            x += 0.05;
            refired.extend(s.step(&three_fingers_at(x)).fired.map(|f| f.trigger));
        }
        assert_eq!(refired, vec![Trigger::Swipe(SwipeDirection::Right)]);
    }

    #[test]
    fn held_two_palms_fire_once_until_a_hand_drops() {
        let mut s = Session::new();
        s.arbiter = TriggerArbiter::new(GestureConfig {
            frames_required: 1000,
            ..config()
        });
        let both = HandFrame::new(vec![fixtures::open_palm(), fixtures::open_palm_at(0.3)]);

        let mut shots = 0;
        for i in 0..300 {
            if i % 50 == 0 {
                s.wait(Duration::from_secs(3));
            }
            if let Some(f) = s.step(&both).fired {
                assert_eq!(f.trigger, Trigger::TwoHandScreenshot);
                shots += 1;
            }
        }
        assert_eq!(shots, 1);

        // Lowering one hand releases the pose
        assert!(s.step(&one(fixtures::open_palm())).fired.is_none());
        let fired = s.step(&both).fired.expect("re-armed");
        assert_eq!(fired.trigger, Trigger::TwoHandScreenshot);
    }

    #[test]
    fn pointer_follows_index_with_smoothing() {
        let mut s = Session::new();
        let pose = pointing(0.2);
        assert_eq!(s.step(&one(pose.clone())).pointer, None);
        assert_eq!(s.step(&one(pose.clone())).pointer, None);

        let tip = pose.landmark(INDEX_TIP);
        let first = s.step(&one(pose)).pointer.expect("pointer mode");
        assert_eq!(first, ((tip.x * 1000.0).round() as i32, (tip.y * 500.0).round() as i32));

        // Jump right: the pointer only covers 35% of the gap
        let mut pts = *pointing(0.2).landmarks();
        pts[INDEX_TIP] = Landmark::new(0.9, 0.1);
        pts[THUMB_TIP] = Landmark::new(0.1, 0.1);
        let moved = s.step(&one(HandPose::new(&pts).unwrap())).pointer.unwrap();
        let expected_x = first.0 as f32 + POINTER_SMOOTHING * (900.0 - first.0 as f32);
        assert!((moved.0 as f32 - expected_x).abs() <= 1.0);
        assert!(moved.0 < 900);
    }

    #[test]
    fn pointer_moves_are_not_cooldown_gated() {
        let mut s = Session::new();
        let fist = one(fixtures::fist());
        for _ in 0..3 {
            s.step(&fist);
        }
        let pose = one(pointing(0.2));
        let moves = (0..6).filter(|_| s.step(&pose).pointer.is_some()).count();
        assert_eq!(moves, 4);
    }

    #[test]
    fn pinch_clicks_but_near_miss_does_not() {
        let mut s = Session::new();
        let near_miss = one(pointing(0.05));
        for _ in 0..5 {
            assert!(s.step(&near_miss).click.is_none());
        }

        let pinch = one(pointing(0.01));
        let click = s.step(&pinch).click.expect("pinch clicks");
        assert_eq!(click.trigger, Trigger::IndexClick);
        assert_eq!(click.action, Action::Click);

        // The click reset the counters, so pointer mode has to re-engage
        assert_eq!(s.step(&pinch).pointer, None);
    }

    #[test]
    fn click_is_gated_by_cooldown() {
        let mut s = Session::new();
        let pinch = one(pointing(0.01));
        let clicks = (0..30).filter(|_| s.step(&pinch).click.is_some()).count();
        assert_eq!(clicks, 1);

        s.wait(Duration::from_secs(3));
        let clicks = (0..3).filter(|_| s.step(&pinch).click.is_some()).count();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn losing_the_hand_resets_counters() {
        let mut s = Session::new();
        let peace = one(fixtures::peace());
        s.step(&peace);
        s.step(&peace);
        s.step(&HandFrame::empty());
        assert_eq!(s.arbiter.counters().count(GestureClass::Peace), 0);
        assert!(s.step(&peace).fired.is_none());
    }

    #[test]
    fn cooldown_holds_over_a_long_session() {
        let mut s = Session::new();
        let poses = [
            one(fixtures::thumbs_up()),
            one(fixtures::peace()),
            one(fixtures::fist()),
            HandFrame::empty(),
            one(fixtures::pinky_up()),
            HandFrame::new(vec![fixtures::open_palm(), fixtures::open_palm_at(0.3)]),
        ];
        let mut fire_times = Vec::new();
        for i in 0..600 {
            let frame = &poses[(i / 7) % poses.len()];
            let out = s.step(frame);
            if out.fired.is_some() || out.click.is_some() {
                fire_times.push(s.now);
            }
        }
        assert!(fire_times.len() > 1);
        for pair in fire_times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs_f32(2.5));
        }
    }
}
