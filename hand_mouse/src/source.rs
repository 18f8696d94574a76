//! Landmark sources: where each frame's hands come from.
//!
//! The session worker owns exactly one [`LandmarkSource`] for the lifetime
//! of a run and drops it when the run ends, which releases whatever device
//! sits behind it.  Two sources ship with the crate:
//!
//! * [`ScriptedSource`] replays a fixed list of frames, then closes.
//! * [`SimHandSource`] synthesizes a hand that follows the mouse inside the
//!   control panel, standing in for camera + detector.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use hand_landmarks::{
    Detections, FrameSize, HandObservation, Handedness, Landmark, LandmarkFrame, Point,
    LANDMARK_COUNT,
};

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// Why a read produced no frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The frame could not be read this time; try again.
    #[error("frame read failed: {0}")]
    Transient(String),

    /// The source has no more frames.
    #[error("landmark source closed")]
    Closed,

    /// The source could not be opened.
    #[error("cannot open landmark source: {0}")]
    Open(String),
}

/// Anything that can deliver one camera frame's detections per call.
pub trait LandmarkSource: Send {
    /// Block until the next frame has been processed.
    fn read(&mut self) -> Result<Detections, SourceError>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn read(&mut self) -> Result<Detections, SourceError> { (**self).read() }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource
// ════════════════════════════════════════════════════════════════════════════

/// Replays prepared frames in order, then reports [`SourceError::Closed`].
pub struct ScriptedSource {
    frames: VecDeque<Result<Detections, SourceError>>,
    pace:   Option<Duration>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Detections>) -> Self {
        ScriptedSource {
            frames: frames.into_iter().map(Ok).collect(),
            pace:   None,
        }
    }

    /// Like [`new`](Self::new), but individual reads may fail.
    pub fn with_results(results: impl IntoIterator<Item = Result<Detections, SourceError>>) -> Self {
        ScriptedSource { frames: results.into_iter().collect(), pace: None }
    }

    /// Sleep this long before handing out each frame.
    pub fn paced(mut self, interval: Duration) -> Self {
        self.pace = Some(interval);
        self
    }

    pub fn remaining(&self) -> usize { self.frames.len() }
}

impl LandmarkSource for ScriptedSource {
    fn read(&mut self) -> Result<Detections, SourceError> {
        let next = self.frames.pop_front().ok_or(SourceError::Closed)?;
        if let Some(pace) = self.pace {
            thread::sleep(pace);
        }
        next
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic hand geometry
// ════════════════════════════════════════════════════════════════════════════

/// Wrist distance below the index tip when pointing.
const SIM_FOREARM_PX: f32 = 140.0;
/// Thumb tip offset from the index tip with the hand open.
const SIM_THUMB_OPEN: (f32, f32) = (-60.0, 10.0);
/// Thumb tip offset from the index tip while pinching.
const SIM_THUMB_PINCH: (f32, f32) = (-6.0, 0.0);

/// Build a plausible right hand with the index fingertip at `tip`.
///
/// Pointing puts the wrist well below the tip; not pointing drops the tip
/// level with the knuckles so the pointing gate fails.  Pinching brings the
/// thumb tip within a few pixels of the index tip.
pub fn synthetic_hand(tip: Point, pinched: bool, pointing: bool, size: FrameSize) -> LandmarkFrame {
    let wrist = if pointing {
        tip.offset(0.0, SIM_FOREARM_PX)
    } else {
        tip.offset(40.0, 10.0)
    };
    let lerp = |a: Point, b: Point, t: f32| Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);

    let mut pts = [wrist; LANDMARK_COUNT];
    let mut set = |lm: Landmark, p: Point| pts[lm.index()] = p;

    // index finger, straight from wrist to tip
    set(Landmark::IndexMcp, lerp(wrist, tip, 0.45));
    set(Landmark::IndexPip, lerp(wrist, tip, 0.65));
    set(Landmark::IndexDip, lerp(wrist, tip, 0.83));
    set(Landmark::IndexTip, tip);

    // thumb, from the wrist toward its tip
    let (tx, ty) = if pinched { SIM_THUMB_PINCH } else { SIM_THUMB_OPEN };
    let thumb_tip = tip.offset(tx, ty);
    let thumb_base = wrist.offset(-25.0, -15.0);
    set(Landmark::ThumbCmc, thumb_base);
    set(Landmark::ThumbMcp, lerp(thumb_base, thumb_tip, 0.4));
    set(Landmark::ThumbIp,  lerp(thumb_base, thumb_tip, 0.7));
    set(Landmark::ThumbTip, thumb_tip);

    // middle, ring and pinky curled against the palm
    let knuckle = lerp(wrist, tip, 0.45);
    for (i, chain) in [
        [Landmark::MiddleMcp, Landmark::MiddlePip, Landmark::MiddleDip, Landmark::MiddleTip],
        [Landmark::RingMcp,   Landmark::RingPip,   Landmark::RingDip,   Landmark::RingTip],
        [Landmark::PinkyMcp,  Landmark::PinkyPip,  Landmark::PinkyDip,  Landmark::PinkyTip],
    ].into_iter().enumerate() {
        let mcp = knuckle.offset(16.0 * (i as f32 + 1.0), 4.0 * i as f32);
        set(chain[0], mcp);
        set(chain[1], mcp.offset(2.0, -14.0));
        set(chain[2], mcp.offset(4.0, -4.0));
        set(chain[3], mcp.offset(3.0, 8.0));
    }

    LandmarkFrame::new(pts, size)
}

// ════════════════════════════════════════════════════════════════════════════
// SimHand: shared pointer state written by the control panel
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the control panel window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer moved to canvas coordinates.
    Pointer { x: f32, y: f32 },
    /// Pointer left the canvas, so the hand disappears.
    PointerLeft,
    /// Left button held (pinch) or released.
    Pinch(bool),
    /// Pointing gesture on or off.
    Pointing(bool),
}

#[derive(Clone, Copy, Debug)]
struct SimHandState {
    pointer:  Option<Point>,
    pinched:  bool,
    pointing: bool,
}

impl Default for SimHandState {
    fn default() -> Self {
        SimHandState { pointer: None, pinched: false, pointing: true }
    }
}

/// Cloneable handle to the simulated hand.  The panel applies [`SimInput`]s;
/// every [`SimHandSource`] opened from it reads the same state.
#[derive(Clone, Default)]
pub struct SimHand {
    state: Arc<Mutex<SimHandState>>,
}

impl SimHand {
    pub fn new() -> Self { Self::default() }

    pub fn apply(&self, input: SimInput) {
        let mut s = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match input {
            SimInput::Pointer { x, y } => s.pointer = Some(Point::new(x, y)),
            SimInput::PointerLeft      => s.pointer = None,
            SimInput::Pinch(on)        => s.pinched = on,
            SimInput::Pointing(on)     => s.pointing = on,
        }
    }

    fn snapshot(&self) -> SimHandState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource
// ════════════════════════════════════════════════════════════════════════════

/// Camera-paced source that reports the simulated hand once per frame.
pub struct SimHandSource {
    hand:       SimHand,
    size:       FrameSize,
    interval:   Duration,
    next_frame: Instant,
}

impl SimHandSource {
    pub fn new(hand: SimHand, size: FrameSize, interval: Duration) -> Self {
        SimHandSource { hand, size, interval, next_frame: Instant::now() }
    }

    /// Detections for the current hand state, stamped `at`.
    fn observe(&self, at: Instant) -> Detections {
        let s = self.hand.snapshot();
        match s.pointer {
            None => Detections::empty(self.size, at),
            Some(tip) => {
                let frame = synthetic_hand(tip, s.pinched, s.pointing, self.size);
                Detections::single(HandObservation::new(frame, Handedness::Right), at)
            }
        }
    }
}

impl LandmarkSource for SimHandSource {
    fn read(&mut self) -> Result<Detections, SourceError> {
        let now = Instant::now();
        if self.next_frame > now {
            thread::sleep(self.next_frame - now);
        }
        let at = Instant::now();
        self.next_frame = at + self.interval;
        Ok(self.observe(at))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: FrameSize = FrameSize::new(640, 480);

    #[test]
    fn scripted_source_replays_then_closes() {
        let t0 = Instant::now();
        let mut src = ScriptedSource::new(vec![
            Detections::empty(SIZE, t0),
            Detections::empty(SIZE, t0 + Duration::from_millis(100)),
        ]);
        assert_eq!(src.remaining(), 2);
        assert_eq!(src.read().unwrap().captured_at, t0);
        assert_eq!(src.read().unwrap().captured_at, t0 + Duration::from_millis(100));
        assert_eq!(src.read().unwrap_err(), SourceError::Closed);
        assert_eq!(src.read().unwrap_err(), SourceError::Closed);
    }

    #[test]
    fn scripted_source_passes_failures_through() {
        let t0 = Instant::now();
        let mut src = ScriptedSource::with_results(vec![
            Err(SourceError::Transient("dropped".into())),
            Ok(Detections::empty(SIZE, t0)),
        ]);
        assert!(matches!(src.read(), Err(SourceError::Transient(_))));
        assert!(src.read().is_ok());
    }

    #[test]
    fn synthetic_hand_points_and_opens() {
        let frame = synthetic_hand(Point::new(320.0, 200.0), false, true, SIZE);
        assert_eq!(frame.index_tip(), Point::new(320.0, 200.0));
        assert!(frame.index_tip().y < frame.wrist().y - 30.0);
        assert!(frame.distance(Landmark::ThumbTip, Landmark::IndexTip) > 20.0);
    }

    #[test]
    fn synthetic_hand_pinches() {
        let frame = synthetic_hand(Point::new(320.0, 200.0), true, true, SIZE);
        assert!(frame.distance(Landmark::ThumbTip, Landmark::IndexTip) < 20.0);
    }

    #[test]
    fn synthetic_hand_not_pointing_fails_the_gate() {
        let frame = synthetic_hand(Point::new(320.0, 200.0), false, false, SIZE);
        assert!(!(frame.index_tip().y < frame.wrist().y - 30.0));
    }

    #[test]
    fn sim_source_follows_applied_input() {
        let hand = SimHand::new();
        let mut src = SimHandSource::new(hand.clone(), SIZE, Duration::from_millis(1));

        assert!(src.read().unwrap().is_empty());

        hand.apply(SimInput::Pointer { x: 100.0, y: 150.0 });
        hand.apply(SimInput::Pinch(true));
        let det = src.read().unwrap();
        let primary = det.primary().unwrap();
        assert_eq!(primary.handedness, Handedness::Right);
        assert_eq!(primary.landmarks.index_tip(), Point::new(100.0, 150.0));
        assert!(primary.landmarks.distance(Landmark::ThumbTip, Landmark::IndexTip) < 20.0);

        hand.apply(SimInput::PointerLeft);
        assert!(src.read().unwrap().is_empty());
    }

    #[test]
    fn sim_source_is_paced() {
        let mut src = SimHandSource::new(SimHand::new(), SIZE, Duration::from_millis(20));
        let a = src.read().unwrap().captured_at;
        let b = src.read().unwrap().captured_at;
        assert!(b.duration_since(a) >= Duration::from_millis(20));
    }
}
