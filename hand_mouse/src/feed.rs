//! Debug feed: a snapshot of what the worker saw on one frame, for the
//! control panel to draw.  Producing it has no effect on control.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use gesture_pointer::pointer::is_pointing;
use gesture_pointer::{ControlRect, CursorState, GestureInterpreter};
use hand_landmarks::{BoundingBox, Detections, FrameSize, Handedness, LandmarkFrame};

/// Padding around the hand's bounding box, in pixels.
const BOX_PAD: f32 = 20.0;

/// Overlay data for the hand being tracked.
#[derive(Clone, Debug)]
pub struct HandOverlay {
    pub landmarks:  LandmarkFrame,
    pub handedness: Handedness,
    pub bounds:     BoundingBox,
    pub pointing:   bool,
}

/// Everything the feed view draws for one frame.
#[derive(Clone, Debug)]
pub struct FeedFrame {
    pub size:    FrameSize,
    pub control: ControlRect,
    pub hand:    Option<HandOverlay>,
    pub pinch:   &'static str,
    pub cursor:  CursorState,
    pub fps:     f32,
}

impl FeedFrame {
    /// Snapshot after `interpreter` has processed `detections`.
    pub fn capture(detections: &Detections, interpreter: &GestureInterpreter, fps: f32) -> Self {
        let cfg = interpreter.config();
        let hand = detections.primary().map(|h| HandOverlay {
            landmarks:  h.landmarks.clone(),
            handedness: h.handedness,
            bounds:     h.landmarks.bounding_box().padded(BOX_PAD),
            pointing:   is_pointing(&h.landmarks, &cfg.pointer),
        });
        FeedFrame {
            size:    detections.size,
            control: ControlRect::inset(detections.size, cfg.pointer.control_margin),
            hand,
            pinch:   interpreter.pinch().phase.label(),
            cursor:  interpreter.cursor(),
            fps,
        }
    }
}

/// Single-slot mailbox between worker and UI.  A newer frame replaces an
/// unread older one.
#[derive(Debug, Default)]
pub struct FeedSlot {
    latest: Mutex<Option<FeedFrame>>,
}

impl FeedSlot {
    pub fn publish(&self, frame: FeedFrame) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    pub fn take(&self) -> Option<FeedFrame> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn clear(&self) {
        self.take();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FpsCounter
// ════════════════════════════════════════════════════════════════════════════

/// Frame-rate estimate from frame timestamps, lightly smoothed.
#[derive(Debug, Default)]
pub struct FpsCounter {
    last: Option<Instant>,
    fps:  f32,
}

impl FpsCounter {
    const SMOOTHING: f32 = 0.8;

    pub fn new() -> Self { Self::default() }

    /// Record a frame taken `at` and return the current estimate.
    pub fn tick(&mut self, at: Instant) -> f32 {
        if let Some(prev) = self.last {
            let dt = at.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                let instant = 1.0 / dt;
                self.fps = if self.fps == 0.0 {
                    instant
                } else {
                    self.fps * Self::SMOOTHING + instant * (1.0 - Self::SMOOTHING)
                };
            }
        }
        self.last = Some(at);
        self.fps
    }
}
