//! One frame in, at most one move and one button intent out.

use std::time::Instant;

use hand_landmarks::{Landmark, LandmarkFrame};
use tracing::{debug, trace};

use crate::config::GestureConfig;
use crate::intent::{CursorIntent, FrameIntents};
use crate::pinch::PinchState;
use crate::pointer::{self, CursorState};

/// Interpret one frame.
///
/// `None` (no hand this frame) yields no intents and leaves both states as
/// they were, so a one-frame detection dropout does not end a pinch.
pub fn interpret(
    frame:  Option<&LandmarkFrame>,
    now:    Instant,
    cfg:    &GestureConfig,
    cursor: &mut CursorState,
    pinch:  &mut PinchState,
) -> FrameIntents {
    let Some(frame) = frame else {
        return FrameIntents::default();
    };

    let cursor_intent = pointer::track_pointer(frame, &cfg.pointer, cfg.screen, cursor)
        .map(|(x, y)| CursorIntent::MoveTo { x, y });

    let pinch_distance = frame.distance(Landmark::ThumbTip, Landmark::IndexTip);
    let (next, click) = pinch.step(pinch_distance, now, &cfg.pinch);
    *pinch = next;

    FrameIntents { cursor: cursor_intent, click }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureInterpreter: owns the per-session state
// ════════════════════════════════════════════════════════════════════════════

/// Cursor and pinch state for one session, plus the config they run under.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    config: GestureConfig,
    cursor: CursorState,
    pinch:  PinchState,
}

impl GestureInterpreter {
    /// Fresh state: cursor anchor at `(0, 0)`, no pinch, no prior click.
    pub fn new(config: GestureConfig) -> Self {
        GestureInterpreter {
            config,
            cursor: CursorState::default(),
            pinch:  PinchState::default(),
        }
    }

    pub fn interpret(&mut self, frame: Option<&LandmarkFrame>, now: Instant) -> FrameIntents {
        let before = self.pinch.phase;
        let intents = interpret(frame, now, &self.config, &mut self.cursor, &mut self.pinch);

        if std::mem::discriminant(&before) != std::mem::discriminant(&self.pinch.phase) {
            debug!(from = before.label(), to = self.pinch.phase.label(), "pinch transition");
        }
        if let Some(click) = intents.click {
            debug!(?click, "button intent");
        }
        if let Some(CursorIntent::MoveTo { x, y }) = intents.cursor {
            trace!(x, y, "cursor");
        }
        intents
    }

    /// End the session's gesture: a drag in progress yields its `MouseUp`.
    pub fn finish(&mut self) -> FrameIntents {
        FrameIntents { cursor: None, click: self.pinch.release() }
    }

    pub fn config(&self) -> &GestureConfig { &self.config }
    pub fn cursor(&self) -> CursorState     { self.cursor }
    pub fn pinch(&self)  -> PinchState      { self.pinch }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
