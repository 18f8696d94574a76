//! Pinch click/drag state machine.
//!
//! ```text
//!            pinch < threshold                  held ≥ drag_hold
//!   ┌──────┐ ─────────────────▶ ┌────────────┐ ─────────────────▶ ┌──────────┐
//!   │ Idle │                    │ Held{since}│   emits MouseDown  │ Dragging │
//!   └──────┘ ◀───────────────── └────────────┘                    └──────────┘
//!      ▲       release: Click if held < click_delay                     │
//!      │       and the last click is ≥ click_delay ago                  │
//!      └────────────────────────────────────────────────────────────────┘
//!                          release: emits MouseUp
//! ```
//!
//! A pinch released after `click_delay` but before `drag_hold` produces
//! nothing at all.  That gap is kept as-is.

use std::time::{Duration, Instant};

use crate::config::PinchConfig;
use crate::intent::ClickIntent;

/// Where the pinch gesture currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PinchPhase {
    #[default]
    Idle,
    /// Pinching, not yet long enough to drag.
    Held { since: Instant },
    /// Pinching long enough that the button is down.
    Dragging { since: Instant },
}

impl PinchPhase {
    pub fn label(&self) -> &'static str {
        match self {
            PinchPhase::Idle          => "idle",
            PinchPhase::Held { .. }   => "pinch",
            PinchPhase::Dragging { .. } => "drag",
        }
    }
}

/// Pinch phase plus the click debounce timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PinchState {
    pub phase:      PinchPhase,
    pub last_click: Option<Instant>,
}

impl PinchState {
    pub fn is_pinched(&self) -> bool { !matches!(self.phase, PinchPhase::Idle) }

    pub fn is_dragging(&self) -> bool { matches!(self.phase, PinchPhase::Dragging { .. }) }

    /// How long the current pinch has lasted, if there is one.
    pub fn held_for(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            PinchPhase::Idle => None,
            PinchPhase::Held { since } | PinchPhase::Dragging { since } => {
                Some(now.saturating_duration_since(since))
            }
        }
    }

    /// Advance by one frame's pinch distance.
    pub fn step(self, distance: f32, now: Instant, cfg: &PinchConfig) -> (PinchState, Option<ClickIntent>) {
        let pinched = distance < cfg.threshold_px;

        if pinched {
            let since = match self.phase {
                PinchPhase::Idle => now,
                PinchPhase::Held { since } => since,
                PinchPhase::Dragging { .. } => return (self, None),
            };
            if now.saturating_duration_since(since) >= cfg.drag_hold {
                let next = PinchState { phase: PinchPhase::Dragging { since }, ..self };
                return (next, Some(ClickIntent::MouseDown));
            }
            return (PinchState { phase: PinchPhase::Held { since }, ..self }, None);
        }

        match self.phase {
            PinchPhase::Idle => (self, None),
            PinchPhase::Dragging { .. } => {
                (PinchState { phase: PinchPhase::Idle, ..self }, Some(ClickIntent::MouseUp))
            }
            PinchPhase::Held { since } => {
                let held = now.saturating_duration_since(since);
                let debounced = self.last_click
                    .map_or(true, |t| now.saturating_duration_since(t) >= cfg.click_delay);
                if held < cfg.click_delay && debounced {
                    let next = PinchState { phase: PinchPhase::Idle, last_click: Some(now) };
                    (next, Some(ClickIntent::Click))
                } else {
                    (PinchState { phase: PinchPhase::Idle, ..self }, None)
                }
            }
        }
    }

    /// Drop any pinch in progress.  A drag is finished with `MouseUp` so the
    /// button is not left held.
    pub fn release(&mut self) -> Option<ClickIntent> {
        let was_dragging = self.is_dragging();
        self.phase = PinchPhase::Idle;
        was_dragging.then_some(ClickIntent::MouseUp)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
