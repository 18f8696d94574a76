//! # gesture_pointer
//!
//! Turns one hand's landmarks, frame by frame, into pointer intents.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Condition | Action |
//! |---|---|---|
//! | Point | index tip > 30 px above wrist | Move cursor (smoothed, speed-scaled) |
//! | Quick pinch | thumb–index < 20 px, released within 0.6 s | Click (debounced 0.6 s) |
//! | Long pinch | held ≥ 1.0 s | Mouse down; release → mouse up |
//! | Pinch released 0.6–1.0 s | any | Nothing |
//!
//! Everything here is pure: time comes in as an [`Instant`](std::time::Instant)
//! argument and intents go out as values, so a whole gesture can be replayed
//! in a unit test.
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use gesture_pointer::{ClickIntent, GestureConfig, PinchState};
//!
//! let cfg = GestureConfig::default();
//! let t0  = Instant::now();
//! let (s, _)     = PinchState::default().step(10.0, t0, &cfg.pinch);
//! let (_, click) = s.step(30.0, t0 + Duration::from_millis(200), &cfg.pinch);
//! assert_eq!(click, Some(ClickIntent::Click));
//! ```

pub mod config;
pub mod intent;
pub mod interpret;
pub mod pinch;
pub mod pointer;

pub use config::{ConfigError, GestureConfig, PinchConfig, PointerConfig, ScreenSize};
pub use intent::{ClickIntent, ControlIntent, CursorIntent, FrameIntents};
pub use interpret::{interpret, GestureInterpreter};
pub use pinch::{PinchPhase, PinchState};
pub use pointer::{ControlRect, CursorState};
