//! # hand_mouse
//!
//! Drives the desktop pointer from per-frame hand landmarks.
//!
//! ## Architecture
//!
//! ```text
//!  UI context (main thread)                 worker thread ("hand-mouse-worker")
//!  ┌──────────────────────┐   start/stop    ┌──────────────────────────────────┐
//!  │ ControlPanel (minifb)│ ──────────────▶ │ LandmarkSource::read()           │
//!  │  C / F / Q keys      │   AtomicBool    │   → GestureInterpreter           │
//!  │  mouse → SimHand     │                 │   → CursorActuator               │
//!  │                      │ ◀────────────── │   → FeedSlot (when feed shown)   │
//!  └──────────────────────┘    FeedFrame    └──────────────────────────────────┘
//! ```
//!
//! ## Panel keys
//!
//! | Input | Action |
//! |---|---|
//! | `C` | Toggle hand control |
//! | `F` | Toggle debug feed |
//! | `Q` | Hide debug feed |
//! | `Esc` | Stop and exit |
//! | mouse over feed | Simulated index fingertip |
//! | left button | Pinch |
//! | hold `Shift` | Not pointing |

pub mod actuator;
pub mod app;
pub mod cli;
pub mod demo;
pub mod feed;
pub mod panel;
pub mod session;
pub mod source;

pub use actuator::{ActuatorError, CursorActuator, LogActuator, RecordingActuator};
pub use feed::{FeedFrame, FeedSlot};
pub use session::{RunSummary, Session};
pub use source::{LandmarkSource, ScriptedSource, SimHand, SimHandSource, SourceError};

/// Error type for hand_mouse
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Landmark source error: {0}")]
    Source(#[from] SourceError),

    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Configuration error: {0}")]
    Config(#[from] gesture_pointer::ConfigError),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Worker error: {0}")]
    Worker(String),
}

/// Result type for hand_mouse
pub type Result<T> = std::result::Result<T, Error>;
