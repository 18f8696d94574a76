//! Session controller: the background worker that bridges
//! Landmark Source → Gesture Interpreter → Cursor Actuator.
//!
//! The UI context talks to the worker only through two atomic flags
//! (`running`, `show_feed`) and reads overlay snapshots out of a
//! [`FeedSlot`].  A flag flip is seen by the worker on its next frame.
//!
//! The source and actuator are opened on the worker thread at each
//! [`Session::start`] and dropped when the run ends, so the device behind
//! the source is held only while control is enabled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use gesture_pointer::{ControlIntent, FrameIntents, GestureConfig, GestureInterpreter};
use tracing::{debug, error, info, warn};

use crate::actuator::{ActuatorError, CursorActuator};
use crate::feed::{FeedFrame, FeedSlot, FpsCounter};
use crate::source::{LandmarkSource, SourceError};
use crate::{Error, Result};

/// Opens a fresh landmark source for one run.
pub type SourceOpener =
    Arc<dyn Fn() -> std::result::Result<Box<dyn LandmarkSource>, SourceError> + Send + Sync>;

/// Opens a fresh actuator for one run (called on the worker thread).
pub type ActuatorOpener =
    Arc<dyn Fn() -> std::result::Result<Box<dyn CursorActuator>, ActuatorError> + Send + Sync>;

// ════════════════════════════════════════════════════════════════════════════
// SessionFlags
// ════════════════════════════════════════════════════════════════════════════

/// The only state shared between the UI context and the worker.
#[derive(Debug, Default)]
pub struct SessionFlags {
    running:   AtomicBool,
    show_feed: AtomicBool,
}

impl SessionFlags {
    pub fn is_running(&self) -> bool { self.running.load(Ordering::Acquire) }
    pub fn show_feed(&self)  -> bool { self.show_feed.load(Ordering::Relaxed) }
}

// ════════════════════════════════════════════════════════════════════════════
// RunSummary
// ════════════════════════════════════════════════════════════════════════════

/// Counters for one run, logged when it ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames:            u64,
    pub frames_with_hand:  u64,
    pub skipped_reads:     u64,
    pub intents:           u64,
    pub actuator_failures: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

/// Start/stop lifecycle and feed toggle for hand control.
pub struct Session {
    config:        GestureConfig,
    flags:         Arc<SessionFlags>,
    feed:          Arc<FeedSlot>,
    open_source:   SourceOpener,
    open_actuator: ActuatorOpener,
    worker:        Option<JoinHandle<RunSummary>>,
    last_summary:  Option<RunSummary>,
}

impl Session {
    pub fn new(config: GestureConfig, open_source: SourceOpener, open_actuator: ActuatorOpener) -> Self {
        Session {
            config,
            flags: Arc::new(SessionFlags::default()),
            feed: Arc::new(FeedSlot::default()),
            open_source,
            open_actuator,
            worker: None,
            last_summary: None,
        }
    }

    /// Begin hand control.  Does nothing if already running.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        // a run that ended by itself (source closed) still needs joining
        self.join_worker();

        self.flags.running.store(true, Ordering::Release);
        let worker = Worker {
            interpreter:   GestureInterpreter::new(self.config.clone()),
            flags:         Arc::clone(&self.flags),
            feed:          Arc::clone(&self.feed),
            open_source:   Arc::clone(&self.open_source),
            open_actuator: Arc::clone(&self.open_actuator),
        };
        let spawned = thread::Builder::new()
            .name("hand-mouse-worker".into())
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                info!("hand control started");
                Ok(())
            }
            Err(e) => {
                self.flags.running.store(false, Ordering::Release);
                Err(Error::Worker(e.to_string()))
            }
        }
    }

    /// End hand control and wait for the worker to release its source.
    /// Safe to call at any time, any number of times.
    pub fn stop(&mut self) {
        self.flags.running.store(false, Ordering::Release);
        if self.join_worker() {
            info!("hand control stopped");
        }
    }

    /// Start when stopped, stop when running.  Returns the new state.
    pub fn toggle_control(&mut self) -> Result<bool> {
        if self.is_running() {
            self.stop();
        } else {
            self.start()?;
        }
        Ok(self.is_running())
    }

    /// Flip feed visibility.  Returns the new state.
    pub fn toggle_feed(&self) -> bool {
        let shown = !self.flags.show_feed.fetch_xor(true, Ordering::Relaxed);
        if !shown {
            self.feed.clear();
        }
        debug!(shown, "feed toggled");
        shown
    }

    pub fn set_show_feed(&self, shown: bool) {
        self.flags.show_feed.store(shown, Ordering::Relaxed);
        if !shown {
            self.feed.clear();
        }
    }

    pub fn is_running(&self) -> bool { self.flags.is_running() }
    pub fn show_feed(&self)  -> bool { self.flags.show_feed() }

    /// Latest overlay snapshot, if the worker produced one since last call.
    pub fn drain_feed(&self) -> Option<FeedFrame> { self.feed.take() }

    /// Counters of the most recently finished run.
    pub fn last_summary(&self) -> Option<RunSummary> { self.last_summary }

    pub fn config(&self) -> &GestureConfig { &self.config }

    /// Join a finished or stopping worker.  Returns true if there was one.
    fn join_worker(&mut self) -> bool {
        let Some(handle) = self.worker.take() else { return false };
        match handle.join() {
            Ok(summary) => {
                info!(
                    frames = summary.frames,
                    with_hand = summary.frames_with_hand,
                    skipped = summary.skipped_reads,
                    intents = summary.intents,
                    "run finished"
                );
                self.last_summary = Some(summary);
            }
            Err(_) => error!("hand control worker panicked"),
        }
        true
    }
}

impl Drop for Session {
    fn drop(&mut self) { self.stop(); }
}

// ════════════════════════════════════════════════════════════════════════════
// Worker: the run loop
// ════════════════════════════════════════════════════════════════════════════

struct Worker {
    interpreter:   GestureInterpreter,
    flags:         Arc<SessionFlags>,
    feed:          Arc<FeedSlot>,
    open_source:   SourceOpener,
    open_actuator: ActuatorOpener,
}

impl Worker {
    fn run(mut self) -> RunSummary {
        let mut summary = RunSummary::default();

        let mut source = match (self.open_source)() {
            Ok(s)  => s,
            Err(e) => {
                error!(error = %e, "cannot open landmark source");
                self.flags.running.store(false, Ordering::Release);
                return summary;
            }
        };
        let mut actuator = match (self.open_actuator)() {
            Ok(a)  => a,
            Err(e) => {
                error!(error = %e, "cannot open cursor actuator");
                self.flags.running.store(false, Ordering::Release);
                return summary;
            }
        };

        let mut fps = FpsCounter::new();

        while self.flags.is_running() {
            let detections = match source.read() {
                Ok(d) => d,
                Err(SourceError::Closed) => {
                    debug!("landmark source closed");
                    break;
                }
                Err(SourceError::Transient(reason)) => {
                    debug!(%reason, "skipping unreadable frame");
                    summary.skipped_reads += 1;
                    continue;
                }
                Err(e @ SourceError::Open(_)) => {
                    error!(error = %e, "landmark source failed");
                    break;
                }
            };
            summary.frames += 1;

            let hand = detections.primary().map(|h| &h.landmarks);
            if hand.is_some() {
                summary.frames_with_hand += 1;
            }
            let intents = self.interpreter.interpret(hand, detections.captured_at);
            dispatch(actuator.as_mut(), &intents, &mut summary);

            let rate = fps.tick(detections.captured_at);
            if self.flags.show_feed() {
                self.feed.publish(FeedFrame::capture(&detections, &self.interpreter, rate));
            }
        }

        let last = self.interpreter.finish();
        dispatch(actuator.as_mut(), &last, &mut summary);

        self.flags.running.store(false, Ordering::Release);
        drop(source);
        debug!("landmark source released");
        summary
    }
}

/// Forward a frame's intents; failures are logged and otherwise ignored.
fn dispatch(actuator: &mut dyn CursorActuator, intents: &FrameIntents, summary: &mut RunSummary) {
    for intent in intents.ordered() {
        summary.intents += 1;
        if let Err(e) = actuator.dispatch(intent) {
            summary.actuator_failures += 1;
            if !matches!(intent, ControlIntent::MoveTo { .. }) || summary.actuator_failures == 1 {
                warn!(error = %e, ?intent, "cursor actuator failed");
            }
        }
    }
}
