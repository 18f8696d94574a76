//! Cursor actuators: where intents end up.
//!
//! The worker opens its actuator on its own thread, so implementations do
//! not need to be `Send`.

use std::sync::{Arc, Mutex, PoisonError};

use gesture_pointer::{ControlIntent, ScreenSize};
use tracing::{info, trace};

/// An intent could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{action} failed: {reason}")]
pub struct ActuatorError {
    pub action: &'static str,
    pub reason: String,
}

impl ActuatorError {
    pub fn new(action: &'static str, reason: impl Into<String>) -> Self {
        ActuatorError { action, reason: reason.into() }
    }
}

/// Performs pointer intents against some pointer.
pub trait CursorActuator {
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError>;
    fn click(&mut self)      -> Result<(), ActuatorError>;
    fn mouse_down(&mut self) -> Result<(), ActuatorError>;
    fn mouse_up(&mut self)   -> Result<(), ActuatorError>;

    /// Resolution of the pointer's screen, when the backend knows it.
    fn screen_size(&self) -> Option<ScreenSize> { None }

    fn dispatch(&mut self, intent: ControlIntent) -> Result<(), ActuatorError> {
        match intent {
            ControlIntent::MoveTo { x, y } => self.move_to(x, y),
            ControlIntent::Click           => self.click(),
            ControlIntent::MouseDown       => self.mouse_down(),
            ControlIntent::MouseUp         => self.mouse_up(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LogActuator
// ════════════════════════════════════════════════════════════════════════════

/// Writes intents to the log instead of moving anything.
#[derive(Debug, Default)]
pub struct LogActuator {
    moves: u64,
}

impl CursorActuator for LogActuator {
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError> {
        self.moves += 1;
        trace!(x, y, moves = self.moves, "move to");
        Ok(())
    }
    fn click(&mut self) -> Result<(), ActuatorError> {
        info!(moves = self.moves, "click");
        Ok(())
    }
    fn mouse_down(&mut self) -> Result<(), ActuatorError> {
        info!("mouse down");
        Ok(())
    }
    fn mouse_up(&mut self) -> Result<(), ActuatorError> {
        info!("mouse up");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RecordingActuator
// ════════════════════════════════════════════════════════════════════════════

/// Appends every intent to a shared list.  Clones share the same list, so
/// one clone can go to the worker while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    log: Arc<Mutex<Vec<ControlIntent>>>,
}

impl RecordingActuator {
    pub fn new() -> Self { Self::default() }

    /// Everything recorded so far.
    pub fn intents(&self) -> Vec<ControlIntent> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Recorded intents other than moves.
    pub fn buttons(&self) -> Vec<ControlIntent> {
        self.intents().into_iter()
            .filter(|i| !matches!(i, ControlIntent::MoveTo { .. }))
            .collect()
    }

    fn push(&self, intent: ControlIntent) -> Result<(), ActuatorError> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).push(intent);
        Ok(())
    }
}

impl CursorActuator for RecordingActuator {
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError> {
        self.push(ControlIntent::MoveTo { x, y })
    }
    fn click(&mut self)      -> Result<(), ActuatorError> { self.push(ControlIntent::Click) }
    fn mouse_down(&mut self) -> Result<(), ActuatorError> { self.push(ControlIntent::MouseDown) }
    fn mouse_up(&mut self)   -> Result<(), ActuatorError> { self.push(ControlIntent::MouseUp) }
}

// ════════════════════════════════════════════════════════════════════════════
// EnigoActuator: real OS pointer (feature = "enigo")
// ════════════════════════════════════════════════════════════════════════════

/// Drives the OS pointer through `enigo`.  Moves are absolute; coordinates
/// are truncated to whole pixels and the OS clamps off-screen positions.
#[cfg(feature = "enigo")]
pub struct EnigoActuator {
    enigo: enigo::Enigo,
}

#[cfg(feature = "enigo")]
impl EnigoActuator {
    pub fn new() -> Result<Self, ActuatorError> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())
            .map_err(|e| ActuatorError::new("connect", e.to_string()))?;
        Ok(EnigoActuator { enigo })
    }

    fn button(&mut self, action: &'static str, direction: enigo::Direction) -> Result<(), ActuatorError> {
        use enigo::Mouse;
        self.enigo
            .button(enigo::Button::Left, direction)
            .map_err(|e| ActuatorError::new(action, e.to_string()))
    }
}

#[cfg(feature = "enigo")]
impl CursorActuator for EnigoActuator {
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError> {
        use enigo::Mouse;
        self.enigo
            .move_mouse(x as i32, y as i32, enigo::Coordinate::Abs)
            .map_err(|e| ActuatorError::new("move", e.to_string()))
    }
    fn click(&mut self)      -> Result<(), ActuatorError> { self.button("click", enigo::Direction::Click) }
    fn mouse_down(&mut self) -> Result<(), ActuatorError> { self.button("mouse down", enigo::Direction::Press) }
    fn mouse_up(&mut self)   -> Result<(), ActuatorError> { self.button("mouse up", enigo::Direction::Release) }

    fn screen_size(&self) -> Option<ScreenSize> {
        use enigo::Mouse;
        let (w, h) = self.enigo.main_display().ok()?;
        (w > 0 && h > 0).then(|| ScreenSize::new(w as u32, h as u32))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_routes_each_intent() {
        let rec = RecordingActuator::new();
        let mut act = rec.clone();
        for intent in [
            ControlIntent::MoveTo { x: 3.0, y: 4.0 },
            ControlIntent::MouseDown,
            ControlIntent::MoveTo { x: 5.0, y: 6.0 },
            ControlIntent::MouseUp,
            ControlIntent::Click,
        ] {
            act.dispatch(intent).unwrap();
        }
        assert_eq!(rec.intents().len(), 5);
        assert_eq!(rec.buttons(), vec![
            ControlIntent::MouseDown, ControlIntent::MouseUp, ControlIntent::Click,
        ]);
    }

    #[test]
    fn log_actuator_accepts_everything() {
        let mut act = LogActuator::default();
        act.dispatch(ControlIntent::MoveTo { x: -10.0, y: 5000.0 }).unwrap();
        act.dispatch(ControlIntent::Click).unwrap();
        assert_eq!(act.moves, 1);
        assert_eq!(act.screen_size(), None);
    }

    #[test]
    fn actuator_error_message() {
        let err = ActuatorError::new("click", "no display");
        assert_eq!(err.to_string(), "click failed: no display");
    }
}
