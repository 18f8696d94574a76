//! What a frame asks the pointer to do.

/// Cursor movement in screen pixels.  Coordinates may lie off-screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorIntent {
    MoveTo { x: f64, y: f64 },
}

/// Left-button action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickIntent {
    Click,
    MouseDown,
    MouseUp,
}

/// Either kind of intent, in the shape an actuator consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlIntent {
    MoveTo { x: f64, y: f64 },
    Click,
    MouseDown,
    MouseUp,
}

impl From<CursorIntent> for ControlIntent {
    fn from(intent: CursorIntent) -> Self {
        match intent {
            CursorIntent::MoveTo { x, y } => ControlIntent::MoveTo { x, y },
        }
    }
}

impl From<ClickIntent> for ControlIntent {
    fn from(intent: ClickIntent) -> Self {
        match intent {
            ClickIntent::Click     => ControlIntent::Click,
            ClickIntent::MouseDown => ControlIntent::MouseDown,
            ClickIntent::MouseUp   => ControlIntent::MouseUp,
        }
    }
}

/// Output of one interpreted frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameIntents {
    pub cursor: Option<CursorIntent>,
    pub click:  Option<ClickIntent>,
}

impl FrameIntents {
    pub fn is_empty(&self) -> bool { self.cursor.is_none() && self.click.is_none() }

    /// Intents in dispatch order: the move first, then the button.
    pub fn ordered(&self) -> impl Iterator<Item = ControlIntent> {
        self.cursor.map(ControlIntent::from)
            .into_iter()
            .chain(self.click.map(ControlIntent::from))
    }
}
