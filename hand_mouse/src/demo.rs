//! Canned gestures for `hand_mouse demo`.
//!
//! Each scenario is a list of frames 100 ms apart, built from
//! [`synthetic_hand`], so the whole pipeline can be watched without a
//! camera or a window.

use std::time::{Duration, Instant};

use gesture_pointer::ControlIntent;
use hand_landmarks::{Detections, FrameSize, HandObservation, Handedness, Point};

use crate::source::synthetic_hand;

/// Frame spacing of every scenario.
pub const DEMO_FRAME: Duration = Duration::from_millis(100);

/// Camera resolution the scenarios are built for.
pub const DEMO_CAMERA: FrameSize = FrameSize::new(640, 480);

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoScenario {
    /// Pinch for 0.3 s: one click.
    Click,
    /// Pinch for 1.3 s while moving right: button down, then up.
    Drag,
    /// Pinch for 0.8 s: too long to click, too short to drag.
    DeadZone,
}

impl DemoScenario {
    /// Button intents the scenario should produce.
    pub fn expected_buttons(self) -> Vec<ControlIntent> {
        match self {
            DemoScenario::Click    => vec![ControlIntent::Click],
            DemoScenario::Drag     => vec![ControlIntent::MouseDown, ControlIntent::MouseUp],
            DemoScenario::DeadZone => vec![],
        }
    }
}

/// Frames for `scenario`, the first stamped `t0`.
pub fn script(scenario: DemoScenario, t0: Instant) -> Vec<Detections> {
    // (tip, pinched); None is a frame where the detector lost the hand
    let steps: Vec<Option<(Point, bool)>> = match scenario {
        DemoScenario::Click => {
            let tip = Point::new(320.0, 240.0);
            [false, false, true, true, true, false, false]
                .into_iter()
                .map(|p| Some((tip, p)))
                .collect()
        }
        DemoScenario::Drag => (0..17)
            .map(|i| {
                let tip = Point::new(200.0 + 15.0 * i as f32, 240.0);
                match i {
                    7           => None,
                    2..=14      => Some((tip, true)),
                    _           => Some((tip, false)),
                }
            })
            .collect(),
        DemoScenario::DeadZone => {
            let tip = Point::new(400.0, 300.0);
            (0..12).map(|i| Some((tip, (2..=9).contains(&i)))).collect()
        }
    };

    steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| {
            let at = t0 + DEMO_FRAME * i as u32;
            match step {
                None => Detections::empty(DEMO_CAMERA, at),
                Some((tip, pinched)) => {
                    let frame = synthetic_hand(tip, pinched, true, DEMO_CAMERA);
                    Detections::single(HandObservation::new(frame, Handedness::Right), at)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_pointer::{GestureConfig, GestureInterpreter};

    fn run(scenario: DemoScenario) -> Vec<ControlIntent> {
        let mut gi = GestureInterpreter::new(GestureConfig::default());
        let mut buttons = Vec::new();
        for det in script(scenario, Instant::now()) {
            let out = gi.interpret(det.primary().map(|h| &h.landmarks), det.captured_at);
            buttons.extend(out.click.map(ControlIntent::from));
        }
        buttons.extend(gi.finish().click.map(ControlIntent::from));
        buttons
    }

    #[test]
    fn every_scenario_matches_its_expectation() {
        for s in [DemoScenario::Click, DemoScenario::Drag, DemoScenario::DeadZone] {
            assert_eq!(run(s), s.expected_buttons(), "{s:?}");
        }
    }

    #[test]
    fn frames_are_evenly_spaced() {
        let t0 = Instant::now();
        let frames = script(DemoScenario::Drag, t0);
        assert_eq!(frames.len(), 17);
        assert_eq!(frames[3].captured_at - frames[2].captured_at, DEMO_FRAME);
        assert!(frames[7].is_empty());
    }
}
