//! Session lifecycle against scripted sources and a recording actuator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gesture_pointer::{ControlIntent, GestureConfig};
use hand_landmarks::{Detections, FrameSize, HandObservation, Handedness, Point};
use hand_mouse::demo::{self, DemoScenario};
use hand_mouse::session::{ActuatorOpener, SourceOpener};
use hand_mouse::source::synthetic_hand;
use hand_mouse::{
    CursorActuator, LandmarkSource, RecordingActuator, ScriptedSource, Session, SimHand,
    SimHandSource, SourceError,
};

const CAMERA: FrameSize = FrameSize::new(640, 480);

fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}

fn hand_at(tip: Point, pinched: bool, at: Instant) -> Detections {
    let frame = synthetic_hand(tip, pinched, true, CAMERA);
    Detections::single(HandObservation::new(frame, Handedness::Right), at)
}

fn scripted(frames: Vec<Detections>) -> SourceOpener {
    Arc::new(move || Ok(Box::new(ScriptedSource::new(frames.clone())) as Box<dyn LandmarkSource>))
}

fn recording(rec: &RecordingActuator) -> ActuatorOpener {
    let rec = rec.clone();
    Arc::new(move || Ok(Box::new(rec.clone()) as Box<dyn CursorActuator>))
}

/// A hand that never ends; the session has to be stopped.
fn endless(sim: &SimHand) -> SourceOpener {
    let sim = sim.clone();
    Arc::new(move || {
        Ok(Box::new(SimHandSource::new(sim.clone(), CAMERA, Duration::from_millis(5))) as Box<dyn LandmarkSource>)
    })
}

fn click_script(t0: Instant) -> Vec<Detections> {
    let tip = Point::new(320.0, 240.0);
    [false, true, true, false]
        .into_iter()
        .enumerate()
        .map(|(i, p)| hand_at(tip, p, t0 + Duration::from_millis(100 * i as u64)))
        .collect()
}

#[test]
fn scripted_click_reaches_the_actuator() {
    let rec = RecordingActuator::new();
    let mut session = Session::new(GestureConfig::default(), scripted(click_script(Instant::now())), recording(&rec));

    session.start().unwrap();
    wait_until("source to close", || !session.is_running());
    session.stop();

    assert_eq!(rec.buttons(), vec![ControlIntent::Click]);
    let summary = session.last_summary().unwrap();
    assert_eq!(summary.frames, 4);
    assert_eq!(summary.frames_with_hand, 4);
    assert_eq!(summary.actuator_failures, 0);
}

#[test]
fn start_is_idempotent() {
    let opens = Arc::new(AtomicUsize::new(0));
    let sim = SimHand::new();
    let inner = endless(&sim);
    let counted: SourceOpener = {
        let opens = Arc::clone(&opens);
        Arc::new(move || {
            opens.fetch_add(1, Ordering::SeqCst);
            inner()
        })
    };
    let mut session = Session::new(GestureConfig::default(), counted, recording(&RecordingActuator::new()));

    session.start().unwrap();
    session.start().unwrap();
    wait_until("source to open", || opens.load(Ordering::SeqCst) >= 1);
    session.start().unwrap();
    assert!(session.is_running());
    session.stop();
    assert_eq!(opens.load(Ordering::SeqCst), 1);

    // a fresh run opens a fresh source
    session.start().unwrap();
    wait_until("second open", || opens.load(Ordering::SeqCst) == 2);
    session.stop();
}

#[test]
fn stop_is_idempotent_and_safe_before_start() {
    let sim = SimHand::new();
    let mut session = Session::new(GestureConfig::default(), endless(&sim), recording(&RecordingActuator::new()));
    session.stop();
    assert!(!session.is_running());
    assert!(session.last_summary().is_none());

    session.start().unwrap();
    session.stop();
    session.stop();
    assert!(!session.is_running());
    assert!(session.last_summary().is_some());
}

#[test]
fn closed_source_ends_the_run() {
    let rec = RecordingActuator::new();
    let mut session = Session::new(GestureConfig::default(), scripted(Vec::new()), recording(&rec));
    session.start().unwrap();
    wait_until("run to end", || !session.is_running());
    assert!(rec.intents().is_empty());

    // restart after the run ended by itself
    session.start().unwrap();
    wait_until("second run to end", || !session.is_running());
    session.stop();
}

#[test]
fn drag_in_progress_is_released_on_stop() {
    let sim = SimHand::new();
    sim.apply(hand_mouse::source::SimInput::Pointer { x: 320.0, y: 240.0 });
    sim.apply(hand_mouse::source::SimInput::Pinch(true));

    let rec = RecordingActuator::new();
    let mut session = Session::new(GestureConfig::default(), endless(&sim), recording(&rec));
    session.start().unwrap();
    wait_until("button down", || rec.buttons().contains(&ControlIntent::MouseDown));
    session.stop();

    assert_eq!(rec.buttons(), vec![ControlIntent::MouseDown, ControlIntent::MouseUp]);
}

#[test]
fn transient_reads_are_skipped() {
    let t0 = Instant::now();
    let mut results: Vec<Result<Detections, SourceError>> = Vec::new();
    for (i, det) in click_script(t0).into_iter().enumerate() {
        results.push(Ok(det));
        if i == 1 {
            results.push(Err(SourceError::Transient("dropped frame".into())));
            results.push(Err(SourceError::Transient("dropped frame".into())));
        }
    }
    let opener: SourceOpener = Arc::new(move || {
        Ok(Box::new(ScriptedSource::with_results(results.clone())) as Box<dyn LandmarkSource>)
    });

    let rec = RecordingActuator::new();
    let mut session = Session::new(GestureConfig::default(), opener, recording(&rec));
    session.start().unwrap();
    wait_until("run to end", || !session.is_running());
    session.stop();

    assert_eq!(rec.buttons(), vec![ControlIntent::Click]);
    let summary = session.last_summary().unwrap();
    assert_eq!(summary.skipped_reads, 2);
    assert_eq!(summary.frames, 4);
}

#[test]
fn feed_frames_only_while_shown() {
    let sim = SimHand::new();
    sim.apply(hand_mouse::source::SimInput::Pointer { x: 200.0, y: 200.0 });
    let mut session = Session::new(GestureConfig::default(), endless(&sim), recording(&RecordingActuator::new()));

    session.start().unwrap();
    thread::sleep(Duration::from_millis(40));
    assert!(session.drain_feed().is_none());

    assert!(session.toggle_feed());
    let mut frame = None;
    wait_until("a feed frame", || {
        frame = session.drain_feed();
        frame.is_some()
    });
    let frame = frame.unwrap();
    assert_eq!(frame.size, CAMERA);
    assert!(frame.hand.is_some());

    assert!(!session.toggle_feed());
    thread::sleep(Duration::from_millis(20));
    session.stop();
    // a frame captured just before the toggle may still have landed
    session.set_show_feed(false);
    assert!(session.drain_feed().is_none());
}

#[test]
fn failed_open_leaves_the_session_stopped() {
    let failing: SourceOpener = Arc::new(|| Err(SourceError::Open("no camera".into())));
    let rec = RecordingActuator::new();
    let mut session = Session::new(GestureConfig::default(), failing, recording(&rec));

    session.start().unwrap();
    wait_until("worker to give up", || !session.is_running());
    session.stop();
    assert!(rec.intents().is_empty());
    assert_eq!(session.last_summary().map(|s| s.frames), Some(0));
}

#[test]
fn source_failure_mid_run_ends_the_run() {
    let t0 = Instant::now();
    let results: Vec<Result<Detections, SourceError>> = vec![
        Ok(hand_at(Point::new(320.0, 240.0), false, t0)),
        Err(SourceError::Open("camera unplugged".into())),
        Ok(hand_at(Point::new(320.0, 240.0), true, t0 + Duration::from_millis(100))),
    ];
    let opener: SourceOpener = Arc::new(move || {
        Ok(Box::new(ScriptedSource::with_results(results.clone())) as Box<dyn LandmarkSource>)
    });

    let rec = RecordingActuator::new();
    let mut session = Session::new(GestureConfig::default(), opener, recording(&rec));
    session.start().unwrap();
    wait_until("run to end", || !session.is_running());
    session.stop();

    let summary = session.last_summary().unwrap();
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.skipped_reads, 0);
    assert!(rec.buttons().is_empty());
}

/// Intents reaching the actuator for one pass over `frames`.
fn intents_with_feed(frames: Vec<Detections>, shown: bool) -> Vec<ControlIntent> {
    let rec = RecordingActuator::new();
    let mut session = Session::new(GestureConfig::default(), scripted(frames), recording(&rec));
    session.set_show_feed(shown);
    session.start().unwrap();
    wait_until("run to end", || !session.is_running());
    session.stop();
    rec.intents()
}

#[test]
fn feed_visibility_does_not_change_intents() {
    let frames = demo::script(DemoScenario::Drag, Instant::now());

    let hidden = intents_with_feed(frames.clone(), false);
    let shown = intents_with_feed(frames, true);

    assert!(hidden.contains(&ControlIntent::MouseDown));
    assert!(hidden.iter().filter(|i| matches!(i, ControlIntent::MoveTo { .. })).count() > 1);
    assert_eq!(hidden, shown);
}
