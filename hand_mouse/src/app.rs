//! Application wiring: builds the session from an [`AppConfig`] and runs the
//! control panel loop, or replays a demo headlessly.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gesture_pointer::{ControlIntent, GestureConfig, ScreenSize};
use hand_landmarks::FrameSize;
use tracing::{debug, info};

use crate::actuator::{CursorActuator, LogActuator, RecordingActuator};
use crate::demo::{self, DemoScenario};
use crate::panel::{ControlPanel, PanelCommand, PanelStatus, FEED_H, FEED_W};
use crate::session::{ActuatorOpener, Session, SourceOpener};
use crate::source::{LandmarkSource, ScriptedSource, SimHand, SimHandSource};
use crate::{Error, Result};

/// Camera resolution of the simulated hand, matching the panel's feed area.
pub const SIM_CAMERA: FrameSize = FrameSize::new(FEED_W as u32, FEED_H as u32);

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Which cursor actuator the session drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ActuatorKind {
    /// Log intents only
    #[default]
    Log,
    /// Move the real OS pointer (needs the `enigo` feature)
    Enigo,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gesture:        GestureConfig,
    pub actuator:       ActuatorKind,
    pub show_feed:      bool,
    pub autostart:      bool,
    /// Frame interval of the simulated camera.
    pub frame_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gesture:        GestureConfig::default(),
            actuator:       ActuatorKind::Log,
            show_feed:      false,
            autostart:      false,
            frame_interval: Duration::from_millis(33), // ~30fps
        }
    }
}

/// Opener for the chosen actuator kind.
pub fn actuator_opener(kind: ActuatorKind) -> Result<ActuatorOpener> {
    match kind {
        ActuatorKind::Log => Ok(Arc::new(|| Ok(Box::new(LogActuator::default()) as Box<dyn CursorActuator>))),
        #[cfg(feature = "enigo")]
        ActuatorKind::Enigo => Ok(Arc::new(|| {
            Ok(Box::new(crate::actuator::EnigoActuator::new()?) as Box<dyn CursorActuator>)
        })),
        #[cfg(not(feature = "enigo"))]
        ActuatorKind::Enigo => Err(Error::Unsupported(
            "built without the `enigo` feature; rebuild with --features enigo".into(),
        )),
    }
}

/// Screen resolution as reported by the actuator backend, if it can tell.
pub fn detect_screen(kind: ActuatorKind) -> Option<ScreenSize> {
    match kind {
        #[cfg(feature = "enigo")]
        ActuatorKind::Enigo => crate::actuator::EnigoActuator::new().ok()?.screen_size(),
        _ => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Panel commands
// ════════════════════════════════════════════════════════════════════════════

/// Apply one panel command.  `Break` means the user asked to exit; the
/// session has already been stopped by then.
pub fn apply_command(session: &mut Session, command: PanelCommand) -> Result<ControlFlow<()>> {
    match command {
        PanelCommand::ToggleControl => {
            let running = session.toggle_control()?;
            debug!(running, "control toggled");
        }
        PanelCommand::ToggleFeed => {
            session.toggle_feed();
        }
        PanelCommand::HideFeed => {
            session.set_show_feed(false);
        }
        PanelCommand::Exit => {
            session.stop();
            return Ok(ControlFlow::Break(()));
        }
    }
    Ok(ControlFlow::Continue(()))
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the control panel loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the interactive application until the panel is closed.
pub fn run(cfg: AppConfig) -> Result<()> {
    cfg.gesture.validate()?;

    // ── Simulated hand, shared by the panel and every source opened ──────
    let sim = SimHand::new();
    let open_source: SourceOpener = {
        let sim = sim.clone();
        let interval = cfg.frame_interval;
        Arc::new(move || {
            Ok(Box::new(SimHandSource::new(sim.clone(), SIM_CAMERA, interval)) as Box<dyn LandmarkSource>)
        })
    };

    let mut session = Session::new(cfg.gesture.clone(), open_source, actuator_opener(cfg.actuator)?);
    session.set_show_feed(cfg.show_feed);

    let mut panel = ControlPanel::new(sim)?;
    if cfg.autostart {
        session.start()?;
    }
    info!(
        screen = format_args!("{}x{}", cfg.gesture.screen.width, cfg.gesture.screen.height),
        actuator = ?cfg.actuator,
        "control panel open"
    );

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut last_feed = None;
    while panel.is_open() {
        for command in panel.poll_commands() {
            if apply_command(&mut session, command)?.is_break() {
                return Ok(());
            }
        }

        if let Some(frame) = session.drain_feed() {
            last_feed = Some(frame);
        }
        if !session.is_running() || !session.show_feed() {
            last_feed = None;
        }

        let status = PanelStatus { running: session.is_running(), show_feed: session.show_feed() };
        panel.render(status, last_feed.as_ref())?;
    }

    session.stop();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// run_demo(): headless scripted session
// ════════════════════════════════════════════════════════════════════════════

/// Play `scenario` through a real session and return every intent that
/// reached the actuator.
pub fn run_demo(scenario: DemoScenario, cfg: &AppConfig) -> Result<Vec<ControlIntent>> {
    cfg.gesture.validate()?;

    let frames = demo::script(scenario, Instant::now());
    let open_source: SourceOpener = Arc::new(move || {
        Ok(Box::new(ScriptedSource::new(frames.clone())) as Box<dyn LandmarkSource>)
    });
    let recorder = RecordingActuator::new();
    let open_actuator: ActuatorOpener = {
        let recorder = recorder.clone();
        Arc::new(move || Ok(Box::new(recorder.clone()) as Box<dyn CursorActuator>))
    };

    let mut session = Session::new(cfg.gesture.clone(), open_source, open_actuator);
    session.start()?;
    while session.is_running() {
        thread::sleep(Duration::from_millis(2));
    }
    session.stop();

    Ok(recorder.intents())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
