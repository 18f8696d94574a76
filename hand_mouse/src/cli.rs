//! Command-line interface.

use clap::{Parser, Subcommand};
use gesture_pointer::ScreenSize;

use crate::app::ActuatorKind;
use crate::demo::DemoScenario;

/// Hand Mouse - drive the pointer with hand gestures
#[derive(Parser, Debug)]
#[command(name = "hand_mouse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the control panel with a simulated hand
    Run {
        /// Where pointer intents go
        #[arg(short, long, value_enum, default_value_t = ActuatorKind::Log)]
        actuator: ActuatorKind,

        /// Screen resolution as WxH (default: reported by the actuator, else 1920x1080)
        #[arg(short, long, value_parser = parse_screen)]
        screen: Option<ScreenSize>,

        /// Show the debug feed from the start
        #[arg(long)]
        show_feed: bool,

        /// Enable hand control as soon as the panel opens
        #[arg(long)]
        autostart: bool,

        /// Keep mapped positions on screen
        #[arg(long)]
        clamp: bool,
    },

    /// Replay a scripted gesture headlessly and print the intents
    Demo {
        #[arg(value_enum)]
        scenario: DemoScenario,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Parse `"1920x1080"` into a [`ScreenSize`].
pub fn parse_screen(s: &str) -> Result<ScreenSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width in {s:?}"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height in {s:?}"))?;
    if w == 0 || h == 0 {
        return Err(format!("screen size must be non-zero, got {s:?}"));
    }
    Ok(ScreenSize::new(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["hand_mouse", "run"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Run { actuator, screen, show_feed, autostart, clamp } => {
                assert_eq!(actuator, ActuatorKind::Log);
                assert_eq!(screen, None);
                assert!(!show_feed && !autostart && !clamp);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_with_all_options() {
        let cli = Cli::try_parse_from([
            "hand_mouse", "-v", "run",
            "--actuator", "enigo",
            "--screen", "2560x1440",
            "--show-feed", "--autostart", "--clamp",
        ]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run { actuator, screen, show_feed, autostart, clamp } => {
                assert_eq!(actuator, ActuatorKind::Enigo);
                assert_eq!(screen, Some(ScreenSize::new(2560, 1440)));
                assert!(show_feed && autostart && clamp);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn demo_takes_a_scenario() {
        let cli = Cli::try_parse_from(["hand_mouse", "demo", "dead-zone"]).unwrap();
        assert!(matches!(cli.command, Commands::Demo { scenario: DemoScenario::DeadZone }));
        assert!(Cli::try_parse_from(["hand_mouse", "demo", "wave"]).is_err());
    }

    #[test]
    fn screen_parsing() {
        assert_eq!(parse_screen("1280x720"), Ok(ScreenSize::new(1280, 720)));
        assert_eq!(parse_screen("800X600"), Ok(ScreenSize::new(800, 600)));
        assert!(parse_screen("1280").is_err());
        assert!(parse_screen("0x720").is_err());
        assert!(parse_screen("wide x tall").is_err());
    }
}
