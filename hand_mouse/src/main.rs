//! hand_mouse: interactive entry point.

use gesture_pointer::{ControlIntent, GestureConfig, ScreenSize};
use hand_mouse::app::{self, AppConfig};
use hand_mouse::cli::{Cli, Commands};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // --verbose enables debug-level output; RUST_LOG overrides both
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Run { actuator, screen, show_feed, autostart, clamp } => {
            banner();
            #[cfg(feature = "enigo")]
            println!("  Pointer backends: log, enigo");
            #[cfg(not(feature = "enigo"))]
            println!("  Pointer backends: log  (use --features enigo for the OS pointer)");
            println!();

            let screen = screen
                .or_else(|| app::detect_screen(actuator))
                .unwrap_or_default();
            let mut gesture = GestureConfig::default().with_screen(screen);
            gesture.pointer.clamp_to_screen = clamp;

            let cfg = AppConfig { gesture, actuator, show_feed, autostart, ..AppConfig::default() };
            println!("  Opening control panel…  C=control  F=feed  Q=hide feed  Esc=quit");
            println!();
            app::run(cfg)?;
        }
        Commands::Demo { scenario } => {
            let cfg = AppConfig::default();
            let intents = app::run_demo(scenario, &cfg)?;
            for intent in &intents {
                print_intent(intent, cfg.gesture.screen);
            }

            let buttons: Vec<_> = intents.into_iter()
                .filter(|i| !matches!(i, ControlIntent::MoveTo { .. }))
                .collect();
            if buttons == scenario.expected_buttons() {
                info!(?scenario, ?buttons, "demo produced the expected buttons");
            } else {
                warn!(?scenario, ?buttons, expected = ?scenario.expected_buttons(), "demo buttons differ");
            }
        }
    }

    Ok(())
}

fn banner() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Hand Mouse - gesture pointer control            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

fn print_intent(intent: &ControlIntent, screen: ScreenSize) {
    match intent {
        ControlIntent::MoveTo { x, y } => {
            let off = *x < 0.0 || *y < 0.0 || *x > screen.width as f64 || *y > screen.height as f64;
            println!("  move   {x:8.1} {y:8.1}{}", if off { "  (off screen)" } else { "" });
        }
        ControlIntent::Click     => println!("  click"),
        ControlIntent::MouseDown => println!("  down"),
        ControlIntent::MouseUp   => println!("  up"),
    }
}
