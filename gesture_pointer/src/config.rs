//! Gesture tunables.
//!
//! Every value has a fixed default; a session reads its [`GestureConfig`]
//! once at construction and never changes it.

use std::time::Duration;

/// Screen resolution the pointer is mapped onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width:  u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self { ScreenSize { width, height } }
}

impl Default for ScreenSize {
    fn default() -> Self { ScreenSize::new(1920, 1080) }
}

/// Cursor-movement tunables.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerConfig {
    /// Index tip must be this many pixels above the wrist to count as pointing.
    pub pointing_margin_px: f32,
    /// Fraction of the camera frame inset on each side before mapping.
    pub control_margin:     f64,
    /// Divisor of the one-pole smoothing filter.
    pub smooth_factor:      f64,
    /// Numerator of the wrist-distance speed boost.
    pub speed_gain_px:      f64,
    /// Upper bound of the speed multiplier.
    pub speed_cap:          f64,
    /// Clamp mapped targets to the screen instead of extrapolating.
    pub clamp_to_screen:    bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig {
            pointing_margin_px: 30.0,
            control_margin:     0.20,
            smooth_factor:      2.0,
            speed_gain_px:      40.0,
            speed_cap:          2.0,
            clamp_to_screen:    false,
        }
    }
}

/// Pinch click/drag tunables.
#[derive(Clone, Debug, PartialEq)]
pub struct PinchConfig {
    /// Thumb-tip to index-tip distance below which the hand is pinching.
    pub threshold_px: f32,
    /// Sustained pinch that turns into a drag.
    pub drag_hold:    Duration,
    /// Longest pinch that still clicks, and the minimum gap between clicks.
    pub click_delay:  Duration,
}

impl Default for PinchConfig {
    fn default() -> Self {
        PinchConfig {
            threshold_px: 20.0,
            drag_hold:    Duration::from_millis(1000),
            click_delay:  Duration::from_millis(600),
        }
    }
}

/// Complete configuration of a [`GestureInterpreter`](crate::GestureInterpreter).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GestureConfig {
    pub screen:  ScreenSize,
    pub pointer: PointerConfig,
    pub pinch:   PinchConfig,
}

/// A tunable is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid gesture config: {field} {reason}")]
pub struct ConfigError {
    pub field:  &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError { field, reason: reason.into() }
    }
}

impl GestureConfig {
    pub fn with_screen(mut self, screen: ScreenSize) -> Self {
        self.screen = screen;
        self
    }

    /// Check every value is usable.  Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::new("screen", format!(
                "must be non-empty, got {}x{}", self.screen.width, self.screen.height
            )));
        }
        let p = &self.pointer;
        if !(0.0..0.5).contains(&p.control_margin) {
            return Err(ConfigError::new("control_margin", format!(
                "must be in [0, 0.5), got {}", p.control_margin
            )));
        }
        if !(p.smooth_factor >= 1.0) {
            return Err(ConfigError::new("smooth_factor", format!(
                "must be >= 1, got {}", p.smooth_factor
            )));
        }
        if !(p.speed_cap >= 1.0) {
            return Err(ConfigError::new("speed_cap", format!(
                "must be >= 1, got {}", p.speed_cap
            )));
        }
        if !(p.speed_gain_px >= 0.0) {
            return Err(ConfigError::new("speed_gain_px", format!(
                "must be >= 0, got {}", p.speed_gain_px
            )));
        }
        if !(p.pointing_margin_px >= 0.0) {
            return Err(ConfigError::new("pointing_margin_px", format!(
                "must be >= 0, got {}", p.pointing_margin_px
            )));
        }
        if !(self.pinch.threshold_px > 0.0) {
            return Err(ConfigError::new("pinch threshold_px", format!(
                "must be > 0, got {}", self.pinch.threshold_px
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_constants() {
        let cfg = GestureConfig::default();
        assert_eq!(cfg.pinch.threshold_px, 20.0);
        assert_eq!(cfg.pinch.drag_hold, Duration::from_secs(1));
        assert_eq!(cfg.pinch.click_delay, Duration::from_millis(600));
        assert_eq!(cfg.pointer.control_margin, 0.20);
        assert_eq!(cfg.pointer.smooth_factor, 2.0);
        assert_eq!(cfg.pointer.speed_cap, 2.0);
        assert_eq!(cfg.pointer.pointing_margin_px, 30.0);
        assert!(!cfg.pointer.clamp_to_screen);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn with_screen_overrides_resolution() {
        let cfg = GestureConfig::default().with_screen(ScreenSize::new(2560, 1440));
        assert_eq!(cfg.screen, ScreenSize::new(2560, 1440));
    }

    #[test]
    fn rejects_half_frame_margin() {
        let mut cfg = GestureConfig::default();
        cfg.pointer.control_margin = 0.5;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.field, "control_margin");
    }

    #[test]
    fn rejects_empty_screen() {
        let cfg = GestureConfig::default().with_screen(ScreenSize::new(0, 1080));
        assert_eq!(cfg.validate().unwrap_err().field, "screen");
    }

    #[test]
    fn rejects_nan_smoothing() {
        let mut cfg = GestureConfig::default();
        cfg.pointer.smooth_factor = f64::NAN;
        assert_eq!(cfg.validate().unwrap_err().field, "smooth_factor");
    }

    #[test]
    fn rejects_zero_pinch_threshold() {
        let mut cfg = GestureConfig::default();
        cfg.pinch.threshold_px = 0.0;
        assert!(cfg.validate().is_err());
    }
}
