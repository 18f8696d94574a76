//! Cursor movement: pointing gate, frame-to-screen mapping, speed scaling,
//! and one-pole smoothing.
//!
//! # Mapping
//!
//! The camera frame is inset by `control_margin` on every side; the inset
//! rectangle is stretched onto the whole screen.  A fingertip outside the
//! rectangle lands outside the screen unless `clamp_to_screen` is set.
//!
//! ```text
//!  camera frame (w × h)                 screen
//!  ┌──────────────────────┐             ┌──────────────────────┐
//!  │   ┌──────────────┐   │             │                      │
//!  │   │ control rect │   │   ───────▶  │   full resolution    │
//!  │   └──────────────┘   │             │                      │
//!  └──────────────────────┘             └──────────────────────┘
//! ```

use hand_landmarks::{FrameSize, Landmark, LandmarkFrame};

use crate::config::{PointerConfig, ScreenSize};

// ════════════════════════════════════════════════════════════════════════════
// CursorState
// ════════════════════════════════════════════════════════════════════════════

/// Last smoothed cursor position, the anchor for the next frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
}

impl CursorState {
    pub fn new(x: f64, y: f64) -> Self { CursorState { x, y } }

    /// Move a fraction of the way toward `target` and return the new position.
    ///
    /// `next = prev + (target - prev) / smooth_factor * multiplier`
    pub fn smooth_toward(&mut self, target: (f64, f64), smooth_factor: f64, multiplier: f64) -> (f64, f64) {
        self.x += (target.0 - self.x) / smooth_factor * multiplier;
        self.y += (target.1 - self.y) / smooth_factor * multiplier;
        (self.x, self.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ControlRect
// ════════════════════════════════════════════════════════════════════════════

/// The inset region of the camera frame that maps onto the full screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlRect {
    pub left:   f64,
    pub top:    f64,
    pub right:  f64,
    pub bottom: f64,
}

impl ControlRect {
    /// Inset `size` by `margin` (a fraction) on each side.  Margins are
    /// truncated to whole pixels.
    pub fn inset(size: FrameSize, margin: f64) -> Self {
        let w = size.width as f64;
        let h = size.height as f64;
        let mx = (w * margin).floor();
        let my = (h * margin).floor();
        ControlRect { left: mx, top: my, right: w - mx, bottom: h - my }
    }

    /// Linearly map a frame position onto `screen`.
    pub fn map_to_screen(&self, x: f64, y: f64, screen: ScreenSize, clamp: bool) -> (f64, f64) {
        let sw = screen.width as f64;
        let sh = screen.height as f64;
        let tx = remap(x, self.left, self.right, 0.0, sw);
        let ty = remap(y, self.top, self.bottom, 0.0, sh);
        if clamp {
            (tx.clamp(0.0, sw), ty.clamp(0.0, sh))
        } else {
            (tx, ty)
        }
    }
}

fn remap(v: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    to_lo + (v - from_lo) * (to_hi - to_lo) / (from_hi - from_lo)
}

// ════════════════════════════════════════════════════════════════════════════
// Gate / speed
// ════════════════════════════════════════════════════════════════════════════

/// True when the index fingertip is more than `pointing_margin_px` above the
/// wrist (image y grows downward).
pub fn is_pointing(frame: &LandmarkFrame, cfg: &PointerConfig) -> bool {
    frame.index_tip().y < frame.wrist().y - cfg.pointing_margin_px
}

/// `min(1 + gain / max(distance, 1), cap)`.
///
/// For the defaults the result lies in `(1.0, 2.0]` for any finite
/// distance; the floor of 1 px keeps it finite at zero distance.
pub fn speed_multiplier(wrist_distance: f64, cfg: &PointerConfig) -> f64 {
    (1.0 + cfg.speed_gain_px / wrist_distance.max(1.0)).min(cfg.speed_cap)
}

/// Run the cursor half of one frame.  Returns the new position when the
/// hand is pointing, `None` (and leaves `cursor` untouched) otherwise.
pub fn track_pointer(
    frame:  &LandmarkFrame,
    cfg:    &PointerConfig,
    screen: ScreenSize,
    cursor: &mut CursorState,
) -> Option<(f64, f64)> {
    if !is_pointing(frame, cfg) {
        return None;
    }
    let tip = frame.index_tip();
    let rect = ControlRect::inset(frame.size(), cfg.control_margin);
    let target = rect.map_to_screen(tip.x as f64, tip.y as f64, screen, cfg.clamp_to_screen);

    let wrist_distance = frame.distance(Landmark::IndexTip, Landmark::Wrist) as f64;
    let multiplier = speed_multiplier(wrist_distance, cfg);

    Some(cursor.smooth_toward(target, cfg.smooth_factor, multiplier))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::{Point, LANDMARK_COUNT};

    const CAMERA: FrameSize = FrameSize::new(640, 480);
    const SCREEN: ScreenSize = ScreenSize::new(1920, 1080);

    fn hand(index_tip: Point, wrist: Point) -> LandmarkFrame {
        let mut pts = [Point::new(0.0, 0.0); LANDMARK_COUNT];
        pts[Landmark::Wrist.index()]    = wrist;
        pts[Landmark::IndexTip.index()] = index_tip;
        pts[Landmark::ThumbTip.index()] = index_tip.offset(-60.0, 0.0);
        LandmarkFrame::new(pts, CAMERA)
    }

    #[test]
    fn control_rect_insets_twenty_percent() {
        let rect = ControlRect::inset(CAMERA, 0.20);
        assert_eq!(rect, ControlRect { left: 128.0, top: 96.0, right: 512.0, bottom: 384.0 });
    }

    #[test]
    fn control_rect_truncates_odd_margins() {
        // 0.2 * 641 = 128.2 → 128
        let rect = ControlRect::inset(FrameSize::new(641, 481), 0.20);
        assert_eq!(rect.left, 128.0);
        assert_eq!(rect.right, 513.0);
        assert_eq!(rect.top, 96.0);
    }

    #[test]
    fn mapping_corners_and_centre() {
        let rect = ControlRect::inset(CAMERA, 0.20);
        assert_eq!(rect.map_to_screen(128.0, 96.0, SCREEN, false), (0.0, 0.0));
        assert_eq!(rect.map_to_screen(512.0, 384.0, SCREEN, false), (1920.0, 1080.0));
        assert_eq!(rect.map_to_screen(320.0, 240.0, SCREEN, false), (960.0, 540.0));
    }

    #[test]
    fn mapping_extrapolates_outside_rect() {
        let rect = ControlRect::inset(CAMERA, 0.20);
        let (x, y) = rect.map_to_screen(0.0, 480.0, SCREEN, false);
        assert_eq!(x, -640.0);
        assert_eq!(y, 1440.0);
    }

    #[test]
    fn mapping_clamps_when_asked() {
        let rect = ControlRect::inset(CAMERA, 0.20);
        assert_eq!(rect.map_to_screen(0.0, 480.0, SCREEN, true), (0.0, 1080.0));
    }

    #[test]
    fn pointing_needs_more_than_margin() {
        let cfg = PointerConfig::default();
        assert!(is_pointing(&hand(Point::new(320.0, 200.0), Point::new(320.0, 231.0)), &cfg));
        // exactly 30 px above is not enough
        assert!(!is_pointing(&hand(Point::new(320.0, 200.0), Point::new(320.0, 230.0)), &cfg));
        // finger below the wrist
        assert!(!is_pointing(&hand(Point::new(320.0, 300.0), Point::new(320.0, 250.0)), &cfg));
    }

    #[test]
    fn speed_multiplier_bounds() {
        let cfg = PointerConfig::default();
        for d in [0.0, 0.5, 1.0, 10.0, 40.0, 41.0, 80.0, 400.0, 1e6] {
            let m = speed_multiplier(d, &cfg);
            assert!(m > 1.0 && m <= 2.0, "distance {} gave {}", d, m);
        }
        assert_eq!(speed_multiplier(0.0, &cfg), 2.0);
        assert_eq!(speed_multiplier(80.0, &cfg), 1.5);
        assert_eq!(speed_multiplier(160.0, &cfg), 1.25);
    }

    #[test]
    fn smoothing_is_idempotent_at_rest() {
        let mut cursor = CursorState::new(700.0, 300.0);
        for _ in 0..10 {
            assert_eq!(cursor.smooth_toward((700.0, 300.0), 2.0, 1.7), (700.0, 300.0));
        }
    }

    #[test]
    fn smoothing_converges_on_a_fixed_target() {
        let mut cursor = CursorState::default();
        for _ in 0..60 {
            cursor.smooth_toward((960.0, 540.0), 2.0, 1.25);
        }
        assert!((cursor.x - 960.0).abs() < 1e-6);
        assert!((cursor.y - 540.0).abs() < 1e-6);
    }

    #[test]
    fn track_pointer_matches_formula() {
        // tip maps to (960, 540); wrist 80 px below → multiplier 1.5
        let frame = hand(Point::new(320.0, 240.0), Point::new(320.0, 320.0));
        let mut cursor = CursorState::new(900.0, 500.0);
        let pos = track_pointer(&frame, &PointerConfig::default(), SCREEN, &mut cursor);
        // 900 + 60 / 2 * 1.5 = 945 ; 500 + 40 / 2 * 1.5 = 530
        assert_eq!(pos, Some((945.0, 530.0)));
        assert_eq!(cursor, CursorState::new(945.0, 530.0));
    }

    #[test]
    fn track_pointer_leaves_cursor_when_not_pointing() {
        let frame = hand(Point::new(320.0, 240.0), Point::new(320.0, 250.0));
        let mut cursor = CursorState::new(12.0, 34.0);
        assert_eq!(track_pointer(&frame, &PointerConfig::default(), SCREEN, &mut cursor), None);
        assert_eq!(cursor, CursorState::new(12.0, 34.0));
    }
}
