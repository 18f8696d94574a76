//! Control panel window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  FPS: 30                          cursor: 960 540    │
//! │       ┌──────────── control rectangle ───────────┐   │
//! │       │            ┌─ Right ──┐                  │   │
//! │       │            │  skeleton│                  │   │
//! │       │            └──────────┘                  │   │
//! │       └──────────────────────────────────────────┘   │
//! │  pinch: idle                                         │
//! ├──────────────────────────────────────────────────────┤
//! │  CONTROL ON   FEED ON      C=control F=feed Q=hide   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The feed area doubles as the simulated hand's input pad: the mouse
//! position is the index fingertip, the left button pinches, and holding
//! Shift stops pointing.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use hand_landmarks::{Point, HAND_CONNECTIONS};

use crate::feed::FeedFrame;
use crate::source::{SimHand, SimInput};
use crate::{Error, Result};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const FEED_W:     usize = 640;
pub const FEED_H:     usize = 480;
const STATUS_H:       usize = 40;
pub const WIN_W:      usize = FEED_W;
pub const WIN_H:      usize = FEED_H + STATUS_H;
const LABEL_SCALE:    usize = 2;
const BG_COLOR:       u32   = 0xFF1A1A2E;
const STATUS_BG:      u32   = 0xFF0F3460;
const CONTROL_COLOR:  u32   = 0xFFFF00FF;  // magenta
const BONE_COLOR:     u32   = 0xFF00C000;
const JOINT_COLOR:    u32   = 0xFFFF3030;
const BOX_COLOR:      u32   = 0xFF00FF00;
const TEXT_COLOR:     u32   = 0xFFEEEEEE;
const ON_COLOR:       u32   = 0xFF40FF40;
const OFF_COLOR:      u32   = 0xFFFF6060;
const DIM_COLOR:      u32   = 0xFF888888;
const LEGEND:         &str  = "C=control  F=feed  Q=hide feed  esc=quit  drag=pinch  shift=fist";

// ════════════════════════════════════════════════════════════════════════════
// Commands and status
// ════════════════════════════════════════════════════════════════════════════

/// What the user asked for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelCommand {
    ToggleControl,
    ToggleFeed,
    HideFeed,
    Exit,
}

/// Session state shown in the status bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelStatus {
    pub running:   bool,
    pub show_feed: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// ControlPanel
// ════════════════════════════════════════════════════════════════════════════

pub struct ControlPanel {
    window: Window,
    canvas: Canvas,
    sim:    SimHand,
}

impl ControlPanel {
    pub fn new(sim: SimHand) -> Result<Self> {
        let mut window = Window::new(
            "Hand Mouse: control panel",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| Error::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(ControlPanel {
            window,
            canvas: Canvas::new(WIN_W, WIN_H, BG_COLOR),
            sim,
        })
    }

    /// Returns false when the window has been closed.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Collect key commands and forward mouse state to the simulated hand.
    pub fn poll_commands(&mut self) -> Vec<PanelCommand> {
        let mut commands = Vec::new();
        if !self.window.is_open() {
            commands.push(PanelCommand::Exit);
            return commands;
        }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if pressed(Key::C) { commands.push(PanelCommand::ToggleControl); }
        if pressed(Key::F) { commands.push(PanelCommand::ToggleFeed); }
        if pressed(Key::Q) { commands.push(PanelCommand::HideFeed); }
        if pressed(Key::Escape) { commands.push(PanelCommand::Exit); }

        let shift = self.window.is_key_down(Key::LeftShift)
                 || self.window.is_key_down(Key::RightShift);
        self.sim.apply(SimInput::Pointing(!shift));
        self.sim.apply(SimInput::Pinch(self.window.get_mouse_down(MouseButton::Left)));
        match self.window.get_mouse_pos(MouseMode::Discard) {
            Some((x, y)) if (y as usize) < FEED_H => self.sim.apply(SimInput::Pointer { x, y }),
            _ => self.sim.apply(SimInput::PointerLeft),
        }

        commands
    }

    /// Draw one frame.  `feed` is the latest overlay, if the feed is shown.
    pub fn render(&mut self, status: PanelStatus, feed: Option<&FeedFrame>) -> Result<()> {
        self.canvas.clear(BG_COLOR);

        match feed {
            Some(frame) if status.show_feed => self.canvas.draw_feed(frame),
            _ if status.show_feed => {
                self.canvas.draw_label("waiting for frames", 20, 20, LABEL_SCALE, DIM_COLOR);
            }
            _ => {
                self.canvas.draw_label("feed hidden", 20, 20, LABEL_SCALE, DIM_COLOR);
            }
        }
        self.canvas.draw_status(status);

        self.window
            .update_with_buffer(&self.canvas.buf, WIN_W, WIN_H)
            .map_err(|e| Error::Window(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas: ARGB framebuffer and drawing primitives
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    buf: Vec<u32>,
    w:   usize,
    h:   usize,
}

impl Canvas {
    pub fn new(w: usize, h: usize, color: u32) -> Self {
        Canvas { buf: vec![color; w * h], w, h }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    pub fn clear(&mut self, color: u32) { self.buf.fill(color); }

    // ── Feed overlay ──────────────────────────────────────────────────────

    fn draw_feed(&mut self, frame: &FeedFrame) {
        let sx = FEED_W as f64 / frame.size.width.max(1) as f64;
        let sy = FEED_H as f64 / frame.size.height.max(1) as f64;
        let to_px = |x: f64, y: f64| ((x * sx).round() as isize, (y * sy).round() as isize);

        let (l, t) = to_px(frame.control.left,  frame.control.top);
        let (r, b) = to_px(frame.control.right, frame.control.bottom);
        if r > l && b > t {
            self.draw_border(l.max(0) as usize, t.max(0) as usize, (r - l) as usize, (b - t) as usize, CONTROL_COLOR);
        }

        if let Some(hand) = &frame.hand {
            let at = |p: Point| to_px(p.x as f64, p.y as f64);

            for (a, b) in HAND_CONNECTIONS {
                let (x0, y0) = at(hand.landmarks[a]);
                let (x1, y1) = at(hand.landmarks[b]);
                self.draw_line(x0, y0, x1, y1, BONE_COLOR);
            }
            for p in hand.landmarks.points() {
                let (x, y) = at(*p);
                self.draw_dot(x, y, 3, JOINT_COLOR);
            }

            let (bx0, by0) = at(hand.bounds.min);
            let (bx1, by1) = at(hand.bounds.max);
            let (bx0, by0) = (bx0.max(0), by0.max(0));
            if bx1 > bx0 && by1 > by0 {
                self.draw_border(bx0 as usize, by0 as usize, (bx1 - bx0) as usize, (by1 - by0) as usize, BOX_COLOR);
            }
            let label_y = (by0 as usize).saturating_sub(5 * LABEL_SCALE + 4);
            self.draw_label(hand.handedness.label(), bx0 as usize, label_y, LABEL_SCALE, BOX_COLOR);
            if !hand.pointing {
                self.draw_label("not pointing", bx0 as usize, by1.max(0) as usize + 4, LABEL_SCALE, DIM_COLOR);
            }
        }

        self.draw_label(&format!("FPS: {:.0}", frame.fps), 10, 10, LABEL_SCALE, TEXT_COLOR);
        let cursor = format!("cursor: {:.0} {:.0}", frame.cursor.x, frame.cursor.y);
        let cursor_x = FEED_W.saturating_sub(10 + cursor.len() * 4 * LABEL_SCALE);
        self.draw_label(&cursor, cursor_x, 10, LABEL_SCALE, TEXT_COLOR);
        self.draw_label(&format!("pinch: {}", frame.pinch), 10, FEED_H - 20, LABEL_SCALE, TEXT_COLOR);
    }

    // ── Status bar ────────────────────────────────────────────────────────

    fn draw_status(&mut self, status: PanelStatus) {
        let y = FEED_H;
        self.fill_rect(0, y, self.w, STATUS_H, STATUS_BG);

        let (control, control_color) = if status.running { ("CONTROL ON", ON_COLOR) } else { ("CONTROL OFF", OFF_COLOR) };
        let (feed, feed_color)       = if status.show_feed { ("FEED ON", ON_COLOR) } else { ("FEED OFF", DIM_COLOR) };
        self.draw_label(control, 10,  y + 8, LABEL_SCALE, control_color);
        self.draw_label(feed,    130, y + 8, LABEL_SCALE, feed_color);
        self.draw_label(LEGEND, 10, y + 26, 1, DIM_COLOR);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            for col in x..(x + w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.w) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.h) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.buf[y * self.w + x] = color;
        }
    }

    fn plot(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Bresenham line; off-canvas parts are clipped per pixel.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (step_x, step_y) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += step_x; }
            if e2 <= dx { err += dx; y += step_y; }
        }
    }

    fn draw_dot(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.plot(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 3×5 bitmap text, each font pixel drawn as a `scale`×`scale` block.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let advance = 4 * scale; // 3 wide + 1 gap
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > self.w { break; }
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += advance;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

const FALLBACK_GLYPH: [u8; 5] = [0b000, 0b000, 0b010, 0b000, 0b000]; // dot

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => FALLBACK_GLYPH,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
