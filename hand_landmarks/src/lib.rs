//! # hand_landmarks
//!
//! The data a hand-pose detector hands over once per camera frame:
//!
//! * [`LandmarkFrame`]: exactly 21 pixel-space keypoints of one hand, in the
//!   anatomical order used by common hand-landmark models
//!   (0 = wrist, 4 = thumb tip, 8 = index fingertip, …).
//! * [`Detections`]: every hand seen in one camera frame, with the frame's
//!   pixel size and capture timestamp.  Only the first hand is ever used for
//!   control; [`Detections::primary`] makes that choice explicit.
//!
//! The 21-point shape is carried by the type (`[Point; 21]`), so a frame of
//! the wrong shape cannot reach the gesture logic.  Building one from a
//! slice checks the length and reports [`FrameShapeError`].
//!
//! ```rust
//! use hand_landmarks::{FrameSize, Landmark, LandmarkFrame, Point};
//!
//! let size  = FrameSize::new(640, 480);
//! let frame = LandmarkFrame::new([Point::new(320.0, 240.0); 21], size);
//! assert_eq!(frame[Landmark::IndexTip], Point::new(320.0, 240.0));
//! ```

use std::ops::Index;
use std::time::Instant;

/// Number of keypoints in one hand.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Point / FrameSize / BoundingBox
// ════════════════════════════════════════════════════════════════════════════

/// A 2D position in camera-frame pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Point { x, y } }

    /// Euclidean pixel distance.
    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point { x: self.x + dx, y: self.y + dy }
    }
}

/// Pixel dimensions of the camera frame the landmarks were measured in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameSize {
    pub width:  u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self { FrameSize { width, height } }
}

/// Axis-aligned box around a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Grow the box by `pad` pixels on every side.
    pub fn padded(self, pad: f32) -> BoundingBox {
        BoundingBox {
            min: self.min.offset(-pad, -pad),
            max: self.max.offset(pad, pad),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark: anatomical numbering
// ════════════════════════════════════════════════════════════════════════════

/// The 21 hand keypoints, numbered as the detector emits them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Landmark {
    Wrist      = 0,
    ThumbCmc   = 1,
    ThumbMcp   = 2,
    ThumbIp    = 3,
    ThumbTip   = 4,
    IndexMcp   = 5,
    IndexPip   = 6,
    IndexDip   = 7,
    IndexTip   = 8,
    MiddleMcp  = 9,
    MiddlePip  = 10,
    MiddleDip  = 11,
    MiddleTip  = 12,
    RingMcp    = 13,
    RingPip    = 14,
    RingDip    = 15,
    RingTip    = 16,
    PinkyMcp   = 17,
    PinkyPip   = 18,
    PinkyDip   = 19,
    PinkyTip   = 20,
}

impl Landmark {
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Landmark::Wrist,
        Landmark::ThumbCmc,  Landmark::ThumbMcp,  Landmark::ThumbIp,  Landmark::ThumbTip,
        Landmark::IndexMcp,  Landmark::IndexPip,  Landmark::IndexDip, Landmark::IndexTip,
        Landmark::MiddleMcp, Landmark::MiddlePip, Landmark::MiddleDip, Landmark::MiddleTip,
        Landmark::RingMcp,   Landmark::RingPip,   Landmark::RingDip,  Landmark::RingTip,
        Landmark::PinkyMcp,  Landmark::PinkyPip,  Landmark::PinkyDip, Landmark::PinkyTip,
    ];

    pub fn index(self) -> usize { self as usize }
}

/// Bones of the hand skeleton, for drawing.
pub const HAND_CONNECTIONS: [(Landmark, Landmark); 21] = {
    use Landmark::*;
    [
        (Wrist, ThumbCmc),     (ThumbCmc, ThumbMcp),   (ThumbMcp, ThumbIp),   (ThumbIp, ThumbTip),
        (Wrist, IndexMcp),     (IndexMcp, IndexPip),   (IndexPip, IndexDip),  (IndexDip, IndexTip),
        (IndexMcp, MiddleMcp), (MiddleMcp, MiddlePip), (MiddlePip, MiddleDip), (MiddleDip, MiddleTip),
        (MiddleMcp, RingMcp),  (RingMcp, RingPip),     (RingPip, RingDip),    (RingDip, RingTip),
        (RingMcp, PinkyMcp),   (Wrist, PinkyMcp),      (PinkyMcp, PinkyPip),  (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// A slice of keypoints did not have exactly [`LANDMARK_COUNT`] entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("hand landmark frame needs {expected} points, got {found}")]
pub struct FrameShapeError {
    pub expected: usize,
    pub found:    usize,
}

/// One hand's 21 keypoints in pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [Point; LANDMARK_COUNT],
    size:   FrameSize,
}

impl LandmarkFrame {
    pub fn new(points: [Point; LANDMARK_COUNT], size: FrameSize) -> Self {
        LandmarkFrame { points, size }
    }

    /// Build from a slice, rejecting anything but exactly 21 points.
    pub fn from_slice(points: &[Point], size: FrameSize) -> Result<Self, FrameShapeError> {
        let points: [Point; LANDMARK_COUNT] = points.try_into().map_err(|_| FrameShapeError {
            expected: LANDMARK_COUNT,
            found:    points.len(),
        })?;
        Ok(LandmarkFrame { points, size })
    }

    /// Build from detector-style normalized coordinates (0.0–1.0 of the
    /// frame).  Coordinates are scaled to pixels and truncated to whole
    /// pixels.
    pub fn from_normalized(coords: &[(f32, f32)], size: FrameSize) -> Result<Self, FrameShapeError> {
        let w = size.width as f32;
        let h = size.height as f32;
        let pixels: Vec<Point> = coords.iter()
            .map(|&(nx, ny)| Point::new((nx * w).trunc(), (ny * h).trunc()))
            .collect();
        Self::from_slice(&pixels, size)
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] { &self.points }
    pub fn size(&self)   -> FrameSize                 { self.size }

    pub fn wrist(&self)     -> Point { self[Landmark::Wrist] }
    pub fn thumb_tip(&self) -> Point { self[Landmark::ThumbTip] }
    pub fn index_tip(&self) -> Point { self[Landmark::IndexTip] }

    /// Pixel distance between two keypoints.
    pub fn distance(&self, a: Landmark, b: Landmark) -> f32 {
        self[a].distance_to(self[b])
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let first = self.points[0];
        let (min, max) = self.points.iter().fold((first, first), |(lo, hi), p| {
            (Point::new(lo.x.min(p.x), lo.y.min(p.y)),
             Point::new(hi.x.max(p.x), hi.y.max(p.y)))
        });
        BoundingBox { min, max }
    }
}

impl Index<Landmark> for LandmarkFrame {
    type Output = Point;

    fn index(&self, landmark: Landmark) -> &Point {
        &self.points[landmark.index()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detections: everything one camera frame produced
// ════════════════════════════════════════════════════════════════════════════

/// Left/right classification reported alongside a detected hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Handedness {
    pub fn label(self) -> &'static str {
        match self {
            Handedness::Left    => "Left",
            Handedness::Right   => "Right",
            Handedness::Unknown => "Hand",
        }
    }
}

/// One detected hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    pub landmarks:  LandmarkFrame,
    pub handedness: Handedness,
}

impl HandObservation {
    pub fn new(landmarks: LandmarkFrame, handedness: Handedness) -> Self {
        HandObservation { landmarks, handedness }
    }
}

/// All hands found in one camera frame.
#[derive(Clone, Debug)]
pub struct Detections {
    pub hands:       Vec<HandObservation>,
    pub size:        FrameSize,
    pub captured_at: Instant,
}

impl Detections {
    /// A frame in which no hand was found.
    pub fn empty(size: FrameSize, captured_at: Instant) -> Self {
        Detections { hands: Vec::new(), size, captured_at }
    }

    /// A frame with exactly one hand.
    pub fn single(hand: HandObservation, captured_at: Instant) -> Self {
        let size = hand.landmarks.size();
        Detections { hands: vec![hand], size, captured_at }
    }

    /// The hand used for control: the first one detected.  Any further hands
    /// are ignored.
    pub fn primary(&self) -> Option<&HandObservation> {
        self.hands.first()
    }

    pub fn is_empty(&self) -> bool { self.hands.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
