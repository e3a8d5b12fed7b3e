//! Resolved drawing primitives
//!
//! Shapes are stored in absolute panel coordinates. Region and template
//! offsets are applied when the configuration is parsed.

use alloc::string::String;
use alloc::vec::Vec;

use crate::color::Rgb;

/// A point on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Area {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Overlap of two areas; empty if they do not overlap
    pub fn intersect(self, other: Area) -> Area {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let w = self.right().min(other.right()).saturating_sub(x).max(0);
        let h = self.bottom().min(other.bottom()).saturating_sub(y).max(0);
        Area::new(x, y, w, h)
    }
}

/// Text drawn by an external [`TextRenderer`](super::TextRenderer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextShape {
    pub origin: Point,
    pub text: String,
    /// Pixel scale, 1 or 2
    pub scale: u8,
    /// Font index, 0-based
    pub font: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// Fill the whole clip area
    Fill,
    Rect(Area),
    Line { from: Point, to: Point },
    /// Filled polygon, at least three points
    Polygon(Vec<Point>),
    Text(TextShape),
}

/// One colored primitive, optionally clipped to a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub color: Rgb,
    pub clip: Option<Area>,
}

/// Ordered list of shapes drawn for one binding
pub type Visual = Vec<Shape>;

/// Visuals of a block, one per activity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockVisual {
    pub active: Visual,
    pub inactive: Visual,
}

impl BlockVisual {
    pub fn for_activity(&self, active: bool) -> &Visual {
        if active { &self.active } else { &self.inactive }
    }
}
