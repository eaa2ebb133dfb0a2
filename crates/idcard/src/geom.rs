//! # Pixel geometry

/// A width and height in pixels
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    /// Horizontal extent
    pub w: f32,
    /// Vertical extent
    pub h: f32,
}

impl Size {
    /// Create a new size
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned rectangle in (fractional) pixel coordinates
///
/// The origin is the top left corner of the canvas, `y` grows downwards.
/// Width and height are never negative.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BoxRegion {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

/// A rectangle snapped to whole pixels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge (inclusive)
    pub x: i64,
    /// Top edge (inclusive)
    pub y: i64,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
}

impl BoxRegion {
    /// Create a new region, clamping negative extents to zero
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    /// The right edge (`x + w`)
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// The bottom edge (`y + h`)
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.w / self.h
    }

    /// Check whether `other` lies within `self`, allowing for `eps` of
    /// floating point error on every edge.
    pub fn contains(&self, other: &BoxRegion, eps: f32) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }

    /// Snap the region to the pixel grid
    ///
    /// Every edge is rounded on its own, so that two regions sharing an
    /// edge also share the snapped edge. Edges are clamped to the `i32`
    /// range, far beyond any canvas.
    pub fn to_pixel_rect(&self) -> PixelRect {
        let x0 = snap(self.x);
        let y0 = snap(self.y);
        let x1 = snap(self.right());
        let y1 = snap(self.bottom());
        PixelRect {
            x: x0,
            y: y0,
            w: (x1 - x0).max(0) as u32,
            h: (y1 - y0).max(0) as u32,
        }
    }
}

fn snap(edge: f32) -> i64 {
    let edge = edge.round().clamp(i32::MIN as f32, i32::MAX as f32);
    i64::from(edge as i32)
}

impl PixelRect {
    /// The first column after the rectangle
    pub fn right(&self) -> i64 {
        self.x + i64::from(self.w)
    }

    /// The first row after the rectangle
    pub fn bottom(&self) -> i64 {
        self.y + i64::from(self.h)
    }
}
