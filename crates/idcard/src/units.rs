//! # Physical units
//!
//! - A **millimeter** is 1/25.4 of an inch
//! - A **centimeter** is 10 millimeters
//! - A (DTP) **point** is 1/72 of an inch
//!
//! Layout boxes are given in millimeters and centimeters, font sizes in
//! points. Both are converted with the same resolution, so that a font of
//! a given point size has the same physical size as a box next to it.

use std::fmt;

/// Number of millimeters in one inch (25.4)
pub const MM_PER_INCH: f32 = 25.4;

/// Number of DTP [points] in one inch (72)
///
/// [points]: https://en.wikipedia.org/wiki/Point_(typography)
pub const POINTS_PER_INCH: f32 = 72.0;

/// The default print resolution in dots per inch (300)
pub const DEFAULT_DPI: f32 = 300.0;

/// A unit of physical length
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unit {
    /// 1/25.4 inch
    Millimeter,
    /// 10 millimeters
    Centimeter,
    /// 1/72 inch
    Point,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeter => f.write_str("mm"),
            Self::Centimeter => f.write_str("cm"),
            Self::Point => f.write_str("pt"),
        }
    }
}

/// Convert a physical length to (fractional) device pixels at `dpi`
///
/// ```
/// use idcard::units::{pixels, Unit};
/// assert_eq!(pixels(25.4, Unit::Millimeter, 300.0), 300.0);
/// assert_eq!(pixels(72.0, Unit::Point, 300.0), 300.0);
/// ```
pub fn pixels(value: f32, unit: Unit, dpi: f32) -> f32 {
    match unit {
        Unit::Millimeter => value * dpi / MM_PER_INCH,
        Unit::Centimeter => pixels(value * 10.0, Unit::Millimeter, dpi),
        Unit::Point => value * dpi / POINTS_PER_INCH,
    }
}

/// A magnitude together with its unit
///
/// The magnitude is expected to be non-negative.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicalLength {
    /// The magnitude
    pub value: f32,
    /// The unit of `value`
    pub unit: Unit,
}

impl PhysicalLength {
    /// A length in millimeters
    pub const fn mm(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Millimeter,
        }
    }

    /// A length in centimeters
    pub const fn cm(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Centimeter,
        }
    }

    /// A length in points
    pub const fn pt(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Point,
        }
    }

    /// Get the length in device pixels at `dpi`
    pub fn to_pixels(self, dpi: f32) -> f32 {
        pixels(self.value, self.unit, dpi)
    }
}

impl fmt::Display for PhysicalLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
