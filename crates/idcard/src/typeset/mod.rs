//! # Typesetting
//!
//! The [`Typesetter`] trait is the boundary between the card layout and the
//! font technology. Layout only needs line heights and wrapped text
//! extents; drawing is delegated back to the typesetter.
//!
//! Point sizes are converted to pixels with the resolution passed in (or the
//! resolution of the canvas when drawing), which keeps text dimensionally
//! consistent with the millimeter based layout.

use image::Rgba;
use thiserror::Error;

use crate::{
    canvas::Canvas,
    font::FontSpec,
    geom::{BoxRegion, Size},
};

mod draft;
mod system;

pub use draft::DraftTypesetter;
pub use system::SystemFonts;

/// Failure to find or use a font
#[derive(Debug, Error)]
pub enum FontError {
    /// Not a single font face is available
    #[error("no fonts available")]
    NoFonts,
    /// The font data could not be parsed
    #[error("failed to parse font {family:?}: {message}")]
    Parse {
        /// The requested family
        family: String,
        /// What went wrong
        message: &'static str,
    },
    /// A font file could not be loaded
    #[error("failed to load font file")]
    Io(#[from] std::io::Error),
}

/// Alignment along one axis of a layout rectangle
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Align {
    /// Left or top
    #[default]
    Near,
    /// Centered
    Center,
    /// Right or bottom
    Far,
}

impl Align {
    /// The offset of content with extent `used` in a space of `available`
    ///
    /// ```
    /// use idcard::typeset::Align;
    /// assert_eq!(Align::Near.offset(100.0, 40.0), 0.0);
    /// assert_eq!(Align::Center.offset(100.0, 40.0), 30.0);
    /// assert_eq!(Align::Far.offset(100.0, 40.0), 60.0);
    /// ```
    pub fn offset(self, available: f32, used: f32) -> f32 {
        match self {
            Self::Near => 0.0,
            Self::Center => (available - used) / 2.0,
            Self::Far => available - used,
        }
    }
}

/// How text is placed in its layout rectangle
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TextFormat {
    /// Horizontal alignment of every line
    pub align: Align,
    /// Vertical alignment of the block of lines
    pub line_align: Align,
    /// Whether to break lines at word boundaries to fit the width
    pub wrap: bool,
}

impl TextFormat {
    /// Left and top aligned, single line
    pub const SINGLE_LINE: Self = Self {
        align: Align::Near,
        line_align: Align::Near,
        wrap: false,
    };

    /// Centered on both axes, wrapped
    pub const CENTERED: Self = Self {
        align: Align::Center,
        line_align: Align::Center,
        wrap: true,
    };
}

/// Measures and draws text
pub trait Typesetter {
    /// The line metric height of `font` in pixels at `dpi`
    ///
    /// This is the distance between the baselines of two consecutive lines,
    /// i.e. ascent, descent and line gap combined.
    fn line_height(&mut self, font: &FontSpec, dpi: f32) -> Result<f32, FontError>;

    /// The extent of `text`, broken into lines at word boundaries if it
    /// exceeds `max_width`
    fn measure(
        &mut self,
        font: &FontSpec,
        text: &str,
        max_width: Option<f32>,
        dpi: f32,
    ) -> Result<Size, FontError>;

    /// Draw `text` into `rect` on the canvas
    fn draw(
        &mut self,
        canvas: &mut Canvas,
        font: &FontSpec,
        text: &str,
        rect: BoxRegion,
        format: TextFormat,
        color: Rgba<u8>,
    ) -> Result<(), FontError>;
}

impl<T: Typesetter + ?Sized> Typesetter for &mut T {
    fn line_height(&mut self, font: &FontSpec, dpi: f32) -> Result<f32, FontError> {
        (**self).line_height(font, dpi)
    }

    fn measure(
        &mut self,
        font: &FontSpec,
        text: &str,
        max_width: Option<f32>,
        dpi: f32,
    ) -> Result<Size, FontError> {
        (**self).measure(font, text, max_width, dpi)
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        font: &FontSpec,
        text: &str,
        rect: BoxRegion,
        format: TextFormat,
        color: Rgba<u8>,
    ) -> Result<(), FontError> {
        (**self).draw(canvas, font, text, rect, format, color)
    }
}
