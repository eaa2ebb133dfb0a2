//! # Text layout
//!
//! The ID and the name are stacked below the photo box and share its left
//! edge and width. The additional text spans the card between the side
//! margins and grows upwards from the bottom margin when it wraps.

use crate::{
    font::{CardFonts, FontRole, FontSpec},
    geom::{BoxRegion, Size},
    typeset::{Align, FontError, TextFormat, Typesetter},
    units::PhysicalLength,
};

/// Gap between the bottom of the photo box and the ID line
pub const BADGE_GAP: PhysicalLength = PhysicalLength::mm(1.5);
/// Gap between the ID line and the name line
pub const NAME_GAP: PhysicalLength = PhysicalLength::mm(1.0);

/// Format of the additional text: left aligned, wrapped, bottom anchored
pub const BOTTOM_FORMAT: TextFormat = TextFormat {
    align: Align::Near,
    line_align: Align::Far,
    wrap: true,
};

/// A positioned piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// What the text is
    pub role: FontRole,
    /// The resolved font
    pub font: FontSpec,
    /// The layout rectangle
    pub region: BoxRegion,
    /// The height after word wrapping, for wrapped blocks
    pub wrapped_height: Option<f32>,
    /// Placement of the text within `region`
    pub format: TextFormat,
}

/// The three text blocks of a card
#[derive(Debug, Clone, PartialEq)]
pub struct TextStack {
    /// Employee ID
    pub badge: TextBlock,
    /// Full name
    pub name: TextBlock,
    /// Additional text
    pub bottom: TextBlock,
}

impl TextStack {
    /// The blocks in drawing order
    pub fn blocks(&self) -> [&TextBlock; 3] {
        [&self.badge, &self.name, &self.bottom]
    }
}

/// Compute the text blocks of a card
///
/// - `canvas` is the pixel size of the card
/// - `margin` is the card margin in pixels
/// - `photo` is the *configured* photo box, not the fitted image
/// - `bottom_text` is measured with word wrapping at the available width
///
/// The name line is positioned with the line height of the *badge* font,
/// so its top edge does not depend on the name font.
pub fn stack_text<T: Typesetter + ?Sized>(
    typesetter: &mut T,
    canvas: Size,
    margin: f32,
    photo: BoxRegion,
    fonts: &CardFonts,
    bottom_text: &str,
    dpi: f32,
) -> Result<TextStack, FontError> {
    let badge_line = typesetter.line_height(&fonts.badge, dpi)?;
    let badge_y = photo.bottom() + BADGE_GAP.to_pixels(dpi);
    let badge = TextBlock {
        role: FontRole::Badge,
        font: fonts.badge.clone(),
        region: BoxRegion::new(photo.x, badge_y, photo.w, badge_line),
        wrapped_height: None,
        format: TextFormat::SINGLE_LINE,
    };

    let name_line = typesetter.line_height(&fonts.name, dpi)?;
    let name_y = badge_y + badge_line + NAME_GAP.to_pixels(dpi);
    let name = TextBlock {
        role: FontRole::Name,
        font: fonts.name.clone(),
        region: BoxRegion::new(photo.x, name_y, photo.w, name_line),
        wrapped_height: None,
        format: TextFormat::SINGLE_LINE,
    };

    let width = (canvas.w - 2.0 * margin).max(0.0);
    let wrapped = typesetter.measure(&fonts.bottom, bottom_text, Some(width), dpi)?;
    let bottom = TextBlock {
        role: FontRole::Bottom,
        font: fonts.bottom.clone(),
        region: BoxRegion::new(
            margin,
            canvas.h - margin - wrapped.h,
            width,
            wrapped.h,
        ),
        wrapped_height: Some(wrapped.h),
        format: BOTTOM_FORMAT,
    };

    log::debug!(
        "Text layout: badge at y={:.1}, name at y={:.1}, bottom at y={:.1} ({:.1}px high)",
        badge_y,
        name_y,
        bottom.region.y,
        wrapped.h
    );
    Ok(TextStack {
        badge,
        name,
        bottom,
    })
}
