//! # Card composition
//!
//! [`render_card`] runs the whole pipeline for one card: allocate the
//! canvas, paint the background, draw the photo and logo slots and finally
//! the three text blocks. Everything it acquires (canvas, decoded images,
//! font faces held by the typesetter passed in) is scoped to the call.
//!
//! Problems with individual assets are not fatal. They are forwarded to a
//! [`Reporter`] and recorded in the [`RenderReport`], and the slot is
//! filled with a placeholder.

use std::{fmt, path::Path};

use crate::{
    canvas::{Canvas, BLACK, LIGHT_GRAY, WHITE},
    card::{CardSpec, ImageSlot},
    fit::{fit_image, AssetError, FittedImage},
    font::{FontRole, FontSpec},
    geom::BoxRegion,
    stack::{stack_text, TextStack},
    typeset::{TextFormat, Typesetter},
    units::DEFAULT_DPI,
    RenderError,
};

/// The image slots of a card
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Top left
    Photo,
    /// Top right
    Logo,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Photo => f.write_str("photo"),
            Self::Logo => f.write_str("logo"),
        }
    }
}

/// How an image slot is decorated
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotPolicy {
    /// Whether a placed image gets a one pixel black outline.
    /// Placeholders are never outlined.
    pub border: bool,
    /// The text on the placeholder
    pub label: &'static str,
}

impl SlotPolicy {
    /// Outlined, `NO PHOTO`
    pub const PHOTO: Self = Self {
        border: true,
        label: "NO PHOTO",
    };

    /// Not outlined, `NO LOGO`
    pub const LOGO: Self = Self {
        border: false,
        label: "NO LOGO",
    };
}

/// Settings of a render
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderOptions {
    /// Resolution of the output, also used to size the fonts
    pub dpi: f32,
    /// Decoration of the photo slot
    pub photo: SlotPolicy,
    /// Decoration of the logo slot
    pub logo: SlotPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            photo: SlotPolicy::PHOTO,
            logo: SlotPolicy::LOGO,
        }
    }
}

impl RenderOptions {
    /// Default options at the given resolution
    pub fn with_dpi(dpi: f32) -> Self {
        Self {
            dpi,
            ..Self::default()
        }
    }

    /// The policy for `slot`
    pub fn policy(&self, slot: Slot) -> SlotPolicy {
        match slot {
            Slot::Photo => self.photo,
            Slot::Logo => self.logo,
        }
    }
}

/// Something noteworthy that did not stop the render
#[derive(Debug)]
pub enum RenderEvent<'a> {
    /// An image could not be used, a placeholder was drawn instead
    AssetUnavailable {
        /// The affected slot
        slot: Slot,
        /// The configured path, if any
        path: Option<&'a Path>,
        /// Why the image could not be used
        cause: &'a AssetError,
    },
    /// A style string was not understood, the regular style was used
    StyleUnrecognized {
        /// The affected text
        role: FontRole,
        /// The configured style
        style: &'a str,
    },
}

/// Receives [`RenderEvent`]s
pub trait Reporter {
    /// Handle an event
    fn report(&mut self, event: RenderEvent<'_>);
}

/// Ignores all events
impl Reporter for () {
    fn report(&mut self, _event: RenderEvent<'_>) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: RenderEvent<'_>) {
        (**self).report(event)
    }
}

/// The outcome of one image slot
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SlotReport {
    /// Whether the placeholder was drawn
    pub placeholder: bool,
    /// The fitted image, or the full box for a placeholder
    pub region: BoxRegion,
}

/// What was drawn where
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    /// The photo slot
    pub photo: SlotReport,
    /// The logo slot
    pub logo: SlotReport,
    /// The text layout
    pub text: TextStack,
}

impl RenderReport {
    /// The report for `slot`
    pub fn slot(&self, slot: Slot) -> &SlotReport {
        match slot {
            Slot::Photo => &self.photo,
            Slot::Logo => &self.logo,
        }
    }
}

/// A finished card
pub struct RenderedCard {
    /// The raster
    pub canvas: Canvas,
    /// What was drawn where
    pub report: RenderReport,
}

impl RenderedCard {
    /// Encode the card as PNG and write it to `path`
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.canvas.save_png(path)
    }
}

fn draw_slot<T, R>(
    canvas: &mut Canvas,
    typesetter: &mut T,
    reporter: &mut R,
    slot: Slot,
    config: &ImageSlot,
    bbox: BoxRegion,
    options: &RenderOptions,
) -> Result<SlotReport, RenderError>
where
    T: Typesetter + ?Sized,
    R: Reporter + ?Sized,
{
    let policy = options.policy(slot);
    match fit_image(config.path.as_deref(), bbox) {
        FittedImage::Placed { region, source } => {
            canvas.draw_image(&source, region);
            if policy.border {
                canvas.stroke_rect(region, BLACK);
            }
            Ok(SlotReport {
                placeholder: false,
                region,
            })
        }
        FittedImage::Missing { region, cause } => {
            reporter.report(RenderEvent::AssetUnavailable {
                slot,
                path: config.path.as_deref(),
                cause: &cause,
            });
            canvas.fill_rect(region, LIGHT_GRAY);
            typesetter.draw(
                canvas,
                &FontSpec::label(),
                policy.label,
                region,
                TextFormat::CENTERED,
                BLACK,
            )?;
            Ok(SlotReport {
                placeholder: true,
                region,
            })
        }
    }
}

/// Render a card
///
/// The only fatal errors are a canvas that cannot be allocated and text
/// that cannot be typeset at all. Missing or broken images and unknown
/// style strings are reported to `reporter` and the render continues.
pub fn render_card<T, R>(
    card: &CardSpec,
    typesetter: &mut T,
    reporter: &mut R,
    options: &RenderOptions,
) -> Result<RenderedCard, RenderError>
where
    T: Typesetter + ?Sized,
    R: Reporter + ?Sized,
{
    let dpi = options.dpi;
    let mut canvas = Canvas::cr80(dpi)?;
    canvas.fill(WHITE);
    let size = canvas.size();
    let margin = card.margin().to_pixels(dpi);
    log::debug!(
        "Canvas {}x{} at {} dpi, margin {:.1}px",
        canvas.width(),
        canvas.height(),
        dpi,
        margin
    );

    for (role, style) in card.unrecognized_styles() {
        reporter.report(RenderEvent::StyleUnrecognized { role, style });
    }

    let photo_box = BoxRegion::new(
        margin,
        margin,
        card.photo().width.to_pixels(dpi),
        card.photo().height.to_pixels(dpi),
    );
    let photo = draw_slot(
        &mut canvas,
        typesetter,
        reporter,
        Slot::Photo,
        card.photo(),
        photo_box,
        options,
    )?;

    let logo_w = card.logo().width.to_pixels(dpi);
    let logo_box = BoxRegion::new(
        size.w - margin - logo_w,
        margin,
        logo_w,
        card.logo().height.to_pixels(dpi),
    );
    let logo = draw_slot(
        &mut canvas,
        typesetter,
        reporter,
        Slot::Logo,
        card.logo(),
        logo_box,
        options,
    )?;

    let text = stack_text(
        typesetter,
        size,
        margin,
        photo_box,
        card.fonts(),
        card.text(FontRole::Bottom),
        dpi,
    )?;
    for block in text.blocks() {
        typesetter.draw(
            &mut canvas,
            &block.font,
            card.text(block.role),
            block.region,
            block.format,
            BLACK,
        )?;
    }

    Ok(RenderedCard {
        canvas,
        report: RenderReport { photo, logo, text },
    })
}
