//! # The card canvas
//!
//! An RGBA raster with the physical size of an ID-1 card at a given
//! resolution. All drawing operations clip to the canvas.

use std::{
    io::{Cursor, Write},
    path::Path,
};

use image::{
    imageops::{self, FilterType},
    ImageFormat, Rgba, RgbaImage,
};
use tempfile::NamedTempFile;

use crate::{
    geom::{BoxRegion, PixelRect, Size},
    units::{pixels, Unit},
    RenderError,
};

/// Width of an ID-1 (CR80) card in millimeters
pub const CARD_WIDTH_MM: f32 = 85.60;
/// Height of an ID-1 (CR80) card in millimeters
pub const CARD_HEIGHT_MM: f32 = 53.98;

/// Opaque white
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Opaque black
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// The neutral fill of image placeholders
pub const LIGHT_GRAY: Rgba<u8> = Rgba([211, 211, 211, 255]);

/// Upper bound for the raster buffer (1 GiB)
const MAX_CANVAS_BYTES: u64 = 1 << 30;

/// The pixel size of a card at `dpi`
///
/// ```
/// assert_eq!(idcard::canvas::card_pixels(300.0), (1011, 638));
/// ```
pub fn card_pixels(dpi: f32) -> (u32, u32) {
    let w = pixels(CARD_WIDTH_MM, Unit::Millimeter, dpi).round();
    let h = pixels(CARD_HEIGHT_MM, Unit::Millimeter, dpi).round();
    (w as u32, h as u32)
}

/// A raster surface together with its resolution
pub struct Canvas {
    image: RgbaImage,
    dpi: f32,
}

impl Canvas {
    /// Allocate a blank (transparent) canvas of the given pixel size
    pub fn new(width: u32, height: u32, dpi: f32) -> Result<Self, RenderError> {
        let bytes = u64::from(width) * u64::from(height) * 4;
        if width == 0 || height == 0 || bytes > MAX_CANVAS_BYTES || !(dpi > 0.0) {
            return Err(RenderError::Canvas { width, height, dpi });
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
            dpi,
        })
    }

    /// Allocate a canvas with the size of an ID-1 card at `dpi`
    pub fn cr80(dpi: f32) -> Result<Self, RenderError> {
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(RenderError::Canvas {
                width: 0,
                height: 0,
                dpi,
            });
        }
        let (width, height) = card_pixels(dpi);
        Self::new(width, height, dpi)
    }

    /// The width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// The height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The size in pixels
    pub fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    /// The resolution in dots per inch
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Get a single pixel, if it is on the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// Fill the whole canvas
    pub fn fill(&mut self, color: Rgba<u8>) {
        for px in self.image.pixels_mut() {
            *px = color;
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height()) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// The part of `r` that is on the canvas
    fn visible(&self, r: PixelRect) -> Option<PixelRect> {
        let x0 = r.x.max(0);
        let y0 = r.y.max(0);
        let x1 = r.right().min(i64::from(self.width()));
        let y1 = r.bottom().min(i64::from(self.height()));
        (x0 < x1 && y0 < y1).then(|| PixelRect {
            x: x0,
            y: y0,
            w: (x1 - x0) as u32,
            h: (y1 - y0) as u32,
        })
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, region: BoxRegion, color: Rgba<u8>) {
        if let Some(v) = self.visible(region.to_pixel_rect()) {
            for y in v.y..v.bottom() {
                for x in v.x..v.right() {
                    self.image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Draw a one pixel outline on the snapped edges of `region`
    ///
    /// The right and bottom lines are drawn on the pixel column/row right
    /// after the region, so the outline encloses it.
    pub fn stroke_rect(&mut self, region: BoxRegion, color: Rgba<u8>) {
        let r = region.to_pixel_rect();
        let (x1, y1) = (r.right(), r.bottom());
        // only the columns and rows on the canvas
        let max_x = i64::from(self.width()) - 1;
        let max_y = i64::from(self.height()) - 1;
        for x in r.x.max(0)..=x1.min(max_x) {
            self.put(x, r.y, color);
            self.put(x, y1, color);
        }
        for y in r.y.max(0)..=y1.min(max_y) {
            self.put(r.x, y, color);
            self.put(x1, y, color);
        }
    }

    /// Blend `color` into a pixel with the given coverage (0 = none, 255 = full)
    pub fn blend(&mut self, x: i64, y: i64, coverage: u8, color: Rgba<u8>) {
        if coverage == 0
            || x < 0
            || y < 0
            || x >= i64::from(self.width())
            || y >= i64::from(self.height())
        {
            return;
        }
        let alpha = u32::from(coverage) * u32::from(color[3]) / 255;
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let s = u32::from(color[c]);
            let d = u32::from(dst[c]);
            dst[c] = ((s * alpha + d * (255 - alpha) + 127) / 255) as u8;
        }
        let da = u32::from(dst[3]);
        dst[3] = (alpha + da * (255 - alpha) / 255) as u8;
    }

    /// Scale `source` to the snapped `region` and draw it on top
    ///
    /// When the region sticks out of the canvas, only the part of the
    /// source that lands on the canvas is scaled.
    pub fn draw_image(&mut self, source: &RgbaImage, region: BoxRegion) {
        let r = region.to_pixel_rect();
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 {
            return;
        }
        let v = match self.visible(r) {
            Some(v) => v,
            None => return,
        };
        if v == r {
            let scaled = if source.dimensions() == (r.w, r.h) {
                source.clone()
            } else {
                imageops::resize(source, r.w, r.h, FilterType::CatmullRom)
            };
            imageops::overlay(&mut self.image, &scaled, r.x, r.y);
            return;
        }

        let (x0, x1) = source_span(r.x, r.w, v.x, v.w, src_w);
        let (y0, y1) = source_span(r.y, r.h, v.y, v.h, src_h);
        let part = imageops::crop_imm(source, x0, y0, x1 - x0, y1 - y0).to_image();
        let scaled = imageops::resize(&part, v.w, v.h, FilterType::CatmullRom);
        imageops::overlay(&mut self.image, &scaled, v.x, v.y);
    }

    /// Encode the canvas as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(RenderError::Encode)?;
        Ok(buf)
    }

    /// Encode the canvas as PNG and write it to `path`
    ///
    /// The data is written to a temporary file next to `path` which then
    /// replaces `path`, so a failed save leaves no partial file behind.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = self.encode_png()?;
        let io_error = |source: std::io::Error| RenderError::Io {
            path: path.to_owned(),
            source,
        };
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

/// The source pixels `[start, end)` along one axis that are shown when a
/// source of `src_len` pixels is scaled to `len` pixels at `pos` and only
/// `visible_len` pixels from `visible_pos` on are on the canvas.
fn source_span(pos: i64, len: u32, visible_pos: i64, visible_len: u32, src_len: u32) -> (u32, u32) {
    let scale = f64::from(src_len) / f64::from(len);
    let offset = visible_pos as f64 - pos as f64;
    let start = (offset * scale).floor().clamp(0.0, f64::from(src_len - 1));
    let end = ((offset + f64::from(visible_len)) * scale).ceil();
    let end = end.clamp(start + 1.0, f64::from(src_len));
    (start as u32, end as u32)
}
