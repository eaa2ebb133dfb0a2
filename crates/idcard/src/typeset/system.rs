//! Typesetting with the fonts installed on the host
//!
//! Faces are looked up by family, weight and slant in a [`fontdb`]
//! database, rasterized and laid out with [`fontdue`], and decorated
//! (underline, strikeout) with the metrics read by [`ttf_parser`].

use std::{collections::HashMap, path::Path, rc::Rc};

use fontdb::{Database, Family, Query, Stretch, Weight, ID};
use fontdue::layout::{CoordinateSystem, GlyphPosition, Layout, LayoutSettings, TextStyle, WrapStyle};
use image::Rgba;

use super::{FontError, TextFormat, Typesetter};
use crate::{
    canvas::Canvas,
    font::{FontSpec, FontStyle},
    geom::{BoxRegion, Size},
};

/// A decoration line relative to the baseline (up is positive), in font
/// units or em
#[derive(Debug, Copy, Clone)]
struct Stroke {
    /// Top edge of the line
    position: f32,
    thickness: f32,
}

const UNDERLINE_EM: Stroke = Stroke {
    position: -0.1,
    thickness: 0.05,
};

const STRIKEOUT_EM: Stroke = Stroke {
    position: 0.3,
    thickness: 0.05,
};

#[cfg(target_os = "windows")]
const SANS_SERIF: &str = "Arial";
#[cfg(target_os = "macos")]
const SANS_SERIF: &str = "Helvetica";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const SANS_SERIF: &str = "DejaVu Sans";

struct Face {
    font: fontdue::Font,
    units_per_em: f32,
    underline: Option<Stroke>,
    strikeout: Option<Stroke>,
}

impl Face {
    fn parse(family: &str, data: &[u8], index: u32) -> Result<Self, FontError> {
        let settings = fontdue::FontSettings {
            collection_index: index,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(data, settings).map_err(|message| FontError::Parse {
            family: family.to_owned(),
            message,
        })?;
        let (units_per_em, underline, strikeout) = match ttf_parser::Face::parse(data, index) {
            Ok(face) => {
                let stroke = |m: ttf_parser::LineMetrics| Stroke {
                    position: f32::from(m.position),
                    thickness: f32::from(m.thickness),
                };
                (
                    f32::from(face.units_per_em()),
                    face.underline_metrics().map(stroke),
                    face.strikeout_metrics().map(stroke),
                )
            }
            Err(e) => {
                log::debug!("No decoration metrics for {:?}: {}", family, e);
                (font.units_per_em(), None, None)
            }
        };
        Ok(Self {
            font,
            units_per_em,
            underline,
            strikeout,
        })
    }

    fn line_height(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.new_line_size)
            .unwrap_or(px)
    }

    fn layout(&self, text: &str, px: f32, max_width: Option<f32>) -> Layout<()> {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            max_width,
            wrap_style: WrapStyle::Word,
            ..LayoutSettings::default()
        });
        layout.append(std::slice::from_ref(&self.font), &TextStyle::new(text, px, 0));
        layout
    }

    fn advance(&self, glyph: &GlyphPosition<()>) -> f32 {
        self.font
            .metrics_indexed(glyph.key.glyph_index, glyph.key.px)
            .advance_width
    }

    /// The top and thickness of a decoration line in pixels, relative to
    /// the baseline (down is positive)
    ///
    /// `fallback` is used if the face has no such metrics, given in em.
    fn decoration(&self, stroke: Option<Stroke>, fallback: Stroke, px: f32) -> (f32, f32) {
        let (top, thickness) = match stroke {
            Some(s) if s.thickness > 0.0 => {
                let scale = px / self.units_per_em;
                (-s.position * scale, s.thickness * scale)
            }
            _ => (-fallback.position * px, fallback.thickness * px),
        };
        (top, thickness.max(1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// A [`Typesetter`] backed by system fonts
///
/// Faces are cached for the lifetime of the typesetter, so create one per
/// render to avoid holding on to font data.
pub struct SystemFonts {
    db: Database,
    faces: HashMap<FaceKey, Rc<Face>>,
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFonts {
    /// Create a typesetter with all fonts installed on the system
    ///
    /// Families that are not installed fall back to the usual sans-serif
    /// family of the platform.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        db.set_sans_serif_family(SANS_SERIF);
        log::debug!("Loaded {} system font faces", db.len());
        Self::with_database(db)
    }

    /// Create a typesetter from an existing font database
    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            faces: HashMap::new(),
        }
    }

    /// Add a single font file (e.g. a `*.ttf` shipped next to the card)
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<(), FontError> {
        self.db.load_font_file(path)?;
        Ok(())
    }

    /// Whether there are no fonts at all
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn query(&self, spec: &FontSpec) -> Result<ID, FontError> {
        let weight = if spec.style.is_bold() {
            Weight::BOLD
        } else {
            Weight::NORMAL
        };
        let style = if spec.style.is_italic() {
            fontdb::Style::Italic
        } else {
            fontdb::Style::Normal
        };
        let query = |families: &[Family<'_>]| {
            self.db.query(&Query {
                families,
                weight,
                stretch: Stretch::Normal,
                style,
            })
        };

        if let Some(id) = query(&[Family::Name(&spec.family)]) {
            return Ok(id);
        }
        log::warn!(
            "Font family {:?} not found, using the default sans-serif family",
            spec.family
        );
        if let Some(id) = query(&[Family::SansSerif]) {
            return Ok(id);
        }
        self.db
            .faces()
            .next()
            .map(|face| face.id)
            .ok_or(FontError::NoFonts)
    }

    fn face(&mut self, spec: &FontSpec) -> Result<Rc<Face>, FontError> {
        let key = FaceKey {
            family: spec.family.clone(),
            bold: spec.style.is_bold(),
            italic: spec.style.is_italic(),
        };
        if let Some(face) = self.faces.get(&key) {
            return Ok(Rc::clone(face));
        }
        let id = self.query(spec)?;
        let face = self
            .db
            .with_face_data(id, |data, index| Face::parse(&spec.family, data, index))
            .ok_or(FontError::NoFonts)??;
        let face = Rc::new(face);
        self.faces.insert(key, Rc::clone(&face));
        Ok(face)
    }
}

impl Typesetter for SystemFonts {
    fn line_height(&mut self, font: &FontSpec, dpi: f32) -> Result<f32, FontError> {
        let face = self.face(font)?;
        Ok(face.line_height(font.size_px(dpi)))
    }

    fn measure(
        &mut self,
        font: &FontSpec,
        text: &str,
        max_width: Option<f32>,
        dpi: f32,
    ) -> Result<Size, FontError> {
        let face = self.face(font)?;
        let layout = face.layout(text, font.size_px(dpi), max_width);
        let w = layout
            .glyphs()
            .iter()
            .map(|g| g.x + face.advance(g))
            .fold(0.0, f32::max);
        Ok(Size::new(w, layout.height()))
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
        let face = self.face(font)?;
        let px = font.size_px(canvas.dpi());
        let layout = face.layout(text, px, format.wrap.then_some(rect.w));
        let glyphs = layout.glyphs();
        let lines = match layout.lines() {
            Some(lines) => lines,
            None => return Ok(()),
        };

        let oy = rect.y + format.line_align.offset(rect.h, layout.height());
        for (index, line) in lines.iter().enumerate() {
            let end = lines.get(index + 1).map_or(glyphs.len(), |l| l.glyph_start);
            let line_glyphs = &glyphs[line.glyph_start.min(end)..end];
            let (left, right) = line_glyphs.iter().fold((f32::MAX, 0.0f32), |(l, r), g| {
                (l.min(g.x), r.max(g.x + face.advance(g)))
            });
            if left > right {
                continue;
            }
            let ox = rect.x + format.align.offset(rect.w, right);

            for g in line_glyphs {
                if g.width == 0 || g.height == 0 {
                    continue;
                }
                let (metrics, coverage) = face.font.rasterize_config(g.key);
                let x0 = (ox + g.x).round() as i64;
                let y0 = (oy + g.y).round() as i64;
                for (row, chunk) in coverage.chunks_exact(metrics.width.max(1)).enumerate() {
                    for (col, &c) in chunk.iter().enumerate() {
                        let x = x0.saturating_add(col as i64);
                        let y = y0.saturating_add(row as i64);
                        canvas.blend(x, y, c, color);
                    }
                }
            }

            let decorations = [
                (FontStyle::UNDERLINE, face.underline, UNDERLINE_EM),
                (FontStyle::STRIKEOUT, face.strikeout, STRIKEOUT_EM),
            ];
            for (flag, stroke, fallback) in decorations {
                if !font.style.contains(flag) {
                    continue;
                }
                let (top, thickness) = face.decoration(stroke, fallback, px);
                let bar = BoxRegion::new(
                    ox + left,
                    oy + line.baseline_y + top,
                    right - left,
                    thickness,
                );
                canvas.fill_rect(bar, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fontdb::Database;

    use super::SystemFonts;
    use crate::{
        canvas::{Canvas, BLACK, WHITE},
        font::{FontSpec, FontStyle},
        geom::BoxRegion,
        stack::BOTTOM_FORMAT,
        typeset::{FontError, TextFormat, Typesetter},
    };

    /// The installed fonts, or `None` on a host without any
    fn system_fonts() -> Option<SystemFonts> {
        let fonts = SystemFonts::new();
        if fonts.is_empty() {
            eprintln!("No system fonts installed, skipping");
            return None;
        }
        Some(fonts)
    }

    /// Non-white pixels as (x, y)
    fn ink(canvas: &Canvas) -> Vec<(u32, u32)> {
        let mut ink = Vec::new();
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) != Some(WHITE) {
                    ink.push((x, y));
                }
            }
        }
        ink
    }

    fn draw(
        fonts: &mut SystemFonts,
        spec: &FontSpec,
        text: &str,
        rect: BoxRegion,
        format: TextFormat,
    ) -> Canvas {
        let mut canvas = Canvas::new(500, 240, 300.0).unwrap();
        canvas.fill(WHITE);
        fonts.draw(&mut canvas, spec, text, rect, format, BLACK).unwrap();
        canvas
    }

    #[test]
    fn test_empty_database() {
        let mut fonts = SystemFonts::with_database(Database::new());
        assert!(fonts.is_empty());
        let result = fonts.line_height(&FontSpec::label(), 300.0);
        assert!(matches!(result, Err(FontError::NoFonts)));
    }

    #[test]
    fn test_missing_font_file() {
        let mut fonts = SystemFonts::with_database(Database::new());
        let result = fonts.load_font_file("does/not/exist.ttf");
        assert!(matches!(result, Err(FontError::Io(_))));
    }

    #[test]
    fn test_unknown_family_falls_back() {
        let Some(mut fonts) = system_fonts() else { return };
        let spec = FontSpec::new("No Such Family 1234", 8.0, FontStyle::REGULAR);
        assert!(fonts.line_height(&spec, 300.0).unwrap() > 0.0);
    }

    #[test]
    fn test_wrapped_height_is_whole_lines() {
        let Some(mut fonts) = system_fonts() else { return };
        let spec = FontSpec::new("Arial", 6.0, FontStyle::REGULAR);
        let line = fonts.line_height(&spec, 300.0).unwrap();
        assert!(line > 0.0);

        let long = "Property of ACME Corporation. If found, please return to the front desk. ".repeat(4);
        let mut lines = Vec::new();
        for text in ["", "Valid until 12/2030", long.as_str()] {
            let size = fonts.measure(&spec, text, Some(940.0), 300.0).unwrap();
            let n = size.h / line;
            assert!((n - n.round()).abs() < 1e-3, "{} is not a whole number of lines", n);
            lines.push(n.round() as u32);
        }
        assert_eq!(lines[0], 0);
        assert_eq!(lines[1], 1);
        assert!(lines[2] > 2);
    }

    #[test]
    fn test_ink_stays_in_rect() {
        let Some(mut fonts) = system_fonts() else { return };
        let rect = BoxRegion::new(100.0, 60.0, 300.0, 120.0);

        let canvas = draw(&mut fonts, &FontSpec::label(), "NO PHOTO", rect, TextFormat::CENTERED);
        let ink = ink(&canvas);
        assert!(!ink.is_empty());
        for &(x, y) in &ink {
            let (x, y) = (x as f32, y as f32);
            assert!(x >= rect.x - 2.0 && x <= rect.right() + 2.0, "ink at x={}", x);
            assert!(y >= rect.y - 2.0 && y <= rect.bottom() + 2.0, "ink at y={}", y);
        }
        // centered on both axes
        let (min_x, max_x) = ink.iter().fold((u32::MAX, 0), |(l, r), &(x, _)| (l.min(x), r.max(x)));
        let left = min_x as f32 - rect.x;
        let right = rect.right() - max_x as f32;
        assert!((left - right).abs() < 6.0, "left {} right {}", left, right);

        // wrapped text sits on the bottom edge
        let spec = FontSpec::new("Arial", 6.0, FontStyle::REGULAR);
        let text = "Valid until 12/2030 ".repeat(8);
        let canvas = draw(&mut fonts, &spec, &text, rect, BOTTOM_FORMAT);
        let ink = self::ink(&canvas);
        let max_y = ink.iter().map(|&(_, y)| y).max().unwrap();
        assert!(max_y as f32 <= rect.bottom() + 2.0);
        assert!(max_y as f32 >= rect.bottom() - 20.0);
    }

    #[test]
    fn test_decorations_add_ink() {
        let Some(mut fonts) = system_fonts() else { return };
        let rect = BoxRegion::new(20.0, 20.0, 460.0, 200.0);
        let count = |fonts: &mut SystemFonts, style| {
            let spec = FontSpec::new("Arial", 10.0, style);
            ink(&draw(fonts, &spec, "Jane Doe", rect, TextFormat::SINGLE_LINE)).len()
        };
        let regular = count(&mut fonts, FontStyle::REGULAR);
        assert!(regular > 0);
        assert!(count(&mut fonts, FontStyle::UNDERLINE) > regular);
        assert!(count(&mut fonts, FontStyle::STRIKEOUT) > regular);
    }
}
