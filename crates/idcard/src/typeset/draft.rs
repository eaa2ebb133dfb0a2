//! A typesetter that does not need any font files
//!
//! Every character is a fixed-width cell and every visible character is
//! drawn as a solid bar. This is enough to check a layout on a machine
//! without the configured fonts, and it is fully deterministic.

use image::Rgba;

use super::{FontError, TextFormat, Typesetter};
use crate::{
    canvas::Canvas,
    font::{FontSpec, FontStyle},
    geom::{BoxRegion, Size},
};

/// Advance of one character cell, in em
const ADVANCE_EM: f32 = 0.5;
/// Advance of one bold character cell, in em
const BOLD_ADVANCE_EM: f32 = 0.6;
/// Line height, in em
const LINE_HEIGHT_EM: f32 = 1.2;

/// Fixed-pitch bar typesetter
#[derive(Debug, Default, Copy, Clone)]
pub struct DraftTypesetter;

impl DraftTypesetter {
    /// Create a new draft typesetter
    pub fn new() -> Self {
        Self
    }

    fn advance(font: &FontSpec, dpi: f32) -> f32 {
        let em = font.size_px(dpi);
        if font.style.is_bold() {
            em * BOLD_ADVANCE_EM
        } else {
            em * ADVANCE_EM
        }
    }

    /// Break `text` into lines of at most `max_width` pixels
    ///
    /// Hard line breaks are kept. A single word that is wider than
    /// `max_width` gets a line of its own.
    fn lines(text: &str, advance: f32, max_width: Option<f32>) -> Vec<String> {
        let mut lines = Vec::new();
        if text.is_empty() {
            return lines;
        }
        for paragraph in text.split('\n') {
            let max_chars = match max_width {
                Some(w) => ((w / advance).floor() as usize).max(1),
                None => {
                    lines.push(paragraph.to_owned());
                    continue;
                }
            };
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let len = line.chars().count();
                let wlen = word.chars().count();
                if len > 0 && len + 1 + wlen > max_chars {
                    lines.push(std::mem::take(&mut line));
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
            }
            lines.push(line);
        }
        lines
    }
}

impl Typesetter for DraftTypesetter {
    fn line_height(&mut self, font: &FontSpec, dpi: f32) -> Result<f32, FontError> {
        Ok(font.size_px(dpi) * LINE_HEIGHT_EM)
    }

    fn measure(
        &mut self,
        font: &FontSpec,
        text: &str,
        max_width: Option<f32>,
        dpi: f32,
    ) -> Result<Size, FontError> {
        let advance = Self::advance(font, dpi);
        let lines = Self::lines(text, advance, max_width);
        let w = lines
            .iter()
            .map(|l| l.chars().count() as f32 * advance)
            .fold(0.0, f32::max);
        let h = lines.len() as f32 * self.line_height(font, dpi)?;
        Ok(Size::new(w, h))
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
        let dpi = canvas.dpi();
        let advance = Self::advance(font, dpi);
        let line_height = self.line_height(font, dpi)?;
        let max_width = format.wrap.then_some(rect.w);
        let lines = Self::lines(text, advance, max_width);

        let block_h = lines.len() as f32 * line_height;
        let mut y = rect.y + format.line_align.offset(rect.h, block_h);
        for line in &lines {
            let line_w = line.chars().count() as f32 * advance;
            let x0 = rect.x + format.align.offset(rect.w, line_w);
            for (i, c) in line.chars().enumerate() {
                if c.is_whitespace() {
                    continue;
                }
                let cell = BoxRegion::new(
                    x0 + i as f32 * advance + advance * 0.1,
                    y + line_height * 0.2,
                    advance * 0.8,
                    line_height * 0.6,
                );
                canvas.fill_rect(cell, color);
            }
            if font.style.contains(FontStyle::UNDERLINE) {
                let bar = BoxRegion::new(x0, y + line_height * 0.85, line_w, line_height * 0.05);
                canvas.fill_rect(bar, color);
            }
            if font.style.contains(FontStyle::STRIKEOUT) {
                let bar = BoxRegion::new(x0, y + line_height * 0.5, line_w, line_height * 0.05);
                canvas.fill_rect(bar, color);
            }
            y += line_height;
        }
        Ok(())
    }
}
