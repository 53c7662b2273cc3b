use std::{io::Cursor, path::Path};

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use shared::domain::WordFrequency;
use thiserror::Error;

use crate::layout::{layout_words, LayoutOptions, PlacedWord, TextMeasure};

const PALETTE: &[[u8; 3]] = &[
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [49, 104, 142],
    [53, 183, 121],
    [72, 40, 120],
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no font is configured for rendering")]
    FontUnavailable,
    #[error("failed to read font file '{path}': {source}")]
    FontRead {
        path: String,
        source: std::io::Error,
    },
    #[error("font file '{0}' is not a valid TrueType/OpenType font")]
    InvalidFont(String),
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub layout: LayoutOptions,
    pub background: [u8; 3],
    pub max_words: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            background: [255, 255, 255],
            max_words: 100,
        }
    }
}

/// Turns ranked frequencies into PNG bytes.
pub trait CloudRenderer: Send + Sync {
    fn render(&self, frequencies: &[WordFrequency]) -> Result<Vec<u8>, RenderError>;
}

/// Stand-in used when the configured font could not be loaded.
pub struct MissingFontRenderer;

impl CloudRenderer for MissingFontRenderer {
    fn render(&self, _frequencies: &[WordFrequency]) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::FontUnavailable)
    }
}

pub struct GlyphRenderer {
    font: FontArc,
    options: RenderOptions,
}

impl GlyphRenderer {
    pub fn new(font: FontArc, options: RenderOptions) -> Self {
        Self { font, options }
    }

    pub fn from_file(path: impl AsRef<Path>, options: RenderOptions) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.display().to_string(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|_| RenderError::InvalidFont(path.display().to_string()))?;
        Ok(Self::new(font, options))
    }

    fn draw_word(&self, canvas: &mut RgbaImage, placed: &PlacedWord) {
        let [r, g, b] = PALETTE[placed.rank % PALETTE.len()];
        let scaled = self.font.as_scaled(PxScale::from(placed.font_size));
        let mut caret = point(placed.bounds.x, placed.bounds.y + scaled.ascent());
        let mut previous: Option<GlyphId> = None;

        for ch in placed.word.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(placed.font_size, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let origin = outlined.px_bounds().min;
            outlined.draw(|gx, gy, coverage| {
                let x = origin.x as i64 + i64::from(gx);
                let y = origin.y as i64 + i64::from(gy);
                let outside = x < 0
                    || y < 0
                    || x >= i64::from(canvas.width())
                    || y >= i64::from(canvas.height());
                if outside {
                    return;
                }
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                blend(pixel, [r, g, b], coverage);
            });
        }
    }

    /// Lays out at most `max_words` of the ranked input.
    fn layout(&self, frequencies: &[WordFrequency]) -> Vec<PlacedWord> {
        let words = &frequencies[..frequencies.len().min(self.options.max_words)];
        let placed = layout_words(words, self, &self.options.layout);
        tracing::debug!(
            requested = words.len(),
            placed = placed.len(),
            "laid out word cloud"
        );
        placed
    }
}

impl TextMeasure for GlyphRenderer {
    fn measure(&self, word: &str, font_size: f32) -> (f32, f32) {
        let scaled = self.font.as_scaled(PxScale::from(font_size));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in word.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        (width, scaled.ascent() - scaled.descent())
    }
}

impl CloudRenderer for GlyphRenderer {
    fn render(&self, frequencies: &[WordFrequency]) -> Result<Vec<u8>, RenderError> {
        let placed = self.layout(frequencies);
        let [r, g, b] = self.options.background;
        let mut canvas = RgbaImage::from_pixel(
            self.options.layout.width,
            self.options.layout.height,
            Rgba([r, g, b, 255]),
        );
        for word in &placed {
            self.draw_word(&mut canvas, word);
        }
        encode_png(canvas)
    }
}

fn blend(pixel: &mut Rgba<u8>, color: [u8; 3], coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0);
    for (channel, target) in pixel.0.iter_mut().zip(color) {
        let mixed = f32::from(*channel) * (1.0 - alpha) + f32::from(target) * alpha;
        *channel = mixed.round() as u8;
    }
}

pub fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas).write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}
