//! Word placement for the rendered cloud.
//!
//! Words are laid out largest first. Each word starts at the canvas centre and
//! walks outward along an Archimedean spiral until its bounding box neither
//! leaves the canvas nor overlaps an earlier word. A word that finds no spot
//! is retried at a smaller size and dropped once it falls below the minimum.

use std::f32::consts::TAU;

use shared::domain::WordFrequency;

const SPIRAL_ANGLE_STEP: f32 = 0.1;
const SPIRAL_RADIUS_PER_TURN: f32 = 6.0;

/// Measures the rendered extent of a word at a given pixel size.
pub trait TextMeasure {
    /// Returns `(width, height)` in pixels.
    fn measure(&self, word: &str, font_size: f32) -> (f32, f32);
}

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub width: u32,
    pub height: u32,
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub font_step: f32,
    /// Empty pixels kept around every word.
    pub margin: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            min_font_size: 10.0,
            max_font_size: 100.0,
            font_step: 4.0,
            margin: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    fn inside(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= width
            && self.y + self.height <= height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub count: u64,
    /// Position in the ranked input, used to pick a colour.
    pub rank: usize,
    pub font_size: f32,
    /// Box of the glyphs themselves, without margin.
    pub bounds: Rect,
}

/// Font size proportional to the word's share of the top count.
pub fn font_size_for(count: u64, max_count: u64, options: &LayoutOptions) -> f32 {
    if max_count == 0 {
        return options.min_font_size;
    }
    let ratio = count as f32 / max_count as f32;
    let span = options.max_font_size - options.min_font_size;
    (options.min_font_size + span * ratio).clamp(options.min_font_size, options.max_font_size)
}

/// Places ranked words on the canvas. Words that do not fit are skipped.
pub fn layout_words<M: TextMeasure>(
    frequencies: &[WordFrequency],
    measure: &M,
    options: &LayoutOptions,
) -> Vec<PlacedWord> {
    let max_count = frequencies.iter().map(WordFrequency::count).max().unwrap_or(0);
    let mut occupied: Vec<Rect> = Vec::with_capacity(frequencies.len());
    let mut placed = Vec::with_capacity(frequencies.len());

    for (rank, freq) in frequencies.iter().enumerate() {
        let mut font_size = font_size_for(freq.count(), max_count, options);
        loop {
            let (width, height) = measure.measure(freq.word(), font_size);
            if let Some(bounds) = find_spot(width, height, &occupied, options) {
                occupied.push(Rect {
                    x: bounds.x - options.margin,
                    y: bounds.y - options.margin,
                    width: bounds.width + options.margin * 2.0,
                    height: bounds.height + options.margin * 2.0,
                });
                placed.push(PlacedWord {
                    word: freq.word().to_string(),
                    count: freq.count(),
                    rank,
                    font_size,
                    bounds,
                });
                break;
            }
            if font_size <= options.min_font_size {
                tracing::debug!(word = freq.word(), "word does not fit on canvas, skipped");
                break;
            }
            font_size = (font_size - options.font_step).max(options.min_font_size);
        }
    }

    placed
}

fn find_spot(width: f32, height: f32, occupied: &[Rect], options: &LayoutOptions) -> Option<Rect> {
    let canvas_w = options.width as f32;
    let canvas_h = options.height as f32;
    if width + options.margin * 2.0 > canvas_w || height + options.margin * 2.0 > canvas_h {
        return None;
    }

    let (cx, cy) = (canvas_w / 2.0, canvas_h / 2.0);
    let aspect = canvas_w / canvas_h;
    let max_radius = (cx * cx + cy * cy).sqrt();
    let mut angle = 0.0_f32;

    loop {
        let radius = SPIRAL_RADIUS_PER_TURN * angle / TAU;
        if radius > max_radius {
            return None;
        }
        let candidate = Rect {
            x: cx + radius * aspect * angle.cos() - width / 2.0,
            y: cy + radius * angle.sin() - height / 2.0,
            width,
            height,
        };
        let padded = Rect {
            x: candidate.x - options.margin,
            y: candidate.y - options.margin,
            width: candidate.width + options.margin * 2.0,
            height: candidate.height + options.margin * 2.0,
        };
        if padded.inside(canvas_w, canvas_h) && !occupied.iter().any(|r| r.intersects(&padded)) {
            return Some(candidate);
        }
        angle += SPIRAL_ANGLE_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is `0.6 * size` wide and `size` tall.
    struct FixedWidth;

    impl TextMeasure for FixedWidth {
        fn measure(&self, word: &str, font_size: f32) -> (f32, f32) {
            (word.chars().count() as f32 * font_size * 0.6, font_size)
        }
    }

    #[test]
    fn font_size_scales_with_count() {
        let options = LayoutOptions::default();
        assert_eq!(font_size_for(10, 10, &options), 100.0);
        assert_eq!(font_size_for(5, 10, &options), 55.0);
        assert_eq!(font_size_for(0, 10, &options), 10.0);
        assert_eq!(font_size_for(3, 0, &options), 10.0);
    }

    #[test]
    fn first_word_is_centred() {
        let options = LayoutOptions::default();
        let placed = layout_words(&[WordFrequency::new("cloud", 4)], &FixedWidth, &options);
        assert_eq!(placed.len(), 1);
        let bounds = placed[0].bounds;
        assert_eq!(bounds.x + bounds.width / 2.0, 300.0);
        assert_eq!(bounds.y + bounds.height / 2.0, 200.0);
    }

    #[test]
    fn placed_words_never_overlap_or_leave_canvas() {
        let options = LayoutOptions::default();
        let freqs: Vec<WordFrequency> = (0..40)
            .map(|i| WordFrequency::new(format!("word{i}"), 40 - i as u64))
            .collect();
        let placed = layout_words(&freqs, &FixedWidth, &options);
        assert!(placed.len() > 5);

        for (i, a) in placed.iter().enumerate() {
            assert!(a.bounds.x >= 0.0 && a.bounds.y >= 0.0);
            assert!(a.bounds.x + a.bounds.width <= 600.0);
            assert!(a.bounds.y + a.bounds.height <= 400.0);
            for b in placed.iter().skip(i + 1) {
                assert!(!a.bounds.intersects(&b.bounds), "{} overlaps {}", a.word, b.word);
            }
        }
    }

    #[test]
    fn oversized_word_shrinks_until_it_fits() {
        let options = LayoutOptions::default();
        let placed = layout_words(
            &[WordFrequency::new("supercalifragilistic", 1)],
            &FixedWidth,
            &options,
        );
        assert_eq!(placed.len(), 1);
        assert!(placed[0].font_size < options.max_font_size);
        assert!(placed[0].bounds.width <= 600.0);
    }

    #[test]
    fn word_too_long_for_minimum_size_is_dropped() {
        let options = LayoutOptions::default();
        let long = "x".repeat(200);
        let placed = layout_words(
            &[WordFrequency::new(long, 1), WordFrequency::new("kept", 1)],
            &FixedWidth,
            &options,
        );
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].word, "kept");
        assert_eq!(placed[0].rank, 1);
    }
}
