//! Word-cloud rendering: an 800×400 PNG where glyph size follows word frequency.
//!
//! Words are placed largest-first along an elliptical spiral from the centre;
//! a word that cannot be placed at its size is retried smaller, then dropped.
//! After `MAX_CONSECUTIVE_MISSES` dropped words in a row the canvas counts as
//! full and the remaining words are skipped.
//! Glyphs come from the 8×8 bitmap font and are scaled by an integer factor.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::analysis::error::AnalysisError;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 400;

const MAX_WORDS: usize = 200;
const GLYPH: u32 = 8;
const MIN_SCALE: u32 = 2;
const MAX_SCALE: u32 = 8;
const MARGIN: u32 = 2;
const SPIRAL_STEP: f64 = 0.15;
const MAX_SPIRAL_STEPS: usize = 3000;
const MAX_CONSECUTIVE_MISSES: usize = 10;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const PALETTE: &[Rgb<u8>] = &[
    Rgb([68, 1, 84]),
    Rgb([59, 82, 139]),
    Rgb([33, 145, 140]),
    Rgb([94, 201, 98]),
    Rgb([253, 231, 37]),
    Rgb([72, 40, 120]),
];

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "else",
    "ever", "few", "for", "from", "further", "get", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no",
    "nor", "not", "of", "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our",
    "ours", "ourselves", "out", "over", "own", "same", "shall", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "with", "would", "www", "you", "your", "yours", "yourself", "yourselves", "com", "http",
];

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Rect {
    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Writes word-cloud PNGs into a fixed output directory.
#[derive(Debug, Clone)]
pub struct WordCloudRenderer {
    output_dir: PathBuf,
}

impl WordCloudRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders `normalized` text into `<output_dir>/<file_name>` and returns the path.
    pub fn render(&self, normalized: &str, file_name: &str) -> Result<PathBuf, AnalysisError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(AnalysisError::RenderFailure(format!(
                "invalid artifact file name '{file_name}'"
            )));
        }

        let frequencies = word_frequencies(normalized);
        if frequencies.is_empty() {
            return Err(AnalysisError::RenderFailure(
                "no words left to render".to_string(),
            ));
        }

        let cloud = draw_cloud(&frequencies);
        debug!(
            "Placed {}/{} words in word cloud ({} tried)",
            cloud.placed,
            frequencies.len(),
            cloud.tried
        );

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            AnalysisError::RenderFailure(format!(
                "cannot create '{}': {e}",
                self.output_dir.display()
            ))
        })?;
        let path = self.output_dir.join(file_name);
        cloud
            .image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| AnalysisError::RenderFailure(format!("cannot write PNG: {e}")))?;
        Ok(path)
    }
}

/// Word counts, most frequent first, ties broken alphabetically.
fn word_frequencies(normalized: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in normalized.split_whitespace() {
        if word.len() < 2 || STOPWORDS.contains(&word) {
            continue;
        }
        *counts.entry(word).or_default() += 1;
    }

    let mut words: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(MAX_WORDS);
    words
}

fn scale_for(count: usize, max_count: usize) -> u32 {
    let ratio = count as f64 / max_count.max(1) as f64;
    MIN_SCALE + (ratio * f64::from(MAX_SCALE - MIN_SCALE)).round() as u32
}

struct Cloud {
    image: RgbImage,
    placed: usize,
    tried: usize,
}

fn draw_cloud(frequencies: &[(String, usize)]) -> Cloud {
    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let mut occupied: Vec<Rect> = Vec::new();
    let max_count = frequencies.first().map(|(_, c)| *c).unwrap_or(1);
    let mut misses = 0;
    let mut tried = 0;

    for (index, (word, count)) in frequencies.iter().enumerate() {
        if misses >= MAX_CONSECUTIVE_MISSES {
            break;
        }
        tried += 1;
        let chars = word.chars().count() as u32;
        let start_scale = scale_for(*count, max_count);

        let spot = (MIN_SCALE..=start_scale).rev().find_map(|scale| {
            let w = chars * GLYPH * scale + MARGIN;
            let h = GLYPH * scale + MARGIN;
            find_free_spot(w, h, &occupied).map(|rect| (rect, scale))
        });

        match spot {
            Some((rect, scale)) => {
                draw_word(&mut image, word, rect.x, rect.y, scale, PALETTE[index % PALETTE.len()]);
                occupied.push(rect);
                misses = 0;
            }
            None => misses += 1,
        }
    }

    Cloud {
        placed: occupied.len(),
        image,
        tried,
    }
}

fn find_free_spot(w: u32, h: u32, occupied: &[Rect]) -> Option<Rect> {
    if w > WIDTH || h > HEIGHT {
        return None;
    }
    let cx = f64::from(WIDTH) / 2.0;
    let cy = f64::from(HEIGHT) / 2.0;

    for step in 0..MAX_SPIRAL_STEPS {
        let t = step as f64 * SPIRAL_STEP;
        // Stretch x to follow the 2:1 canvas.
        let x = cx + 2.0 * t * t.cos() * 2.0 - f64::from(w) / 2.0;
        let y = cy + 2.0 * t * t.sin() - f64::from(h) / 2.0;
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let rect = Rect {
            x: x as u32,
            y: y as u32,
            w,
            h,
        };
        if rect.x + w > WIDTH || rect.y + h > HEIGHT {
            continue;
        }
        if !occupied.iter().any(|o| o.intersects(&rect)) {
            return Some(rect);
        }
    }
    None
}

fn draw_word(image: &mut RgbImage, word: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    for (ci, ch) in word.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let gx = x + ci as u32 * GLYPH * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = gx + col * scale;
                let py = y + row as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        if px + dx < WIDTH && py + dy < HEIGHT {
                            image.put_pixel(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
    }
}
