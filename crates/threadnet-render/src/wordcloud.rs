//! Word clouds of message text.
//!
//! Words are runs of alphanumerics and apostrophes at least two characters
//! long. Counting is case-insensitive; each word is drawn in its most
//! frequent spelling. English stopwords are dropped and a trailing `'s` is
//! stripped. Font size follows `0.5 * count / max_count + 0.5` of the
//! largest size, and words are placed along an Archimedean spiral from the
//! centre, shrinking until they fit or are skipped.
//!
//! Drawing requires the `wordcloud` feature; without it
//! [`Renderer::create_wordcloud`] logs an error and returns `Ok(None)`.

use std::path::PathBuf;

use crate::Renderer;
use crate::error::Result;

/// Options for [`Renderer::create_wordcloud`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCloudOptions {
    pub title: String,
    pub max_words: usize,
    /// Colour name or `#rrggbb`.
    pub background: String,
    /// Seed for word placement and colours.
    pub seed: u64,
    pub save_path: Option<PathBuf>,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            title: "Word Cloud".to_string(),
            max_words: 100,
            background: "white".to_string(),
            seed: 42,
            save_path: None,
        }
    }
}

#[cfg(feature = "wordcloud")]
pub use cloud::{PlacedWord, STOPWORDS, layout_words, word_frequencies};

#[cfg(feature = "wordcloud")]
mod cloud {
    use std::collections::{HashMap, HashSet};
    use std::path::PathBuf;

    use plotters::prelude::*;
    use plotters::style::text_anchor::{HPos, Pos, VPos};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tracing::debug;

    use super::WordCloudOptions;
    use crate::error::{RenderError, Result};
    use crate::style::{parse_color, viridis};
    use crate::{Renderer, saved};

    /// English stopwords removed before counting.
    pub const STOPWORDS: &[&str] = &[
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "else", "ever", "few", "for", "from", "further", "get", "had", "has",
        "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
        "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
        "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only",
        "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own",
        "same", "shall", "she", "should", "so", "some", "such", "than", "that", "the", "their",
        "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
        "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
        "when", "where", "which", "while", "who", "whom", "why", "with", "would", "you", "your",
        "yours", "yourself", "yourselves", "don't", "can't", "won't", "isn't", "aren't",
        "wasn't", "weren't", "doesn't", "didn't", "i'm", "i've", "i'll", "i'd", "you're",
        "it's", "that's", "there's", "let's",
    ];

    /// Relative weight of frequency in font sizing.
    const RELATIVE_SCALING: f64 = 0.5;
    const SHRINK: f64 = 0.9;
    const SPIRAL_STEP: f64 = 0.1;

    /// A word positioned on the canvas.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PlacedWord {
        pub text: String,
        pub count: usize,
        /// Top-left corner in pixels.
        pub x: i32,
        pub y: i32,
        pub width: u32,
        pub height: u32,
        pub font_size: u32,
    }

    impl PlacedWord {
        fn overlaps(&self, x: i32, y: i32, w: u32, h: u32) -> bool {
            let (ax1, ay1) = (self.x + to_i32(self.width), self.y + to_i32(self.height));
            let (bx1, by1) = (x + to_i32(w), y + to_i32(h));
            self.x < bx1 && x < ax1 && self.y < by1 && y < ay1
        }
    }

    fn to_i32(v: u32) -> i32 {
        i32::try_from(v).unwrap_or(i32::MAX)
    }

    /// The `max_words` most frequent words of `text`, most frequent first.
    ///
    /// Ties are broken alphabetically.
    #[must_use]
    pub fn word_frequencies(text: &str, max_words: usize) -> Vec<(String, usize)> {
        let stop: HashSet<&str> = STOPWORDS.iter().copied().collect();
        // lowercase key -> (total, spelling -> count)
        let mut counts: HashMap<String, (usize, HashMap<String, usize>)> = HashMap::new();

        for raw in text.split(|c: char| !(c.is_alphanumeric() || c == '\'')) {
            let word = raw.trim_matches('\'');
            let word = word
                .strip_suffix("'s")
                .or_else(|| word.strip_suffix("'S"))
                .unwrap_or(word);
            if word.chars().count() < 2 {
                continue;
            }
            let key = word.to_lowercase();
            if stop.contains(key.as_str()) {
                continue;
            }
            let entry = counts.entry(key).or_default();
            entry.0 += 1;
            *entry.1.entry(word.to_string()).or_default() += 1;
        }

        let mut words: Vec<(String, usize)> = counts
            .into_values()
            .map(|(total, spellings)| {
                let mut forms: Vec<(String, usize)> = spellings.into_iter().collect();
                forms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                (forms.into_iter().next().map(|f| f.0).unwrap_or_default(), total)
            })
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(max_words);
        words
    }

    /// Place `words` (most frequent first) on a `width` x `height` canvas.
    ///
    /// `measure(text, font_size)` returns the pixel extent of `text`. Words
    /// that do not fit at `min_font` or larger are left out. Placed boxes
    /// never overlap and stay inside the canvas.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn layout_words<F>(
        words: &[(String, usize)],
        width: u32,
        height: u32,
        min_font: u32,
        seed: u64,
        measure: F,
    ) -> Vec<PlacedWord>
    where
        F: Fn(&str, u32) -> (u32, u32),
    {
        let Some(max_count) = words.iter().map(|w| w.1).max().filter(|&m| m > 0) else {
            return Vec::new();
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let max_font = f64::from(height) / 4.0;
        let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);
        let max_radius = cx.hypot(cy);
        let mut placed: Vec<PlacedWord> = Vec::new();

        for (text, count) in words {
            let ratio = *count as f64 / max_count as f64;
            let mut size = (max_font * RELATIVE_SCALING.mul_add(ratio, 1.0 - RELATIVE_SCALING)).round();
            let phase = rng.gen_range(0.0..std::f64::consts::TAU);

            while size >= f64::from(min_font) {
                let font_size = size as u32;
                let (w, h) = measure(text, font_size);
                if w <= width && h <= height {
                    let spot = spiral_spot(&placed, (cx, cy), max_radius, phase, (w, h), (width, height));
                    if let Some((x, y)) = spot {
                        placed.push(PlacedWord {
                            text: text.clone(),
                            count: *count,
                            x,
                            y,
                            width: w,
                            height: h,
                            font_size,
                        });
                        break;
                    }
                }
                size = (size * SHRINK).floor();
            }
        }
        placed
    }

    /// First free top-left corner along a spiral around `centre`.
    #[allow(clippy::cast_possible_truncation)]
    fn spiral_spot(
        placed: &[PlacedWord],
        centre: (f64, f64),
        max_radius: f64,
        phase: f64,
        (w, h): (u32, u32),
        (width, height): (u32, u32),
    ) -> Option<(i32, i32)> {
        let (half_w, half_h) = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let mut t = 0.0_f64;
        loop {
            let r = t * 2.0;
            if r > max_radius {
                return None;
            }
            let angle = t + phase;
            let x = (centre.0 + r * angle.cos() - half_w).round() as i32;
            let y = (centre.1 + r * angle.sin() - half_h).round() as i32;
            let inside = x >= 0
                && y >= 0
                && x + to_i32(w) <= to_i32(width)
                && y + to_i32(h) <= to_i32(height);
            if inside && !placed.iter().any(|p| p.overlaps(x, y, w, h)) {
                return Some((x, y));
            }
            t += SPIRAL_STEP;
        }
    }

    impl Renderer {
        pub(super) fn draw_wordcloud(
            &self,
            text: &str,
            options: &WordCloudOptions,
        ) -> Result<Option<PathBuf>> {
            let background = parse_color(&options.background)?;
            let words = word_frequencies(text, options.max_words);
            if words.is_empty() {
                return Err(RenderError::EmptyInput("text has no countable words"));
            }
            let path = self.target_path(options.save_path.as_deref(), "wordcloud.png")?;

            {
                let root = BitMapBackend::new(&path, self.canvas_size((15.0, 8.0))).into_drawing_area();
                root.fill(&background)?;
                let title = ("sans-serif", self.points(16.0))
                    .into_font()
                    .style(FontStyle::Bold);
                let root = root.titled(&options.title, title)?;
                let area = root.margin(self.points(10.0), self.points(10.0), self.points(10.0), self.points(10.0));
                let (width, height) = area.dim_in_pixel();

                let measure = |word: &str, size: u32| {
                    let font: TextStyle<'_> = ("sans-serif", size).into_font().into();
                    area.estimate_text_size(word, &font)
                        .unwrap_or((size.saturating_mul(u32::try_from(word.len()).unwrap_or(u32::MAX)), size))
                };
                let placed = layout_words(&words, width, height, self.points(4.0), options.seed, measure);
                debug!(words = words.len(), placed = placed.len(), "word cloud layout");

                let mut rng = StdRng::seed_from_u64(options.seed);
                for word in &placed {
                    let color = viridis(rng.r#gen::<f64>());
                    let style = TextStyle::from(("sans-serif", word.font_size).into_font())
                        .pos(Pos::new(HPos::Left, VPos::Top))
                        .color(&color);
                    area.draw(&Text::new(word.text.as_str(), (word.x, word.y), style))?;
                }
                root.present()?;
            }

            saved("word cloud", &path);
            Ok(Some(path))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn approx(text: &str, size: u32) -> (u32, u32) {
            (u32::try_from(text.len()).unwrap_or(u32::MAX) * size * 3 / 5, size)
        }

        #[test]
        fn counts_ignore_case_and_stopwords() {
            let words = word_frequencies(
                "The forum, the FORUM and the forum! Rust's borrow checker; rust rust. a I",
                10,
            );
            assert_eq!(
                words,
                vec![
                    ("forum".to_string(), 3),
                    ("rust".to_string(), 3),
                    ("borrow".to_string(), 1),
                    ("checker".to_string(), 1),
                ]
            );
        }

        #[test]
        fn most_common_spelling_wins_and_limit_applies() {
            let words = word_frequencies("Linux Linux linux kernel kernel", 1);
            assert_eq!(words, vec![("Linux".to_string(), 3)]);
            assert!(word_frequencies("the and of", 10).is_empty());
        }

        #[test]
        fn layout_has_no_overlaps_and_stays_inside() {
            let words: Vec<(String, usize)> = (0..40)
                .map(|i| (format!("word{i}"), 40 - i))
                .collect();
            let placed = layout_words(&words, 800, 400, 4, 42, approx);
            assert!(!placed.is_empty());
            assert_eq!(placed[0].text, "word0");
            for (i, a) in placed.iter().enumerate() {
                assert!(a.x >= 0 && a.y >= 0);
                assert!(a.x + to_i32(a.width) <= 800 && a.y + to_i32(a.height) <= 400);
                for b in &placed[i + 1..] {
                    assert!(!a.overlaps(b.x, b.y, b.width, b.height), "{} overlaps {}", a.text, b.text);
                }
            }
        }

        #[test]
        fn layout_is_seeded() {
            let words = vec![("alpha".to_string(), 3), ("beta".to_string(), 2), ("gamma".to_string(), 1)];
            assert_eq!(
                layout_words(&words, 400, 200, 4, 1, approx),
                layout_words(&words, 400, 200, 4, 1, approx)
            );
            assert!(layout_words(&[], 400, 200, 4, 1, approx).is_empty());
        }
    }
}

impl Renderer {
    /// Draw a word cloud of `text`.
    ///
    /// Returns the written path, or `None` when word-cloud support is not
    /// compiled in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderError::EmptyInput`] when `text` has no words
    /// left after stopword removal, plus colour, I/O and drawing failures.
    #[tracing::instrument(skip(self, text, options), fields(chars = text.len()))]
    pub fn create_wordcloud(&self, text: &str, options: &WordCloudOptions) -> Result<Option<PathBuf>> {
        #[cfg(feature = "wordcloud")]
        {
            self.draw_wordcloud(text, options)
        }
        #[cfg(not(feature = "wordcloud"))]
        {
            let _ = (text, options);
            tracing::error!("word cloud support not compiled in; rebuild with the `wordcloud` feature");
            Ok(None)
        }
    }
}

#[cfg(all(test, not(feature = "wordcloud")))]
mod tests {
    use super::*;

    #[test]
    fn missing_feature_is_a_logged_no_op() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let r = Renderer::new(crate::RenderConfig {
            output_dir: tmp.path().to_path_buf(),
            dpi: 72,
        })
        .expect("renderer");
        let out = r.create_wordcloud("some words here", &WordCloudOptions::default());
        assert!(matches!(out, Ok(None)));
        assert!(!tmp.path().join("wordcloud.png").exists());
    }
}
