//! Word wrapping and the overflow rule for text bands.
//!
//! Text is wrapped at the nominal size first. While the block is taller than
//! its band the size drops one point at a time, down to the style minimum.
//! If it still overflows at the minimum, trailing lines are dropped and the
//! last kept line ends in `...`.

use super::fonts::Font;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size_pt: f32,
    pub min_size_pt: f32,
    /// Line height in millimetres per point of font size.
    pub leading: f32,
}

impl TextStyle {
    pub fn line_height_mm(&self, size_pt: f32) -> f32 {
        size_pt * self.leading
    }
}

/// Text laid out for a band: final size, wrapped lines and line height.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub font: Font,
    pub size_pt: f32,
    pub line_height_mm: f32,
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl TextBlock {
    pub fn height_mm(&self) -> f32 {
        self.lines.len() as f32 * self.line_height_mm
    }
}

/// Break a word wider than `max_width` into pieces that fit.
fn split_long_word(word: &str, font: Font, size_pt: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if font.text_width_mm(&current, size_pt) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy word wrap of a single paragraph.
pub fn wrap_line(text: &str, font: Font, size_pt: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if font.text_width_mm(&candidate, size_pt) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if font.text_width_mm(word, size_pt) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = split_long_word(word, font, size_pt, max_width);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap each paragraph independently. Empty paragraphs are skipped.
pub fn wrap_paragraphs(paragraphs: &[String], font: Font, size_pt: f32, max_width: f32) -> Vec<String> {
    paragraphs
        .iter()
        .flat_map(|p| wrap_line(p, font, size_pt, max_width))
        .collect()
}

/// Shorten `line` until `line...` fits in `max_width`.
fn with_ellipsis(line: &str, font: Font, size_pt: f32, max_width: f32) -> String {
    let mut base: String = line.trim_end().to_string();
    loop {
        let candidate = format!("{}{}", base.trim_end(), ELLIPSIS);
        if base.is_empty() || font.text_width_mm(&candidate, size_pt) <= max_width {
            return candidate;
        }
        base.pop();
    }
}

/// Lay out `paragraphs` inside a `max_width` × `max_height` band.
pub fn fit_text(paragraphs: &[String], style: &TextStyle, max_width: f32, max_height: f32) -> TextBlock {
    let mut size = style.size_pt;

    loop {
        let line_height = style.line_height_mm(size);
        let lines = wrap_paragraphs(paragraphs, style.font, size, max_width);
        let fits = lines.len() as f32 * line_height <= max_height + f32::EPSILON;

        if fits {
            return TextBlock {
                font: style.font,
                size_pt: size,
                line_height_mm: line_height,
                lines,
                truncated: false,
            };
        }

        if size - 1.0 >= style.min_size_pt {
            size -= 1.0;
            continue;
        }

        let max_lines = ((max_height / line_height).floor() as usize).max(1);
        let mut kept: Vec<String> = lines.into_iter().take(max_lines).collect();
        if let Some(last) = kept.last_mut() {
            *last = with_ellipsis(last, style.font, size, max_width);
        }
        tracing::warn!(
            "Text does not fit at {}pt, truncated to {} lines",
            size,
            kept.len()
        );
        return TextBlock {
            font: style.font,
            size_pt: size,
            line_height_mm: line_height,
            lines: kept,
            truncated: true,
        };
    }
}
