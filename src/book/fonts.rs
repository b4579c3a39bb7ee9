//! Standard-14 Helvetica metrics and WinAnsi text encoding.
//!
//! The fonts are not embedded, so widths come from the Adobe AFM tables.

/// Widths for codes 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

/// Width used for Latin-1 characters above the ASCII range.
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Font {
    HelveticaBold,
    HelveticaOblique,
}

impl Font {
    pub fn all() -> [Font; 2] {
        [Font::HelveticaBold, Font::HelveticaOblique]
    }

    /// PostScript name used as the PDF `BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Name of the font in page resource dictionaries.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::HelveticaBold => "F1",
            Font::HelveticaOblique => "F2",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
            Font::HelveticaOblique => &HELVETICA_WIDTHS,
        }
    }

    fn byte_width(self, byte: u8) -> u16 {
        match byte {
            32..=126 => self.widths()[usize::from(byte - 32)],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Width in millimetres of `text` set at `size_pt`.
    pub fn text_width_mm(self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|b| u32::from(self.byte_width(b)))
            .sum();
        units as f32 / 1000.0 * size_pt / super::geometry::MM_TO_PT
    }
}

/// Encode text for a WinAnsi simple font. Characters outside Latin-1 become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| match u32::from(c) {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}
