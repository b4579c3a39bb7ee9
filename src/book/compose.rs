//! Page composition: turns page content into an ordered list of drawing
//! operations on a fixed 210 mm square page.
//!
//! Every page is drawn back to front: background, frame, image, text, footer.

use super::fonts::Font;
use super::geometry::{cover_rect, fit_rect, Rect};
use super::text::{fit_text, TextBlock, TextStyle};
use super::theme::Rgb;
use crate::models::StoryPage;
use crate::story::normalize_punctuation;
use crate::{Error, Result};

pub const PAGE_SIZE_MM: f32 = 210.0;
pub const PAGE: Rect = Rect::new(0.0, 0.0, PAGE_SIZE_MM, PAGE_SIZE_MM);

/// White plate behind the title on both covers.
pub const BOOKPLATE: Rect = Rect::new(30.0, 80.0, 150.0, 50.0);
pub const BOOKPLATE_RADIUS: f32 = 10.0;
pub const BOOKPLATE_PADDING: f32 = 5.0;

/// White "Polaroid" frame around each illustration.
pub const PHOTO_FRAME: Rect = Rect::new(10.0, 10.0, 190.0, 140.0);
pub const PHOTO_INSET: f32 = 4.0;

pub const TEXT_BAND: Rect = Rect::new(10.0, 155.0, 190.0, 40.0);
pub const FOOTER_BASELINE: f32 = 201.0;

pub const TITLE_STYLE: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size_pt: 24.0,
    min_size_pt: 14.0,
    leading: 0.625,
};

pub const END_MESSAGE_STYLE: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size_pt: 20.0,
    min_size_pt: 12.0,
    leading: 0.5,
};

pub const STORY_STYLE: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size_pt: 16.0,
    min_size_pt: 10.0,
    leading: 0.5,
};

pub const FOOTER_STYLE: TextStyle = TextStyle {
    font: Font::HelveticaOblique,
    size_pt: 8.0,
    min_size_pt: 8.0,
    leading: 0.5,
};

/// Half the Helvetica cap height, in em. Used to center text on a line.
const HALF_CAP_HEIGHT_EM: f32 = 0.359;

/// Handle for an image registered with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

/// Registered image id plus its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgb,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Rgb,
    },
    Image {
        id: ImageId,
        rect: Rect,
        clip: Option<Rect>,
    },
    Text {
        font: Font,
        size_pt: f32,
        color: Rgb,
        x: f32,
        baseline: f32,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Story(usize),
    BackCover,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPage {
    pub kind: PageKind,
    pub ops: Vec<DrawOp>,
}

impl ComposedPage {
    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn require_text(text: &str, page: usize, asset: &'static str) -> Result<String> {
    let text = normalize_punctuation(text);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::Asset {
            page,
            asset,
            reason: "is empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Emit centered text ops for `block`, starting at `top`.
fn centered_lines(block: &TextBlock, area: Rect, top: f32, ops: &mut Vec<DrawOp>) {
    let size_mm = block.size_pt / super::geometry::MM_TO_PT;
    for (i, line) in block.lines.iter().enumerate() {
        let width = block.font.text_width_mm(line, block.size_pt);
        let line_top = top + i as f32 * block.line_height_mm;
        ops.push(DrawOp::Text {
            font: block.font,
            size_pt: block.size_pt,
            color: Rgb::BLACK,
            x: area.x + (area.width - width) / 2.0,
            baseline: line_top + block.line_height_mm / 2.0 + HALF_CAP_HEIGHT_EM * size_mm,
            text: line.clone(),
        });
    }
}

fn compose_plate_page(
    kind: PageKind,
    page: usize,
    text: &str,
    asset: &'static str,
    style: &TextStyle,
    pattern: ImageInfo,
) -> Result<ComposedPage> {
    let text = require_text(text, page, asset)?;
    let placement = cover_rect(
        pattern.width as f32,
        pattern.height as f32,
        PAGE.width,
        PAGE.height,
    )?;

    let mut ops = vec![
        DrawOp::Image {
            id: pattern.id,
            rect: PAGE.place(placement),
            clip: Some(PAGE),
        },
        DrawOp::FillRoundedRect {
            rect: BOOKPLATE,
            radius: BOOKPLATE_RADIUS,
            color: Rgb::WHITE,
        },
    ];

    let area = BOOKPLATE.inset(BOOKPLATE_PADDING);
    let paragraphs: Vec<String> = text.lines().map(str::to_string).collect();
    let block = fit_text(&paragraphs, style, area.width, area.height);
    let top = area.y + (area.height - block.height_mm()) / 2.0;
    centered_lines(&block, area, top, &mut ops);

    Ok(ComposedPage { kind, ops })
}

/// Front cover: pattern background, bookplate and title.
pub fn compose_cover(title: &str, pattern: ImageInfo) -> Result<ComposedPage> {
    compose_plate_page(PageKind::Cover, 1, title, "title", &TITLE_STYLE, pattern)
}

/// Back cover: pattern background, bookplate and end message.
pub fn compose_back_cover(message: &str, pattern: ImageInfo, page: usize) -> Result<ComposedPage> {
    compose_plate_page(
        PageKind::BackCover,
        page,
        message,
        "end message",
        &END_MESSAGE_STYLE,
        pattern,
    )
}

/// Story page `index` (1-based): theme fill, framed illustration, verse and
/// page-number footer. The document page number is `index + 1`.
pub fn compose_story_page(
    index: usize,
    story: &StoryPage,
    illustration: ImageInfo,
    theme: Rgb,
) -> Result<ComposedPage> {
    let page = index + 1;
    let lines: Vec<String> = story
        .lines
        .iter()
        .map(|line| normalize_punctuation(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(Error::Asset {
            page,
            asset: "story text",
            reason: "is empty".to_string(),
        });
    }

    let image_area = PHOTO_FRAME.inset(PHOTO_INSET);
    let placement = fit_rect(
        illustration.width as f32,
        illustration.height as f32,
        image_area.width,
        image_area.height,
    )?;

    let mut ops = vec![
        DrawOp::FillRect {
            rect: PAGE,
            color: theme,
        },
        DrawOp::FillRect {
            rect: PHOTO_FRAME,
            color: Rgb::WHITE,
        },
        DrawOp::Image {
            id: illustration.id,
            rect: image_area.place(placement),
            clip: None,
        },
    ];

    let block = fit_text(&lines, &STORY_STYLE, TEXT_BAND.width, TEXT_BAND.height);
    centered_lines(&block, TEXT_BAND, TEXT_BAND.y, &mut ops);

    let footer = format!("Page {}", index);
    let footer_width = FOOTER_STYLE
        .font
        .text_width_mm(&footer, FOOTER_STYLE.size_pt);
    ops.push(DrawOp::Text {
        font: FOOTER_STYLE.font,
        size_pt: FOOTER_STYLE.size_pt,
        color: Rgb::BLACK,
        x: (PAGE_SIZE_MM - footer_width) / 2.0,
        baseline: FOOTER_BASELINE,
        text: footer,
    });

    Ok(ComposedPage {
        kind: PageKind::Story(index),
        ops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::fonts::encode_win_ansi;

    const PATTERN: ImageInfo = ImageInfo {
        id: ImageId(0),
        width: 1024,
        height: 1024,
    };
    const WIDE: ImageInfo = ImageInfo {
        id: ImageId(1),
        width: 1600,
        height: 900,
    };

    fn story(lines: &[&str]) -> StoryPage {
        StoryPage::new(lines.iter().map(|s| s.to_string()).collect())
    }

    fn within(inner: Rect, outer: Rect) -> bool {
        const EPS: f32 = 1e-3;
        inner.x >= outer.x - EPS
            && inner.y >= outer.y - EPS
            && inner.right() <= outer.right() + EPS
            && inner.bottom() <= outer.bottom() + EPS
    }

    #[test]
    fn test_cover_draw_order() {
        let page = compose_cover("Silly Maya", PATTERN).unwrap();
        assert_eq!(page.kind, PageKind::Cover);
        assert!(matches!(page.ops[0], DrawOp::Image { clip: Some(_), .. }));
        assert!(matches!(page.ops[1], DrawOp::FillRoundedRect { .. }));
        assert!(page.ops[2..]
            .iter()
            .all(|op| matches!(op, DrawOp::Text { .. })));
        assert_eq!(page.texts(), vec!["Silly Maya"]);
    }

    #[test]
    fn test_typographic_punctuation_survives_encoding() {
        let cover = compose_cover("Maya\u{2019}s \u{201C}Big\u{201D} Day", PATTERN).unwrap();
        assert_eq!(cover.texts(), vec!["Maya's \"Big\" Day"]);

        let back = compose_back_cover("Love \u{2014} Mom\u{2026}", PATTERN, 7).unwrap();
        assert_eq!(back.texts(), vec!["Love -- Mom..."]);

        for text in cover.texts().into_iter().chain(back.texts()) {
            assert!(!encode_win_ansi(text).contains(&b'?'), "{}", text);
        }
    }

    #[test]
    fn test_story_lines_are_normalized() {
        let page = compose_story_page(
            1,
            &story(&["\u{2018}Hi,\u{2019} she said\u{2026}"]),
            PATTERN,
            Rgb::WHITE,
        )
        .unwrap();
        assert_eq!(page.texts(), vec!["'Hi,' she said...", "Page 1"]);
    }

    #[test]
    fn test_cover_pattern_covers_page() {
        let page = compose_cover("Title", WIDE).unwrap();
        let DrawOp::Image { rect, .. } = page.ops[0] else {
            panic!("expected pattern image first");
        };
        assert!(rect.x <= 0.0 && rect.y <= 0.0);
        assert!(rect.right() >= PAGE_SIZE_MM && rect.bottom() >= PAGE_SIZE_MM);
    }

    #[test]
    fn test_cover_title_is_centered_inside_plate() {
        let page = compose_cover("Silly Maya", PATTERN).unwrap();
        let DrawOp::Text { x, baseline, size_pt, ref text, font, .. } = page.ops[2] else {
            panic!("expected title text");
        };
        assert_eq!(size_pt, TITLE_STYLE.size_pt);
        let width = font.text_width_mm(text, size_pt);
        let center = x + width / 2.0;
        assert!((center - PAGE_SIZE_MM / 2.0).abs() < 1e-3);
        assert!(baseline > BOOKPLATE.y && baseline < BOOKPLATE.bottom());
    }

    #[test]
    fn test_long_title_shrinks_to_fit_plate() {
        let title = "The Extraordinarily Long And Winding Adventure Of Maya And The Armadillo";
        let page = compose_cover(title, PATTERN).unwrap();
        let sizes: Vec<f32> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { size_pt, .. } => Some(*size_pt),
                _ => None,
            })
            .collect();
        assert!(sizes.len() >= 2);
        assert!(sizes.iter().all(|s| *s < TITLE_STYLE.size_pt));
        assert_eq!(page.texts().join(" "), title);
    }

    #[test]
    fn test_empty_title_is_an_asset_error() {
        let err = compose_cover("   ", PATTERN).unwrap_err();
        assert!(matches!(
            err,
            Error::Asset {
                page: 1,
                asset: "title",
                ..
            }
        ));
    }

    #[test]
    fn test_story_page_layers() {
        let theme = Rgb(204, 229, 255);
        let page = compose_story_page(
            1,
            &story(&["One", "Two", "Three", "Four"]),
            WIDE,
            theme,
        )
        .unwrap();

        assert_eq!(page.kind, PageKind::Story(1));
        assert_eq!(
            page.ops[0],
            DrawOp::FillRect {
                rect: PAGE,
                color: theme
            }
        );
        assert_eq!(
            page.ops[1],
            DrawOp::FillRect {
                rect: PHOTO_FRAME,
                color: Rgb::WHITE
            }
        );
        let DrawOp::Image { id, rect, clip } = page.ops[2] else {
            panic!("expected illustration third");
        };
        assert_eq!(id, WIDE.id);
        assert!(clip.is_none());
        assert!(within(rect, PHOTO_FRAME.inset(PHOTO_INSET)));
        assert_eq!(page.texts(), vec!["One", "Two", "Three", "Four", "Page 1"]);
    }

    #[test]
    fn test_story_text_stays_in_band() {
        let page = compose_story_page(
            3,
            &story(&["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]),
            PATTERN,
            Rgb::WHITE,
        )
        .unwrap();
        for op in &page.ops {
            if let DrawOp::Text { baseline, text, .. } = op {
                if text.starts_with("Page") {
                    continue;
                }
                assert!(*baseline > TEXT_BAND.y && *baseline <= TEXT_BAND.bottom());
            }
        }
    }

    #[test]
    fn test_blank_story_page_is_an_asset_error() {
        let err = compose_story_page(2, &story(&["  ", ""]), PATTERN, Rgb::WHITE).unwrap_err();
        assert!(matches!(
            err,
            Error::Asset {
                page: 3,
                asset: "story text",
                ..
            }
        ));
    }

    #[test]
    fn test_back_cover_uses_end_message_style() {
        let page = compose_back_cover("Love, Mom", PATTERN, 7).unwrap();
        assert_eq!(page.kind, PageKind::BackCover);
        assert_eq!(page.texts(), vec!["Love, Mom"]);
        assert!(page.ops.iter().any(|op| matches!(
            op,
            DrawOp::Text { size_pt, .. } if *size_pt == END_MESSAGE_STYLE.size_pt
        )));
        let err = compose_back_cover("", PATTERN, 7).unwrap_err();
        assert!(matches!(err, Error::Asset { page: 7, .. }));
    }
}
