//! Book assembly
//!
//! Lays the story, illustrations and cover pattern out onto fixed 210 mm
//! square pages and serializes them as a PDF. Given the same assets the
//! output is byte-for-byte identical.

pub mod asset;
pub mod builder;
pub mod compose;
pub mod fonts;
pub mod geometry;
pub mod text;
pub mod theme;

pub use asset::DecodedImage;
pub use builder::{BuildState, DocumentBuilder};
pub use compose::{ComposedPage, DrawOp, ImageId, PageKind};
pub use geometry::{cover_rect, fit_rect, Placement, Rect};
pub use theme::{resolve_theme, Rgb, ThemeColor};

use crate::models::StoryPage;
use crate::{Error, Result};

/// Everything the assembler needs, as produced by the upstream clients.
#[derive(Debug, Clone)]
pub struct BookAssets {
    pub title: String,
    pub theme_color: String,
    pub end_message: String,
    pub pages: Vec<StoryPage>,
    pub cover_pattern: Vec<u8>,
    pub illustrations: Vec<Vec<u8>>,
}

/// Build the complete book: cover, one page per story page, back cover.
pub fn assemble_book(assets: &BookAssets) -> Result<Vec<u8>> {
    if assets.pages.len() != assets.illustrations.len() {
        return Err(Error::AssetCountMismatch {
            pages: assets.pages.len(),
            images: assets.illustrations.len(),
        });
    }

    tracing::info!(
        "Assembling book '{}' with {} story pages",
        assets.title,
        assets.pages.len()
    );

    let theme = resolve_theme(&assets.theme_color);
    let mut builder = DocumentBuilder::new(theme, assets.pages.len());

    let pattern = builder.add_image(DecodedImage::decode(
        &assets.cover_pattern,
        1,
        "cover pattern",
    )?)?;
    builder.write_cover(&assets.title, pattern)?;

    for (i, (page, bytes)) in assets.pages.iter().zip(&assets.illustrations).enumerate() {
        let illustration = builder.add_image(DecodedImage::decode(bytes, i + 2, "illustration")?)?;
        builder.write_story_page(page, illustration)?;
    }

    builder.write_back_cover(&assets.end_message, pattern)?;
    builder.finalize()
}
