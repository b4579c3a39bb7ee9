//! Document builder: accepts pages in book order and serializes the PDF.
//!
//! Pages must arrive as one cover, exactly `N` story pages, then one back
//! cover. Any other order, or any call after [`DocumentBuilder::finalize`],
//! fails with [`Error::InvalidState`].

use super::asset::DecodedImage;
use super::compose::{
    compose_back_cover, compose_cover, compose_story_page, ComposedPage, DrawOp, ImageId,
    ImageInfo, PageKind, PAGE_SIZE_MM,
};
use super::fonts::{encode_win_ansi, Font};
use super::geometry::{mm_to_pt, Rect};
use super::theme::Rgb;
use crate::models::StoryPage;
use crate::{Error, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeSet;
use std::fmt;

/// Bezier control distance for quarter circles.
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Empty,
    CoverWritten,
    StoryPageWritten(usize),
    BackCoverWritten,
    Finalized,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Empty => write!(f, "EMPTY"),
            BuildState::CoverWritten => write!(f, "COVER_WRITTEN"),
            BuildState::StoryPageWritten(n) => write!(f, "STORY_PAGE_WRITTEN({})", n),
            BuildState::BackCoverWritten => write!(f, "BACK_COVER_WRITTEN"),
            BuildState::Finalized => write!(f, "FINALIZED"),
        }
    }
}

struct EmbeddedImage {
    object_id: ObjectId,
    width: u32,
    height: u32,
}

pub struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    fonts: Vec<(Font, ObjectId)>,
    images: Vec<EmbeddedImage>,
    page_ids: Vec<ObjectId>,
    page_kinds: Vec<PageKind>,
    theme: Rgb,
    story_pages: usize,
    state: BuildState,
}

fn real(value: f32) -> Object {
    Object::Real((value * 1000.0).round() / 1000.0)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn image_resource_name(id: ImageId) -> String {
    format!("Im{}", id.0)
}

/// PDF y coordinate (bottom-up, points) of a top-down millimetre value.
fn flip_y(y_mm: f32) -> f32 {
    mm_to_pt(PAGE_SIZE_MM - y_mm)
}

fn push_color(ops: &mut Vec<Operation>, color: Rgb, stroke: bool) {
    let (r, g, b) = color.unit();
    let operator = if stroke { "RG" } else { "rg" };
    ops.push(Operation::new(operator, vec![real(r), real(g), real(b)]));
}

fn push_rect_path(ops: &mut Vec<Operation>, rect: Rect) {
    ops.push(Operation::new(
        "re",
        vec![
            real(mm_to_pt(rect.x)),
            real(flip_y(rect.bottom())),
            real(mm_to_pt(rect.width)),
            real(mm_to_pt(rect.height)),
        ],
    ));
}

fn push_rounded_rect_path(ops: &mut Vec<Operation>, rect: Rect, radius: f32) {
    let r = mm_to_pt(radius.min(rect.width / 2.0).min(rect.height / 2.0));
    let k = r * KAPPA;
    let left = mm_to_pt(rect.x);
    let right = mm_to_pt(rect.right());
    let top = flip_y(rect.y);
    let bottom = flip_y(rect.bottom());

    let point = |op: &str, coords: &[f32]| {
        Operation::new(op, coords.iter().copied().map(real).collect())
    };

    ops.push(point("m", &[left + r, bottom]));
    ops.push(point("l", &[right - r, bottom]));
    ops.push(point("c", &[right - r + k, bottom, right, bottom + r - k, right, bottom + r]));
    ops.push(point("l", &[right, top - r]));
    ops.push(point("c", &[right, top - r + k, right - r + k, top, right - r, top]));
    ops.push(point("l", &[left + r, top]));
    ops.push(point("c", &[left + r - k, top, left, top - r + k, left, top - r]));
    ops.push(point("l", &[left, bottom + r]));
    ops.push(point("c", &[left, bottom + r - k, left + r - k, bottom, left + r, bottom]));
    ops.push(Operation::new("h", vec![]));
}

fn render_ops(page: &ComposedPage) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::FillRect { rect, color } => {
                ops.push(Operation::new("q", vec![]));
                push_color(&mut ops, *color, false);
                push_rect_path(&mut ops, *rect);
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::FillRoundedRect {
                rect,
                radius,
                color,
            } => {
                ops.push(Operation::new("q", vec![]));
                push_color(&mut ops, *color, false);
                push_rounded_rect_path(&mut ops, *rect, *radius);
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Image { id, rect, clip } => {
                ops.push(Operation::new("q", vec![]));
                if let Some(clip) = clip {
                    push_rect_path(&mut ops, *clip);
                    ops.push(Operation::new("W", vec![]));
                    ops.push(Operation::new("n", vec![]));
                }
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(mm_to_pt(rect.width)),
                        real(0.0),
                        real(0.0),
                        real(mm_to_pt(rect.height)),
                        real(mm_to_pt(rect.x)),
                        real(flip_y(rect.bottom())),
                    ],
                ));
                ops.push(Operation::new("Do", vec![name(&image_resource_name(*id))]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Text {
                font,
                size_pt,
                color,
                x,
                baseline,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                push_color(&mut ops, *color, false);
                ops.push(Operation::new(
                    "Tf",
                    vec![name(font.resource_name()), real(*size_pt)],
                ));
                ops.push(Operation::new(
                    "Td",
                    vec![real(mm_to_pt(*x)), real(flip_y(*baseline))],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

impl DocumentBuilder {
    /// Start an empty book with `story_pages` interior pages on `theme`.
    pub fn new(theme: Rgb, story_pages: usize) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let fonts = Font::all()
            .into_iter()
            .map(|font| {
                let id = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => font.base_font(),
                    "Encoding" => "WinAnsiEncoding",
                });
                (font, id)
            })
            .collect();

        Self {
            doc,
            pages_id,
            fonts,
            images: Vec::new(),
            page_ids: Vec::new(),
            page_kinds: Vec::new(),
            theme,
            story_pages,
            state: BuildState::Empty,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Kinds of the pages written so far, in order.
    pub fn page_kinds(&self) -> &[PageKind] {
        &self.page_kinds
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }

    fn image_info(&self, id: ImageId) -> Result<ImageInfo> {
        let embedded = self.images.get(id.0).ok_or_else(|| {
            Error::Pdf(format!("image {} was never added to this document", id.0))
        })?;
        Ok(ImageInfo {
            id,
            width: embedded.width,
            height: embedded.height,
        })
    }

    /// Embed a decoded image as an XObject. It may be drawn on any page.
    pub fn add_image(&mut self, image: DecodedImage) -> Result<ImageId> {
        if self.state == BuildState::Finalized {
            return Err(self.invalid("add an image"));
        }

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width),
                "Height" => i64::from(image.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            image.rgb,
        );
        let object_id = self.doc.add_object(stream);

        let id = ImageId(self.images.len());
        self.images.push(EmbeddedImage {
            object_id,
            width: image.width,
            height: image.height,
        });
        Ok(id)
    }

    pub fn write_cover(&mut self, title: &str, pattern: ImageId) -> Result<()> {
        if self.state != BuildState::Empty {
            return Err(self.invalid("write the cover"));
        }
        let page = compose_cover(title, self.image_info(pattern)?)?;
        self.push_page(page)?;
        self.state = BuildState::CoverWritten;
        Ok(())
    }

    pub fn write_story_page(&mut self, story: &StoryPage, illustration: ImageId) -> Result<()> {
        let written = match self.state {
            BuildState::CoverWritten => 0,
            BuildState::StoryPageWritten(n) => n,
            _ => return Err(self.invalid("write a story page")),
        };
        if written >= self.story_pages {
            return Err(self.invalid("write a story page"));
        }

        let index = written + 1;
        let page = compose_story_page(index, story, self.image_info(illustration)?, self.theme)?;
        self.push_page(page)?;
        self.state = BuildState::StoryPageWritten(index);
        Ok(())
    }

    pub fn write_back_cover(&mut self, message: &str, pattern: ImageId) -> Result<()> {
        let ready = match self.state {
            BuildState::CoverWritten => self.story_pages == 0,
            BuildState::StoryPageWritten(n) => n == self.story_pages,
            _ => false,
        };
        if !ready {
            return Err(self.invalid("write the back cover"));
        }

        let page_number = self.page_ids.len() + 1;
        let page = compose_back_cover(message, self.image_info(pattern)?, page_number)?;
        self.push_page(page)?;
        self.state = BuildState::BackCoverWritten;
        Ok(())
    }

    fn push_page(&mut self, page: ComposedPage) -> Result<()> {
        let content = Content {
            operations: render_ops(&page),
        };
        let encoded = content
            .encode()
            .map_err(|e| Error::Pdf(format!("failed to encode page content: {}", e)))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let mut font_resources = Dictionary::new();
        for (font, id) in &self.fonts {
            font_resources.set(font.resource_name(), *id);
        }

        let used_images: BTreeSet<ImageId> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        let mut image_resources = Dictionary::new();
        for id in used_images {
            let embedded = &self.images[id.0];
            image_resources.set(image_resource_name(id), embedded.object_id);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => font_resources,
                "XObject" => image_resources,
            },
        });

        tracing::debug!("Wrote page {} ({:?})", self.page_ids.len() + 1, page.kind);
        self.page_ids.push(page_id);
        self.page_kinds.push(page.kind);
        Ok(())
    }

    /// Serialize the finished book. Only valid after the back cover.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        if self.state != BuildState::BackCoverWritten {
            return Err(self.invalid("finalize"));
        }

        let size = mm_to_pt(PAGE_SIZE_MM);
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(size), real(size)],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| Error::Pdf(format!("failed to serialize document: {}", e)))?;

        self.state = BuildState::Finalized;
        tracing::info!(
            "Finalized document: {} pages, {} bytes",
            self.page_ids.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
