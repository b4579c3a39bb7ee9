//! Connection self-test: one text and one image round-trip against the
//! configured models.

use crate::ai::mime::detect_image_mime;
use crate::ai::{IllustrationService, StoryService};
use crate::Result;

pub const TEXT_CHECK_PROMPT: &str = "Explain how AI works in a few words";
pub const IMAGE_CHECK_PROMPT: &str =
    "A simple, cute, storybook-style drawing of a cartoon armadillo";

/// Outcome of one check. Failures are kept so both checks always run.
#[derive(Debug)]
pub struct ConnectionReport {
    pub text: Result<String>,
    pub image: Result<Vec<u8>>,
}

impl ConnectionReport {
    pub fn is_success(&self) -> bool {
        self.text.is_ok() && self.image.is_ok()
    }

    /// MIME type of the returned image, when the image check succeeded.
    pub fn image_mime(&self) -> Option<&'static str> {
        self.image.as_deref().ok().and_then(detect_image_mime)
    }
}

pub async fn check_connection(
    story: &dyn StoryService,
    illustrator: &dyn IllustrationService,
) -> ConnectionReport {
    tracing::info!("Checking text generation");
    let text = story.generate_story(TEXT_CHECK_PROMPT).await;
    if let Err(e) = &text {
        tracing::warn!("Text generation check failed: {}", e);
    }

    tracing::info!("Checking image generation");
    let image = illustrator.cover_pattern(IMAGE_CHECK_PROMPT).await;
    if let Err(e) = &image {
        tracing::warn!("Image generation check failed: {}", e);
    }

    ConnectionReport { text, image }
}
