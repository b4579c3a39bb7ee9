//! Application orchestration for turning a memory into a storybook PDF.

use crate::ai::{GeminiIllustrationClient, GeminiStoryClient, IllustrationService, StoryService};
use crate::book::{assemble_book, BookAssets};
use crate::models::{Config, StoryInputs};
use crate::{prompts, story, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Coordinates story generation, illustration and book assembly for one run.
pub struct App {
    story: Box<dyn StoryService>,
    illustrator: Box<dyn IllustrationService>,
    story_pages: usize,
    output_dir: PathBuf,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub story: Box<dyn StoryService>,
    pub illustrator: Box<dyn IllustrationService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks.
    pub fn with_services(services: AppServices, story_pages: usize, output_dir: PathBuf) -> Self {
        Self {
            story: services.story,
            illustrator: services.illustrator,
            story_pages,
            output_dir,
        }
    }

    /// Construct an app backed by Gemini, writing into the working directory.
    pub fn new(config: &Config) -> Self {
        // Reuse one HTTP connection pool across both clients.
        let http_client = reqwest::Client::new();

        info!("Story model: {}", config.story_model);
        info!("Image model: {}", config.image_model);

        let story = Box::new(GeminiStoryClient::new_with_client(
            config.gemini_api_key.clone(),
            config.story_model.clone(),
            http_client.clone(),
        ));
        let illustrator = Box::new(GeminiIllustrationClient::new_with_client(
            config.gemini_api_key.clone(),
            config.image_model.clone(),
            http_client,
        ));

        Self::with_services(
            AppServices { story, illustrator },
            config.story_pages,
            PathBuf::from("."),
        )
    }

    /// Run the whole pipeline and return the path of the written PDF.
    pub async fn run(&self, inputs: &StoryInputs) -> Result<PathBuf> {
        info!("Generating a {}-page story", self.story_pages);
        let raw = self
            .story
            .generate_story(&prompts::story_prompt(inputs, self.story_pages))
            .await?;
        let pages = story::parse_story(&raw, self.story_pages)?;
        for (i, page) in pages.iter().enumerate() {
            info!("Page {}: {}", i + 1, page.lines.join(" / "));
        }

        let style_guide = vec![
            prompts::style_guide_prompt(inputs),
            prompts::negative_prompt(),
        ];
        let mut session = self.illustrator.start_session(&style_guide).await?;

        let mut illustrations = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            info!("Illustrating page {}/{}", i + 1, pages.len());
            let image = self
                .illustrator
                .illustrate(&mut session, &prompts::scene_prompt(page))
                .await?;
            illustrations.push(image);
        }

        info!("Generating cover pattern ({})", inputs.cover_theme);
        let cover_pattern = self
            .illustrator
            .cover_pattern(&prompts::cover_pattern_prompt(&inputs.cover_theme))
            .await?;

        let pdf = assemble_book(&BookAssets {
            title: inputs.title.clone(),
            theme_color: inputs.theme_color.clone(),
            end_message: inputs.end_message.clone(),
            pages,
            cover_pattern,
            illustrations,
        })?;

        let path = self.output_dir.join(inputs.output_filename());
        fs::write(&path, &pdf)?;
        info!("Saved storybook ({} bytes) to {}", pdf.len(), path.display());

        Ok(path)
    }
}
