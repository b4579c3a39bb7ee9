use super::{IllustrationService, IllustrationSession, Role, SessionPart, SessionTurn, StoryService};
use crate::{Error, Result};
use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// A small solid-color PNG, used when no canned image is queued.
pub fn placeholder_png(width: u32, height: u32, color: [u8; 3]) -> Result<Vec<u8>> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[derive(Clone)]
pub struct MockStoryClient {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockStoryClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Canned story of `pages` pages, four lines each.
    pub fn with_pages(self, pages: usize) -> Self {
        let story = (1..=pages)
            .map(|page| {
                (1..=4)
                    .map(|line| format!("Page {} line {} of the tale", page, line))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        self.with_response(story)
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockStoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryService for MockStoryClient {
    async fn generate_story(&self, prompt: &str) -> Result<String> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::UpstreamResponse(
                "No canned story configured".to_string(),
            ));
        }
        let index = (prompts.len() - 1) % responses.len();
        Ok(responses[index].clone())
    }
}

/// Records every call and answers with queued images or a placeholder PNG.
#[derive(Clone)]
pub struct MockIllustrationClient {
    image_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_on_scene: Arc<Mutex<Option<usize>>>,
    style_guides: Arc<Mutex<Vec<Vec<String>>>>,
    scenes: Arc<Mutex<Vec<String>>>,
    history_lengths: Arc<Mutex<Vec<usize>>>,
    cover_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockIllustrationClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            fail_on_scene: Arc::new(Mutex::new(None)),
            style_guides: Arc::new(Mutex::new(Vec::new())),
            scenes: Arc::new(Mutex::new(Vec::new())),
            history_lengths: Arc::new(Mutex::new(Vec::new())),
            cover_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    /// Fail the `n`th scene request (1-based).
    pub fn failing_on_scene(self, n: usize) -> Self {
        *self.fail_on_scene.lock().unwrap() = Some(n);
        self
    }

    pub fn style_guides(&self) -> Vec<Vec<String>> {
        self.style_guides.lock().unwrap().clone()
    }

    pub fn scenes(&self) -> Vec<String> {
        self.scenes.lock().unwrap().clone()
    }

    /// Session exchange count seen by each scene request.
    pub fn history_lengths(&self) -> Vec<usize> {
        self.history_lengths.lock().unwrap().clone()
    }

    pub fn cover_prompts(&self) -> Vec<String> {
        self.cover_prompts.lock().unwrap().clone()
    }

    fn next_image(&self, call: usize) -> Result<Vec<u8>> {
        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            placeholder_png(8, 8, [200, 120, 80])
        } else {
            Ok(responses[(call - 1) % responses.len()].clone())
        }
    }
}

impl Default for MockIllustrationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IllustrationService for MockIllustrationClient {
    async fn start_session(&self, style_guide: &[String]) -> Result<IllustrationSession> {
        self.style_guides.lock().unwrap().push(style_guide.to_vec());

        let mut session = IllustrationSession::new();
        session.push_exchange(
            SessionTurn {
                role: Role::User,
                parts: style_guide.iter().cloned().map(SessionPart::Text).collect(),
            },
            SessionTurn {
                role: Role::Model,
                parts: vec![SessionPart::Text("Style noted.".to_string())],
            },
        );
        Ok(session)
    }

    async fn illustrate(&self, session: &mut IllustrationSession, scene: &str) -> Result<Vec<u8>> {
        let call = {
            let mut scenes = self.scenes.lock().unwrap();
            scenes.push(scene.to_string());
            scenes.len()
        };
        self.history_lengths
            .lock()
            .unwrap()
            .push(session.exchanges());

        if *self.fail_on_scene.lock().unwrap() == Some(call) {
            return Err(Error::AiProvider(format!(
                "Mock failure on scene {}",
                call
            )));
        }

        let image = self.next_image(call)?;
        session.push_exchange(
            SessionTurn {
                role: Role::User,
                parts: vec![SessionPart::Text(scene.to_string())],
            },
            SessionTurn {
                role: Role::Model,
                parts: vec![SessionPart::Image {
                    mime_type: "image/png".to_string(),
                    data: image.clone(),
                }],
            },
        );
        Ok(image)
    }

    async fn cover_pattern(&self, prompt: &str) -> Result<Vec<u8>> {
        self.cover_prompts.lock().unwrap().push(prompt.to_string());
        placeholder_png(16, 16, [240, 220, 200])
    }
}
