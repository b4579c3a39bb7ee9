//! AI service integration for story text and illustrations
//!
//! The pipeline talks to the provider through two traits: [`StoryService`]
//! for the verse and [`IllustrationService`] for the style-guided image
//! session and the cover pattern.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiIllustrationClient, GeminiStoryClient};
pub use mock::{MockIllustrationClient, MockStoryClient};

use crate::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPart {
    Text(String),
    Image { mime_type: String, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTurn {
    pub role: Role,
    pub parts: Vec<SessionPart>,
}

/// Conversation state shared by every illustration in one book.
///
/// Created by [`IllustrationService::start_session`] and passed by `&mut` to
/// each [`IllustrationService::illustrate`] call so later pages see the style
/// guide and earlier pages. Not `Clone`: one book, one session.
#[derive(Debug, Default)]
pub struct IllustrationSession {
    turns: Vec<SessionTurn>,
}

impl IllustrationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[SessionTurn] {
        &self.turns
    }

    /// Record a completed exchange.
    pub fn push_exchange(&mut self, request: SessionTurn, response: SessionTurn) {
        self.turns.push(request);
        self.turns.push(response);
    }

    /// Number of completed request/response exchanges.
    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }
}

#[async_trait]
pub trait StoryService: Send + Sync {
    /// Return the raw story text for `prompt`.
    async fn generate_story(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait IllustrationService: Send + Sync {
    /// Send the style guide once and return the session it establishes.
    async fn start_session(&self, style_guide: &[String]) -> Result<IllustrationSession>;

    /// Illustrate one scene within `session`, returning encoded image bytes.
    async fn illustrate(&self, session: &mut IllustrationSession, scene: &str) -> Result<Vec<u8>>;

    /// Generate the seamless cover pattern. Independent of any session.
    async fn cover_pattern(&self, prompt: &str) -> Result<Vec<u8>>;
}
