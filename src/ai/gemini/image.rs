use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig, Part,
};
use crate::ai::mime::detect_image_mime;
use crate::ai::{IllustrationService, IllustrationSession, Role, SessionPart, SessionTurn};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;

pub struct GeminiIllustrationClient {
    http: GeminiHttpClient,
}

impl GeminiIllustrationClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
        }
    }

    fn generation_config() -> GenerationConfig {
        GenerationConfig {
            max_output_tokens: None,
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            image_config: Some(ImageConfig {
                aspect_ratio: "1:1".to_string(),
            }),
        }
    }

    /// Send `request` on top of the session history and return the reply.
    async fn send_turn(
        &self,
        session: &IllustrationSession,
        request: &SessionTurn,
    ) -> Result<GenerateContentResponse> {
        let mut contents: Vec<Content> = session.turns().iter().map(Content::from).collect();
        contents.push(Content::from(request));

        self.http
            .generate_content(&GenerateContentRequest {
                contents,
                generation_config: Some(Self::generation_config()),
            })
            .await
    }

    /// Decode the model reply into session parts, checking any image payload.
    fn decode_reply(response: &GenerateContentResponse) -> Result<SessionTurn> {
        let content = response.first_content().ok_or_else(|| {
            Error::UpstreamResponse(format!(
                "Gemini returned no content: {}",
                response.empty_reason()
            ))
        })?;

        let mut parts = Vec::with_capacity(content.parts.len());
        for part in &content.parts {
            match part {
                Part::Text { text } => parts.push(SessionPart::Text(text.clone())),
                Part::InlineData { inline_data } => {
                    let data = base64::engine::general_purpose::STANDARD
                        .decode(&inline_data.data)
                        .map_err(|e| {
                            Error::UpstreamResponse(format!(
                                "Failed to decode Gemini base64 image: {}",
                                e
                            ))
                        })?;
                    parts.push(SessionPart::Image {
                        mime_type: inline_data.mime_type.clone(),
                        data,
                    });
                }
            }
        }

        Ok(SessionTurn {
            role: Role::Model,
            parts,
        })
    }

    /// First image in a decoded reply, rejecting empty or non-image payloads.
    fn require_image(reply: &SessionTurn, what: &str) -> Result<Vec<u8>> {
        let data = reply
            .parts
            .iter()
            .find_map(|part| match part {
                SessionPart::Image { data, .. } => Some(data),
                SessionPart::Text(_) => None,
            })
            .ok_or_else(|| Error::UpstreamResponse(format!("No image data for {}", what)))?;

        if data.is_empty() {
            return Err(Error::UpstreamResponse(format!(
                "Empty image data for {}",
                what
            )));
        }
        let mime = detect_image_mime(data).ok_or_else(|| {
            Error::UpstreamResponse(format!("Image data for {} is not a known format", what))
        })?;

        tracing::debug!("Received {} ({} bytes) for {}", mime, data.len(), what);
        Ok(data.clone())
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiIllustrationClient);

#[async_trait]
impl IllustrationService for GeminiIllustrationClient {
    async fn start_session(&self, style_guide: &[String]) -> Result<IllustrationSession> {
        let mut session = IllustrationSession::new();
        let request = SessionTurn {
            role: Role::User,
            parts: style_guide.iter().cloned().map(SessionPart::Text).collect(),
        };

        tracing::info!("Sending style guide to {}", self.http.model());
        let response = self.send_turn(&session, &request).await?;
        let reply = Self::decode_reply(&response)?;
        session.push_exchange(request, reply);
        Ok(session)
    }

    async fn illustrate(&self, session: &mut IllustrationSession, scene: &str) -> Result<Vec<u8>> {
        let request = SessionTurn {
            role: Role::User,
            parts: vec![SessionPart::Text(scene.to_string())],
        };

        let response = self.send_turn(session, &request).await?;
        let reply = Self::decode_reply(&response)?;
        let image = Self::require_image(&reply, "scene")?;
        session.push_exchange(request, reply);
        Ok(image)
    }

    async fn cover_pattern(&self, prompt: &str) -> Result<Vec<u8>> {
        let request = SessionTurn {
            role: Role::User,
            parts: vec![SessionPart::Text(prompt.to_string())],
        };

        let response = self
            .send_turn(&IllustrationSession::new(), &request)
            .await?;
        let reply = Self::decode_reply(&response)?;
        Self::require_image(&reply, "cover pattern")
    }
}
