use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerationConfig};
use crate::ai::StoryService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiStoryClient {
    http: GeminiHttpClient,
}

impl GeminiStoryClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(60),
                client,
            ),
        }
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiStoryClient);

#[async_trait]
impl StoryService for GeminiStoryClient {
    async fn generate_story(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(&[prompt.to_string()])],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(4096),
                response_modalities: None,
                image_config: None,
            }),
        };

        tracing::info!("Requesting story from {}", self.http.model());
        let response = self.http.generate_content(&request).await?;

        let text = response
            .first_content()
            .and_then(Content::text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                Error::UpstreamResponse(format!(
                    "Gemini returned no story text: {}",
                    response.empty_reason()
                ))
            })?;

        tracing::debug!("Story text received ({} chars)", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    fn make_client(server: &MockServer, api_key: &str, model: &str) -> GeminiStoryClient {
        GeminiStoryClient::new(api_key.to_string(), model.to_string()).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_story_parses_response() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(header("x-goog-api-key", "test-key"))
            .and(body_string_contains("armadillos"))
            .respond_with(test_support::text_response("Line one\nLine two\n\nLine three"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);
        let story = client
            .generate_story("Write about armadillos")
            .await
            .unwrap();
        assert_eq!(story, "Line one\nLine two\n\nLine three");
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = make_client(&server, "bad-key", DEFAULT_MODEL);

        let err = client.generate_story("prompt").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_generate_story_rejects_empty_candidates() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);
        let err = client.generate_story("prompt").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_story_rejects_blank_text() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(test_support::text_response("  \n "))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);
        let err = client.generate_story("prompt").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_story_strips_models_prefix_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(test_support::text_response("a story"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", "models/gemini-2.5-flash");

        client.generate_story("prompt").await.unwrap();
    }
}
