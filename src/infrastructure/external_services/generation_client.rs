use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, Error as ReqwestError};
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;

use crate::application::ports::generation_gateway::{
    GenerationGateway, GenerationGatewayError, VisionMedia,
};

#[derive(Debug, Clone)]
pub struct GenerationClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub chat_model: String,
    pub vision_model: String,
    pub embedding_model: String,
    pub timeout_secs: u64,
}

impl Default for GenerationClientConfig {
    fn default() -> Self {
        let base_url = env::var("GENERATION_API_URL")
            .unwrap_or_else(|_| "https://open.bigmodel.cn/api/paas/v4".to_string());
        let api_key = env::var("GENERATION_API_KEY").unwrap_or_default();
        let chat_model = env::var("GENERATION_CHAT_MODEL").unwrap_or_else(|_| "glm-4".to_string());
        let vision_model =
            env::var("GENERATION_VISION_MODEL").unwrap_or_else(|_| "glm-4v".to_string());
        let embedding_model =
            env::var("GENERATION_EMBEDDING_MODEL").unwrap_or_else(|_| "embedding-2".to_string());

        Self {
            base_url,
            api_key,
            chat_model,
            vision_model,
            embedding_model,
            timeout_secs: 120,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible completion API with a vision variant.
/// Images travel inline as base64 data URLs; video is referenced by URL
/// and fetched by the backend.
pub struct HttpGenerationClient {
    client: Client,
    config: GenerationClientConfig,
}

impl HttpGenerationClient {
    pub fn new(config: GenerationClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(GenerationClientConfig::default())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn media_content_part(media: &VisionMedia) -> serde_json::Value {
        match media {
            VisionMedia::ImageBytes { bytes, mime_type } => {
                let encoded = BASE64.encode(bytes);
                json!({
                    "type": "image_url",
                    "image_url": { "url": format!("data:{};base64,{}", mime_type, encoded) },
                })
            }
            VisionMedia::ImageUrl(url) => json!({
                "type": "image_url",
                "image_url": { "url": url },
            }),
            VisionMedia::VideoUrl(url) => json!({
                "type": "video_url",
                "video_url": { "url": url },
            }),
        }
    }

    async fn complete(
        &self,
        body: serde_json::Value,
    ) -> Result<String, GenerationGatewayError> {
        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationGatewayError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationGatewayError::ApiError(format!(
                "{}: {}",
                status, text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationGatewayError::ApiError(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(GenerationGatewayError::EmptyResponse)
    }
}

#[async_trait]
impl GenerationGateway for HttpGenerationClient {
    async fn chat(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, GenerationGatewayError> {
        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        self.complete(json!({
            "model": self.config.chat_model,
            "messages": messages,
        }))
        .await
    }

    async fn vision_describe(
        &self,
        prompt: &str,
        media: VisionMedia,
    ) -> Result<String, GenerationGatewayError> {
        let content = json!([
            { "type": "text", "text": prompt },
            Self::media_content_part(&media),
        ]);

        self.complete(json!({
            "model": self.config.vision_model,
            "messages": [{ "role": "user", "content": content }],
        }))
        .await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, GenerationGatewayError> {
        let response = self
            .client
            .post(self.url("/embeddings"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "model": self.config.embedding_model,
                "input": text,
            }))
            .send()
            .await
            .map_err(|e| GenerationGatewayError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationGatewayError::ApiError(format!(
                "{}: {}",
                status, text
            )));
        }

        let embeddings: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| GenerationGatewayError::ApiError(e.to_string()))?;

        embeddings
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(GenerationGatewayError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_bytes_become_a_data_url() {
        let part = HttpGenerationClient::media_content_part(&VisionMedia::ImageBytes {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".to_string(),
        });
        assert_eq!(part["type"], "image_url");
        let url = part["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_video_travels_as_a_url_reference() {
        let part = HttpGenerationClient::media_content_part(&VisionMedia::VideoUrl(
            "http://blobs/clip.mp4?expires=3600".to_string(),
        ));
        assert_eq!(part["type"], "video_url");
        assert_eq!(
            part["video_url"]["url"],
            "http://blobs/clip.mp4?expires=3600"
        );
    }
}
