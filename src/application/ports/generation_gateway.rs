use async_trait::async_trait;

#[derive(Debug)]
pub enum GenerationGatewayError {
    NetworkError(String),
    ApiError(String),
    EmptyResponse,
}

impl std::fmt::Display for GenerationGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationGatewayError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            GenerationGatewayError::ApiError(msg) => write!(f, "API error: {}", msg),
            GenerationGatewayError::EmptyResponse => write!(f, "Model returned no choices"),
        }
    }
}

impl std::error::Error for GenerationGatewayError {}

/// What the vision model is pointed at. Images can travel inline; video is
/// always fetched by the backend from a URL.
#[derive(Debug, Clone)]
pub enum VisionMedia {
    ImageBytes { bytes: Vec<u8>, mime_type: String },
    ImageUrl(String),
    VideoUrl(String),
}

#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn chat(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, GenerationGatewayError>;

    async fn vision_describe(
        &self,
        prompt: &str,
        media: VisionMedia,
    ) -> Result<String, GenerationGatewayError>;

    /// Exposed for completeness; the core ingestion/answer paths never call
    /// it directly (embedding is the retrieval backend's concern).
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GenerationGatewayError>;
}
