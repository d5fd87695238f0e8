use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, multipart};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::time::Duration;

use crate::application::ports::retrieval_gateway::{
    IndexedDocument, Passage, RetrievalGateway, RetrievalGatewayError, SearchMode,
};

#[derive(Debug, Clone)]
pub struct RetrievalClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for RetrievalClientConfig {
    fn default() -> Self {
        let base_url =
            env::var("RETRIEVAL_API_URL").unwrap_or_else(|_| "http://localhost:8080/v1".to_string());
        let api_key = env::var("RETRIEVAL_API_KEY").unwrap_or_default();

        Self {
            base_url,
            api_key,
            timeout_secs: 60,
        }
    }
}

#[derive(Deserialize)]
struct DatasetResponse {
    id: String,
}

#[derive(Deserialize)]
struct DocumentCreateResponse {
    document: DocumentRef,
}

#[derive(Deserialize)]
struct DocumentRef {
    id: String,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    records: Vec<RetrievalRecord>,
}

#[derive(Deserialize)]
struct RetrievalRecord {
    segment: RetrievalSegment,
}

#[derive(Deserialize)]
struct RetrievalSegment {
    content: String,
    #[serde(default)]
    document: Option<SegmentDocument>,
}

#[derive(Deserialize)]
struct SegmentDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Serialize)]
struct CreateByTextRequest<'a> {
    name: &'a str,
    text: &'a str,
    indexing_technique: &'a str,
    process_rule: ProcessRule<'a>,
}

#[derive(Serialize)]
struct ProcessRule<'a> {
    mode: &'a str,
}

/// HTTP client for the dataset-style retrieval backend. Indexing and
/// chunking happen on the backend side; this client only moves content
/// and queries across the wire.
pub struct HttpRetrievalClient {
    client: Client,
    config: RetrievalClientConfig,
}

impl HttpRetrievalClient {
    pub fn new(config: RetrievalClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(RetrievalClientConfig::default())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    // The backend spells these two inconsistently: the text endpoint uses
    // underscores, the file endpoint uses hyphens.
    fn create_by_text_path(collection_id: &str) -> String {
        format!("/datasets/{}/document/create_by_text", collection_id)
    }

    fn create_by_file_path(collection_id: &str) -> String {
        format!("/datasets/{}/document/create-by-file", collection_id)
    }

    fn retrieval_model(top_k: i32, mode: SearchMode) -> serde_json::Value {
        match mode {
            SearchMode::Semantic => json!({
                "search_method": "semantic_search",
                "reranking_enable": false,
                "top_k": top_k,
                "score_threshold_enabled": false,
            }),
            SearchMode::Hybrid { keyword_weight } => json!({
                "search_method": "hybrid_search",
                "reranking_enable": false,
                "top_k": top_k,
                "score_threshold_enabled": false,
                "weights": {
                    "keyword_setting": { "keyword_weight": keyword_weight },
                    "vector_setting": { "vector_weight": 1.0 - keyword_weight },
                },
            }),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RetrievalGatewayError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(RetrievalGatewayError::ApiError(format!(
            "{}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl RetrievalGateway for HttpRetrievalClient {
    async fn create_collection(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<String, RetrievalGatewayError> {
        let response = self
            .client
            .post(self.url("/datasets"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "name": name,
                "description": description,
                "indexing_technique": "high_quality",
                "permission": "only_me",
            }))
            .send()
            .await
            .map_err(|e| RetrievalGatewayError::NetworkError(e.to_string()))?;

        let dataset: DatasetResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RetrievalGatewayError::ApiError(e.to_string()))?;

        Ok(dataset.id)
    }

    async fn delete_collection(&self, collection_id: &str) -> Result<(), RetrievalGatewayError> {
        let response = self
            .client
            .delete(self.url(&format!("/datasets/{}", collection_id)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| RetrievalGatewayError::NetworkError(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn index_text(
        &self,
        collection_id: &str,
        name: &str,
        text: &str,
    ) -> Result<IndexedDocument, RetrievalGatewayError> {
        let request = CreateByTextRequest {
            name,
            text,
            indexing_technique: "high_quality",
            process_rule: ProcessRule { mode: "automatic" },
        };

        let response = self
            .client
            .post(self.url(&Self::create_by_text_path(collection_id)))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RetrievalGatewayError::NetworkError(e.to_string()))?;

        let created: DocumentCreateResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RetrievalGatewayError::ApiError(e.to_string()))?;

        Ok(IndexedDocument {
            external_doc_id: created.document.id,
        })
    }

    async fn index_file(
        &self,
        collection_id: &str,
        file_bytes: Vec<u8>,
        filename: &str,
    ) -> Result<IndexedDocument, RetrievalGatewayError> {
        let data = json!({
            "indexing_technique": "high_quality",
            "process_rule": { "mode": "automatic" },
        });

        let form = multipart::Form::new()
            .text("data", data.to_string())
            .part(
                "file",
                multipart::Part::bytes(file_bytes).file_name(filename.to_string()),
            );

        let response = self
            .client
            .post(self.url(&Self::create_by_file_path(collection_id)))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RetrievalGatewayError::NetworkError(e.to_string()))?;

        let created: DocumentCreateResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RetrievalGatewayError::ApiError(e.to_string()))?;

        Ok(IndexedDocument {
            external_doc_id: created.document.id,
        })
    }

    async fn delete_document(
        &self,
        collection_id: &str,
        external_doc_id: &str,
    ) -> Result<(), RetrievalGatewayError> {
        let response = self
            .client
            .delete(self.url(&format!(
                "/datasets/{}/documents/{}",
                collection_id, external_doc_id
            )))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| RetrievalGatewayError::NetworkError(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn search(
        &self,
        collection_id: &str,
        query: &str,
        top_k: i32,
        mode: SearchMode,
    ) -> Result<Vec<Passage>, RetrievalGatewayError> {
        if query.trim().is_empty() {
            return Err(RetrievalGatewayError::InvalidInput(
                "query must not be empty".to_string(),
            ));
        }

        let response = self
            .client
            .post(self.url(&format!("/datasets/{}/retrieve", collection_id)))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "query": query,
                "retrieval_model": Self::retrieval_model(top_k, mode),
            }))
            .send()
            .await
            .map_err(|e| RetrievalGatewayError::NetworkError(e.to_string()))?;

        let retrieved: RetrieveResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RetrievalGatewayError::ApiError(e.to_string()))?;

        Ok(retrieved
            .records
            .into_iter()
            .map(|record| {
                let (doc_id, doc_name) = match record.segment.document {
                    Some(doc) => (doc.id, doc.name),
                    None => (None, None),
                };
                Passage {
                    content: record.segment.content,
                    source_doc_id: doc_id,
                    source_doc_name: doc_name,
                }
            })
            .collect())
    }
}
