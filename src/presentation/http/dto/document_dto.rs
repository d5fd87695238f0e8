use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Document;

#[derive(Debug, Deserialize)]
pub struct CreateTextDocumentRequestDto {
    pub name: String,
    pub text: String,
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponseDto {
    pub id: Uuid,
    pub kb_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub url: Option<String>,
    pub process_type: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentResponseDto {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            kb_id: document.kb_id(),
            file_name: document.file_name().to_string(),
            file_type: document.file_type().to_string(),
            file_size: document.file_size(),
            url: document.blob().map(|b| b.url.clone()),
            process_type: document.process_type().map(|p| p.to_string()),
            status: document.status().as_str().to_string(),
            error_message: document.status().error_message().map(|s| s.to_string()),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentResponseDto>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadDocumentResponseDto {
    pub document_id: Uuid,
    pub file_name: String,
    pub status: String,
    pub process_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveRequestDto {
    pub query: String,
    pub top_k: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PassageDto {
    pub content: String,
    pub document_id: Option<String>,
    pub document_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RetrieveResponseDto {
    pub passages: Vec<PassageDto>,
    pub total: usize,
}
