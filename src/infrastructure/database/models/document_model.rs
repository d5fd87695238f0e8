use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::{BlobLocation, DocumentStatus, ProcessType};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub kb_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub bucket: Option<String>,
    pub object_name: Option<String>,
    pub blob_url: Option<String>,
    pub external_doc_id: Option<String>,
    pub process_type: Option<String>,
    pub vision_content: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset, Deserialize)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub kb_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub bucket: Option<String>,
    pub object_name: Option<String>,
    pub blob_url: Option<String>,
    pub external_doc_id: Option<String>,
    pub process_type: Option<String>,
    pub vision_content: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for NewDocumentModel {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            kb_id: document.kb_id(),
            file_name: document.file_name().to_string(),
            file_type: document.file_type().to_string(),
            file_size: document.file_size(),
            bucket: document.blob().map(|b| b.bucket.clone()),
            object_name: document.blob().map(|b| b.object_name.clone()),
            blob_url: document.blob().map(|b| b.url.clone()),
            external_doc_id: document.external_doc_id().map(|s| s.to_string()),
            process_type: document.process_type().map(|p| p.to_string()),
            vision_content: document.vision_content().map(|s| s.to_string()),
            status: document.status().as_str().to_string(),
            error_message: document.status().error_message().map(|s| s.to_string()),
            user_id: document.user_id(),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let status = DocumentStatus::from_parts(&model.status, model.error_message.as_deref())?;

        let process_type = model
            .process_type
            .as_deref()
            .map(ProcessType::from_str)
            .transpose()?;

        // All three blob columns are written together; object_name is the
        // anchor when reading back.
        let blob = match (model.bucket, model.object_name, model.blob_url) {
            (Some(bucket), Some(object_name), Some(url)) => {
                Some(BlobLocation::new(bucket, object_name, url))
            }
            _ => None,
        };

        Ok(Document::from_parts(
            model.id,
            model.kb_id,
            model.file_name,
            model.file_type,
            model.file_size,
            blob,
            model.external_doc_id,
            process_type,
            model.vision_content,
            status,
            model.user_id,
            model.created_at,
            model.updated_at,
        ))
    }
}
