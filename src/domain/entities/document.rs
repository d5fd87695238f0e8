use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{BlobLocation, DocumentStatus, ProcessType};

/// An ingested artifact. Mutable only through the ingestion pipeline and the
/// deletion path; status moves `Uploading -> Parsing -> Indexed` with
/// `Parsing -> Failed` as the only modeled failure transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    kb_id: Uuid,
    file_name: String,
    file_type: String,
    file_size: i64,
    blob: Option<BlobLocation>,
    external_doc_id: Option<String>,
    process_type: Option<ProcessType>,
    vision_content: Option<String>,
    status: DocumentStatus,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    /// Uploaded artifact with its blob coordinates recorded up front, so a
    /// later processing failure still leaves an auditable row.
    pub fn from_upload(
        kb_id: Uuid,
        file_name: String,
        file_type: String,
        file_size: i64,
        blob: BlobLocation,
        user_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kb_id,
            file_name,
            file_type,
            file_size,
            blob: Some(blob),
            external_doc_id: None,
            process_type: None,
            vision_content: None,
            status: DocumentStatus::Uploading,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Text-created document: no blob, indexed synchronously, never parses.
    pub fn from_text(
        kb_id: Uuid,
        name: String,
        text_len: i64,
        external_doc_id: String,
        user_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kb_id,
            file_name: name,
            file_type: "txt".to_string(),
            file_size: text_len,
            blob: None,
            external_doc_id: Some(external_doc_id),
            process_type: Some(ProcessType::Text),
            vision_content: None,
            status: DocumentStatus::Indexed,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Text-created document whose indexing call failed before any row
    /// existed; persisted so the failure stays inspectable.
    pub fn from_failed_text(
        kb_id: Uuid,
        name: String,
        text_len: i64,
        error: String,
        user_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kb_id,
            file_name: name,
            file_type: "txt".to_string(),
            file_size: text_len,
            blob: None,
            external_doc_id: None,
            process_type: Some(ProcessType::Text),
            vision_content: None,
            status: DocumentStatus::Failed(error),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        kb_id: Uuid,
        file_name: String,
        file_type: String,
        file_size: i64,
        blob: Option<BlobLocation>,
        external_doc_id: Option<String>,
        process_type: Option<ProcessType>,
        vision_content: Option<String>,
        status: DocumentStatus,
        user_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kb_id,
            file_name,
            file_type,
            file_size,
            blob,
            external_doc_id,
            process_type,
            vision_content,
            status,
            user_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kb_id(&self) -> Uuid {
        self.kb_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn blob(&self) -> Option<&BlobLocation> {
        self.blob.as_ref()
    }

    pub fn external_doc_id(&self) -> Option<&str> {
        self.external_doc_id.as_deref()
    }

    pub fn process_type(&self) -> Option<ProcessType> {
        self.process_type
    }

    pub fn vision_content(&self) -> Option<&str> {
        self.vision_content.as_deref()
    }

    pub fn status(&self) -> &DocumentStatus {
        &self.status
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Enter the parsing phase down the chosen processing path.
    pub fn begin_parsing(&mut self, process_type: ProcessType) -> Result<(), String> {
        match self.status {
            DocumentStatus::Uploading => {
                self.process_type = Some(process_type);
                self.status = DocumentStatus::Parsing;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err("Document is not in uploading state".to_string()),
        }
    }

    pub fn set_vision_content(&mut self, content: String) {
        self.vision_content = Some(content);
        self.updated_at = Utc::now();
    }

    /// Terminal success. An indexed document always carries the external
    /// index id returned by the retrieval backend.
    pub fn complete_indexing(&mut self, external_doc_id: String) -> Result<(), String> {
        match self.status {
            DocumentStatus::Parsing => {
                self.external_doc_id = Some(external_doc_id);
                self.status = DocumentStatus::Indexed;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err("Document is not being parsed".to_string()),
        }
    }

    /// Terminal failure. Allowed from any non-terminal state so no ingestion
    /// path can leave a document in limbo.
    pub fn fail(&mut self, error: String) -> Result<(), String> {
        if self.status.is_terminal() {
            return Err("Document is already in a terminal state".to_string());
        }
        self.status = DocumentStatus::Failed(error);
        self.updated_at = Utc::now();
        Ok(())
    }
}
