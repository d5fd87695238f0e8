use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    BlobStore, GenerationGateway, RetrievalGateway, generation_gateway::VisionMedia,
};
use crate::domain::entities::Document;
use crate::domain::repositories::{DocumentRepository, KnowledgeBaseRepository};
use crate::domain::value_objects::{
    BlobLocation, MediaClass, ProcessType,
    media_class::{extension_of, mime_type_of},
};

const DEFAULT_VIDEO_URL_TTL_SECS: u64 = 3600;

const IMAGE_EXTRACTION_PROMPT: &str = "Carefully analyze this image and extract the following:\n\n\
1. Scene description: describe the setting, environment and main elements in detail\n\
2. Text content: transcribe any visible text (titles, body text, labels) verbatim and completely\n\
3. Tabular data: if the image contains tables, extract their content in a structured form\n\
4. Charts: if the image contains charts (bar, line, pie), describe the data and trends\n\
5. Key points: summarize the most important information in the image\n\n\
Be as detailed and accurate as possible.";

const VIDEO_EXTRACTION_PROMPT: &str = "Carefully analyze this video and extract the following:\n\n\
1. Overview: briefly describe the topic and content of the video\n\
2. Key timestamps: list the important moments and what happens at each\n\
3. Main content: describe the main information, dialogue or explanations in detail\n\
4. Text content: transcribe any text that appears (subtitles, titles, slides)\n\
5. Key points: summarize the most important takeaways\n\n\
Be as detailed and accurate as possible.";

#[derive(Debug)]
pub enum IngestionError {
    KnowledgeBaseNotFound(Uuid),
    CollectionMissing(Uuid),
    DocumentNotFound(Uuid),
    BlobStoreError(String),
    RepositoryError(String),
    ProcessingFailed(String),
}

impl std::fmt::Display for IngestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestionError::KnowledgeBaseNotFound(id) => {
                write!(f, "Knowledge base not found: {}", id)
            }
            IngestionError::CollectionMissing(id) => {
                write!(f, "Knowledge base {} has no external collection", id)
            }
            IngestionError::DocumentNotFound(id) => write!(f, "Document not found: {}", id),
            IngestionError::BlobStoreError(msg) => write!(f, "Blob store error: {}", msg),
            IngestionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            IngestionError::ProcessingFailed(msg) => write!(f, "Document processing failed: {}", msg),
        }
    }
}

impl std::error::Error for IngestionError {}

/// Drives an uploaded artifact through the correct extraction/indexing path
/// and keeps the document status and knowledge-base counter consistent under
/// partial failure.
pub struct IngestionService {
    knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
    documents: Arc<dyn DocumentRepository>,
    retrieval: Arc<dyn RetrievalGateway>,
    generation: Arc<dyn GenerationGateway>,
    blob_store: Arc<dyn BlobStore>,
    video_url_ttl_secs: u64,
}

impl IngestionService {
    pub fn new(
        knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
        documents: Arc<dyn DocumentRepository>,
        retrieval: Arc<dyn RetrievalGateway>,
        generation: Arc<dyn GenerationGateway>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            knowledge_bases,
            documents,
            retrieval,
            generation,
            blob_store,
            video_url_ttl_secs: DEFAULT_VIDEO_URL_TTL_SECS,
        }
    }

    pub fn with_video_url_ttl(mut self, ttl_secs: u64) -> Self {
        self.video_url_ttl_secs = ttl_secs;
        self
    }

    /// Upload path: store the blob, record the document, classify by
    /// extension and run the matching branch. The row and blob survive a
    /// branch failure so it stays inspectable; the counter only moves on
    /// success.
    pub async fn ingest_upload(
        &self,
        kb_id: Uuid,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
        user_id: i64,
    ) -> Result<Document, IngestionError> {
        let collection_id = self.resolve_collection(kb_id).await?;

        tracing::info!(%kb_id, file_name, size = bytes.len(), "ingesting upload");

        let stored = self
            .blob_store
            .put(&bytes, file_name, content_type)
            .await
            .map_err(|e| IngestionError::BlobStoreError(e.to_string()))?;

        let mut doc = Document::from_upload(
            kb_id,
            file_name.to_string(),
            extension_of(file_name),
            bytes.len() as i64,
            BlobLocation::new(stored.bucket, stored.object_name, stored.url),
            user_id,
        );
        self.documents
            .save(&doc)
            .await
            .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;

        let outcome = match MediaClass::from_filename(file_name) {
            MediaClass::Image => self.process_image(&collection_id, &mut doc).await,
            MediaClass::Video => self.process_video(&collection_id, &mut doc).await,
            MediaClass::Generic => self.process_generic(&collection_id, &mut doc, bytes).await,
        };

        if let Err(reason) = outcome {
            tracing::error!(doc_id = %doc.id(), %reason, "ingestion failed");
            let _ = doc.fail(reason.clone());
            self.documents
                .update(&doc)
                .await
                .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;
            return Err(IngestionError::ProcessingFailed(reason));
        }

        self.documents
            .update(&doc)
            .await
            .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;
        self.knowledge_bases
            .increment_doc_count(kb_id)
            .await
            .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;

        tracing::info!(doc_id = %doc.id(), status = %doc.status(), "document ingested");
        Ok(doc)
    }

    /// Text path: no blob, no classification, no parsing phase. Indexing is
    /// synchronous and atomic; a failure is persisted as a failed document.
    pub async fn ingest_text(
        &self,
        kb_id: Uuid,
        name: &str,
        text: &str,
        user_id: i64,
    ) -> Result<Document, IngestionError> {
        let collection_id = self.resolve_collection(kb_id).await?;

        match self.retrieval.index_text(&collection_id, name, text).await {
            Ok(indexed) => {
                let doc = Document::from_text(
                    kb_id,
                    name.to_string(),
                    text.len() as i64,
                    indexed.external_doc_id,
                    user_id,
                );
                self.documents
                    .save(&doc)
                    .await
                    .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;
                self.knowledge_bases
                    .increment_doc_count(kb_id)
                    .await
                    .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;
                Ok(doc)
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::error!(%kb_id, name, %reason, "text indexing failed");
                let doc = Document::from_failed_text(
                    kb_id,
                    name.to_string(),
                    text.len() as i64,
                    reason.clone(),
                    user_id,
                );
                self.documents
                    .save(&doc)
                    .await
                    .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;
                Err(IngestionError::ProcessingFailed(reason))
            }
        }
    }

    /// Best-effort, order-independent cleanup: remote index and blob deletes
    /// are each logged and swallowed; the local row and the counter are
    /// always corrected. Local consistency is never held hostage by remote
    /// availability.
    pub async fn delete_document(&self, doc_id: Uuid) -> Result<(), IngestionError> {
        let doc = self
            .documents
            .find_by_id(doc_id)
            .await
            .map_err(|e| IngestionError::RepositoryError(e.to_string()))?
            .ok_or(IngestionError::DocumentNotFound(doc_id))?;

        let kb = self
            .knowledge_bases
            .find_by_id(doc.kb_id())
            .await
            .unwrap_or(None);

        if let Some(external_id) = doc.external_doc_id() {
            if let Some(collection_id) = kb.as_ref().and_then(|k| k.collection_id()) {
                if let Err(e) = self.retrieval.delete_document(collection_id, external_id).await {
                    tracing::warn!(%doc_id, error = %e, "failed to delete document from retrieval index");
                }
            }
        }

        if let Some(blob) = doc.blob() {
            if let Err(e) = self.blob_store.delete(&blob.bucket, &blob.object_name).await {
                tracing::warn!(%doc_id, error = %e, "failed to delete blob");
            }
        }

        self.documents
            .delete(doc_id)
            .await
            .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;
        self.knowledge_bases
            .decrement_doc_count(doc.kb_id())
            .await
            .map_err(|e| IngestionError::RepositoryError(e.to_string()))?;

        tracing::info!(%doc_id, "document deleted");
        Ok(())
    }

    async fn resolve_collection(&self, kb_id: Uuid) -> Result<String, IngestionError> {
        let kb = self
            .knowledge_bases
            .find_by_id(kb_id)
            .await
            .map_err(|e| IngestionError::RepositoryError(e.to_string()))?
            .ok_or(IngestionError::KnowledgeBaseNotFound(kb_id))?;

        kb.collection_id()
            .map(|s| s.to_string())
            .ok_or(IngestionError::CollectionMissing(kb_id))
    }

    async fn process_image(&self, collection_id: &str, doc: &mut Document) -> Result<(), String> {
        self.begin_parsing(doc, ProcessType::Vision).await?;

        let blob = doc.blob().ok_or("Document has no blob coordinates")?;
        let bytes = self
            .blob_store
            .get(&blob.object_name)
            .await
            .map_err(|e| e.to_string())?;

        let content = self
            .generation
            .vision_describe(
                IMAGE_EXTRACTION_PROMPT,
                VisionMedia::ImageBytes {
                    bytes,
                    mime_type: mime_type_of(doc.file_name()).to_string(),
                },
            )
            .await
            .map_err(|e| e.to_string())?;

        tracing::info!(doc_id = %doc.id(), chars = content.len(), "image content extracted");
        self.index_vision_content(collection_id, doc, content).await
    }

    async fn process_video(&self, collection_id: &str, doc: &mut Document) -> Result<(), String> {
        self.begin_parsing(doc, ProcessType::Vision).await?;

        // The vision backend fetches video itself, so it gets a
        // time-limited URL rather than inline bytes.
        let blob = doc.blob().ok_or("Document has no blob coordinates")?;
        let url = self
            .blob_store
            .presigned_url(&blob.object_name, self.video_url_ttl_secs)
            .await
            .map_err(|e| e.to_string())?;

        let content = self
            .generation
            .vision_describe(VIDEO_EXTRACTION_PROMPT, VisionMedia::VideoUrl(url))
            .await
            .map_err(|e| e.to_string())?;

        tracing::info!(doc_id = %doc.id(), chars = content.len(), "video content extracted");
        self.index_vision_content(collection_id, doc, content).await
    }

    async fn process_generic(
        &self,
        collection_id: &str,
        doc: &mut Document,
        bytes: Vec<u8>,
    ) -> Result<(), String> {
        self.begin_parsing(doc, ProcessType::Generic).await?;

        let indexed = self
            .retrieval
            .index_file(collection_id, bytes, doc.file_name())
            .await
            .map_err(|e| e.to_string())?;

        doc.complete_indexing(indexed.external_doc_id)
    }

    /// Extracted text is indexed as if it were a text document of its own.
    async fn index_vision_content(
        &self,
        collection_id: &str,
        doc: &mut Document,
        content: String,
    ) -> Result<(), String> {
        doc.set_vision_content(content.clone());

        let indexed = self
            .retrieval
            .index_text(collection_id, &format!("{}.txt", doc.file_name()), &content)
            .await
            .map_err(|e| e.to_string())?;

        doc.complete_indexing(indexed.external_doc_id)
    }

    async fn begin_parsing(&self, doc: &mut Document, kind: ProcessType) -> Result<(), String> {
        doc.begin_parsing(kind)?;
        self.documents.update(doc).await.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryDocuments, InMemoryKnowledgeBases, StubBlobStore, StubGeneration, StubRetrieval,
        provisioned_kb,
    };
    use crate::domain::value_objects::DocumentStatus;

    struct Fixture {
        knowledge_bases: Arc<InMemoryKnowledgeBases>,
        documents: Arc<InMemoryDocuments>,
        retrieval: Arc<StubRetrieval>,
        generation: Arc<StubGeneration>,
        blob_store: Arc<StubBlobStore>,
        service: IngestionService,
        kb_id: Uuid,
    }

    fn fixture() -> Fixture {
        let knowledge_bases = Arc::new(InMemoryKnowledgeBases::new());
        let documents = Arc::new(InMemoryDocuments::new());
        let retrieval = Arc::new(StubRetrieval::new());
        let generation = Arc::new(StubGeneration::new());
        let blob_store = Arc::new(StubBlobStore::new());

        let kb = provisioned_kb("manuals");
        let kb_id = kb.id();
        knowledge_bases.insert(kb);

        let service = IngestionService::new(
            knowledge_bases.clone(),
            documents.clone(),
            retrieval.clone(),
            generation.clone(),
            blob_store.clone(),
        );

        Fixture {
            knowledge_bases,
            documents,
            retrieval,
            generation,
            blob_store,
            service,
            kb_id,
        }
    }

    #[tokio::test]
    async fn test_unknown_kb_is_not_found() {
        let f = fixture();
        let result = f
            .service
            .ingest_upload(Uuid::new_v4(), "a.pdf", b"x".to_vec(), None, 1)
            .await;
        assert!(matches!(
            result,
            Err(IngestionError::KnowledgeBaseNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_generic_upload_is_indexed_via_file_path() {
        let f = fixture();
        let doc = f
            .service
            .ingest_upload(f.kb_id, "report.pdf", b"pdf bytes".to_vec(), None, 1)
            .await
            .unwrap();

        assert_eq!(doc.process_type(), Some(ProcessType::Generic));
        assert!(doc.status().is_indexed());
        assert!(doc.external_doc_id().is_some());
        assert!(doc.vision_content().is_none());
        assert_eq!(f.retrieval.indexed_files().len(), 1);
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 1);
    }

    #[tokio::test]
    async fn test_image_upload_goes_through_vision_and_text_indexing() {
        let f = fixture();
        f.generation.set_vision_text("A red car.");

        let doc = f
            .service
            .ingest_upload(f.kb_id, "image.png", b"png bytes".to_vec(), None, 1)
            .await
            .unwrap();

        assert_eq!(doc.process_type(), Some(ProcessType::Vision));
        assert_eq!(doc.vision_content(), Some("A red car."));
        assert!(doc.status().is_indexed());

        // The extracted text, not the bytes, ends up in the index
        let indexed = f.retrieval.indexed_texts();
        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[0].1, "image.png.txt");
        assert!(indexed[0].2.contains("A red car."));
        assert!(f.retrieval.indexed_files().is_empty());
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 1);
    }

    #[tokio::test]
    async fn test_video_upload_uses_presigned_url() {
        let f = fixture();
        let doc = f
            .service
            .ingest_upload(f.kb_id, "clip.MP4", b"video bytes".to_vec(), None, 1)
            .await
            .unwrap();

        assert_eq!(doc.process_type(), Some(ProcessType::Vision));
        assert!(doc.status().is_indexed());

        let media = f.generation.vision_media();
        assert_eq!(media.len(), 1);
        match &media[0] {
            VisionMedia::VideoUrl(url) => assert!(url.contains("expires")),
            other => panic!("expected a video URL, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_branch_failure_marks_document_failed_and_keeps_row() {
        let f = fixture();
        f.retrieval.fail_index_file(true);

        let result = f
            .service
            .ingest_upload(f.kb_id, "report.pdf", b"pdf bytes".to_vec(), None, 1)
            .await;
        assert!(matches!(result, Err(IngestionError::ProcessingFailed(_))));

        // Row and blob remain for inspection; counter untouched
        let docs = f.documents.find_by_kb_sync(f.kb_id);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].status().is_failed());
        assert!(docs[0].status().error_message().unwrap().len() > 0);
        assert!(docs[0].blob().is_some());
        assert_eq!(f.blob_store.object_count(), 1);
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 0);
    }

    #[tokio::test]
    async fn test_vision_failure_marks_document_failed() {
        let f = fixture();
        f.generation.fail_vision(true);

        let result = f
            .service
            .ingest_upload(f.kb_id, "photo.jpg", b"jpeg".to_vec(), None, 1)
            .await;
        assert!(matches!(result, Err(IngestionError::ProcessingFailed(_))));

        let docs = f.documents.find_by_kb_sync(f.kb_id);
        assert!(docs[0].status().is_failed());
        assert_eq!(docs[0].process_type(), Some(ProcessType::Vision));
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 0);
    }

    #[tokio::test]
    async fn test_ingest_text_is_indexed_without_parsing() {
        let f = fixture();
        let doc = f
            .service
            .ingest_text(f.kb_id, "doc1", "The sky is blue.", 1)
            .await
            .unwrap();

        assert_eq!(doc.process_type(), Some(ProcessType::Text));
        assert!(doc.status().is_indexed());
        assert!(doc.blob().is_none());
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 1);
    }

    #[tokio::test]
    async fn test_ingest_text_failure_persists_failed_document() {
        let f = fixture();
        f.retrieval.fail_index_text(true);

        let result = f.service.ingest_text(f.kb_id, "doc1", "text", 1).await;
        assert!(matches!(result, Err(IngestionError::ProcessingFailed(_))));

        let docs = f.documents.find_by_kb_sync(f.kb_id);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].status().is_failed());
        assert!(!docs[0].status().error_message().unwrap().is_empty());
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 0);
    }

    #[tokio::test]
    async fn test_delete_document_survives_remote_failures() {
        let f = fixture();
        let doc = f
            .service
            .ingest_upload(f.kb_id, "report.pdf", b"pdf".to_vec(), None, 1)
            .await
            .unwrap();
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 1);

        // Both remote deletions fail; local state is still corrected
        f.retrieval.fail_delete_document(true);
        f.blob_store.fail_delete(true);

        f.service.delete_document(doc.id()).await.unwrap();

        assert!(f.documents.find_by_kb_sync(f.kb_id).is_empty());
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 0);
    }

    #[tokio::test]
    async fn test_doc_count_decrement_floors_at_zero() {
        let f = fixture();
        let doc = f
            .service
            .ingest_text(f.kb_id, "doc1", "text", 1)
            .await
            .unwrap();

        f.service.delete_document(doc.id()).await.unwrap();
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 0);

        // A second delete of an already-gone document is NotFound, and the
        // counter is never driven below zero.
        let result = f.service.delete_document(doc.id()).await;
        assert!(matches!(result, Err(IngestionError::DocumentNotFound(_))));
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 0);
    }

    #[tokio::test]
    async fn test_counter_tracks_concurrent_ingest_and_delete_bursts() {
        let f = fixture();
        let service = Arc::new(f.service);

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            let kb_id = f.kb_id;
            handles.push(tokio::spawn(async move {
                service
                    .ingest_text(kb_id, &format!("doc{}", i), "text", 1)
                    .await
                    .unwrap()
                    .id()
            }));
        }
        let mut ingested = Vec::new();
        for handle in handles {
            ingested.push(handle.await.unwrap());
        }
        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 16);

        // Deletes and fresh ingests all in flight at once
        let mut handles = Vec::new();
        for id in ingested.into_iter().take(8) {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.delete_document(id).await.unwrap();
            }));
        }
        for i in 16..20 {
            let service = service.clone();
            let kb_id = f.kb_id;
            handles.push(tokio::spawn(async move {
                service
                    .ingest_text(kb_id, &format!("doc{}", i), "text", 1)
                    .await
                    .map(|_| ())
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(f.knowledge_bases.doc_count(f.kb_id), 12);
        assert_eq!(f.documents.find_by_kb_sync(f.kb_id).len(), 12);
    }
}
