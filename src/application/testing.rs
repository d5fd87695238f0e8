//! In-memory repositories and scriptable gateway stubs for exercising the
//! ingestion and RAG pipelines without a database or live backends.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::blob_store::{BlobStore, BlobStoreError, StoredBlob};
use crate::application::ports::generation_gateway::{
    GenerationGateway, GenerationGatewayError, VisionMedia,
};
use crate::application::ports::retrieval_gateway::{
    IndexedDocument, Passage, RetrievalGateway, RetrievalGatewayError, SearchMode,
};
use crate::domain::entities::{ChatMessage, ChatSession, Document, KnowledgeBase};
use crate::domain::repositories::document_repository::{
    DocumentRepository, DocumentRepositoryError,
};
use crate::domain::repositories::knowledge_base_repository::{
    KnowledgeBaseRepository, KnowledgeBaseRepositoryError,
};
use crate::domain::repositories::message_repository::{MessageRepository, MessageRepositoryError};
use crate::domain::repositories::session_repository::{SessionRepository, SessionRepositoryError};

pub fn provisioned_kb(name: &str) -> KnowledgeBase {
    KnowledgeBase::new(
        name.to_string(),
        None,
        format!("col-{}", name),
        "text-embedding-3-small".to_string(),
        "builtin".to_string(),
        1,
    )
}

// ---------------------------------------------------------------- repositories

#[derive(Default)]
pub struct InMemoryKnowledgeBases {
    rows: Mutex<HashMap<Uuid, KnowledgeBase>>,
    counts: Mutex<HashMap<Uuid, i32>>,
}

impl InMemoryKnowledgeBases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, kb: KnowledgeBase) {
        self.counts.lock().unwrap().insert(kb.id(), kb.doc_count());
        self.rows.lock().unwrap().insert(kb.id(), kb);
    }

    pub fn find_sync(&self, id: Uuid) -> Option<KnowledgeBase> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn doc_count(&self, id: Uuid) -> i32 {
        *self.counts.lock().unwrap().get(&id).unwrap_or(&0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl KnowledgeBaseRepository for InMemoryKnowledgeBases {
    async fn save(&self, kb: &KnowledgeBase) -> Result<(), KnowledgeBaseRepositoryError> {
        self.insert(kb.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<KnowledgeBase>, KnowledgeBaseRepositoryError> {
        let counts = self.counts.lock().unwrap();
        Ok(self.rows.lock().unwrap().get(&id).map(|kb| {
            let count = *counts.get(&id).unwrap_or(&0);
            KnowledgeBase::from_parts(
                kb.id(),
                kb.name().to_string(),
                kb.description().map(|s| s.to_string()),
                kb.collection_id().map(|s| s.to_string()),
                kb.embedding_model().to_string(),
                kb.embedding_provider().to_string(),
                count,
                kb.is_enabled(),
                kb.user_id(),
                kb.created_at(),
                kb.updated_at(),
            )
        }))
    }

    async fn find_all(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<KnowledgeBase>, KnowledgeBaseRepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|kb| user_id.is_none_or(|uid| kb.user_id() == uid))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, KnowledgeBaseRepositoryError> {
        self.counts.lock().unwrap().remove(&id);
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn increment_doc_count(&self, id: Uuid) -> Result<(), KnowledgeBaseRepositoryError> {
        let mut counts = self.counts.lock().unwrap();
        *counts.entry(id).or_insert(0) += 1;
        Ok(())
    }

    async fn decrement_doc_count(&self, id: Uuid) -> Result<(), KnowledgeBaseRepositoryError> {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(id).or_insert(0);
        *count = (*count - 1).max(0);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDocuments {
    rows: Mutex<Vec<Document>>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_kb_sync(&self, kb_id: Uuid) -> Vec<Document> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.kb_id() == kb_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocuments {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        self.rows.lock().unwrap().push(document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id() == id)
            .cloned())
    }

    async fn find_by_kb(&self, kb_id: Uuid) -> Result<Vec<Document>, DocumentRepositoryError> {
        Ok(self.find_by_kb_sync(kb_id))
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|d| d.id() == document.id()) {
            Some(row) => {
                *row = document.clone();
                Ok(())
            }
            None => Err(DocumentRepositoryError::NotFound(document.id())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|d| d.id() != id);
        Ok(rows.len() < before)
    }

    async fn delete_by_kb(&self, kb_id: Uuid) -> Result<usize, DocumentRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|d| d.kb_id() != kb_id);
        Ok(before - rows.len())
    }

    async fn count_by_kb(&self, kb_id: Uuid) -> Result<i64, DocumentRepositoryError> {
        Ok(self.find_by_kb_sync(kb_id).len() as i64)
    }
}

#[derive(Default)]
pub struct InMemorySessions {
    rows: Mutex<Vec<ChatSession>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessions {
    async fn save(&self, session: &ChatSession) -> Result<(), SessionRepositoryError> {
        self.rows.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChatSession>, SessionRepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id() == id)
            .cloned())
    }

    async fn find_all(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<ChatSession>, SessionRepositoryError> {
        let mut sessions: Vec<ChatSession> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| user_id.is_none_or(|uid| s.user_id() == uid))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(sessions)
    }

    async fn update(&self, session: &ChatSession) -> Result<(), SessionRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|s| s.id() == session.id()) {
            Some(row) => {
                *row = session.clone();
                Ok(())
            }
            None => Err(SessionRepositoryError::NotFound(session.id())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SessionRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id() != id);
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryMessages {
    rows: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessages {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessages {
    async fn save(&self, message: &ChatMessage) -> Result<(), MessageRepositoryError> {
        self.rows.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<ChatMessage>, MessageRepositoryError> {
        // Insertion order stands in for creation-time order
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id() == session_id)
            .cloned()
            .collect())
    }

    async fn count_by_session(&self, session_id: Uuid) -> Result<i64, MessageRepositoryError> {
        Ok(self.find_by_session(session_id).await?.len() as i64)
    }

    async fn delete_by_session(&self, session_id: Uuid) -> Result<usize, MessageRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.session_id() != session_id);
        Ok(before - rows.len())
    }
}

// -------------------------------------------------------------------- gateways

#[derive(Default)]
pub struct StubRetrieval {
    passages: Mutex<Vec<Passage>>,
    next_doc_id: AtomicUsize,
    fail_search: AtomicBool,
    fail_index_text: AtomicBool,
    fail_index_file: AtomicBool,
    fail_delete_document: AtomicBool,
    fail_create_collection: AtomicBool,
    fail_delete_collection: AtomicBool,
    created_collections: Mutex<Vec<String>>,
    searched_collections: Mutex<Vec<String>>,
    indexed_texts: Mutex<Vec<(String, String, String)>>,
    indexed_files: Mutex<Vec<(String, String)>>,
    deleted_documents: Mutex<Vec<(String, String)>>,
}

impl StubRetrieval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_passages(&self, passages: Vec<Passage>) {
        *self.passages.lock().unwrap() = passages;
    }

    pub fn fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    pub fn fail_index_text(&self, fail: bool) {
        self.fail_index_text.store(fail, Ordering::SeqCst);
    }

    pub fn fail_index_file(&self, fail: bool) {
        self.fail_index_file.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete_document(&self, fail: bool) {
        self.fail_delete_document.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create_collection(&self, fail: bool) {
        self.fail_create_collection.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete_collection(&self, fail: bool) {
        self.fail_delete_collection.store(fail, Ordering::SeqCst);
    }

    pub fn created_collections(&self) -> Vec<String> {
        self.created_collections.lock().unwrap().clone()
    }

    pub fn searched_collections(&self) -> Vec<String> {
        self.searched_collections.lock().unwrap().clone()
    }

    pub fn indexed_texts(&self) -> Vec<(String, String, String)> {
        self.indexed_texts.lock().unwrap().clone()
    }

    pub fn indexed_files(&self) -> Vec<(String, String)> {
        self.indexed_files.lock().unwrap().clone()
    }

    pub fn deleted_documents(&self) -> Vec<(String, String)> {
        self.deleted_documents.lock().unwrap().clone()
    }

    fn next_external_id(&self) -> String {
        format!("ext-{}", self.next_doc_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl RetrievalGateway for StubRetrieval {
    async fn create_collection(
        &self,
        name: &str,
        _description: Option<&str>,
    ) -> Result<String, RetrievalGatewayError> {
        if self.fail_create_collection.load(Ordering::SeqCst) {
            return Err(RetrievalGatewayError::ApiError(
                "collection create rejected".to_string(),
            ));
        }
        self.created_collections
            .lock()
            .unwrap()
            .push(name.to_string());
        Ok(format!("col-{}", name))
    }

    async fn delete_collection(&self, _collection_id: &str) -> Result<(), RetrievalGatewayError> {
        if self.fail_delete_collection.load(Ordering::SeqCst) {
            return Err(RetrievalGatewayError::NetworkError(
                "collection delete timed out".to_string(),
            ));
        }
        Ok(())
    }

    async fn index_text(
        &self,
        collection_id: &str,
        name: &str,
        text: &str,
    ) -> Result<IndexedDocument, RetrievalGatewayError> {
        if self.fail_index_text.load(Ordering::SeqCst) {
            return Err(RetrievalGatewayError::ApiError(
                "text indexing rejected".to_string(),
            ));
        }
        self.indexed_texts.lock().unwrap().push((
            collection_id.to_string(),
            name.to_string(),
            text.to_string(),
        ));
        Ok(IndexedDocument {
            external_doc_id: self.next_external_id(),
        })
    }

    async fn index_file(
        &self,
        collection_id: &str,
        _file_bytes: Vec<u8>,
        filename: &str,
    ) -> Result<IndexedDocument, RetrievalGatewayError> {
        if self.fail_index_file.load(Ordering::SeqCst) {
            return Err(RetrievalGatewayError::ApiError(
                "file indexing rejected".to_string(),
            ));
        }
        self.indexed_files
            .lock()
            .unwrap()
            .push((collection_id.to_string(), filename.to_string()));
        Ok(IndexedDocument {
            external_doc_id: self.next_external_id(),
        })
    }

    async fn delete_document(
        &self,
        collection_id: &str,
        external_doc_id: &str,
    ) -> Result<(), RetrievalGatewayError> {
        if self.fail_delete_document.load(Ordering::SeqCst) {
            return Err(RetrievalGatewayError::NetworkError(
                "index delete timed out".to_string(),
            ));
        }
        self.deleted_documents
            .lock()
            .unwrap()
            .push((collection_id.to_string(), external_doc_id.to_string()));
        Ok(())
    }

    async fn search(
        &self,
        collection_id: &str,
        _query: &str,
        top_k: i32,
        _mode: SearchMode,
    ) -> Result<Vec<Passage>, RetrievalGatewayError> {
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(RetrievalGatewayError::NetworkError(
                "search backend unreachable".to_string(),
            ));
        }
        self.searched_collections
            .lock()
            .unwrap()
            .push(collection_id.to_string());
        let passages = self.passages.lock().unwrap();
        Ok(passages.iter().take(top_k as usize).cloned().collect())
    }
}

pub struct StubGeneration {
    answer: Mutex<String>,
    vision_text: Mutex<String>,
    fail_chat: AtomicBool,
    fail_vision: AtomicBool,
    chats: Mutex<Vec<(String, Option<String>)>>,
    vision_media: Mutex<Vec<VisionMedia>>,
}

impl Default for StubGeneration {
    fn default() -> Self {
        Self {
            answer: Mutex::new("stub answer".to_string()),
            vision_text: Mutex::new("stub vision description".to_string()),
            fail_chat: AtomicBool::new(false),
            fail_vision: AtomicBool::new(false),
            chats: Mutex::new(Vec::new()),
            vision_media: Mutex::new(Vec::new()),
        }
    }
}

impl StubGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_answer(&self, answer: &str) {
        *self.answer.lock().unwrap() = answer.to_string();
    }

    pub fn set_vision_text(&self, text: &str) {
        *self.vision_text.lock().unwrap() = text.to_string();
    }

    pub fn fail_chat(&self, fail: bool) {
        self.fail_chat.store(fail, Ordering::SeqCst);
    }

    pub fn fail_vision(&self, fail: bool) {
        self.fail_vision.store(fail, Ordering::SeqCst);
    }

    pub fn chats(&self) -> Vec<(String, Option<String>)> {
        self.chats.lock().unwrap().clone()
    }

    pub fn vision_media(&self) -> Vec<VisionMedia> {
        self.vision_media.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationGateway for StubGeneration {
    async fn chat(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, GenerationGatewayError> {
        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(GenerationGatewayError::ApiError(
                "model overloaded".to_string(),
            ));
        }
        self.chats
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_prompt.map(|s| s.to_string())));
        Ok(self.answer.lock().unwrap().clone())
    }

    async fn vision_describe(
        &self,
        _prompt: &str,
        media: VisionMedia,
    ) -> Result<String, GenerationGatewayError> {
        if self.fail_vision.load(Ordering::SeqCst) {
            return Err(GenerationGatewayError::ApiError(
                "vision model rejected input".to_string(),
            ));
        }
        self.vision_media.lock().unwrap().push(media);
        Ok(self.vision_text.lock().unwrap().clone())
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, GenerationGatewayError> {
        Ok(vec![0.0; 8])
    }
}

#[derive(Default)]
pub struct StubBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_delete: AtomicBool,
}

impl StubBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for StubBlobStore {
    async fn put(
        &self,
        data: &[u8],
        file_name: &str,
        _content_type: Option<&str>,
    ) -> Result<StoredBlob, BlobStoreError> {
        let object_name = format!("{}_{}", Uuid::new_v4(), file_name);
        self.objects
            .lock()
            .unwrap()
            .insert(object_name.clone(), data.to_vec());
        Ok(StoredBlob {
            bucket: "stub".to_string(),
            url: format!("http://blobs/{}", object_name),
            object_name,
        })
    }

    async fn get(&self, object_name: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(object_name)
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(object_name.to_string()))
    }

    async fn presigned_url(
        &self,
        object_name: &str,
        ttl_secs: u64,
    ) -> Result<String, BlobStoreError> {
        Ok(format!("http://blobs/{}?expires={}", object_name, ttl_secs))
    }

    async fn delete(&self, _bucket: &str, object_name: &str) -> Result<bool, BlobStoreError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(BlobStoreError::IoError(
                "blob backend unreachable".to_string(),
            ));
        }
        Ok(self.objects.lock().unwrap().remove(object_name).is_some())
    }
}
