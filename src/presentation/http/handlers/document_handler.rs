use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{KnowledgeBaseError, KnowledgeBaseService};
use crate::application::use_cases::{
    CreateTextDocumentUseCase, DeleteDocumentUseCase, RetrievePassagesUseCase,
    UploadDocumentUseCase,
    create_text_document::{CreateTextDocumentError, CreateTextDocumentRequest},
    delete_document::DeleteDocumentError,
    retrieve_passages::{RetrievePassagesError, RetrievePassagesRequest},
    upload_document::{UploadDocumentError, UploadDocumentRequest},
};
use crate::presentation::http::dto::{
    ApiResponse, CreateTextDocumentRequestDto, DocumentListResponseDto, DocumentResponseDto,
    MessageResponseDto, PassageDto, RetrieveRequestDto, RetrieveResponseDto,
    UploadDocumentResponseDto,
};

const DEFAULT_USER_ID: i64 = 1;

pub struct DocumentHandler {
    upload_use_case: Arc<UploadDocumentUseCase>,
    create_text_use_case: Arc<CreateTextDocumentUseCase>,
    delete_use_case: Arc<DeleteDocumentUseCase>,
    retrieve_use_case: Arc<RetrievePassagesUseCase>,
    knowledge_base_service: Arc<KnowledgeBaseService>,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadDocumentUseCase>,
        create_text_use_case: Arc<CreateTextDocumentUseCase>,
        delete_use_case: Arc<DeleteDocumentUseCase>,
        retrieve_use_case: Arc<RetrievePassagesUseCase>,
        knowledge_base_service: Arc<KnowledgeBaseService>,
    ) -> Self {
        Self {
            upload_use_case,
            create_text_use_case,
            delete_use_case,
            retrieve_use_case,
            knowledge_base_service,
        }
    }

    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(kb_id): Path<Uuid>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, StatusCode> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?
        {
            let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
                continue;
            };

            let content_type = field.content_type().map(|ct| ct.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|_| StatusCode::BAD_REQUEST)?
                .to_vec();

            let request = UploadDocumentRequest {
                kb_id,
                file_name,
                bytes: data,
                content_type,
                user_id: DEFAULT_USER_ID,
            };

            return match handler.upload_use_case.execute(request).await {
                Ok(response) => Ok((
                    StatusCode::CREATED,
                    Json(ApiResponse::success(UploadDocumentResponseDto {
                        document_id: response.document_id,
                        file_name: response.file_name,
                        status: response.status,
                        process_type: response.process_type,
                    })),
                )),
                Err(UploadDocumentError::KnowledgeBaseNotFound(id)) => Ok((
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::error(
                        "KB_NOT_FOUND".to_string(),
                        format!("Knowledge base not found: {}", id),
                        None,
                    )),
                )),
                Err(UploadDocumentError::EmptyFile(name)) => Ok((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(
                        "EMPTY_FILE".to_string(),
                        format!("Empty file: {}", name),
                        None,
                    )),
                )),
                Err(UploadDocumentError::ProcessingFailed(msg)) => Ok((
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::error(
                        "PROCESSING_FAILED".to_string(),
                        msg,
                        None,
                    )),
                )),
                Err(e) => Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "UPLOAD_FAILED".to_string(),
                        e.to_string(),
                        None,
                    )),
                )),
            };
        }

        Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "NO_FILE".to_string(),
                "No file field in multipart body".to_string(),
                None,
            )),
        ))
    }

    pub async fn create_text_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(kb_id): Path<Uuid>,
        Json(body): Json<CreateTextDocumentRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = CreateTextDocumentRequest {
            kb_id,
            name: body.name,
            text: body.text,
            user_id: body.user_id.unwrap_or(DEFAULT_USER_ID),
        };

        match handler.create_text_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(MessageResponseDto {
                    message: format!("Text document {} indexed", response.document_id),
                })),
            )),
            Err(CreateTextDocumentError::KnowledgeBaseNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "KB_NOT_FOUND".to_string(),
                    format!("Knowledge base not found: {}", id),
                    None,
                )),
            )),
            Err(CreateTextDocumentError::EmptyContent) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "EMPTY_CONTENT".to_string(),
                    "Text content must not be empty".to_string(),
                    None,
                )),
            )),
            Err(CreateTextDocumentError::IndexingFailed(msg)) => Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error("INDEXING_FAILED".to_string(), msg, None)),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "TEXT_CREATE_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        Path(kb_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.knowledge_base_service.list_documents(kb_id).await {
            Ok(documents) => {
                let items: Vec<DocumentResponseDto> =
                    documents.iter().map(DocumentResponseDto::from).collect();
                let total = items.len();
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::success(DocumentListResponseDto {
                        documents: items,
                        total,
                    })),
                ))
            }
            Err(KnowledgeBaseError::NotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "KB_NOT_FOUND".to_string(),
                    format!("Knowledge base not found: {}", id),
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "DOC_LIST_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.delete_use_case.execute(document_id).await {
            Ok(()) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(MessageResponseDto {
                    message: "Document deleted".to_string(),
                })),
            )),
            Err(DeleteDocumentError::NotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "DOC_NOT_FOUND".to_string(),
                    format!("Document not found: {}", id),
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "DOC_DELETE_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn retrieve(
        State(handler): State<Arc<DocumentHandler>>,
        Path(kb_id): Path<Uuid>,
        Json(body): Json<RetrieveRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        if body.query.trim().is_empty() {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "EMPTY_QUERY".to_string(),
                    "Query cannot be empty".to_string(),
                    None,
                )),
            ));
        }

        let request = RetrievePassagesRequest {
            kb_id,
            query: body.query,
            top_k: body.top_k,
        };

        match handler.retrieve_use_case.execute(request).await {
            Ok(response) => {
                let passages: Vec<PassageDto> = response
                    .passages
                    .into_iter()
                    .map(|p| PassageDto {
                        content: p.content,
                        document_id: p.source_doc_id,
                        document_name: p.source_doc_name,
                    })
                    .collect();
                let total = passages.len();
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::success(RetrieveResponseDto {
                        passages,
                        total,
                    })),
                ))
            }
            Err(RetrievePassagesError::KnowledgeBaseNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "KB_NOT_FOUND".to_string(),
                    format!("Knowledge base not found: {}", id),
                    None,
                )),
            )),
            Err(RetrievePassagesError::RetrievalFailed(msg)) => Ok((
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::error(
                    "RETRIEVAL_FAILED".to_string(),
                    msg,
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "RETRIEVE_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }
}
