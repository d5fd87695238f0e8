use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{KnowledgeBaseError, KnowledgeBaseService};
use crate::application::use_cases::{
    CreateKnowledgeBaseUseCase, DeleteKnowledgeBaseUseCase,
    create_knowledge_base::{CreateKnowledgeBaseError, CreateKnowledgeBaseRequest},
    delete_knowledge_base::DeleteKnowledgeBaseError,
};
use crate::presentation::http::dto::{
    ApiResponse, CreateKnowledgeBaseRequestDto, KnowledgeBaseListResponseDto,
    KnowledgeBaseResponseDto, ListKnowledgeBasesQueryDto, MessageResponseDto,
};

const DEFAULT_USER_ID: i64 = 1;

pub struct KnowledgeBaseHandler {
    create_use_case: Arc<CreateKnowledgeBaseUseCase>,
    delete_use_case: Arc<DeleteKnowledgeBaseUseCase>,
    knowledge_base_service: Arc<KnowledgeBaseService>,
}

impl KnowledgeBaseHandler {
    pub fn new(
        create_use_case: Arc<CreateKnowledgeBaseUseCase>,
        delete_use_case: Arc<DeleteKnowledgeBaseUseCase>,
        knowledge_base_service: Arc<KnowledgeBaseService>,
    ) -> Self {
        Self {
            create_use_case,
            delete_use_case,
            knowledge_base_service,
        }
    }

    pub async fn create_knowledge_base(
        State(handler): State<Arc<KnowledgeBaseHandler>>,
        Json(body): Json<CreateKnowledgeBaseRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = CreateKnowledgeBaseRequest {
            name: body.name,
            description: body.description,
            user_id: body.user_id.unwrap_or(DEFAULT_USER_ID),
        };

        match handler.create_use_case.execute(request).await {
            Ok(response) => match handler.knowledge_base_service.get(response.kb_id).await {
                Ok(kb) => Ok((
                    StatusCode::CREATED,
                    Json(ApiResponse::success(KnowledgeBaseResponseDto::from(&kb))),
                )),
                Err(e) => Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "KB_FETCH_FAILED".to_string(),
                        e.to_string(),
                        None,
                    )),
                )),
            },
            Err(CreateKnowledgeBaseError::InvalidName(msg)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_NAME".to_string(), msg, None)),
            )),
            Err(CreateKnowledgeBaseError::ProvisioningFailed(msg)) => Ok((
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::error(
                    "PROVISIONING_FAILED".to_string(),
                    msg,
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "KB_CREATE_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn list_knowledge_bases(
        State(handler): State<Arc<KnowledgeBaseHandler>>,
        Query(params): Query<ListKnowledgeBasesQueryDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.knowledge_base_service.list(params.user_id).await {
            Ok(kbs) => {
                let items: Vec<KnowledgeBaseResponseDto> =
                    kbs.iter().map(KnowledgeBaseResponseDto::from).collect();
                let total = items.len();
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::success(KnowledgeBaseListResponseDto {
                        knowledge_bases: items,
                        total,
                    })),
                ))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "KB_LIST_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn get_knowledge_base(
        State(handler): State<Arc<KnowledgeBaseHandler>>,
        Path(kb_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.knowledge_base_service.get(kb_id).await {
            Ok(kb) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(KnowledgeBaseResponseDto::from(&kb))),
            )),
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
                    "KB_FETCH_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn delete_knowledge_base(
        State(handler): State<Arc<KnowledgeBaseHandler>>,
        Path(kb_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.delete_use_case.execute(kb_id).await {
            Ok(()) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(MessageResponseDto {
                    message: "Knowledge base deleted".to_string(),
                })),
            )),
            Err(DeleteKnowledgeBaseError::NotFound(id)) => Ok((
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
                    "KB_DELETE_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }
}
