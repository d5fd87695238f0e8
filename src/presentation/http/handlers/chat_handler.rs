use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{ConversationError, ConversationService};
use crate::application::use_cases::{
    AskCollectionUseCase, AskQuestionUseCase,
    ask_collection::{AskCollectionError, AskCollectionRequest},
    ask_question::{AskQuestionError, AskQuestionRequest},
};
use crate::presentation::http::dto::{
    AnswerResponseDto, ApiResponse, AskCollectionRequestDto, AskRequestDto,
    ChatMessageResponseDto, CreateSessionRequestDto, ListSessionsQueryDto,
    MessageListResponseDto, MessageResponseDto, SessionListResponseDto, SessionResponseDto,
};

const DEFAULT_USER_ID: i64 = 1;

pub struct ChatHandler {
    ask_use_case: Arc<AskQuestionUseCase>,
    ask_collection_use_case: Arc<AskCollectionUseCase>,
    conversation_service: Arc<ConversationService>,
}

impl ChatHandler {
    pub fn new(
        ask_use_case: Arc<AskQuestionUseCase>,
        ask_collection_use_case: Arc<AskCollectionUseCase>,
        conversation_service: Arc<ConversationService>,
    ) -> Self {
        Self {
            ask_use_case,
            ask_collection_use_case,
            conversation_service,
        }
    }

    pub async fn ask(
        State(handler): State<Arc<ChatHandler>>,
        Json(body): Json<AskRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = AskQuestionRequest {
            kb_id: body.kb_id,
            session_id: body.session_id,
            query: body.query,
            top_k: body.top_k,
            user_id: body.user_id.unwrap_or(DEFAULT_USER_ID),
        };

        match handler.ask_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(AnswerResponseDto {
                    session_id: Some(response.session_id),
                    answer: response.answer,
                    sources: response.sources,
                    retrieval_count: response.retrieval_count,
                })),
            )),
            Err(AskQuestionError::EmptyQuery) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "EMPTY_QUERY".to_string(),
                    "Query cannot be empty".to_string(),
                    None,
                )),
            )),
            Err(AskQuestionError::KnowledgeBaseNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "KB_NOT_FOUND".to_string(),
                    format!("Knowledge base not found: {}", id),
                    None,
                )),
            )),
            Err(AskQuestionError::SessionNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "SESSION_NOT_FOUND".to_string(),
                    format!("Session not found: {}", id),
                    None,
                )),
            )),
            Err(AskQuestionError::GenerationFailed(msg)) => Ok((
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::error(
                    "GENERATION_FAILED".to_string(),
                    msg,
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "ASK_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn ask_collection(
        State(handler): State<Arc<ChatHandler>>,
        Json(body): Json<AskCollectionRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = AskCollectionRequest {
            collection_id: body.collection_id,
            query: body.query,
            top_k: body.top_k,
        };

        match handler.ask_collection_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(AnswerResponseDto {
                    session_id: None,
                    answer: response.answer,
                    sources: response.sources,
                    retrieval_count: response.retrieval_count,
                })),
            )),
            Err(AskCollectionError::EmptyQuery) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "EMPTY_QUERY".to_string(),
                    "Query cannot be empty".to_string(),
                    None,
                )),
            )),
            Err(AskCollectionError::GenerationFailed(msg)) => Ok((
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::error(
                    "GENERATION_FAILED".to_string(),
                    msg,
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "ASK_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn create_session(
        State(handler): State<Arc<ChatHandler>>,
        Json(body): Json<CreateSessionRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .conversation_service
            .create_session(body.kb_id, body.user_id.unwrap_or(DEFAULT_USER_ID))
            .await
        {
            Ok(session) => Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(SessionResponseDto::from(&session))),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "SESSION_CREATE_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn list_sessions(
        State(handler): State<Arc<ChatHandler>>,
        Query(params): Query<ListSessionsQueryDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .conversation_service
            .list_sessions(params.user_id)
            .await
        {
            Ok(sessions) => {
                let items: Vec<SessionResponseDto> =
                    sessions.iter().map(SessionResponseDto::from).collect();
                let total = items.len();
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::success(SessionListResponseDto {
                        sessions: items,
                        total,
                    })),
                ))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "SESSION_LIST_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn get_session_messages(
        State(handler): State<Arc<ChatHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        if let Err(e) = handler.conversation_service.get_session(session_id).await {
            return match e {
                ConversationError::SessionNotFound(id) => Ok((
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::error(
                        "SESSION_NOT_FOUND".to_string(),
                        format!("Session not found: {}", id),
                        None,
                    )),
                )),
                other => Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "SESSION_FETCH_FAILED".to_string(),
                        other.to_string(),
                        None,
                    )),
                )),
            };
        }

        match handler.conversation_service.messages(session_id).await {
            Ok(messages) => {
                let items: Vec<ChatMessageResponseDto> =
                    messages.iter().map(ChatMessageResponseDto::from).collect();
                let total = items.len();
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::success(MessageListResponseDto {
                        messages: items,
                        total,
                    })),
                ))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "MESSAGE_LIST_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn delete_session(
        State(handler): State<Arc<ChatHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.conversation_service.delete_session(session_id).await {
            Ok(()) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(MessageResponseDto {
                    message: "Session deleted".to_string(),
                })),
            )),
            Err(ConversationError::SessionNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "SESSION_NOT_FOUND".to_string(),
                    format!("Session not found: {}", id),
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "SESSION_DELETE_FAILED".to_string(),
                    e.to_string(),
                    None,
                )),
            )),
        }
    }
}
