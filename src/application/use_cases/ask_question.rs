use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::rag_service::{
    ChatTurn, DEFAULT_TOP_K, KbRef, RagAnswer, RagSource,
};
use crate::application::services::{ConversationError, ConversationService, RagError, RagService};

#[derive(Debug)]
pub enum AskQuestionError {
    KnowledgeBaseNotFound(Uuid),
    SessionNotFound(Uuid),
    EmptyQuery,
    GenerationFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for AskQuestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskQuestionError::KnowledgeBaseNotFound(id) => {
                write!(f, "Knowledge base not found: {}", id)
            }
            AskQuestionError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            AskQuestionError::EmptyQuery => write!(f, "Query must not be empty"),
            AskQuestionError::GenerationFailed(msg) => write!(f, "Generation failed: {}", msg),
            AskQuestionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for AskQuestionError {}

impl From<ConversationError> for AskQuestionError {
    fn from(error: ConversationError) -> Self {
        match error {
            ConversationError::SessionNotFound(id) => AskQuestionError::SessionNotFound(id),
            ConversationError::RepositoryError(msg) => AskQuestionError::RepositoryError(msg),
        }
    }
}

impl From<RagError> for AskQuestionError {
    fn from(error: RagError) -> Self {
        match error {
            RagError::KnowledgeBaseNotFound(id) | RagError::CollectionMissing(id) => {
                AskQuestionError::KnowledgeBaseNotFound(id)
            }
            RagError::GenerationFailed(msg) | RagError::RetrievalFailed(msg) => {
                AskQuestionError::GenerationFailed(msg)
            }
            RagError::RepositoryError(msg) => AskQuestionError::RepositoryError(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub kb_id: Uuid,
    /// When absent a fresh session is opened and bound to the knowledge base.
    pub session_id: Option<Uuid>,
    pub query: String,
    pub top_k: Option<i32>,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct AskQuestionResponse {
    pub session_id: Uuid,
    pub answer: String,
    pub sources: Vec<RagSource>,
    pub retrieval_count: usize,
}

/// One conversational round: load prior turns, persist the user question,
/// orchestrate retrieval plus generation, persist the assistant reply.
///
/// The user message is saved before orchestration starts, so a failed
/// round still shows the question in the transcript with no reply.
pub struct AskQuestionUseCase {
    rag_service: Arc<RagService>,
    conversation_service: Arc<ConversationService>,
}

impl AskQuestionUseCase {
    pub fn new(
        rag_service: Arc<RagService>,
        conversation_service: Arc<ConversationService>,
    ) -> Self {
        Self {
            rag_service,
            conversation_service,
        }
    }

    pub async fn execute(
        &self,
        request: AskQuestionRequest,
    ) -> Result<AskQuestionResponse, AskQuestionError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AskQuestionError::EmptyQuery);
        }

        let session = match request.session_id {
            Some(id) => self.conversation_service.get_session(id).await?,
            None => {
                self.conversation_service
                    .create_session(Some(request.kb_id), request.user_id)
                    .await?
            }
        };

        // History is the transcript as it stood before this question.
        let prior = self.conversation_service.messages(session.id()).await?;
        let history: Vec<ChatTurn> = prior
            .iter()
            .map(|m| ChatTurn {
                role: m.role(),
                content: m.content().to_string(),
            })
            .collect();

        self.conversation_service
            .save_user_message(session.id(), query)
            .await?;

        let rag_answer: RagAnswer = self
            .rag_service
            .answer(
                KbRef::KnowledgeBase(request.kb_id),
                query,
                request.top_k.unwrap_or(DEFAULT_TOP_K),
                &history,
            )
            .await?;

        let sources_json = if rag_answer.sources.is_empty() {
            None
        } else {
            serde_json::to_string(&rag_answer.sources).ok()
        };

        self.conversation_service
            .save_assistant_message(session.id(), &rag_answer.answer, sources_json, None)
            .await?;

        if prior.is_empty() {
            self.conversation_service
                .set_title_from_query(session.id(), query)
                .await?;
        }

        Ok(AskQuestionResponse {
            session_id: session.id(),
            answer: rag_answer.answer,
            sources: rag_answer.sources,
            retrieval_count: rag_answer.retrieval_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::retrieval_gateway::Passage;
    use crate::application::services::{ConversationService, RagService};
    use crate::application::testing::{
        InMemoryKnowledgeBases, InMemoryMessages, InMemorySessions,
        StubGeneration, StubRetrieval, provisioned_kb,
    };
    use crate::domain::entities::chat_session;
    use crate::domain::repositories::message_repository::MessageRepository;
    use crate::domain::value_objects::MessageRole;

    struct Harness {
        kbs: Arc<InMemoryKnowledgeBases>,
        messages: Arc<InMemoryMessages>,
        retrieval: Arc<StubRetrieval>,
        generation: Arc<StubGeneration>,
        conversation: Arc<ConversationService>,
        use_case: AskQuestionUseCase,
    }

    fn harness() -> Harness {
        let kbs = Arc::new(InMemoryKnowledgeBases::new());
        let sessions = Arc::new(InMemorySessions::new());
        let messages = Arc::new(InMemoryMessages::new());
        let retrieval = Arc::new(StubRetrieval::new());
        let generation = Arc::new(StubGeneration::new());

        let rag = Arc::new(RagService::new(
            kbs.clone(),
            retrieval.clone(),
            generation.clone(),
        ));
        let conversation = Arc::new(ConversationService::new(sessions, messages.clone()));

        Harness {
            kbs,
            messages,
            retrieval,
            generation,
            conversation: conversation.clone(),
            use_case: AskQuestionUseCase::new(rag, conversation),
        }
    }

    #[tokio::test]
    async fn test_first_question_opens_session_and_titles_it() {
        let h = harness();
        let kb = provisioned_kb("docs");
        h.kbs.insert(kb.clone());
        h.generation.set_answer("Grounded reply.");

        let response = h
            .use_case
            .execute(AskQuestionRequest {
                kb_id: kb.id(),
                session_id: None,
                query: "What is the refund policy?".to_string(),
                top_k: None,
                user_id: 1,
            })
            .await
            .unwrap();

        assert_eq!(response.answer, "Grounded reply.");

        let transcript = h
            .messages
            .find_by_session(response.session_id)
            .await
            .unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role(), MessageRole::User);
        assert_eq!(transcript[0].content(), "What is the refund policy?");
        assert_eq!(transcript[1].role(), MessageRole::Assistant);
        assert_eq!(transcript[1].content(), "Grounded reply.");
    }

    #[tokio::test]
    async fn test_history_excludes_the_question_being_asked() {
        let h = harness();
        let kb = provisioned_kb("docs");
        h.kbs.insert(kb.clone());

        let first = h
            .use_case
            .execute(AskQuestionRequest {
                kb_id: kb.id(),
                session_id: None,
                query: "First question".to_string(),
                top_k: None,
                user_id: 1,
            })
            .await
            .unwrap();

        h.use_case
            .execute(AskQuestionRequest {
                kb_id: kb.id(),
                session_id: Some(first.session_id),
                query: "Second question".to_string(),
                top_k: None,
                user_id: 1,
            })
            .await
            .unwrap();

        let chats = h.generation.chats();
        assert_eq!(chats.len(), 2);
        // First round has no history, so the prompt carries the query inline.
        assert!(chats[0].1.is_none());
        // Second round gets the first exchange as history, not its own query.
        let system = chats[1].1.as_deref().unwrap();
        assert!(system.contains("First question"));
        assert!(!system.contains("Second question"));
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_question_drops_reply() {
        let h = harness();
        let kb = provisioned_kb("docs");
        h.kbs.insert(kb.clone());
        h.generation.fail_chat(true);

        let session = h
            .conversation
            .create_session(Some(kb.id()), 1)
            .await
            .unwrap();

        let err = h
            .use_case
            .execute(AskQuestionRequest {
                kb_id: kb.id(),
                session_id: Some(session.id()),
                query: "Doomed question".to_string(),
                top_k: None,
                user_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AskQuestionError::GenerationFailed(_)));

        // The question was persisted but no assistant message followed.
        let transcript = h.messages.find_by_session(session.id()).await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role(), MessageRole::User);
        assert_eq!(transcript[0].content(), "Doomed question");
    }

    #[tokio::test]
    async fn test_sources_are_serialized_onto_the_reply() {
        let h = harness();
        let kb = provisioned_kb("docs");
        h.kbs.insert(kb.clone());
        h.retrieval.set_passages(vec![Passage {
            content: "Refunds take 14 days.".to_string(),
            source_doc_id: Some("ext-9".to_string()),
            source_doc_name: Some("policy.pdf".to_string()),
        }]);

        let response = h
            .use_case
            .execute(AskQuestionRequest {
                kb_id: kb.id(),
                session_id: None,
                query: "Refund timing?".to_string(),
                top_k: None,
                user_id: 1,
            })
            .await
            .unwrap();

        assert_eq!(response.retrieval_count, 1);
        let transcript = h
            .messages
            .find_by_session(response.session_id)
            .await
            .unwrap();
        let stored = transcript[1].sources().unwrap();
        assert!(stored.contains("policy.pdf"));
        assert!(stored.contains("ext-9"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected_before_any_write() {
        let h = harness();
        let kb = provisioned_kb("docs");
        h.kbs.insert(kb.clone());

        let err = h
            .use_case
            .execute(AskQuestionRequest {
                kb_id: kb.id(),
                session_id: Some(Uuid::new_v4()),
                query: "Hello".to_string(),
                top_k: None,
                user_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AskQuestionError::SessionNotFound(_)));
        assert!(h.generation.chats().is_empty());
    }

    #[tokio::test]
    async fn test_long_first_query_yields_truncated_title() {
        let h = harness();
        let kb = provisioned_kb("docs");
        h.kbs.insert(kb.clone());

        let long_query = "x".repeat(80);
        let expected = chat_session::title_from_query(&long_query);

        let response = h
            .use_case
            .execute(AskQuestionRequest {
                kb_id: kb.id(),
                session_id: None,
                query: long_query,
                top_k: None,
                user_id: 1,
            })
            .await
            .unwrap();

        let session = h
            .conversation
            .get_session(response.session_id)
            .await
            .unwrap();
        assert_eq!(session.title(), expected);
        assert!(session.title().ends_with("..."));
    }
}
