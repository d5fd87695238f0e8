use std::sync::Arc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{
    GenerationGateway, RetrievalGateway,
    retrieval_gateway::{Passage, SearchMode},
};
use crate::domain::repositories::KnowledgeBaseRepository;
use crate::domain::value_objects::MessageRole;

/// Prior turns folded into an answer, most recent last.
pub const HISTORY_MAX_TURNS: usize = 10;

/// Source snippets surfaced to the caller are clipped to this many chars.
pub const SOURCE_SNIPPET_MAX_CHARS: usize = 200;

pub const DEFAULT_TOP_K: i32 = 5;

const NO_CONTEXT_PLACEHOLDER: &str = "No reference material is available.";

const SYSTEM_PROMPT_HEADER: &str = "You are a knowledge-base question answering assistant. \
Answer the user's question using the reference material below.\n\n\
Requirements:\n\
1. Base your answer on the references; if they do not contain the relevant \
information, say so honestly\n\
2. Be accurate, concise and professional\n\
3. Expand with explanation where it helps\n\n\
References:\n";

#[derive(Debug)]
pub enum RagError {
    KnowledgeBaseNotFound(Uuid),
    CollectionMissing(Uuid),
    RepositoryError(String),
    RetrievalFailed(String),
    GenerationFailed(String),
}

impl std::fmt::Display for RagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RagError::KnowledgeBaseNotFound(id) => write!(f, "Knowledge base not found: {}", id),
            RagError::CollectionMissing(id) => {
                write!(f, "Knowledge base {} has no external collection", id)
            }
            RagError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            RagError::RetrievalFailed(msg) => write!(f, "Retrieval failed: {}", msg),
            RagError::GenerationFailed(msg) => write!(f, "Answer generation failed: {}", msg),
        }
    }
}

impl std::error::Error for RagError {}

/// Either an internal knowledge base or a directly addressed external
/// collection for callers that already hold one.
#[derive(Debug, Clone)]
pub enum KbRef {
    KnowledgeBase(Uuid),
    Collection(String),
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagSource {
    pub document_id: String,
    pub document_name: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub answer: String,
    pub sources: Vec<RagSource>,
    pub retrieval_count: usize,
}

/// Turns a query plus optional history into a grounded answer: retrieve
/// context, assemble a bounded prompt, call the model, attribute sources.
/// Retrieval soft-fails; generation hard-fails. No re-ranking anywhere.
pub struct RagService {
    knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
    retrieval: Arc<dyn RetrievalGateway>,
    generation: Arc<dyn GenerationGateway>,
    search_mode: SearchMode,
}

impl RagService {
    pub fn new(
        knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
        retrieval: Arc<dyn RetrievalGateway>,
        generation: Arc<dyn GenerationGateway>,
    ) -> Self {
        Self {
            knowledge_bases,
            retrieval,
            generation,
            search_mode: SearchMode::Semantic,
        }
    }

    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    pub async fn answer(
        &self,
        kb_ref: KbRef,
        query: &str,
        top_k: i32,
        history: &[ChatTurn],
    ) -> Result<RagAnswer, RagError> {
        let collection_id = self.resolve_collection(&kb_ref).await?;

        let passages = match self
            .retrieval
            .search(&collection_id, query, top_k, self.search_mode)
            .await
        {
            Ok(passages) => {
                tracing::info!(count = passages.len(), "retrieved passages");
                passages
            }
            Err(e) => {
                // Degraded but available: answer with zero context rather
                // than failing the whole turn.
                tracing::warn!(error = %e, "retrieval failed, answering without context");
                Vec::new()
            }
        };

        let context = build_context(&passages);
        let system_prompt = format!("{}{}", SYSTEM_PROMPT_HEADER, context);

        let answer = if history.is_empty() {
            self.generation
                .chat(
                    &format!("{}\n\nUser question: {}", system_prompt, query),
                    None,
                )
                .await
        } else {
            let bounded = &history[history.len().saturating_sub(HISTORY_MAX_TURNS)..];
            let system_prompt = append_history(&system_prompt, bounded);
            self.generation.chat(query, Some(&system_prompt)).await
        }
        .map_err(|e| RagError::GenerationFailed(e.to_string()))?;

        Ok(RagAnswer {
            answer,
            sources: extract_sources(&passages),
            retrieval_count: passages.len(),
        })
    }

    /// Raw passage retrieval for the caller surface. Unlike `answer`, a
    /// gateway failure is surfaced here.
    pub async fn retrieve(
        &self,
        kb_id: Uuid,
        query: &str,
        top_k: i32,
    ) -> Result<Vec<Passage>, RagError> {
        let collection_id = self
            .resolve_collection(&KbRef::KnowledgeBase(kb_id))
            .await?;

        self.retrieval
            .search(&collection_id, query, top_k, self.search_mode)
            .await
            .map_err(|e| RagError::RetrievalFailed(e.to_string()))
    }

    async fn resolve_collection(&self, kb_ref: &KbRef) -> Result<String, RagError> {
        match kb_ref {
            KbRef::Collection(id) => Ok(id.clone()),
            KbRef::KnowledgeBase(kb_id) => {
                let kb = self
                    .knowledge_bases
                    .find_by_id(*kb_id)
                    .await
                    .map_err(|e| RagError::RepositoryError(e.to_string()))?
                    .ok_or(RagError::KnowledgeBaseNotFound(*kb_id))?;
                kb.collection_id()
                    .map(|s| s.to_string())
                    .ok_or(RagError::CollectionMissing(*kb_id))
            }
        }
    }
}

/// Passages concatenated in retrieval-rank order, labeled for attribution.
fn build_context(passages: &[Passage]) -> String {
    let mut context = String::new();
    for (i, passage) in passages.iter().enumerate() {
        let content = passage.content.trim();
        if content.is_empty() {
            continue;
        }
        context.push_str(&format!("Reference {}:\n{}\n\n", i + 1, content));
    }

    if context.is_empty() {
        NO_CONTEXT_PLACEHOLDER.to_string()
    } else {
        context
    }
}

fn append_history(system_prompt: &str, history: &[ChatTurn]) -> String {
    let mut prompt = format!("{}\n\nConversation history:\n", system_prompt);
    for turn in history {
        prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
    }
    prompt
}

/// Passages without a resolvable source reference are dropped here but are
/// still counted in `retrieval_count`.
fn extract_sources(passages: &[Passage]) -> Vec<RagSource> {
    passages
        .iter()
        .filter_map(|p| match (&p.source_doc_id, &p.source_doc_name) {
            (Some(id), Some(name)) => Some(RagSource {
                document_id: id.clone(),
                document_name: name.clone(),
                content: truncate(&p.content, SOURCE_SNIPPET_MAX_CHARS),
            }),
            _ => None,
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > max_chars {
        let clipped: String = chars[..max_chars].iter().collect();
        format!("{}...", clipped)
    } else {
        text.to_string()
    }
}
