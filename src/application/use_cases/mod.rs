pub mod ask_collection;
pub mod ask_question;
pub mod create_knowledge_base;
pub mod create_text_document;
pub mod delete_document;
pub mod delete_knowledge_base;
pub mod retrieve_passages;
pub mod upload_document;

pub use ask_collection::AskCollectionUseCase;
pub use ask_question::AskQuestionUseCase;
pub use create_knowledge_base::CreateKnowledgeBaseUseCase;
pub use create_text_document::CreateTextDocumentUseCase;
pub use delete_document::DeleteDocumentUseCase;
pub use delete_knowledge_base::DeleteKnowledgeBaseUseCase;
pub use retrieve_passages::RetrievePassagesUseCase;
pub use upload_document::UploadDocumentUseCase;
