pub mod blob_location;
pub mod document_status;
pub mod media_class;
pub mod message_role;
pub mod process_type;

pub use blob_location::BlobLocation;
pub use document_status::DocumentStatus;
pub use media_class::MediaClass;
pub use message_role::MessageRole;
pub use process_type::ProcessType;
