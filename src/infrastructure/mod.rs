pub mod container;
pub mod database;
pub mod external_services;
pub mod object_storage;

pub use container::AppContainer;
pub use database::{DbPool, create_connection_pool};
pub use object_storage::LocalBlobStore;
