// Repository ports
// Storage adapters in `infrastructure` implement these

use thiserror::Error;

pub mod post_repository;
pub mod profile_repository;
pub mod user_repository;

pub use post_repository::PostRepository;
pub use profile_repository::ProfileRepository;
pub use user_repository::UserRepository;

/// Failure reported by a storage adapter
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// A stored document could not be decoded
    #[error("corrupt document: {0}")]
    Corrupt(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
