//! Object-storage abstraction for the slot document store.
//! One flat namespace of keys inside a single configured bucket; the
//! service only ever needs existence checks, whole-object reads and
//! whole-object replacing writes.

pub mod errors;
pub mod localfs;
pub mod s3;

use async_trait::async_trait;

pub use errors::StorageError;
pub use localfs::LocalFsBackend;
pub use s3::S3Backend;

/// Minimal object-store surface the request handlers depend on.
/// Implementations must be safe to share across in-flight requests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Download the full object at `key`. Missing keys are a backend
    /// error here; callers are expected to check `exists` first.
    async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Upload `data` to `key`, replacing any existing object wholesale.
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), StorageError>;
}
