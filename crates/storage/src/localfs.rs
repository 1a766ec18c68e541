//! Local filesystem backend: one file per key under a root directory.
//! Used for development without credentials and by the e2e tests.
//! Content type and cache control have no filesystem equivalent and are
//! accepted and ignored.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::errors::StorageError;
use crate::ObjectStore;

pub struct LocalFsBackend {
    root: PathBuf,
}

impl LocalFsBackend {
    /// Create the backend, making sure the root directory exists.
    pub async fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ObjectStore for LocalFsBackend {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match fs::metadata(self.path_for(key)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        Ok(fs::read(self.path_for(key)).await?)
    }

    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        _content_type: &str,
        _cache_control: &str,
    ) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let mut f = fs::File::create(path).await?;
        f.write_all(data).await?;
        f.flush().await?;
        Ok(())
    }
}
