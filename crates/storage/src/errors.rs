use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Error reported by the remote store; `code` carries the backend's
    /// error code (e.g. `AccessDenied`, `NoSuchBucket`) when one was given.
    #[error("{message}")]
    Backend { message: String, code: Option<String> },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn backend(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Backend { message: message.into(), code }
    }

    /// Backend error code, if the underlying store reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend { code, .. } => code.as_deref(),
            Self::Io(_) => None,
        }
    }
}
