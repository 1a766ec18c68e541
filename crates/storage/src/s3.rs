//! S3 backend built on aws-sdk-s3. Works against AWS or any S3-compatible
//! store (MinIO etc.) via a custom endpoint.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::errors::StorageError;
use crate::ObjectStore;

pub struct S3Backend {
    client: Client,
    bucket: String,
}

impl S3Backend {
    /// Build a client from the default credential chain. `endpoint`
    /// overrides the AWS endpoint for S3-compatible stores.
    pub async fn new(bucket: impl Into<String>, endpoint: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(url) = endpoint {
            loader = loader.endpoint_url(url);
        }
        let conf = loader.load().await;
        Self { client: Client::new(&conf), bucket: bucket.into() }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Carry the backend's error code and message through to the caller;
/// the HTTP layer turns the code into a remediation hint.
fn sdk_err<E>(err: SdkError<E>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err.code().map(str::to_string);
    let message = match err.message() {
        Some(m) => m.to_string(),
        None => format!("{}", DisplayErrorContext(&err)),
    };
    StorageError::backend(message, code)
}

#[async_trait]
impl ObjectStore for S3Backend {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let resp = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;
        match resp {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) => {
                Ok(false)
            }
            Err(e) => Err(sdk_err(e)),
        }
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(sdk_err)?;
        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::backend(format!("read object body: {e}"), None))?;
        let bytes = body.into_bytes().to_vec();
        debug!(%key, bytes = bytes.len(), "downloaded object");
        Ok(bytes)
    }

    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .cache_control(cache_control)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(sdk_err)?;
        debug!(%key, bytes = data.len(), "uploaded object");
        Ok(())
    }
}
