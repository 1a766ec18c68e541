use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use storage::StorageError;
use tracing::error;

use crate::state::AppState;

/// Request-boundary error type. Every failure a handler can hit becomes
/// one of these and is converted to a JSON response; nothing propagates
/// past the router.
#[derive(Debug)]
pub enum ApiError {
    /// Slot name failed validation; rejected before any storage access.
    InvalidSlot,
    /// The storage backend (or JSON parse of stored bytes) failed.
    Backend {
        error: &'static str,
        details: String,
        code: Option<String>,
        bucket: String,
    },
}

impl ApiError {
    pub fn load(err: StorageError, state: &AppState) -> Self {
        Self::from_storage("Failed to load data", err, state)
    }

    pub fn save(err: StorageError, state: &AppState) -> Self {
        Self::from_storage("Failed to save data", err, state)
    }

    /// Stored bytes that are not valid JSON count as a backend error:
    /// the object is corrupt, not the request.
    pub fn load_parse(err: serde_json::Error, state: &AppState) -> Self {
        Self::Backend {
            error: "Failed to load data",
            details: format!("stored object is not valid JSON: {err}"),
            code: None,
            bucket: state.bucket.clone(),
        }
    }

    pub fn save_encode(err: serde_json::Error, state: &AppState) -> Self {
        Self::Backend {
            error: "Failed to save data",
            details: err.to_string(),
            code: None,
            bucket: state.bucket.clone(),
        }
    }

    fn from_storage(op: &'static str, err: StorageError, state: &AppState) -> Self {
        Self::Backend {
            error: op,
            details: err.to_string(),
            code: err.code().map(str::to_string),
            bucket: state.bucket.clone(),
        }
    }
}

/// Remediation hint for well-known backend error codes.
fn hint_for(code: &str) -> Option<&'static str> {
    match code {
        "AccessDenied" | "Forbidden" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" => {
            Some("check that the configured credentials grant read/write access to the bucket")
        }
        "NoSuchBucket" | "NotFound" => {
            Some("the configured bucket does not exist; create it or fix BUCKET_NAME")
        }
        _ => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidSlot => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid slot name"})),
            )
                .into_response(),
            ApiError::Backend { error: op, details, code, bucket } => {
                error!(error = %op, %details, code = code.as_deref().unwrap_or("-"), %bucket, "backend error");
                let mut body = serde_json::json!({
                    "error": op,
                    "details": details,
                    "bucket": bucket,
                });
                if let Some(code) = code {
                    if let Some(hint) = hint_for(&code) {
                        body["hint"] = hint.into();
                    }
                    body["code"] = code.into();
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_cover_known_codes() {
        assert!(hint_for("AccessDenied").unwrap().contains("credentials"));
        assert!(hint_for("NoSuchBucket").unwrap().contains("bucket"));
        assert!(hint_for("SlowDown").is_none());
    }

    #[test]
    fn invalid_slot_is_bad_request() {
        let resp = ApiError::InvalidSlot.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn backend_error_is_internal() {
        let resp = ApiError::Backend {
            error: "Failed to load data",
            details: "boom".into(),
            code: Some("AccessDenied".into()),
            bucket: "b".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
