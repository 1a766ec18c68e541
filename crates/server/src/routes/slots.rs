//! The two slot endpoints: load and save one JSON document per slot.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::state::AppState;

pub const DEFAULT_SLOT: &str = "slot1";

const DOCUMENT_CONTENT_TYPE: &str = "application/json";
const DOCUMENT_CACHE_CONTROL: &str = "no-cache";

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub slot: Option<String>,
}

/// Accepts `slot<digits>` only; everything else is rejected before any
/// storage access. Missing means `slot1`.
fn validate_slot(raw: Option<String>) -> Result<String, ApiError> {
    let slot = raw.unwrap_or_else(|| DEFAULT_SLOT.to_string());
    match slot.strip_prefix("slot") {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(slot)
        }
        _ => Err(ApiError::InvalidSlot),
    }
}

fn object_key(slot: &str) -> String {
    format!("data_{slot}.json")
}

/// What a never-saved slot loads as.
fn empty_document() -> Value {
    json!({ "layers": [], "controlBoxes": [] })
}

/// `GET /load?slot=<slotN>` — return the stored document, or the canonical
/// empty document if the slot has never been saved.
pub async fn load(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, ApiError> {
    let slot = validate_slot(query.slot)?;
    let key = object_key(&slot);
    debug!(%slot, %key, "loading slot document");

    let exists = state
        .store
        .exists(&key)
        .await
        .map_err(|e| ApiError::load(e, &state))?;
    if !exists {
        return Ok(Json(empty_document()));
    }

    let bytes = state
        .store
        .download(&key)
        .await
        .map_err(|e| ApiError::load(e, &state))?;
    let document: Value =
        serde_json::from_slice(&bytes).map_err(|e| ApiError::load_parse(e, &state))?;
    Ok(Json(document))
}

/// `POST /save?slot=<slotN>` — replace the slot's document wholesale with
/// the request body. The body is any JSON value; no schema is enforced.
pub async fn save(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
    Json(document): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let slot = validate_slot(query.slot)?;
    let key = object_key(&slot);

    let body = serde_json::to_vec(&document).map_err(|e| ApiError::save_encode(e, &state))?;
    state
        .store
        .upload(&key, &body, DOCUMENT_CONTENT_TYPE, DOCUMENT_CACHE_CONTROL)
        .await
        .map_err(|e| ApiError::save(e, &state))?;
    info!(%slot, %key, bytes = body.len(), "saved slot document");

    Ok(Json(json!({
        "success": true,
        "slot": slot,
        "key": key,
        "bytes": body.len(),
    })))
}
