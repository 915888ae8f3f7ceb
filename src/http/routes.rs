//! Axum route handlers for the notes JSON API.

use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

use super::error::ApiError;
use crate::entity::{CategoryCount, Note, NotePayload};
use crate::storage::NoteStore;

/// Shared server state.
///
/// The mutex serializes each request's read-modify-write of the backing file.
pub struct AppState {
    pub store: Mutex<NoteStore>,
}

impl AppState {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

/// Run `f` against the store on the blocking pool; store operations do
/// synchronous file I/O.
async fn with_store<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&NoteStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let store = state.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Storage {
        message: format!("store task failed: {}", e),
    })?
}

/// Parse a create/patch body. An empty body or `null` is an empty payload;
/// anything other than a JSON object is rejected.
fn parse_payload(body: &[u8]) -> Result<NotePayload, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NotePayload::default());
    }

    let value: Value = serde_json::from_slice(body)?;
    if value.is_null() {
        return Ok(NotePayload::default());
    }
    if !value.is_object() {
        return Err(ApiError::InvalidPayload {
            reason: format!("expected a JSON object, got {}", value),
        });
    }
    Ok(serde_json::from_value(value)?)
}

// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// GET /api/notes
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = with_store(state, |store| Ok(store.list_notes())).await?;
    Ok(Json(notes))
}

// POST /api/notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let payload = parse_payload(&body)?;
    let note = with_store(state, move |store| store.create_note(payload)).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

// GET /api/categories
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let counts = with_store(state, |store| Ok(store.category_counts())).await?;
    Ok(Json(counts))
}

// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    let note = with_store(state, move |store| store.get_note(id)).await?;
    Ok(Json(note))
}

// PATCH /api/notes/{id}
pub async fn patch_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Note>, ApiError> {
    let payload = parse_payload(&body)?;
    let note = with_store(state, move |store| store.patch_note(id, payload)).await?;
    Ok(Json(note))
}

// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = with_store(state, move |store| store.delete_note(id)).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
