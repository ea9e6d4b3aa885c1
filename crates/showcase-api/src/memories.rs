use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use showcase_media::attachment::MediaKind;
use showcase_media::lifecycle;
use showcase_types::api::MessageResponse;

use crate::error::ApiError;
use crate::{AppState, tenant, upload};

#[derive(Debug, Deserialize)]
pub struct MemoryQuery {
    #[serde(rename = "profileId")]
    profile_id: Option<String>,
}

/// GET /api/memories — newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MemoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = tenant::resolve(&state, query.profile_id.as_deref())?;
    let memories = state.db.memories_for_user(user_id)?;
    Ok(Json(json!({ "memories": memories })))
}

/// POST /api/memories (multipart, single `memory` file + `caption`)
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;
    let user_id = tenant::resolve(&state, form.text("profileId"))?;

    let file = form
        .file("memory")
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;

    let kind = MediaKind::memory_kind(&file.content_type);
    let stored = state
        .media
        .store(file.bytes.clone(), "memory-files", &file.filename)
        .await?;

    let id = state.db.insert_memory(
        user_id,
        &stored.url,
        kind.as_str(),
        &file.filename,
        form.text("caption").unwrap_or(""),
    )?;

    Ok(Json(json!({
        "message": "Memory uploaded successfully",
        "id": id,
        "file_path": stored.url,
        "file_type": kind.as_str(),
    })))
}

/// DELETE /api/memories/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(memory_id): Path<i64>,
    Query(query): Query<MemoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = tenant::resolve(&state, query.profile_id.as_deref())?;

    let memory = state
        .db
        .get_memory(memory_id, user_id)?
        .ok_or_else(|| ApiError::NotFound("Memory not found".into()))?;

    lifecycle::discard(state.media.as_ref(), &memory.file_path).await;
    state.db.delete_memory(memory_id, user_id)?;

    Ok(Json(MessageResponse {
        message: "Memory deleted successfully".into(),
    }))
}
