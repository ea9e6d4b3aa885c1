//! The section/item catalog: user-defined named sections holding ordered
//! items, each item carrying zero, one, or many media attachments.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use showcase_media::attachment::{AttachmentRef, MULTIPLE, MediaKind, encode_list};
use showcase_media::lifecycle;
use showcase_types::api::{
    CreateSectionRequest, MessageResponse, SectionCreated, UpdateSectionRequest,
};

use crate::error::ApiError;
use crate::{AppState, tenant, upload};

#[derive(Debug, Deserialize)]
pub struct SectionListQuery {
    #[serde(rename = "profileId")]
    profile_id: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    #[serde(rename = "sectionId")]
    section_id: i64,
}

/// POST /api/sections/section
pub async fn create_section(
    State(state): State<AppState>,
    Json(req): Json<CreateSectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = tenant::resolve_or_user(&state, req.profile_id.as_deref(), req.user_id)?;

    let id = state
        .db
        .create_section(user_id, &req.name, req.icon.as_deref())?;

    Ok(Json(SectionCreated {
        id,
        name: req.name,
        icon: req.icon,
    }))
}

/// GET /api/sections/sections
pub async fn get_sections(
    State(state): State<AppState>,
    Query(query): Query<SectionListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = tenant::resolve_or_user(&state, query.profile_id.as_deref(), query.user_id)?;
    let sections = state.db.sections_for_user(user_id)?;
    Ok(Json(json!({ "sections": sections })))
}

/// PUT /api/sections/section/{id} — scoped to the owning user; a mismatch is
/// a 404, not a silent no-op.
pub async fn update_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
    Json(req): Json<UpdateSectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = tenant::resolve(&state, req.profile_id.as_deref())?;

    let updated = state
        .db
        .update_section(section_id, user_id, &req.name, req.icon.as_deref())?;
    if updated == 0 {
        return Err(ApiError::NotFound("Section not found".into()));
    }

    Ok(Json(MessageResponse {
        message: "Section updated successfully".into(),
    }))
}

/// DELETE /api/sections/section/{id}
///
/// The cascade is enforced here, not by the store: every item's attachments
/// are discarded from the media host, then the items, then the section.
pub async fn delete_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.section_exists(section_id)? {
        return Err(ApiError::NotFound("Section not found".into()));
    }

    for item in state.db.items_for_section(section_id)? {
        lifecycle::discard_field(
            state.media.as_ref(),
            item.file_path.as_deref(),
            item.file_type.as_deref(),
        )
        .await;
    }
    state.db.delete_items_for_section(section_id)?;
    state.db.delete_section(section_id)?;

    Ok(Json(MessageResponse {
        message: "Section deleted".into(),
    }))
}

/// POST /api/sections/section/item (multipart, `files` up to 10)
pub async fn add_item(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;

    let section_id: i64 = form
        .text("sectionId")
        .ok_or_else(|| ApiError::BadRequest("sectionId is required".into()))?
        .parse()
        .map_err(|_| ApiError::BadRequest("sectionId must be a number".into()))?;

    if !state.db.section_exists(section_id)? {
        return Err(ApiError::NotFound("Section not found".into()));
    }

    let title = form.text("title");
    let icon = form.text("icon");
    let description = form.text("description");

    let uploads = form.files("files");
    let field = match uploads.len() {
        0 => None,
        1 => {
            let file = uploads[0];
            let stored = state
                .media
                .store(file.bytes.clone(), "content-files", &file.filename)
                .await?;
            Some((stored.url, MediaKind::from_mime(&file.content_type).as_str().to_string()))
        }
        _ => {
            let mut refs = Vec::with_capacity(uploads.len());
            for file in uploads {
                let stored = state
                    .media
                    .store(file.bytes.clone(), "content-files", &file.filename)
                    .await?;
                refs.push(AttachmentRef::new(
                    stored.url,
                    MediaKind::from_mime(&file.content_type).as_str(),
                ));
            }
            Some((encode_list(&refs)?, MULTIPLE.to_string()))
        }
    };

    let file = field.as_ref().map(|(path, kind)| (path.as_str(), kind.as_str()));
    let id = state
        .db
        .insert_section_item(section_id, title, icon, description, file)?;

    let (file_path, file_type) = match &field {
        Some((path, kind)) => (Some(path.as_str()), Some(kind.as_str())),
        None => (None, None),
    };
    Ok(Json(json!({
        "id": id,
        "title": title,
        "icon": icon,
        "file_path": file_path,
        "file_type": file_type,
        "description": description,
    })))
}

/// GET /api/sections/section/items
pub async fn get_items(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.db.items_for_section(query.section_id)?;
    Ok(Json(json!({ "items": items })))
}

/// PUT /api/sections/section/item/{id}
///
/// The client sends the `{path, type}` entries to keep as `existingFiles`;
/// new uploads are appended after them, and the result is persisted as a
/// JSON list with `file_type = multiple`. Entries dropped from the keep list
/// are not deleted from the media host.
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;

    let title = form.text("title");
    let icon = form.text("icon");
    let description = form.text("description");

    let mut refs: Vec<AttachmentRef> = match form.text("existingFiles") {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            warn!("Unparseable existingFiles on item {}: {}", item_id, e);
            Vec::new()
        }),
        None => Vec::new(),
    };

    for file in form.files("files") {
        let stored = state
            .media
            .store(file.bytes.clone(), "content-files", &file.filename)
            .await?;
        refs.push(AttachmentRef::new(
            stored.url,
            MediaKind::from_mime(&file.content_type).as_str(),
        ));
    }

    let encoded;
    let file = if refs.is_empty() {
        None
    } else {
        encoded = encode_list(&refs)?;
        Some((encoded.as_str(), MULTIPLE))
    };

    let updated = state
        .db
        .update_section_item(item_id, title, icon, description, file)?;
    if updated == 0 {
        return Err(ApiError::NotFound("Item not found".into()));
    }

    Ok(Json(MessageResponse {
        message: "Item updated successfully".into(),
    }))
}

/// DELETE /api/sections/section/item/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .db
        .get_section_item(item_id)?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    lifecycle::discard_field(
        state.media.as_ref(),
        item.file_path.as_deref(),
        item.file_type.as_deref(),
    )
    .await;
    state.db.delete_section_item(item_id)?;

    Ok(Json(MessageResponse {
        message: "Item deleted".into(),
    }))
}
