//! Fixed-category content: hobbies, projects, skills, certificates,
//! achievements, adventures. One generic handler set over the shared
//! `content_items` table, parameterized by the category path segment.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use showcase_media::attachment::MediaKind;
use showcase_media::lifecycle;
use showcase_types::api::{IdResponse, MessageResponse};

use crate::error::ApiError;
use crate::{AppState, tenant, upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Hobby,
    Project,
    Skill,
    Certificate,
    Achievement,
    Adventure,
}

impl Category {
    fn from_path(segment: &str) -> Option<Category> {
        match segment {
            "hobbies" => Some(Category::Hobby),
            "projects" => Some(Category::Project),
            "skills" => Some(Category::Skill),
            "certificates" => Some(Category::Certificate),
            "achievements" => Some(Category::Achievement),
            "adventures" => Some(Category::Adventure),
            _ => None,
        }
    }

    /// Category tag stored in the `category` column.
    fn key(&self) -> &'static str {
        match self {
            Category::Hobby => "hobby",
            Category::Project => "project",
            Category::Skill => "skill",
            Category::Certificate => "certificate",
            Category::Achievement => "achievement",
            Category::Adventure => "adventure",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Category::Hobby => "Hobby",
            Category::Project => "Project",
            Category::Skill => "Skill",
            Category::Certificate => "Certificate",
            Category::Achievement => "Achievement",
            Category::Adventure => "Adventure",
        }
    }

    fn default_icon(&self) -> Option<&'static str> {
        match self {
            Category::Hobby => Some("fa-solid fa-heart"),
            Category::Project => None,
            Category::Skill => Some("fa-solid fa-star"),
            Category::Certificate => Some("fa-solid fa-certificate"),
            Category::Achievement => Some("fa-solid fa-trophy"),
            Category::Adventure => Some("fa-solid fa-hiking"),
        }
    }

    fn default_color(&self) -> Option<&'static str> {
        match self {
            Category::Skill => Some("cyan-custom"),
            _ => None,
        }
    }
}

fn parse_category(segment: &str) -> Result<Category, ApiError> {
    Category::from_path(segment)
        .ok_or_else(|| ApiError::NotFound("Unknown content category".into()))
}

#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    #[serde(rename = "profileId")]
    profile_id: Option<String>,
}

/// POST /api/content/{category}
pub async fn add_item(
    State(state): State<AppState>,
    Path(category): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let category = parse_category(&category)?;
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;
    let user_id = tenant::resolve(&state, form.text("profileId"))?;

    // Skills call their label a name; everything else a title.
    let title = form.text("title").or_else(|| form.text("name"));
    let icon = form.text("icon").or(category.default_icon());
    let color = form.text("color").or(category.default_color());
    let description = form.text("description");

    let stored = match form.file("file") {
        Some(file) => Some((
            state
                .media
                .store(file.bytes.clone(), "content-files", &file.filename)
                .await?,
            MediaKind::from_mime(&file.content_type),
        )),
        None => None,
    };
    let file = stored
        .as_ref()
        .map(|(media, kind)| (media.url.as_str(), kind.as_str()));

    let id = state.db.insert_content_item(
        user_id,
        category.key(),
        title,
        icon,
        color,
        description,
        file,
    )?;

    Ok(Json(IdResponse {
        message: format!("{} added successfully", category.label()),
        id,
    }))
}

/// PUT /api/content/{category}/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, i64)>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let category = parse_category(&category)?;
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;
    let user_id = tenant::resolve(&state, form.text("profileId"))?;

    let title = form.text("title").or_else(|| form.text("name"));
    let icon = form.text("icon");
    let color = form.text("color");
    let description = form.text("description");

    // A new upload replaces the old asset: the prior blob is discarded
    // best-effort before the new URL is persisted. Without a new file the
    // attachment pair is left untouched and no media calls happen.
    let stored = match form.file("file") {
        Some(file) => {
            let old = state
                .db
                .get_content_item(id, category.key(), user_id)?
                .ok_or_else(|| ApiError::NotFound(format!("{} not found", category.label())))?;
            lifecycle::discard_field(
                state.media.as_ref(),
                old.file_path.as_deref(),
                old.file_type.as_deref(),
            )
            .await;

            Some((
                state
                    .media
                    .store(file.bytes.clone(), "content-files", &file.filename)
                    .await?,
                MediaKind::from_mime(&file.content_type),
            ))
        }
        None => None,
    };
    let file = stored
        .as_ref()
        .map(|(media, kind)| (media.url.as_str(), kind.as_str()));

    let updated = state.db.update_content_item(
        id,
        category.key(),
        user_id,
        title,
        icon,
        color,
        description,
        file,
    )?;
    if updated == 0 {
        return Err(ApiError::NotFound(format!("{} not found", category.label())));
    }

    Ok(Json(MessageResponse {
        message: format!("{} updated successfully", category.label()),
    }))
}

/// DELETE /api/content/{category}/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, i64)>,
    Query(query): Query<TenantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let category = parse_category(&category)?;
    let user_id = tenant::resolve(&state, query.profile_id.as_deref())?;

    let row = state
        .db
        .get_content_item(id, category.key(), user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", category.label())))?;

    lifecycle::discard_field(
        state.media.as_ref(),
        row.file_path.as_deref(),
        row.file_type.as_deref(),
    )
    .await;
    state.db.delete_content_item(id, category.key(), user_id)?;

    Ok(Json(MessageResponse {
        message: format!("{} deleted successfully", category.label()),
    }))
}
