pub mod auth;
pub mod content;
pub mod error;
pub mod memories;
pub mod profile;
pub mod sections;
pub mod tenant;
pub mod upload;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

use showcase_db::Database;
use showcase_media::MediaStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub media: Arc<dyn MediaStore>,
    pub jwt_secret: String,
    /// Legacy compatibility mode: the tenant id used when a request carries
    /// no (or an unknown) profile id. `None` disables the fallback and turns
    /// those cases into 404s.
    pub legacy_tenant: Option<i64>,
    /// Per-file upload cap in bytes.
    pub max_file_size: usize,
}

pub fn router(state: AppState) -> Router {
    // Section items accept up to 10 files per request, plus form fields.
    let body_limit = state.max_file_size * upload::MAX_FILES_PER_REQUEST + 1024 * 1024;

    Router::new()
        .route("/api/profile/create", post(profile::create_profile))
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/profile/picture", post(profile::update_picture))
        .route("/api/profile/cover", post(profile::update_cover))
        .route("/api/profile/login", post(profile::login))
        .route("/api/profile/forgot-password", post(profile::forgot_password))
        .route(
            "/api/profile/username/{username}",
            get(profile::profile_by_username),
        )
        .route("/api/profile/{profile_id}", get(profile::profile_by_id))
        .route("/api/content/{category}", post(content::add_item))
        .route(
            "/api/content/{category}/{id}",
            put(content::update_item).delete(content::delete_item),
        )
        .route("/api/sections/section", post(sections::create_section))
        .route("/api/sections/sections", get(sections::get_sections))
        .route(
            "/api/sections/section/{id}",
            put(sections::update_section).delete(sections::delete_section),
        )
        .route("/api/sections/section/item", post(sections::add_item))
        .route("/api/sections/section/items", get(sections::get_items))
        .route(
            "/api/sections/section/item/{id}",
            put(sections::update_item).delete(sections::delete_item),
        )
        .route("/api/memories", get(memories::list).post(memories::upload))
        .route("/api/memories/{id}", delete(memories::delete))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
