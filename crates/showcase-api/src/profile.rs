use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Serialize;
use uuid::Uuid;

use showcase_db::models::{HighlightRow, SectionItemRow, SectionRow, UserRow};
use showcase_media::lifecycle;
use showcase_types::api::{
    CreateProfileResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    ProfileSummary, UpdateProfileRequest, UrlResponse, UserPublic,
};

use crate::error::ApiError;
use crate::{AppState, auth, tenant, upload};

#[derive(Debug, Serialize)]
pub struct SectionView {
    #[serde(flatten)]
    pub section: SectionRow,
    pub items: Vec<SectionItemRow>,
}

/// The composed public profile: user + highlights + sections with nested
/// items. Read-only multi-query composition; a concurrent writer can produce
/// a slightly stale mix, which is acceptable for a display page.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserPublic,
    pub highlights: Vec<HighlightRow>,
    pub sections: Vec<SectionView>,
}

fn public_user(user: &UserRow) -> UserPublic {
    UserPublic {
        id: user.id,
        profile_id: user.profile_id.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        intro_text: user.intro_text.clone(),
        profile_picture: user.profile_picture.clone(),
        cover_image: user.cover_image.clone(),
        created_at: user.created_at.clone(),
    }
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let ok = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !ok {
        return Err(ApiError::BadRequest(
            "Username can only contain letters, numbers, and underscores".into(),
        ));
    }
    Ok(())
}

/// Opaque 12-character tenant key handed out at profile creation.
fn generate_profile_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn compose_profile(state: &AppState, user: UserRow) -> Result<ProfileResponse, ApiError> {
    let highlights = state.db.highlights_for_user(user.id)?;

    let mut sections = Vec::new();
    for section in state.db.sections_for_user(user.id)? {
        let items = state.db.items_for_section(section.id)?;
        sections.push(SectionView { section, items });
    }

    Ok(ProfileResponse {
        user: public_user(&user),
        highlights,
        sections,
    })
}

/// POST /api/profile/create
pub async fn create_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;

    let (Some(name), Some(username), Some(intro_text), Some(highlights)) = (
        form.text("name"),
        form.text("username"),
        form.text("intro_text"),
        form.text("highlights"),
    ) else {
        return Err(ApiError::BadRequest(
            "Name, username, intro text, and highlights are required".into(),
        ));
    };

    let security_code = form.text("securityCode").map(str::trim).unwrap_or("");
    if security_code.len() < 2 {
        return Err(ApiError::BadRequest(
            "Security code is required (min 2 characters)".into(),
        ));
    }

    validate_username(username)?;
    if state.db.username_taken(username, None)? {
        return Err(ApiError::BadRequest(
            "Username already taken. Please choose a different one.".into(),
        ));
    }

    let profile_id = generate_profile_id();
    let user_id = state.db.create_user(&profile_id, username, name, intro_text)?;

    if let Some(password) = form.text("password") {
        if password.len() >= 6 {
            state.db.set_password_hash(user_id, &auth::hash_secret(password)?)?;
        }
    }
    state
        .db
        .set_security_code_hash(user_id, &auth::hash_secret(security_code)?)?;

    if let Some(file) = form.file("profilePicture") {
        let stored = state
            .media
            .store(file.bytes.clone(), "profile-images", &file.filename)
            .await?;
        state.db.set_profile_picture(user_id, &stored.url)?;
    }
    if let Some(file) = form.file("coverImage") {
        let stored = state
            .media
            .store(file.bytes.clone(), "cover-images", &file.filename)
            .await?;
        state.db.set_cover_image(user_id, &stored.url)?;
    }

    for highlight in highlights.split(',') {
        let trimmed = highlight.trim();
        if !trimmed.is_empty() {
            state.db.add_highlight(user_id, trimmed)?;
        }
    }

    Ok(Json(CreateProfileResponse {
        message: "Profile created successfully".into(),
        profile_id,
        user_id,
    }))
}

/// POST /api/profile/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(username), Some(password)) = (
        req.username.as_deref().filter(|s| !s.is_empty()),
        req.password.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Username and password are required".into(),
        ));
    };

    let user = state
        .db
        .get_user_by_username(username)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let hash = user
        .password_hash
        .ok_or_else(|| ApiError::Unauthorized("Password not set for this account".into()))?;

    if !auth::verify_secret(password, &hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let token = auth::issue_token(&state.jwt_secret, user.id, &user.username)?;
    Ok(Json(LoginResponse { token }))
}

/// POST /api/profile/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(username), Some(security_code), Some(new_password), Some(confirm_password)) = (
        req.username.as_deref().filter(|s| !s.is_empty()),
        req.security_code.as_deref().filter(|s| !s.is_empty()),
        req.new_password.as_deref().filter(|s| !s.is_empty()),
        req.confirm_password.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Username, security code, new password, and confirm password are required".into(),
        ));
    };

    if new_password != confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".into()));
    }
    if new_password.len() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".into(),
        ));
    }

    let user = state
        .db
        .get_user_by_username(username)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let code_hash = user
        .security_code_hash
        .ok_or_else(|| ApiError::BadRequest("Security code not set for this account".into()))?;

    if !auth::verify_secret(security_code, &code_hash) {
        return Err(ApiError::Unauthorized("Invalid security code".into()));
    }

    state
        .db
        .set_password_hash_for_username(username, &auth::hash_secret(new_password)?)?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".into(),
    }))
}

/// GET /api/profile/{profile_id}
pub async fn profile_by_id(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_profile_id(&profile_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(compose_profile(&state, user)?))
}

/// GET /api/profile/username/{username}
pub async fn profile_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_username(&username)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(ProfileSummary {
        profile_id: user.profile_id,
        username: user.username,
        name: user.name,
    }))
}

/// GET /api/profile — the one bearer-authenticated endpoint.
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let claims = auth::require_claims(&headers, &state.jwt_secret)?;

    let user = state
        .db
        .get_user_by_id(claims.sub)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(compose_profile(&state, user)?))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = tenant::resolve(&state, req.profile_id.as_deref())?;

    if let Some(username) = req.username.as_deref() {
        validate_username(username)?;
        if state.db.username_taken(username, Some(user_id))? {
            return Err(ApiError::BadRequest(
                "Username already taken. Please choose a different one.".into(),
            ));
        }
    }

    state.db.update_user_fields(
        user_id,
        req.name.as_deref(),
        req.username.as_deref(),
        req.intro_text.as_deref(),
    )?;

    if let Some(highlights) = &req.highlights {
        state.db.replace_highlights(user_id, highlights)?;
    }

    Ok(Json(MessageResponse {
        message: "Profile updated successfully".into(),
    }))
}

/// POST /api/profile/picture
pub async fn update_picture(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;
    let user_id = tenant::resolve(&state, form.text("profileId"))?;

    let file = form
        .file("profilePicture")
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;

    if let Some(old) = state.db.current_profile_picture(user_id)? {
        lifecycle::discard(state.media.as_ref(), &old).await;
    }

    let stored = state
        .media
        .store(file.bytes.clone(), "profile-images", &file.filename)
        .await?;
    state.db.set_profile_picture(user_id, &stored.url)?;

    Ok(Json(UrlResponse {
        message: "Profile picture updated successfully".into(),
        url: stored.url,
    }))
}

/// POST /api/profile/cover
pub async fn update_cover(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = upload::read_form(&mut multipart, state.max_file_size).await?;
    let user_id = tenant::resolve(&state, form.text("profileId"))?;

    let file = form
        .file("coverImage")
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;

    if let Some(old) = state.db.current_cover_image(user_id)? {
        lifecycle::discard(state.media.as_ref(), &old).await;
    }

    let stored = state
        .media
        .store(file.bytes.clone(), "cover-images", &file.filename)
        .await?;
    state.db.set_cover_image(user_id, &stored.url)?;

    Ok(Json(UrlResponse {
        message: "Cover image updated successfully".into(),
        url: stored.url,
    }))
}
