use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims issued at login and checked on the authenticated profile read.
/// Canonical definition lives here in showcase-types so the API middleware
/// and any future consumers share one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

/// Fields are optional so absent ones can be reported as a 400 with a
/// proper message instead of a bare deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub username: Option<String>,
    #[serde(rename = "securityCode")]
    pub security_code: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

// -- Profile --

/// Public view of a user row. Credential hashes never leave the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: i64,
    pub profile_id: String,
    pub username: String,
    pub name: String,
    pub intro_text: String,
    pub profile_picture: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CreateProfileResponse {
    pub message: String,
    #[serde(rename = "profileId")]
    pub profile_id: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub intro_text: Option<String>,
    pub highlights: Option<Vec<String>>,
    #[serde(rename = "profileId")]
    pub profile_id: Option<String>,
}

/// Lightweight lookup result for `GET /api/profile/username/{username}`.
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    #[serde(rename = "profileId")]
    pub profile_id: String,
    pub username: String,
    pub name: String,
}

// -- Sections --

#[derive(Debug, Deserialize)]
pub struct CreateSectionRequest {
    pub name: String,
    pub icon: Option<String>,
    #[serde(rename = "profileId")]
    pub profile_id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SectionCreated {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSectionRequest {
    pub name: String,
    pub icon: Option<String>,
    #[serde(rename = "profileId")]
    pub profile_id: Option<String>,
}

// -- Generic envelopes --

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub message: String,
    pub url: String,
}
