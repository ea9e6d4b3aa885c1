//! Database row types — these map directly to SQLite rows.
//! The list-shaped rows serialize straight into response bodies; `UserRow`
//! does not, because it carries credential hashes (see
//! `showcase_types::api::UserPublic`).

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub profile_id: String,
    pub username: String,
    pub name: String,
    pub intro_text: String,
    pub profile_picture: Option<String>,
    pub cover_image: Option<String>,
    pub password_hash: Option<String>,
    pub security_code_hash: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HighlightRow {
    pub id: i64,
    pub user_id: i64,
    pub highlight_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub section_order: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionItemRow {
    pub id: i64,
    pub section_id: i64,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryRow {
    pub id: i64,
    pub user_id: i64,
    pub file_path: String,
    pub file_type: String,
    pub original_name: Option<String>,
    pub caption: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentItemRow {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub created_at: String,
}
