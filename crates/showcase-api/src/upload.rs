//! Multipart intake: collects text fields and file parts, enforcing the
//! upload allow-list and size limits before anything touches the media host.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::ApiError;

/// Section items accept at most this many files per request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "mp4", "mov", "avi", "pdf", "doc", "docx", "txt", "apk",
];

pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl FormData {
    /// Non-empty text field value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }

    pub fn files(&self, field: &str) -> Vec<&UploadedFile> {
        self.files.iter().filter(|f| f.field == field).collect()
    }
}

pub async fn read_form(
    multipart: &mut Multipart,
    max_file_size: usize,
) -> Result<FormData, ApiError> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(filename) => {
                if files.len() >= MAX_FILES_PER_REQUEST {
                    return Err(ApiError::BadRequest(
                        "Too many files! Please select fewer files.".into(),
                    ));
                }
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read upload: {}", e))
                })?;
                validate_file(&filename, bytes.len(), max_file_size)?;
                files.push(UploadedFile {
                    field: name,
                    filename,
                    content_type,
                    bytes,
                });
            }
            None => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read field: {}", e))
                })?;
                fields.insert(name, value);
            }
        }
    }

    Ok(FormData { fields, files })
}

fn validate_file(filename: &str, size: usize, max_file_size: usize) -> Result<(), ApiError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::BadRequest(
            "Only images, videos, APK files, and documents are allowed!".into(),
        ));
    }
    if size > max_file_size {
        return Err(ApiError::BadRequest(
            "File too large! Maximum file size is 10MB.".into(),
        ));
    }
    Ok(())
}
