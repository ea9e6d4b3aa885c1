//! Encoding of the `(file_path, file_type)` field pair.
//!
//! One attachment is stored as a bare URL with a concrete kind; several are
//! stored as a JSON array of `{path, type}` records with the sentinel kind
//! `multiple`. Readers must tolerate legacy rows holding a bare URL.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// `file_type` value marking a JSON-encoded attachment list.
pub const MULTIPLE: &str = "multiple";

/// Concrete media kinds for a single attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Document,
    Apk,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Apk => "apk",
        }
    }

    /// Kind for general content uploads.
    pub fn from_mime(mime: &str) -> MediaKind {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("video/") {
            MediaKind::Video
        } else if mime == "application/vnd.android.package-archive" {
            MediaKind::Apk
        } else {
            MediaKind::Document
        }
    }

    /// Memories only distinguish images from videos.
    pub fn memory_kind(mime: &str) -> MediaKind {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

/// One entry of a multi-attachment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AttachmentRef {
    pub fn new(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }
}

/// Serialize an attachment list for the `file_path` column.
pub fn encode_list(refs: &[AttachmentRef]) -> Result<String> {
    Ok(serde_json::to_string(refs)?)
}

/// Decode a persisted `file_path` value into attachment entries.
///
/// Accepts null (no attachments), a JSON array, or a legacy bare URL whose
/// kind comes from `file_type`.
pub fn parse_field(file_path: Option<&str>, file_type: Option<&str>) -> Vec<AttachmentRef> {
    let Some(raw) = file_path else {
        return Vec::new();
    };
    if raw.is_empty() {
        return Vec::new();
    }

    if let Ok(refs) = serde_json::from_str::<Vec<AttachmentRef>>(raw) {
        return refs;
    }

    vec![AttachmentRef::new(
        raw,
        file_type.filter(|t| *t != MULTIPLE).unwrap_or("file"),
    )]
}

/// Rebuild the host-side identifier from a stored URL.
///
/// The host encodes the storage folder and opaque name as the last two path
/// segments (`.../<folder>/<name>.<ext>`); the identifier is
/// `<folder>/<name>` with the extension stripped at the first dot. This must
/// match the delete endpoint's expectations exactly.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let mut segments = url.rsplit('/');
    let filename = segments.next()?;
    let folder = segments.next()?;
    if folder.is_empty() || filename.is_empty() {
        return None;
    }
    let name = filename.split('.').next()?;
    if name.is_empty() {
        return None;
    }
    Some(format!("{}/{}", folder, name))
}
