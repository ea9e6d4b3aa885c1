//! Best-effort removal of replaced or orphaned assets.
//!
//! Every delete against the media host is fire-and-forget from the caller's
//! perspective: failures are logged for operators and never abort the
//! surrounding request or block the database mutation. A stale remote blob is
//! a lesser cost than failing legitimate CRUD on a third-party outage.

use tracing::warn;

use crate::MediaStore;
use crate::attachment::{parse_field, public_id_from_url};

/// Delete the asset behind a single stored URL, if it looks like one of ours.
///
/// Legacy rows may hold bundled default filenames (`user.png`) or other
/// non-hosted values; those are skipped.
pub async fn discard(store: &dyn MediaStore, url: &str) {
    if !url.starts_with("http") {
        return;
    }
    let Some(public_id) = public_id_from_url(url) else {
        return;
    };
    if let Err(e) = store.delete(&public_id).await {
        warn!("Media delete failed for {}: {}", public_id, e);
    }
}

/// Delete every asset referenced by a persisted `(file_path, file_type)`
/// pair: a JSON array, a legacy single URL, or nothing.
pub async fn discard_field(
    store: &dyn MediaStore,
    file_path: Option<&str>,
    file_type: Option<&str>,
) {
    for entry in parse_field(file_path, file_type) {
        discard(store, &entry.path).await;
    }
}
