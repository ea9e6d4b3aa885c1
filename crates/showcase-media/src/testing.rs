//! In-memory [`MediaStore`] fake for tests and local development.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;
use bytes::Bytes;

use crate::{MediaStore, StoredMedia};

/// Records every store/delete call and hands out URLs shaped like the real
/// host's (`https://cdn.test/<folder>/<name>.<ext>`), so public-id
/// extraction round-trips.
#[derive(Default)]
pub struct RecordingStore {
    stored: Mutex<Vec<StoredMedia>>,
    deleted: Mutex<Vec<String>>,
    delete_attempts: AtomicUsize,
    seq: AtomicUsize,
    fail: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose delete endpoint always errors, for exercising the
    /// best-effort cleanup path.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<StoredMedia> {
        self.stored.lock().unwrap().clone()
    }

    pub fn store_count(&self) -> usize {
        self.stored.lock().unwrap().len()
    }

    /// Public ids successfully deleted, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaStore for RecordingStore {
    async fn store(&self, _bytes: Bytes, folder: &str, filename: &str) -> Result<StoredMedia> {
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        let ext = filename.rsplit('.').next().unwrap_or("bin");
        let media = StoredMedia {
            url: format!("https://cdn.test/{}/mock{}.{}", folder, n, ext),
            public_id: format!("{}/mock{}", folder, n),
        };
        self.stored.lock().unwrap().push(media.clone());
        Ok(media)
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("simulated media host outage");
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}
