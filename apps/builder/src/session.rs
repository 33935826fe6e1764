//! The single resume session: owns the document and persists every change.
//!
//! All mutations go through one lock, and the save happens while the lock is
//! held, so stored snapshots are written in the order the edits were applied.

use std::convert::Infallible;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::edits::{apply_edit, Edit, EditError};
use crate::export::{import_json, ExportFlag, ExportGuard};
use crate::models::{default_resume, ResumeDocument};
use crate::normalize::{clean, coerce};
use crate::storage::{load_document, save_document, KvStore};

pub struct ResumeSession {
    document: Mutex<ResumeDocument>,
    store: Arc<dyn KvStore>,
    exports: ExportFlag,
}

impl ResumeSession {
    /// Loads the stored document (or the cleaned default).
    pub async fn open(store: Arc<dyn KvStore>) -> Self {
        let document = load_document(store.as_ref()).await;
        info!(
            "Resume loaded: theme={}, {} experience, {} education, {} project(s)",
            document.theme.key(),
            document.experience.len(),
            document.education.len(),
            document.projects.len()
        );
        Self {
            document: Mutex::new(document),
            store,
            exports: ExportFlag::default(),
        }
    }

    pub async fn snapshot(&self) -> ResumeDocument {
        self.document.lock().await.clone()
    }

    /// Replaces the document wholesale and persists it.
    pub async fn replace(&self, doc: ResumeDocument) -> ResumeDocument {
        let mut current = self.document.lock().await;
        *current = doc;
        self.persist(&current).await;
        current.clone()
    }

    /// Runs `f` on the current document; on success the result replaces it.
    /// On error nothing changes and nothing is written.
    pub async fn update<F, E>(&self, f: F) -> Result<ResumeDocument, E>
    where
        F: FnOnce(&ResumeDocument) -> Result<ResumeDocument, E>,
    {
        let mut current = self.document.lock().await;
        let next = f(&current)?;
        *current = next;
        self.persist(&current).await;
        Ok(current.clone())
    }

    pub async fn apply_edit(&self, edit: &Edit) -> Result<ResumeDocument, EditError> {
        self.update(|doc| apply_edit(doc, edit)).await
    }

    /// Shape-types raw JSON into the schema without cleaning it.
    pub async fn put_raw(&self, raw: &Value) -> ResumeDocument {
        self.replace(coerce(raw)).await
    }

    /// Cleans under the same lock as every other edit, so an edit queued
    /// behind it is applied to the cleaned document.
    pub async fn clean(&self) -> ResumeDocument {
        match self.update(|doc| Ok::<_, Infallible>(clean(doc))).await {
            Ok(doc) => doc,
            Err(never) => match never {},
        }
    }

    pub async fn reset(&self) -> ResumeDocument {
        info!("Resume reset to the default");
        self.replace(clean(&default_resume())).await
    }

    /// Imports a JSON file. Non-object input is ignored and returns `None`.
    pub async fn import_json(&self, bytes: &[u8]) -> Option<ResumeDocument> {
        match import_json(bytes) {
            Some(doc) => {
                info!("Imported resume ({} bytes)", bytes.len());
                Some(self.replace(doc).await)
            }
            None => {
                warn!("Ignored import: not a JSON object ({} bytes)", bytes.len());
                None
            }
        }
    }

    pub async fn set_photo(&self, data_url: String) -> ResumeDocument {
        let mut current = self.document.lock().await;
        current.basics.photo_data_url = data_url;
        self.persist(&current).await;
        current.clone()
    }

    /// Claims the export slot, or `None` while another export is running.
    pub fn begin_export(&self) -> Option<ExportGuard<'_>> {
        self.exports.try_begin()
    }

    /// Save failures are logged and otherwise ignored.
    async fn persist(&self, doc: &ResumeDocument) {
        if let Err(e) = save_document(self.store.as_ref(), doc).await {
            warn!("Failed to save resume: {e}");
        }
    }
}
