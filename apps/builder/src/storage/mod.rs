// Persistence adapter: one key-value slot holding the whole document as JSON.

pub mod file;
pub mod redis_store;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{default_resume, ResumeDocument};
use crate::normalize::{clean, clean_value};

pub use file::FileKvStore;
pub use redis_store::RedisKvStore;

/// Key of the document slot.
pub const STORAGE_KEY: &str = "resume_builder_v1";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Loads the stored document. Never fails: a missing, unreadable or
/// structurally invalid value yields the built-in default. The result is
/// always cleaned.
pub async fn load_document(store: &dyn KvStore) -> ResumeDocument {
    let raw = match store.get(STORAGE_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No stored resume, starting from the default");
            return clean(&default_resume());
        }
        Err(e) => {
            warn!("Failed to read stored resume, using the default: {e}");
            return clean(&default_resume());
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Object(_)) => clean_value(&value),
        Ok(_) => {
            warn!("Stored resume is not a JSON object, using the default");
            clean(&default_resume())
        }
        Err(e) => {
            warn!("Stored resume is not valid JSON, using the default: {e}");
            clean(&default_resume())
        }
    }
}

pub async fn save_document(store: &dyn KvStore, doc: &ResumeDocument) -> Result<(), StorageError> {
    let json = serde_json::to_string(doc)?;
    store.set(STORAGE_KEY, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Theme;

    #[tokio::test]
    async fn test_load_missing_returns_cleaned_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path());
        assert_eq!(load_document(&store).await, clean(&default_resume()));
    }

    #[tokio::test]
    async fn test_load_corrupt_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path());
        for corrupt in ["{not json", "[1,2]", "42", "null"] {
            store.set(STORAGE_KEY, corrupt).await.unwrap();
            assert_eq!(load_document(&store).await, clean(&default_resume()), "{corrupt}");
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path());
        let mut doc = clean(&default_resume());
        doc.theme = Theme::Classic;
        doc.basics.full_name = "Grace Hopper".to_string();

        save_document(&store, &doc).await.unwrap();
        assert_eq!(load_document(&store).await, doc);
    }

    #[tokio::test]
    async fn test_load_cleans_stored_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path());
        store
            .set(STORAGE_KEY, r#"{"skills":["react","React"," REACT "],"settings":{"zoom":9}}"#)
            .await
            .unwrap();
        let doc = load_document(&store).await;
        assert_eq!(doc.skills, vec!["React".to_string()]);
        assert_eq!(doc.settings.zoom, 1.2);
    }
}
