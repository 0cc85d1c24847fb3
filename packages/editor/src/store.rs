//! Document persistence collaborators.
//!
//! The editor never touches storage directly: it hands snapshots to a
//! [`DocumentStore`] and gets documents back from it. Stores are keyed by an
//! opaque string (a document id, a file name).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use trellis_model::{Document, ModelError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    Model(#[from] ModelError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub trait DocumentStore {
    fn load(&self, key: &str) -> Result<Document, StoreError>;

    fn save(&mut self, key: &str, document: &Document) -> Result<(), StoreError>;
}

/// In-memory store holding serialized JSON, so loads go through the same
/// lenient parsing as files do
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw JSON document under `key`
    pub fn insert_json(&mut self, key: impl Into<String>, json: impl Into<String>) {
        self.documents.insert(key.into(), json.into());
    }

    pub fn get_json(&self, key: &str) -> Option<&str> {
        self.documents.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Document, StoreError> {
        let json = self
            .documents
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(Document::from_json(json)?)
    }

    fn save(&mut self, key: &str, document: &Document) -> Result<(), StoreError> {
        self.documents.insert(key.to_string(), document.to_json_pretty()?);
        Ok(())
    }
}

/// Pretty-printed JSON files under a root directory.
///
/// Keys are paths relative to the root; `.json` is appended when the key has
/// no extension.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let path = self.root.join(key);
        if path.extension().is_some() {
            path
        } else {
            path.with_extension("json")
        }
    }
}

impl DocumentStore for FileStore {
    fn load(&self, key: &str) -> Result<Document, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        let source = std::fs::read_to_string(&path)?;
        let document = Document::from_json(&source)?;
        info!(path = %path.display(), pages = document.pages.len(), "Loaded document");
        Ok(document)
    }

    fn save(&mut self, key: &str, document: &Document) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, document.to_json_pretty()?)?;
        debug!(path = %path.display(), "Saved document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let doc = Document::new("Stored");
        store.save("site", &doc).unwrap();

        let loaded = store.load("site").unwrap();
        assert_eq!(loaded, doc);
        assert!(matches!(store.load("other"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_memory_store_rejects_invalid_json() {
        let mut store = MemoryStore::new();
        store.insert_json("bad", "{ not json");
        assert!(matches!(store.load("bad"), Err(StoreError::Model(_))));
    }

    #[test]
    fn test_file_store_paths() {
        let store = FileStore::new("/tmp/sites");
        assert_eq!(store.path_for("home"), PathBuf::from("/tmp/sites/home.json"));
        assert_eq!(store.path_for("site.json"), PathBuf::from("/tmp/sites/site.json"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("trellis-store-{}", uuid_like()));
        let mut store = FileStore::new(&dir);
        let doc = Document::new("On disk");

        store.save("nested/site", &doc).unwrap();
        assert!(dir.join("nested/site.json").exists());
        assert_eq!(store.load("nested/site").unwrap(), doc);
        assert!(matches!(store.load("missing"), Err(StoreError::NotFound(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    fn uuid_like() -> String {
        trellis_model::IdGenerator::new().seed().to_string()
    }
}
