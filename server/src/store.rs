use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

/// Collection name the ping documents live under.
pub const COLLECTION: &str = "updates";

/// One version-check ping. A client id owns at most one record; each new
/// ping replaces the previous one (last-write-wins, no history).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingRecord {
    pub client_id: String,
    pub client_version: String,
    pub observed_at: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Document store for ping records, keyed by client id.
#[async_trait]
pub trait PingStore: Send + Sync {
    /// Write the record keyed by its client id, replacing any previous one.
    async fn upsert(&self, record: &PingRecord) -> Result<(), StoreError>;

    /// The current record for a client id, if any.
    async fn fetch(&self, client_id: &str) -> Result<Option<PingRecord>, StoreError>;
}

/// Stores each record as one JSON document at
/// `<base_dir>/updates/<client_id>.json`.
pub struct FilesystemStore {
    dir: PathBuf,
}

impl FilesystemStore {
    pub fn new(base_dir: &str) -> Self {
        FilesystemStore {
            dir: Path::new(base_dir).join(COLLECTION),
        }
    }

    /// Client ids are GUIDs in practice, but anything outside
    /// `[A-Za-z0-9._-]` is replaced so an id can never escape the
    /// collection directory.
    fn document_path(&self, client_id: &str) -> PathBuf {
        let name: String = client_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl PingStore for FilesystemStore {
    async fn upsert(&self, record: &PingRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(self.document_path(&record.client_id), bytes).await?;
        Ok(())
    }

    async fn fetch(&self, client_id: &str) -> Result<Option<PingRecord>, StoreError> {
        match fs::read(self.document_path(client_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store. Useful for development configs and as a test double;
/// records are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, PingRecord>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.records.lock().expect("ping store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PingStore for MemoryStore {
    async fn upsert(&self, record: &PingRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("ping store lock poisoned")
            .insert(record.client_id.clone(), record.clone());
        Ok(())
    }

    async fn fetch(&self, client_id: &str) -> Result<Option<PingRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("ping store lock poisoned")
            .get(client_id)
            .cloned())
    }
}
