//! `PersistentMemory`: JSON-lines file store, one file per `conversation_id`,
//! upsert by `key` via last-writer-wins log compaction on read. Kept
//! file-based, rather than introducing a new database dependency, to stay
//! aligned with the teacher's filesystem-backed state-store convention.

use async_trait::async_trait;
use conduit_core::{
    ConversationId, MemoryBoundary, MemoryReadResponse, MemoryReadStatus, MemoryWriteResponse,
    MemoryWriteStatus,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One JSON-lines record: an upsert of `key -> data` for a conversation.
#[derive(serde::Serialize, serde::Deserialize)]
struct Record {
    key: String,
    data: serde_json::Value,
}

/// File-backed memory boundary. Each conversation gets its own
/// append-only `.jsonl` file under `root`; reads compact the log by
/// scanning for the last record matching `key`.
pub struct PersistentMemory {
    root: PathBuf,
    /// One lock per conversation file, so concurrent turns on different
    /// conversations never block each other, but writes to the same
    /// conversation file serialize.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PersistentMemory {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, conversation_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn file_path(&self, conversation_id: &str) -> PathBuf {
        self.root.join(format!("{}.jsonl", sanitize_filename(conversation_id)))
    }

    async fn read_records(path: &Path) -> Result<Vec<Record>, std::io::Error> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str::<Record>(l).ok())
            .collect())
    }
}

/// Keep a conversation id filesystem-safe without a full percent-encoding
/// scheme — conversation ids are expected to be opaque tokens, not
/// user-authored paths.
fn sanitize_filename(conversation_id: &str) -> String {
    conversation_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[async_trait]
impl MemoryBoundary for PersistentMemory {
    async fn read(
        &self,
        conversation_id: &ConversationId,
        key: &str,
        authorized: bool,
    ) -> MemoryReadResponse {
        if !authorized {
            return MemoryReadResponse {
                status: MemoryReadStatus::Unauthorized,
                data: None,
                error: Some("memory read not authorized by decision-logic".into()),
            };
        }

        let lock = self.lock_for(conversation_id.as_str()).await;
        let _guard = lock.lock().await;
        let path = self.file_path(conversation_id.as_str());

        match Self::read_records(&path).await {
            Ok(records) => match records.into_iter().rev().find(|r| r.key == key) {
                Some(r) => MemoryReadResponse {
                    status: MemoryReadStatus::Success,
                    data: Some(r.data),
                    error: None,
                },
                None => MemoryReadResponse {
                    status: MemoryReadStatus::NotFound,
                    data: None,
                    error: Some(format!("no memory for key {key}")),
                },
            },
            Err(e) => MemoryReadResponse {
                status: MemoryReadStatus::Unavailable,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }

    async fn write(
        &self,
        conversation_id: &ConversationId,
        key: &str,
        data: serde_json::Value,
        authorized: bool,
    ) -> MemoryWriteResponse {
        if !authorized {
            return MemoryWriteResponse {
                status: MemoryWriteStatus::Unauthorized,
                error: Some("memory write not authorized by decision-logic".into()),
            };
        }

        let line = match serde_json::to_string(&Record {
            key: key.to_string(),
            data,
        }) {
            Ok(l) => l,
            Err(e) => {
                return MemoryWriteResponse {
                    status: MemoryWriteStatus::Failed,
                    error: Some(format!("unserializable write payload: {e}")),
                };
            }
        };

        let lock = self.lock_for(conversation_id.as_str()).await;
        let _guard = lock.lock().await;

        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            return MemoryWriteResponse {
                status: MemoryWriteStatus::Failed,
                error: Some(e.to_string()),
            };
        }

        let path = self.file_path(conversation_id.as_str());
        use tokio::io::AsyncWriteExt;
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await;
        match file {
            Ok(mut f) => match f.write_all(format!("{line}\n").as_bytes()).await {
                Ok(()) => MemoryWriteResponse {
                    status: MemoryWriteStatus::Success,
                    error: None,
                },
                Err(e) => MemoryWriteResponse {
                    status: MemoryWriteStatus::Failed,
                    error: Some(e.to_string()),
                },
            },
            Err(e) => MemoryWriteResponse {
                status: MemoryWriteStatus::Failed,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let mem = PersistentMemory::new(dir.path());
        let conv = ConversationId::new("c1");
        let payload = serde_json::json!({"fact": "likes tea"});
        let w = mem.write(&conv, "prefs", payload.clone(), true).await;
        assert_eq!(w.status, MemoryWriteStatus::Success);
        let r = mem.read(&conv, "prefs", true).await;
        assert_eq!(r.status, MemoryReadStatus::Success);
        assert_eq!(r.data, Some(payload));
    }

    #[tokio::test]
    async fn upsert_keeps_last_writer() {
        let dir = tempfile::tempdir().unwrap();
        let mem = PersistentMemory::new(dir.path());
        let conv = ConversationId::new("c1");
        mem.write(&conv, "k", serde_json::json!(1), true).await;
        mem.write(&conv, "k", serde_json::json!(2), true).await;
        let r = mem.read(&conv, "k", true).await;
        assert_eq!(r.data, Some(serde_json::json!(2)));
    }

    #[tokio::test]
    async fn missing_file_is_not_found_not_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mem = PersistentMemory::new(dir.path());
        let conv = ConversationId::new("nonexistent");
        let r = mem.read(&conv, "k", true).await;
        assert_eq!(r.status, MemoryReadStatus::NotFound);
    }
}
