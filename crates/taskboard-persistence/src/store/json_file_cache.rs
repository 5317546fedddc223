use serde_json::Value;
use std::path::{Path, PathBuf};
use taskboard_core::{BoardError, BoardResult};

use crate::serialization::JsonSerializer;
use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{CacheStore, Serializer};

/// Directory-backed cache: one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Bytes outside `[A-Za-z0-9_-]` are written as
    /// `%XX`, so distinct keys map to distinct files inside the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                file_name.push(byte as char);
            } else {
                file_name.push_str(&format!("%{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", file_name))
    }
}

impl CacheStore for JsonFileCache {
    fn get(&self, key: &str) -> BoardResult<Option<Value>> {
        let path = self.path_for(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BoardError::Io(e)),
        };
        let value: Value = JsonSerializer.deserialize(&bytes)?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: Value) -> BoardResult<()> {
        let path = self.path_for(key);
        let bytes = JsonSerializer.serialize(&value)?;
        AtomicWriter::write_atomic_blocking(&path, &bytes)
            .map_err(|e| BoardError::Cache(format!("{}: {}", path.display(), e)))
    }
}
