use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use taskboard_core::{BoardError, BoardResult};

use crate::traits::CacheStore;

/// In-process cache for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
    reject_writes: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, as a full or unavailable storage would.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> BoardResult<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BoardError::Cache("cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> BoardResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(BoardError::Cache(format!("write rejected for {}", key)));
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BoardError::Cache("cache lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_set() {
        let cache = MemoryCache::new();
        assert!(cache.get("availableLabels").unwrap().is_none());

        cache.set("availableLabels", json!([])).unwrap();
        cache.set("tasks_p1", json!({"projectId": "p1"})).unwrap();

        assert_eq!(cache.get("availableLabels").unwrap(), Some(json!([])));
        assert_eq!(cache.keys(), vec!["availableLabels", "tasks_p1"]);
    }

    #[test]
    fn test_rejected_writes_leave_value() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1)).unwrap();
        cache.set_reject_writes(true);

        assert!(matches!(cache.set("k", json!(2)), Err(BoardError::Cache(_))));
        assert_eq!(cache.get("k").unwrap(), Some(json!(1)));
    }
}
