use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{ArchivedTask, Board, Label, LabelId};

use crate::keys;
use crate::traits::CacheStore;

/// Typed view over a `CacheStore`.
///
/// The board store and the label registry each hold one of these over the
/// same underlying store; they only ever touch their own keys.
pub struct CacheAdapter {
    store: Arc<dyn CacheStore>,
}

impl Clone for CacheAdapter {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl CacheAdapter {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str) -> BoardResult<Option<T>> {
        match self.store.get(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| BoardError::Serialization(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> BoardResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| BoardError::Serialization(format!("{}: {}", key, e)))?;
        self.store.set(key, value)
    }

    /// Like `read`, but a missing or undecodable entry yields the default.
    /// The mirror is best-effort, so a bad entry must not block a session.
    pub fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.read(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry {}: {}", key, e);
                T::default()
            }
        }
    }

    pub fn load_board(&self, project_id: &str) -> Option<Board> {
        let board: Option<Board> = self.read_or_default(&keys::tasks(project_id));
        board.filter(|b| b.project_id == project_id)
    }

    pub fn save_board(&self, board: &Board) -> BoardResult<()> {
        self.write(&keys::tasks(&board.project_id), board)
    }

    pub fn load_archive(&self, user_id: &str) -> Vec<ArchivedTask> {
        self.read_or_default(&keys::archived_tasks(user_id))
    }

    pub fn save_archive(&self, user_id: &str, archive: &[ArchivedTask]) -> BoardResult<()> {
        self.write(&keys::archived_tasks(user_id), &archive)
    }

    pub fn load_labels(&self) -> Vec<Label> {
        self.read_or_default(keys::AVAILABLE_LABELS)
    }

    pub fn save_labels(&self, labels: &[Label]) -> BoardResult<()> {
        self.write(keys::AVAILABLE_LABELS, &labels)
    }

    pub fn load_selected_labels(&self) -> BTreeSet<LabelId> {
        self.read_or_default(keys::SELECTED_LABELS)
    }

    pub fn save_selected_labels(&self, selected: &BTreeSet<LabelId>) -> BoardResult<()> {
        self.write(keys::SELECTED_LABELS, selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCache;
    use chrono::Utc;
    use serde_json::json;
    use taskboard_domain::{LabelColor, Task, TaskDraft, TaskStatus};

    fn adapter() -> (Arc<MemoryCache>, CacheAdapter) {
        let cache = Arc::new(MemoryCache::new());
        let adapter = CacheAdapter::new(cache.clone());
        (cache, adapter)
    }

    fn task(id: u64) -> Task {
        let fields = TaskDraft::new("cached", TaskStatus::InProgress).into_fields(
            "p1".to_string(),
            "u1".to_string(),
            0,
        );
        Task::from_fields(id, fields, Utc::now())
    }

    #[test]
    fn test_board_is_keyed_by_project() {
        let (cache, adapter) = adapter();
        let board = Board::from_tasks("p1".to_string(), vec![task(1)]);

        adapter.save_board(&board).unwrap();

        assert!(cache.get("tasks_p1").unwrap().is_some());
        assert_eq!(adapter.load_board("p1"), Some(board));
        assert_eq!(adapter.load_board("p2"), None);
    }

    #[test]
    fn test_archive_is_keyed_by_user() {
        let (cache, adapter) = adapter();
        let archive = vec![ArchivedTask::new(task(3))];

        adapter.save_archive("alice", &archive).unwrap();

        assert!(cache.get("archivedTasks_alice").unwrap().is_some());
        assert_eq!(adapter.load_archive("alice"), archive);
        assert!(adapter.load_archive("bob").is_empty());
    }

    #[test]
    fn test_labels_and_selection() {
        let (_cache, adapter) = adapter();
        let labels = vec![Label::new("ui".to_string(), LabelColor::Blue)];
        let selected: BTreeSet<LabelId> = labels.iter().map(|l| l.id).collect();

        adapter.save_labels(&labels).unwrap();
        adapter.save_selected_labels(&selected).unwrap();

        assert_eq!(adapter.load_labels(), labels);
        assert_eq!(adapter.load_selected_labels(), selected);
    }

    #[test]
    fn test_corrupt_entry_falls_back_to_default() {
        let (cache, adapter) = adapter();
        cache.set("availableLabels", json!({"not": "a list"})).unwrap();
        cache.set("tasks_p1", json!(42)).unwrap();

        assert!(adapter.load_labels().is_empty());
        assert!(adapter.load_board("p1").is_none());
        assert!(matches!(
            adapter.read::<Vec<Label>>("availableLabels"),
            Err(BoardError::Serialization(_))
        ));
    }
}
