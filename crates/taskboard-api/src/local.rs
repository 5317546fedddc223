use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{Task, TaskFields, TaskId};
use taskboard_persistence::{AtomicWriter, JsonSerializer, Serializer};
use tokio::sync::Mutex;

use crate::traits::TaskApi;

#[derive(Debug, Serialize, Deserialize)]
struct LocalRecord {
    next_id: TaskId,
    tasks: BTreeMap<TaskId, Task>,
}

impl Default for LocalRecord {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: BTreeMap::new(),
        }
    }
}

/// Stand-in system of record living in this process.
///
/// Ids are assigned sequentially from 1. With a backing file the record
/// survives across runs, which lets the CLI work without a server. Failure
/// switches make it reject calls the way an unreachable server would.
#[derive(Debug, Default)]
pub struct LocalTaskApi {
    record: Mutex<LocalRecord>,
    path: Option<PathBuf>,
    offline: AtomicBool,
    failing_updates: AtomicUsize,
    failing_ids: std::sync::Mutex<HashSet<TaskId>>,
    update_calls: AtomicUsize,
}

impl LocalTaskApi {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed record; a missing file starts empty.
    pub async fn open(path: impl AsRef<Path>) -> BoardResult<Self> {
        let path = path.as_ref().to_path_buf();
        let record = if path.exists() {
            let bytes = AtomicWriter::read_all(&path).await?;
            JsonSerializer.deserialize(&bytes)?
        } else {
            LocalRecord::default()
        };
        tracing::debug!(
            "Opened local task record {} ({} tasks)",
            path.display(),
            record.tasks.len()
        );
        Ok(Self {
            record: Mutex::new(record),
            path: Some(path),
            ..Default::default()
        })
    }

    /// Reject every call until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Reject the next `count` update calls.
    pub fn fail_next_updates(&self, count: usize) {
        self.failing_updates.store(count, Ordering::SeqCst);
    }

    /// Reject every update for the given task ids.
    pub fn fail_updates_for(&self, ids: impl IntoIterator<Item = TaskId>) {
        let mut failing = self
            .failing_ids
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        failing.extend(ids);
    }

    /// Number of update calls received, including rejected ones.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Stored copy of a task, as the server sees it.
    pub async fn stored(&self, id: TaskId) -> Option<Task> {
        self.record.lock().await.tasks.get(&id).cloned()
    }

    fn check_online(&self) -> BoardResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BoardError::Network("task service unreachable".to_string()));
        }
        Ok(())
    }

    fn should_fail_update(&self, id: TaskId) -> bool {
        let consumed = self
            .failing_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let failing = self
            .failing_ids
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        consumed || failing.contains(&id)
    }

    async fn persist(&self, record: &LocalRecord) -> BoardResult<()> {
        if let Some(path) = &self.path {
            let bytes = JsonSerializer.serialize(record)?;
            AtomicWriter::write_atomic(path, &bytes).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TaskApi for LocalTaskApi {
    async fn fetch_tasks_by_project(&self, project_id: &str) -> BoardResult<Vec<Task>> {
        self.check_online()?;
        let record = self.record.lock().await;
        let mut tasks: Vec<Task> = record
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.status, t.position, t.id));
        Ok(tasks)
    }

    async fn create_task(&self, fields: TaskFields) -> BoardResult<Task> {
        self.check_online()?;
        let mut record = self.record.lock().await;
        let id = record.next_id;
        record.next_id += 1;
        let task = Task::from_fields(id, fields, Utc::now());
        record.tasks.insert(id, task.clone());
        self.persist(&record).await?;
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, fields: TaskFields) -> BoardResult<Task> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if self.should_fail_update(id) {
            return Err(BoardError::Network(format!(
                "update of task {} rejected by server",
                id
            )));
        }
        let mut record = self.record.lock().await;
        let existing = record
            .tasks
            .get(&id)
            .ok_or_else(|| BoardError::Network(format!("404: task {} does not exist", id)))?;
        let mut updated = Task::from_fields(id, fields, existing.created_at);
        updated.comments_count = existing.comments_count;
        record.tasks.insert(id, updated.clone());
        self.persist(&record).await?;
        Ok(updated)
    }

    async fn delete_task(&self, id: TaskId) -> BoardResult<()> {
        self.check_online()?;
        let mut record = self.record.lock().await;
        if record.tasks.remove(&id).is_none() {
            return Err(BoardError::Network(format!("404: task {} does not exist", id)));
        }
        self.persist(&record).await
    }
}
