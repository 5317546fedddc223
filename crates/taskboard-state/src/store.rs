use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use taskboard_api::TaskApi;
use taskboard_core::{BoardError, BoardResult, NoticeLog};
use taskboard_domain::ordering;
use taskboard_domain::{
    ArchivedTask, Board, LabelId, Task, TaskDraft, TaskId, TaskStatus, TaskUpdate,
};
use taskboard_persistence::CacheAdapter;

use crate::labels::LabelUsage;
use crate::session::BoardSession;

/// Owns the three columns and the acting user's archive for one project.
///
/// In-memory state and the cache are updated together, before any remote
/// call is awaited. The remote task API is the authority for everything
/// except archive membership, which only exists in the cache.
pub struct BoardStore {
    pub(crate) session: BoardSession,
    pub(crate) api: Arc<dyn TaskApi>,
    pub(crate) cache: CacheAdapter,
    pub(crate) board: Board,
    pub(crate) archive: Vec<ArchivedTask>,
    pub(crate) notices: NoticeLog,
}

impl BoardStore {
    /// Build a store seeded from the cache so a board can render before
    /// `load` returns.
    pub fn new(session: BoardSession, api: Arc<dyn TaskApi>, cache: CacheAdapter) -> Self {
        let archive = cache.load_archive(&session.user_id);
        let archived: HashSet<TaskId> = archive.iter().map(ArchivedTask::id).collect();
        let board = match cache.load_board(&session.project_id) {
            Some(cached) => Board::from_tasks(
                session.project_id.clone(),
                cached.tasks().filter(|t| !archived.contains(&t.id)).cloned(),
            ),
            None => Board::new(session.project_id.clone()),
        };
        tracing::debug!(
            "Hydrated board {} from cache ({} tasks, {} archived)",
            session.project_id,
            board.len(),
            archive.len()
        );
        Self {
            session,
            api,
            cache,
            board,
            archive,
            notices: NoticeLog::default(),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notices = NoticeLog::new(ttl);
        self
    }

    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.board.column(status)
    }

    pub fn archived(&self) -> &[ArchivedTask] {
        &self.archive
    }

    pub fn find(&self, task_id: TaskId) -> Option<&Task> {
        self.board.find(task_id)
    }

    pub fn find_archived(&self, task_id: TaskId) -> Option<&ArchivedTask> {
        self.archive.iter().find(|a| a.id() == task_id)
    }

    pub fn notices(&mut self) -> &mut NoticeLog {
        &mut self.notices
    }

    /// Fetch the project's tasks and rebuild the columns. Archived ids stay
    /// hidden. On failure the current state is kept as is.
    pub async fn load(&mut self) -> BoardResult<()> {
        let api = Arc::clone(&self.api);
        let tasks = match api.fetch_tasks_by_project(&self.session.project_id).await {
            Ok(tasks) => tasks,
            Err(e) => return Err(self.surface(e)),
        };

        let archived: HashSet<TaskId> = self.archive.iter().map(ArchivedTask::id).collect();
        self.board = Board::from_tasks(
            self.session.project_id.clone(),
            tasks.into_iter().filter(|t| !archived.contains(&t.id)),
        );
        tracing::info!(
            "Loaded board {}: {} todo, {} in progress, {} done",
            self.session.project_id,
            self.board.column(TaskStatus::ToDo).len(),
            self.board.column(TaskStatus::InProgress).len(),
            self.board.column(TaskStatus::Done).len()
        );
        self.mirror_board();
        Ok(())
    }

    /// Create a task at the end of its column.
    pub async fn add(&mut self, draft: TaskDraft) -> BoardResult<Task> {
        let position = self.board.column(draft.status).len() as u32;
        let fields = draft.into_fields(
            self.session.project_id.clone(),
            self.session.user_id.clone(),
            position,
        );

        let api = Arc::clone(&self.api);
        let created = match api.create_task(fields).await {
            Ok(task) => task,
            Err(e) => return Err(self.surface(e)),
        };

        tracing::info!("Created task: {} (id: {})", created.title, created.id);
        self.board.append(created.clone());
        self.mirror_board();
        Ok(self.board.find(created.id).cloned().unwrap_or(created))
    }

    /// Send a full-field update and place the result at its position in its
    /// (possibly new) column. No rollback happens here on failure.
    pub async fn update(&mut self, task: Task) -> BoardResult<Task> {
        if !self.board.contains(task.id) {
            let err = BoardError::not_found(format!("task {}", task.id));
            return Err(self.surface(err));
        }

        let api = Arc::clone(&self.api);
        let updated = match api.update_task(task.id, task.fields()).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.surface(e)),
        };

        let id = updated.id;
        self.board.take(id);
        self.board.insert_at_position(updated.clone());
        tracing::info!("Updated task {} ({} @ {})", id, updated.status, updated.position);
        self.mirror_board();
        Ok(self.board.find(id).cloned().unwrap_or(updated))
    }

    /// Apply field edits through `update`.
    pub async fn edit(&mut self, task_id: TaskId, changes: TaskUpdate) -> BoardResult<Task> {
        let Some(mut task) = self.board.find(task_id).cloned() else {
            let err = BoardError::not_found(format!("task {}", task_id));
            return Err(self.surface(err));
        };
        task.apply(changes);
        self.update(task).await
    }

    /// Delete a task from the system of record and from `status`.
    pub async fn remove(&mut self, task_id: TaskId, status: TaskStatus) -> BoardResult<()> {
        if ordering::index_of(self.board.column(status), task_id).is_none() {
            let err = BoardError::not_found(format!("task {} in {}", task_id, status));
            return Err(self.surface(err));
        }

        let api = Arc::clone(&self.api);
        if let Err(e) = api.delete_task(task_id).await {
            return Err(self.surface(e));
        }

        self.board.take_from(status, task_id);
        tracing::info!("Deleted task {}", task_id);
        self.mirror_board();
        Ok(())
    }

    /// Hide a task from the board under the acting user's archive.
    pub fn archive(&mut self, task_id: TaskId) -> BoardResult<()> {
        let Some((status, _)) = self.board.locate(task_id) else {
            let err = BoardError::not_found(format!("task {}", task_id));
            return Err(self.surface(err));
        };

        self.apply_local(&[status], true, |board, archive| {
            if let Some((task, _)) = board.take(task_id) {
                archive.push(ArchivedTask::new(task));
            }
        })?;
        tracing::info!("Archived task {}", task_id);
        Ok(())
    }

    /// Put an archived task back at the end of its stored status column.
    pub fn restore(&mut self, task_id: TaskId) -> BoardResult<Task> {
        let Some(archived) = self.find_archived(task_id) else {
            let err = BoardError::not_found(format!("archived task {}", task_id));
            return Err(self.surface(err));
        };
        let status = archived.task.status;

        self.apply_local(&[status], true, |board, archive| {
            if let Some(index) = archive.iter().position(|a| a.id() == task_id) {
                board.append(archive.remove(index).into_task());
            }
        })?;
        tracing::info!("Restored task {} to {}", task_id, status);
        self.board
            .find(task_id)
            .cloned()
            .ok_or_else(|| BoardError::Internal(format!("restored task {} missing", task_id)))
    }

    /// Replace a column's order. One update goes out per task whose position
    /// changed, all at once; if any is rejected the whole column reverts.
    pub async fn reorder_column(
        &mut self,
        status: TaskStatus,
        ordered: Vec<Task>,
    ) -> BoardResult<()> {
        let current = self.board.column(status).to_vec();
        if !ordering::same_members(&current, &ordered) {
            let err = BoardError::not_found(format!(
                "reordered tasks do not match the {} column",
                status
            ));
            return Err(self.surface(err));
        }

        let mut next = ordered;
        for task in next.iter_mut() {
            task.status = status;
        }
        ordering::compact_positions(&mut next);

        let changed: Vec<Task> = ordering::changed_positions(&current, &next)
            .into_iter()
            .cloned()
            .collect();
        if changed.is_empty() {
            tracing::debug!("Reorder of {} left positions unchanged", status);
            return Ok(());
        }

        let api = Arc::clone(&self.api);
        let request = async move {
            let results = join_all(
                changed
                    .iter()
                    .map(|task| api.update_task(task.id, task.fields())),
            )
            .await;
            let total = results.len();
            let mut failures = results.into_iter().filter_map(Result::err);
            match failures.next() {
                Some(first) => {
                    let failed = 1 + failures.count();
                    tracing::warn!("{} of {} position updates rejected", failed, total);
                    Err(first)
                }
                None => Ok(total),
            }
        };

        let mutate = move |board: &mut Board, _: &mut Vec<ArchivedTask>| {
            board.replace_column(status, next)
        };
        let sent = self
            .commit_optimistic(&[status], false, mutate, request)
            .await?;
        tracing::info!("Reordered {} ({} position updates)", status, sent);
        Ok(())
    }

    /// Move a task to the end of another column with a single update.
    /// Both columns are restored exactly if the update is rejected.
    pub async fn move_to_column(&mut self, task_id: TaskId, dest: TaskStatus) -> BoardResult<Task> {
        let Some((source, _)) = self.board.locate(task_id) else {
            let err = BoardError::not_found(format!("task {}", task_id));
            return Err(self.surface(err));
        };
        let Some(mut moved) = self.board.find(task_id).cloned() else {
            let err = BoardError::not_found(format!("task {}", task_id));
            return Err(self.surface(err));
        };
        if source == dest {
            return Ok(moved);
        }

        moved.status = dest;
        moved.position = self.board.column(dest).len() as u32;
        let fields = moved.fields();
        let api = Arc::clone(&self.api);
        let request = async move { api.update_task(task_id, fields).await };

        let mutate = move |board: &mut Board, _: &mut Vec<ArchivedTask>| {
            board.take(task_id);
            board.append(moved);
        };
        let confirmed = self
            .commit_optimistic(&[source, dest], false, mutate, request)
            .await?;

        // Keep the server's field content, our ordering
        self.board.take(task_id);
        let mut confirmed = confirmed;
        confirmed.status = dest;
        confirmed.position = self.board.column(dest).len() as u32;
        self.board.append(confirmed);
        self.mirror_board();

        tracing::info!("Moved task {} from {} to {}", task_id, source, dest);
        self.board
            .find(task_id)
            .cloned()
            .ok_or_else(|| BoardError::Internal(format!("moved task {} missing", task_id)))
    }

    /// Check single membership and dense positions.
    pub fn verify_invariants(&self) -> BoardResult<()> {
        let mut seen = HashSet::new();
        for status in TaskStatus::ALL {
            let column = self.board.column(status);
            if !ordering::is_dense(column) {
                return Err(BoardError::Internal(format!(
                    "positions in {} are not dense",
                    status
                )));
            }
            if let Some(task) = column.iter().find(|t| t.status != status) {
                return Err(BoardError::Internal(format!(
                    "task {} in {} has status {}",
                    task.id, status, task.status
                )));
            }
            for task in column {
                if !seen.insert(task.id) {
                    return Err(BoardError::Internal(format!(
                        "task {} appears more than once",
                        task.id
                    )));
                }
            }
        }
        for archived in &self.archive {
            if !seen.insert(archived.id()) {
                return Err(BoardError::Internal(format!(
                    "task {} is both archived and on the board",
                    archived.id()
                )));
            }
        }
        Ok(())
    }

    /// Mirror the board after the remote side accepted a change. The change
    /// stands even if the write fails; the failure only raises a notice.
    fn mirror_board(&mut self) {
        if let Err(e) = self.cache.save_board(&self.board) {
            tracing::warn!(
                "Board {} not mirrored to cache: {}",
                self.session.project_id,
                e
            );
            self.notices.error(e.to_string());
        }
    }

    /// Record an error as a transient notice and hand it back.
    pub(crate) fn surface(&mut self, err: BoardError) -> BoardError {
        tracing::warn!("Board operation failed: {}", err);
        self.notices.error(err.to_string());
        err
    }
}

impl LabelUsage for BoardStore {
    fn label_in_use(&self, label_id: LabelId) -> bool {
        self.board.references_label(label_id)
            || self.archive.iter().any(|a| a.task.has_label(label_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_api::LocalTaskApi;
    use taskboard_persistence::{CacheStore, MemoryCache};

    struct Fixture {
        api: Arc<LocalTaskApi>,
        cache: Arc<MemoryCache>,
        store: BoardStore,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(LocalTaskApi::in_memory());
        let cache = Arc::new(MemoryCache::new());
        let store = BoardStore::new(
            BoardSession::new("p1", "alice"),
            api.clone(),
            CacheAdapter::new(cache.clone()),
        );
        Fixture { api, cache, store }
    }

    fn ids(tasks: &[Task]) -> Vec<TaskId> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn cached_board(cache: &MemoryCache) -> Board {
        serde_json::from_value(cache.get("tasks_p1").unwrap().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_add_appends_and_mirrors_cache() {
        let mut fx = fixture();
        let first = fx.store.add(TaskDraft::new("Fix bug", TaskStatus::ToDo)).await.unwrap();
        let second = fx.store.add(TaskDraft::new("Write docs", TaskStatus::ToDo)).await.unwrap();

        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        assert_eq!(first.creator_id, "alice");
        assert_eq!(first.project_id, "p1");
        assert_eq!(cached_board(&fx.cache), *fx.store.board());
    }

    #[tokio::test]
    async fn test_add_failure_leaves_state() {
        let mut fx = fixture();
        fx.api.set_offline(true);

        let result = fx.store.add(TaskDraft::new("Fix bug", TaskStatus::ToDo)).await;
        assert!(matches!(result, Err(BoardError::Network(_))));
        assert!(fx.store.board().is_empty());
        assert_eq!(fx.store.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_load_excludes_archived_and_keeps_state_on_failure() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        let b = fx.store.add(TaskDraft::new("B", TaskStatus::ToDo)).await.unwrap();
        fx.store.archive(a.id).unwrap();

        fx.store.load().await.unwrap();
        assert_eq!(ids(fx.store.column(TaskStatus::ToDo)), vec![b.id]);
        fx.store.verify_invariants().unwrap();

        let before = fx.store.board().clone();
        fx.api.set_offline(true);
        assert!(fx.store.load().await.is_err());
        assert_eq!(*fx.store.board(), before);
    }

    #[tokio::test]
    async fn test_update_moves_between_columns_at_position() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        let b = fx.store.add(TaskDraft::new("B", TaskStatus::Done)).await.unwrap();

        let mut changed = a.clone();
        changed.status = TaskStatus::Done;
        changed.position = 0;
        let updated = fx.store.update(changed).await.unwrap();

        assert_eq!(updated.position, 0);
        assert!(fx.store.column(TaskStatus::ToDo).is_empty());
        assert_eq!(ids(fx.store.column(TaskStatus::Done)), vec![a.id, b.id]);
        fx.store.verify_invariants().unwrap();
    }

    #[tokio::test]
    async fn test_update_unknown_task_is_not_found() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        let mut ghost = a.clone();
        ghost.id = 404;

        assert!(matches!(
            fx.store.update(ghost).await,
            Err(BoardError::NotFound(_))
        ));
        assert_eq!(fx.api.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_edit_changes_fields_only() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::InProgress)).await.unwrap();

        let edited = fx
            .store
            .edit(
                a.id,
                TaskUpdate {
                    title: Some("A, renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.title, "A, renamed");
        assert_eq!(edited.status, TaskStatus::InProgress);
        assert_eq!(fx.api.stored(a.id).await.unwrap().title, "A, renamed");
    }

    #[tokio::test]
    async fn test_remove() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        let b = fx.store.add(TaskDraft::new("B", TaskStatus::ToDo)).await.unwrap();

        assert!(matches!(
            fx.store.remove(a.id, TaskStatus::Done).await,
            Err(BoardError::NotFound(_))
        ));

        fx.store.remove(a.id, TaskStatus::ToDo).await.unwrap();
        assert_eq!(ids(fx.store.column(TaskStatus::ToDo)), vec![b.id]);
        assert_eq!(fx.store.column(TaskStatus::ToDo)[0].position, 0);
        assert!(fx.api.stored(a.id).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_task() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        fx.api.set_offline(true);

        assert!(fx.store.remove(a.id, TaskStatus::ToDo).await.is_err());
        assert!(fx.store.find(a.id).is_some());
    }

    #[tokio::test]
    async fn test_add_succeeds_when_cache_rejects_write() {
        let mut fx = fixture();
        fx.cache.set_reject_writes(true);

        let created = fx
            .store
            .add(TaskDraft::new("Fix bug", TaskStatus::ToDo))
            .await
            .unwrap();

        assert_eq!(ids(fx.store.column(TaskStatus::ToDo)), vec![created.id]);
        assert!(fx.api.stored(created.id).await.is_some());
        assert_eq!(fx.store.notices().len(), 1);
        assert!(fx.cache.get("tasks_p1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_edit_succeeds_when_cache_rejects_write() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        let moved = fx.store.move_to_column(a.id, TaskStatus::Done).await.unwrap();
        assert_eq!(moved.status, TaskStatus::Done);

        fx.cache.set_reject_writes(true);
        let edited = fx
            .store
            .edit(
                a.id,
                TaskUpdate {
                    title: Some("A2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.title, "A2");
        assert_eq!(fx.store.find(a.id).unwrap().title, "A2");
    }

    #[tokio::test]
    async fn test_archive_cache_failure_reverts() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        fx.cache.set_reject_writes(true);

        assert!(matches!(fx.store.archive(a.id), Err(BoardError::Cache(_))));
        assert!(fx.store.find(a.id).is_some());
        assert!(fx.store.archived().is_empty());
    }

    #[tokio::test]
    async fn test_archive_restore_roundtrip() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::InProgress)).await.unwrap();
        let b = fx.store.add(TaskDraft::new("B", TaskStatus::InProgress)).await.unwrap();

        fx.store.archive(a.id).unwrap();
        assert_eq!(ids(fx.store.column(TaskStatus::InProgress)), vec![b.id]);
        assert_eq!(fx.store.archived().len(), 1);
        fx.store.verify_invariants().unwrap();

        let restored = fx.store.restore(a.id).unwrap();
        let mut expected = a.clone();
        expected.position = 1;
        assert_eq!(restored, expected);
        assert_eq!(ids(fx.store.column(TaskStatus::InProgress)), vec![b.id, a.id]);
        assert!(fx.store.archived().is_empty());

        assert!(matches!(
            fx.store.restore(a.id),
            Err(BoardError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reorder_with_foreign_task_is_rejected() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::ToDo)).await.unwrap();
        let b = fx.store.add(TaskDraft::new("B", TaskStatus::Done)).await.unwrap();

        let result = fx.store.reorder_column(TaskStatus::ToDo, vec![b, a]).await;
        assert!(matches!(result, Err(BoardError::NotFound(_))));
        assert_eq!(fx.api.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_store_hydrates_from_cache() {
        let mut fx = fixture();
        let a = fx.store.add(TaskDraft::new("A", TaskStatus::Done)).await.unwrap();
        let b = fx.store.add(TaskDraft::new("B", TaskStatus::Done)).await.unwrap();
        fx.store.archive(b.id).unwrap();

        let reopened = BoardStore::new(
            BoardSession::new("p1", "alice"),
            fx.api.clone(),
            CacheAdapter::new(fx.cache.clone()),
        );
        assert_eq!(ids(reopened.column(TaskStatus::Done)), vec![a.id]);
        assert_eq!(reopened.archived().len(), 1);

        let other_user = BoardStore::new(
            BoardSession::new("p1", "bob"),
            fx.api.clone(),
            CacheAdapter::new(fx.cache.clone()),
        );
        assert!(other_user.archived().is_empty());
    }
}
