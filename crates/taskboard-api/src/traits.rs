use async_trait::async_trait;
use taskboard_core::BoardResult;
use taskboard_domain::{Task, TaskFields, TaskId};

/// The remote system of record for task content, status and position.
///
/// Every failure, whether transport or a rejected request, surfaces as
/// `BoardError::Network`.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn fetch_tasks_by_project(&self, project_id: &str) -> BoardResult<Vec<Task>>;

    async fn create_task(&self, fields: TaskFields) -> BoardResult<Task>;

    /// Full-field update. The server stores `fields.position` as given.
    async fn update_task(&self, id: TaskId, fields: TaskFields) -> BoardResult<Task>;

    async fn delete_task(&self, id: TaskId) -> BoardResult<()>;
}
