use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// A task hidden from the active board. The task itself is kept verbatim,
/// including the status it returns to on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedTask {
    pub task: Task,
    pub archived_at: DateTime<Utc>,
}

impl ArchivedTask {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            archived_at: Utc::now(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.task.id
    }

    pub fn into_task(self) -> Task {
        self.task
    }

    pub fn task_ref(&self) -> &Task {
        &self.task
    }
}

impl From<ArchivedTask> for Task {
    fn from(archived: ArchivedTask) -> Self {
        archived.task
    }
}
