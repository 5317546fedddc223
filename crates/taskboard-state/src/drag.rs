use serde::{Deserialize, Serialize};
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{ordering, Task, TaskId, TaskStatus};

use crate::store::BoardStore;

/// Identity of the card being dragged: which task, picked up from which column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragContext {
    pub task_id: TaskId,
    pub source_status: TaskStatus,
}

impl DragContext {
    pub fn new(task_id: TaskId, source_status: TaskStatus) -> Self {
        Self {
            task_id,
            source_status,
        }
    }
}

/// What the pointer was over when the gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// A card row inside a column.
    Task { task_id: TaskId, status: TaskStatus },
    /// A column body, outside any card.
    Column(TaskStatus),
}

impl DropTarget {
    pub fn status(&self) -> TaskStatus {
        match *self {
            Self::Task { status, .. } => status,
            Self::Column(status) => status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No gesture was active.
    Ignored,
    /// Dropped outside any target; nothing changed.
    Cancelled,
    /// Dropped on its own slot.
    Unchanged,
    /// New order committed within the source column.
    Reordered { status: TaskStatus, from: usize, to: usize },
    /// Committed to the end of another column.
    Moved(Task),
}

/// Turns drag gestures into board operations.
///
/// Holds at most one active gesture. The slot is cleared as soon as a drop
/// is processed, before the remote call that follows resolves.
#[derive(Debug, Default)]
pub struct DragOrchestrator {
    active: Option<DragContext>,
}

impl DragOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a gesture. Returns false, changing nothing, if one is already active.
    pub fn start(&mut self, context: DragContext) -> bool {
        if let Some(active) = self.active {
            tracing::debug!(
                "Ignoring drag of task {}: task {} is already being dragged",
                context.task_id,
                active.task_id
            );
            return false;
        }
        tracing::debug!(
            "Drag started: task {} from {}",
            context.task_id,
            context.source_status
        );
        self.active = Some(context);
        true
    }

    pub fn active(&self) -> Option<&DragContext> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The task to draw in the drag overlay.
    pub fn active_task<'a>(&self, store: &'a BoardStore) -> Option<&'a Task> {
        self.active.and_then(|ctx| store.find(ctx.task_id))
    }

    /// Abort the gesture without touching the board.
    pub fn cancel(&mut self) {
        if let Some(ctx) = self.active.take() {
            tracing::debug!("Drag of task {} cancelled", ctx.task_id);
        }
    }

    /// Finish the gesture over `over` and commit the result.
    pub async fn end(
        &mut self,
        store: &mut BoardStore,
        over: Option<DropTarget>,
    ) -> BoardResult<DropOutcome> {
        let Some(active) = self.active.take() else {
            return Ok(DropOutcome::Ignored);
        };
        let Some(over) = over else {
            tracing::debug!("Drag of task {} ended outside any column", active.task_id);
            return Ok(DropOutcome::Cancelled);
        };

        let dest = over.status();
        if dest == active.source_status {
            self.drop_in_column(store, active, over).await
        } else if store.board().locate(active.task_id).map(|(s, _)| s) == Some(dest) {
            tracing::debug!(
                "Task {} is already in {}; stale drag source {}",
                active.task_id,
                dest,
                active.source_status
            );
            Ok(DropOutcome::Unchanged)
        } else {
            let moved = store.move_to_column(active.task_id, dest).await?;
            Ok(DropOutcome::Moved(moved))
        }
    }

    async fn drop_in_column(
        &self,
        store: &mut BoardStore,
        active: DragContext,
        over: DropTarget,
    ) -> BoardResult<DropOutcome> {
        let status = active.source_status;
        let column = store.column(status);
        let Some(from) = ordering::index_of(column, active.task_id) else {
            return Err(BoardError::not_found(format!(
                "task {} in {}",
                active.task_id, status
            )));
        };

        let to = match over {
            DropTarget::Task { task_id, .. } => match ordering::index_of(column, task_id) {
                Some(index) => index,
                None => {
                    return Err(BoardError::not_found(format!("task {} in {}", task_id, status)))
                }
            },
            DropTarget::Column(_) => column.len().saturating_sub(1),
        };

        if from == to {
            return Ok(DropOutcome::Unchanged);
        }

        let ordered = ordering::move_within(column, from, to);
        store.reorder_column(status, ordered).await?;
        Ok(DropOutcome::Reordered { status, from, to })
    }
}
