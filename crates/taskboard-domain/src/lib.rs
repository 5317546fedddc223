pub mod archived_task;
pub mod board;
pub mod label;
pub mod ordering;
pub mod snapshot;
pub mod task;

pub use archived_task::ArchivedTask;
pub use board::Board;
pub use label::{Label, LabelColor, LabelId};
pub use snapshot::BoardSnapshot;
pub use task::{
    ProjectId, Task, TaskDraft, TaskFields, TaskId, TaskPriority, TaskStatus, TaskType,
    TaskUpdate, UserId,
};
