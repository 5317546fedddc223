use serde::{Deserialize, Serialize};

use crate::label::LabelId;
use crate::ordering;
use crate::task::{ProjectId, Task, TaskId, TaskStatus};

/// The three ordered columns of one project.
///
/// Every mutating method leaves the touched columns with dense positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub project_id: ProjectId,
    #[serde(default)]
    todo: Vec<Task>,
    #[serde(default)]
    in_progress: Vec<Task>,
    #[serde(default)]
    done: Vec<Task>,
}

impl Board {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            todo: Vec::new(),
            in_progress: Vec::new(),
            done: Vec::new(),
        }
    }

    /// Group tasks by status, ordered by their stored positions.
    pub fn from_tasks(project_id: ProjectId, tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::new(project_id);
        for task in tasks {
            board.column_mut(task.status).push(task);
        }
        for status in TaskStatus::ALL {
            ordering::normalize(board.column_mut(status));
        }
        board
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::ToDo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::ToDo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.todo
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.done.iter())
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column and index currently holding `task_id`.
    pub fn locate(&self, task_id: TaskId) -> Option<(TaskStatus, usize)> {
        TaskStatus::ALL.into_iter().find_map(|status| {
            ordering::index_of(self.column(status), task_id).map(|index| (status, index))
        })
    }

    pub fn find(&self, task_id: TaskId) -> Option<&Task> {
        self.locate(task_id)
            .map(|(status, index)| &self.column(status)[index])
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.locate(task_id).is_some()
    }

    pub fn references_label(&self, label_id: LabelId) -> bool {
        self.tasks().any(|t| t.has_label(label_id))
    }

    /// Append to the end of the column named by the task's status.
    pub fn append(&mut self, mut task: Task) {
        let column = self.column_mut(task.status);
        task.position = column.len() as u32;
        column.push(task);
    }

    /// Insert into the column named by the task's status at its position,
    /// clamped to the column length.
    pub fn insert_at_position(&mut self, task: Task) {
        let column = self.column_mut(task.status);
        let index = (task.position as usize).min(column.len());
        column.insert(index, task);
        ordering::compact_positions(column);
    }

    /// Remove a task wherever it is, compacting the column it left.
    /// Returns the task and the index it occupied.
    pub fn take(&mut self, task_id: TaskId) -> Option<(Task, usize)> {
        let (status, index) = self.locate(task_id)?;
        let column = self.column_mut(status);
        let task = column.remove(index);
        ordering::compact_positions(column);
        Some((task, index))
    }

    /// Remove a task only if it sits in `status`.
    pub fn take_from(&mut self, status: TaskStatus, task_id: TaskId) -> Option<Task> {
        let column = self.column_mut(status);
        let index = ordering::index_of(column, task_id)?;
        let task = column.remove(index);
        ordering::compact_positions(column);
        Some(task)
    }

    /// Replace a column wholesale. Statuses are forced to the column and
    /// positions follow list order.
    pub fn replace_column(&mut self, status: TaskStatus, tasks: Vec<Task>) {
        let column = self.column_mut(status);
        *column = tasks;
        for task in column.iter_mut() {
            task.status = status;
        }
        ordering::compact_positions(column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::Utc;

    fn task(id: TaskId, status: TaskStatus, position: u32) -> Task {
        let fields = TaskDraft::new(format!("T{}", id), status).into_fields(
            "p1".to_string(),
            "u1".to_string(),
            position,
        );
        Task::from_fields(id, fields, Utc::now())
    }

    fn ids(tasks: &[Task]) -> Vec<TaskId> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_from_tasks_groups_and_sorts() {
        let board = Board::from_tasks(
            "p1".to_string(),
            vec![
                task(1, TaskStatus::ToDo, 1),
                task(2, TaskStatus::Done, 0),
                task(3, TaskStatus::ToDo, 0),
                task(4, TaskStatus::ToDo, 7),
            ],
        );

        assert_eq!(ids(board.column(TaskStatus::ToDo)), vec![3, 1, 4]);
        assert!(ordering::is_dense(board.column(TaskStatus::ToDo)));
        assert_eq!(ids(board.column(TaskStatus::Done)), vec![2]);
        assert!(board.column(TaskStatus::InProgress).is_empty());
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn test_append_sets_end_position() {
        let mut board = Board::new("p1".to_string());
        board.append(task(1, TaskStatus::ToDo, 42));
        board.append(task(2, TaskStatus::ToDo, 0));

        let column = board.column(TaskStatus::ToDo);
        assert_eq!(ids(column), vec![1, 2]);
        assert_eq!(column[1].position, 1);
    }

    #[test]
    fn test_take_compacts_source() {
        let mut board = Board::from_tasks(
            "p1".to_string(),
            vec![
                task(1, TaskStatus::ToDo, 0),
                task(2, TaskStatus::ToDo, 1),
                task(3, TaskStatus::ToDo, 2),
            ],
        );

        let (taken, index) = board.take(2).unwrap();
        assert_eq!(taken.id, 2);
        assert_eq!(index, 1);
        assert_eq!(ids(board.column(TaskStatus::ToDo)), vec![1, 3]);
        assert!(ordering::is_dense(board.column(TaskStatus::ToDo)));
        assert!(board.take(2).is_none());
    }

    #[test]
    fn test_take_from_checks_column() {
        let mut board = Board::from_tasks("p1".to_string(), vec![task(1, TaskStatus::Done, 0)]);
        assert!(board.take_from(TaskStatus::ToDo, 1).is_none());
        assert!(board.take_from(TaskStatus::Done, 1).is_some());
        assert!(board.is_empty());
    }

    #[test]
    fn test_insert_at_position_clamps() {
        let mut board = Board::from_tasks(
            "p1".to_string(),
            vec![task(1, TaskStatus::ToDo, 0), task(2, TaskStatus::ToDo, 1)],
        );
        board.insert_at_position(task(3, TaskStatus::ToDo, 0));
        board.insert_at_position(task(4, TaskStatus::ToDo, 50));

        assert_eq!(ids(board.column(TaskStatus::ToDo)), vec![3, 1, 2, 4]);
        assert!(ordering::is_dense(board.column(TaskStatus::ToDo)));
    }

    #[test]
    fn test_locate_and_label_references() {
        let label = uuid::Uuid::new_v4();
        let mut labelled = task(5, TaskStatus::InProgress, 0);
        labelled.labels.insert(label);
        let board = Board::from_tasks("p1".to_string(), vec![labelled]);

        assert_eq!(board.locate(5), Some((TaskStatus::InProgress, 0)));
        assert!(board.references_label(label));
        assert!(!board.references_label(uuid::Uuid::new_v4()));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let board = Board::from_tasks(
            "p1".to_string(),
            vec![task(1, TaskStatus::ToDo, 0), task(2, TaskStatus::Done, 0)],
        );
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }
}
