//! Point-in-time capture of the parts of a board an operation touches.
//!
//! Optimistic commits capture a `BoardSnapshot` before mutating, and
//! restore it verbatim when the remote call is rejected.

use crate::{ArchivedTask, Board, Task, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    columns: Vec<(TaskStatus, Vec<Task>)>,
    archive: Option<Vec<ArchivedTask>>,
}

impl BoardSnapshot {
    /// Capture the given columns. Duplicated statuses are captured once.
    pub fn capture(board: &Board, statuses: &[TaskStatus]) -> Self {
        let mut columns: Vec<(TaskStatus, Vec<Task>)> = Vec::with_capacity(statuses.len());
        for &status in statuses {
            if columns.iter().all(|(s, _)| *s != status) {
                columns.push((status, board.column(status).to_vec()));
            }
        }
        Self {
            columns,
            archive: None,
        }
    }

    /// Also capture an archive list.
    pub fn with_archive(mut self, archive: &[ArchivedTask]) -> Self {
        self.archive = Some(archive.to_vec());
        self
    }

    pub fn statuses(&self) -> impl Iterator<Item = TaskStatus> + '_ {
        self.columns.iter().map(|(status, _)| *status)
    }

    /// Put the captured columns (and archive, if captured) back.
    pub fn restore(self, board: &mut Board, archive: &mut Vec<ArchivedTask>) {
        for (status, tasks) in self.columns {
            board.replace_column(status, tasks);
        }
        if let Some(saved) = self.archive {
            *archive = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskDraft;
    use chrono::Utc;

    fn task(id: u64, status: TaskStatus, position: u32) -> Task {
        let fields = TaskDraft::new(format!("T{}", id), status).into_fields(
            "p1".to_string(),
            "u1".to_string(),
            position,
        );
        Task::from_fields(id, fields, Utc::now())
    }

    #[test]
    fn test_restore_columns_exactly() {
        let mut board = Board::from_tasks(
            "p1".to_string(),
            vec![
                task(1, TaskStatus::ToDo, 0),
                task(2, TaskStatus::ToDo, 1),
                task(3, TaskStatus::InProgress, 0),
            ],
        );
        let original = board.clone();
        let mut archive = Vec::new();

        let snapshot =
            BoardSnapshot::capture(&board, &[TaskStatus::InProgress, TaskStatus::ToDo]);
        let (moved, _) = board.take(3).unwrap();
        let mut moved = moved;
        moved.status = TaskStatus::ToDo;
        board.append(moved);
        assert_ne!(board, original);

        snapshot.restore(&mut board, &mut archive);
        assert_eq!(board, original);
    }

    #[test]
    fn test_capture_deduplicates_statuses() {
        let board = Board::new("p1".to_string());
        let snapshot = BoardSnapshot::capture(&board, &[TaskStatus::Done, TaskStatus::Done]);
        assert_eq!(snapshot.statuses().count(), 1);
    }

    #[test]
    fn test_restore_archive_only_when_captured() {
        let mut board = Board::new("p1".to_string());
        let mut archive = vec![ArchivedTask::new(task(9, TaskStatus::Done, 0))];

        BoardSnapshot::capture(&board, &[]).restore(&mut board, &mut archive);
        assert_eq!(archive.len(), 1);

        BoardSnapshot::capture(&board, &[])
            .with_archive(&[])
            .restore(&mut board, &mut archive);
        assert!(archive.is_empty());
    }
}
