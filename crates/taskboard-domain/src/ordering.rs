//! Positional rules for a single column.
//!
//! Pure functions over ordered task lists. A committed column always has
//! positions `0..n-1` in list order.

use crate::task::{Task, TaskId};

/// Rewrite positions to match list order.
pub fn compact_positions(tasks: &mut [Task]) {
    for (index, task) in tasks.iter_mut().enumerate() {
        task.position = index as u32;
    }
}

/// Order tasks by stored position, ties broken by id, then renumber densely.
pub fn normalize(tasks: &mut Vec<Task>) {
    tasks.sort_by_key(|t| (t.position, t.id));
    compact_positions(tasks);
}

pub fn is_dense(tasks: &[Task]) -> bool {
    tasks
        .iter()
        .enumerate()
        .all(|(index, task)| task.position as usize == index)
}

pub fn index_of(tasks: &[Task], task_id: TaskId) -> Option<usize> {
    tasks.iter().position(|t| t.id == task_id)
}

/// Move the task at `from` to `to`, returning the renumbered column.
/// `to` is clamped to the last index.
pub fn move_within(tasks: &[Task], from: usize, to: usize) -> Vec<Task> {
    let mut ordered = tasks.to_vec();
    if from >= ordered.len() {
        return ordered;
    }
    let task = ordered.remove(from);
    let to = to.min(ordered.len());
    ordered.insert(to, task);
    compact_positions(&mut ordered);
    ordered
}

/// Tasks in `after` whose position differs from their position in `before`.
/// Tasks absent from `before` count as changed.
pub fn changed_positions<'a>(before: &[Task], after: &'a [Task]) -> Vec<&'a Task> {
    after
        .iter()
        .filter(|task| {
            before
                .iter()
                .find(|b| b.id == task.id)
                .map_or(true, |b| b.position != task.position)
        })
        .collect()
}

/// True when both lists hold the same task ids, ignoring order.
pub fn same_members(a: &[Task], b: &[Task]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<TaskId> = a.iter().map(|t| t.id).collect();
    let mut right: Vec<TaskId> = b.iter().map(|t| t.id).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}
