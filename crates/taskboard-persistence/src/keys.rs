//! Cache key layout. Board state is scoped by project, archives by acting
//! user, and labels are global to the board instance.

pub const AVAILABLE_LABELS: &str = "availableLabels";
pub const SELECTED_LABELS: &str = "selectedLabels";

pub fn tasks(project_id: &str) -> String {
    format!("tasks_{}", project_id)
}

pub fn archived_tasks(user_id: &str) -> String {
    format!("archivedTasks_{}", user_id)
}
