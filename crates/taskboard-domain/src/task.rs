use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::label::LabelId;

/// Server-assigned task identifier.
pub type TaskId = u64;
pub type ProjectId = String;
pub type UserId = String;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Board column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "todo" | "to-do" => Ok(Self::ToDo),
            "in-progress" | "inprogress" | "doing" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!(
                "Invalid status: {}. Use todo, in-progress, or done",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    High,
    #[default]
    Low,
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            other => Err(format!("Invalid priority: {}. Use high or low", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Bug,
    #[default]
    Feature,
    Improvement,
    Research,
    Documentation,
    Custom(String),
}

impl FromStr for TaskType {
    type Err = String;

    /// Unknown names become a custom type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Task type cannot be empty".to_string());
        }
        Ok(match trimmed.to_lowercase().as_str() {
            "bug" => Self::Bug,
            "feature" => Self::Feature,
            "improvement" => Self::Improvement,
            "research" => Self::Research,
            "documentation" | "docs" => Self::Documentation,
            _ => Self::Custom(trimmed.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub labels: BTreeSet<LabelId>,
    pub position: u32,
    pub creator_id: UserId,
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments_count: u32,
}

impl Task {
    pub fn from_fields(id: TaskId, fields: TaskFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            task_type: fields.task_type,
            labels: fields.labels,
            position: fields.position,
            creator_id: fields.creator_id,
            project_id: fields.project_id,
            created_at,
            comments_count: 0,
        }
    }

    /// Full-field payload for an update request.
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            task_type: self.task_type.clone(),
            labels: self.labels.clone(),
            position: self.position,
            creator_id: self.creator_id.clone(),
            project_id: self.project_id.clone(),
        }
    }

    pub fn has_label(&self, label_id: LabelId) -> bool {
        self.labels.contains(&label_id)
    }

    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(task_type) = update.task_type {
            self.task_type = task_type;
        }
        if let Some(labels) = update.labels {
            self.labels = labels;
        }
    }
}

/// Request body for create and update calls. The server stores `position` as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub labels: BTreeSet<LabelId>,
    pub position: u32,
    pub creator_id: UserId,
    pub project_id: ProjectId,
}

/// User input for a new task. Nothing beyond presence is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub task_type: TaskType,
    pub labels: BTreeSet<LabelId>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            status,
            ..Default::default()
        }
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = LabelId>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    pub fn into_fields(self, project_id: ProjectId, creator_id: UserId, position: u32) -> TaskFields {
        TaskFields {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            task_type: self.task_type,
            labels: self.labels,
            position,
            creator_id,
            project_id,
        }
    }
}

/// Field edits that leave column membership alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub task_type: Option<TaskType>,
    pub labels: Option<BTreeSet<LabelId>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.task_type.is_none()
            && self.labels.is_none()
    }
}
