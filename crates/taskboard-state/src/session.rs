use serde::{Deserialize, Serialize};
use taskboard_domain::{ProjectId, UserId};

/// Who is looking at which board. Scopes the cached board (by project)
/// and the archive (by acting user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSession {
    pub project_id: ProjectId,
    pub user_id: UserId,
}

impl BoardSession {
    pub fn new(project_id: impl Into<ProjectId>, user_id: impl Into<UserId>) -> Self {
        Self {
            project_id: project_id.into(),
            user_id: user_id.into(),
        }
    }
}
