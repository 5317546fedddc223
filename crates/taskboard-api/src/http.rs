use async_trait::async_trait;
use std::time::Duration;
use taskboard_core::{AppConfig, BoardError, BoardResult};
use taskboard_domain::{Task, TaskFields, TaskId};

use crate::traits::TaskApi;

/// REST client for the remote task API.
///
/// Routes:
/// - `GET    {base}/projects/{project}/tasks`
/// - `POST   {base}/tasks`
/// - `PUT    {base}/tasks/{id}`
/// - `DELETE {base}/tasks/{id}`
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

fn network(context: &str, err: reqwest::Error) -> BoardError {
    BoardError::Network(format!("{}: {}", context, err))
}

impl HttpTaskApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> BoardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("taskboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BoardError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Returns `None` when no API URL is configured.
    pub fn from_config(config: &AppConfig) -> BoardResult<Option<Self>> {
        match config.api_url.as_deref() {
            Some(url) => Self::new(url, config.api_token.clone(), config.request_timeout()).map(Some),
            None => Ok(None),
        }
    }

    pub fn project_tasks_url(&self, project_id: &str) -> String {
        format!("{}/projects/{}/tasks", self.base_url, project_id)
    }

    pub fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    pub fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        context: &str,
        request: reqwest::RequestBuilder,
    ) -> BoardResult<reqwest::Response> {
        let response = self
            .authorize(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| network(context, e))?;
        response.error_for_status().map_err(|e| network(context, e))
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn fetch_tasks_by_project(&self, project_id: &str) -> BoardResult<Vec<Task>> {
        let context = "Failed to fetch project tasks";
        let tasks = self
            .send(context, self.client.get(self.project_tasks_url(project_id)))
            .await?
            .json::<Vec<Task>>()
            .await
            .map_err(|e| network(context, e))?;
        tracing::debug!("Fetched {} tasks for project {}", tasks.len(), project_id);
        Ok(tasks)
    }

    async fn create_task(&self, fields: TaskFields) -> BoardResult<Task> {
        let context = "Failed to create task";
        self.send(context, self.client.post(self.tasks_url()).json(&fields))
            .await?
            .json::<Task>()
            .await
            .map_err(|e| network(context, e))
    }

    async fn update_task(&self, id: TaskId, fields: TaskFields) -> BoardResult<Task> {
        let context = "Failed to update task";
        self.send(context, self.client.put(self.task_url(id)).json(&fields))
            .await?
            .json::<Task>()
            .await
            .map_err(|e| network(context, e))
    }

    async fn delete_task(&self, id: TaskId) -> BoardResult<()> {
        self.send("Failed to delete task", self.client.delete(self.task_url(id)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::{TaskDraft, TaskStatus};

    #[test]
    fn test_urls_trim_trailing_slash() {
        let api = HttpTaskApi::new("http://localhost:8080/api/", None, Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            api.project_tasks_url("p1"),
            "http://localhost:8080/api/projects/p1/tasks"
        );
        assert_eq!(api.tasks_url(), "http://localhost:8080/api/tasks");
        assert_eq!(api.task_url(7), "http://localhost:8080/api/tasks/7");
    }

    #[test]
    fn test_from_config_without_url() {
        let config = AppConfig::default();
        assert!(HttpTaskApi::from_config(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let api = HttpTaskApi::new(
            &format!("http://127.0.0.1:{}", port),
            None,
            Duration::from_secs(2),
        )
        .unwrap();

        let fetch = api.fetch_tasks_by_project("p1").await;
        assert!(matches!(fetch, Err(BoardError::Network(_))));

        let fields = TaskDraft::new("Fix bug", TaskStatus::ToDo).into_fields(
            "p1".to_string(),
            "u1".to_string(),
            0,
        );
        let create = api.create_task(fields).await;
        assert!(matches!(create, Err(BoardError::Network(_))));
    }
}
