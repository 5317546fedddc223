use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use taskboard_api::{HttpTaskApi, LocalTaskApi, TaskApi};
use taskboard_core::AppConfig;
use taskboard_domain::{LabelId, Task, TaskId};
use taskboard_persistence::{CacheAdapter, JsonFileCache};
use taskboard_state::{BoardSession, BoardStore, DragOrchestrator, LabelRegistry};

use crate::cli::Cli;

const LOCAL_API_FILE: &str = "local_api.json";

/// Everything one command needs: the board, the shared labels, and a drag
/// slot for move and reorder.
pub struct CliContext {
    pub store: BoardStore,
    pub labels: LabelRegistry,
    pub drag: DragOrchestrator,
}

impl CliContext {
    pub async fn open(cli: &Cli, config: AppConfig) -> anyhow::Result<Self> {
        let project_id = cli
            .project
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--project is required (or set TASKBOARD_PROJECT)"))?;
        let user_id = cli
            .user
            .clone()
            .unwrap_or_else(|| config.effective_user_id().to_string());
        let cache_dir = cli
            .cache_dir
            .clone()
            .unwrap_or_else(|| config.effective_cache_dir());

        let api = Self::open_api(cli, &config, &cache_dir).await?;
        let cache = CacheAdapter::new(Arc::new(JsonFileCache::new(&cache_dir)));
        tracing::debug!(
            "Opening board {} for {} (cache: {})",
            project_id,
            user_id,
            cache_dir.display()
        );

        let store = BoardStore::new(BoardSession::new(project_id, user_id), api, cache.clone())
            .with_notice_ttl(config.notice_ttl());
        let labels = LabelRegistry::new(cache);
        Ok(Self {
            store,
            labels,
            drag: DragOrchestrator::new(),
        })
    }

    async fn open_api(
        cli: &Cli,
        config: &AppConfig,
        cache_dir: &std::path::Path,
    ) -> anyhow::Result<Arc<dyn TaskApi>> {
        if let Some(url) = cli.api_url.as_deref().or(config.api_url.as_deref()) {
            let http = HttpTaskApi::new(url, config.api_token.clone(), config.request_timeout())?;
            return Ok(Arc::new(http));
        }

        let path: PathBuf = cli
            .local_api
            .clone()
            .unwrap_or_else(|| cache_dir.join(LOCAL_API_FILE));
        let local = LocalTaskApi::open(&path)
            .await
            .with_context(|| format!("Failed to open task record {}", path.display()))?;
        Ok(Arc::new(local))
    }

    pub fn task(&self, id: TaskId) -> anyhow::Result<&Task> {
        self.store
            .find(id)
            .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))
    }

    /// Resolve a label by name, falling back to its id.
    pub fn resolve_label(&self, key: &str) -> anyhow::Result<LabelId> {
        if let Some(label) = self.labels.find_by_name(key) {
            return Ok(label.id);
        }
        key.parse::<LabelId>()
            .ok()
            .and_then(|id| self.labels.get(id))
            .map(|label| label.id)
            .ok_or_else(|| anyhow::anyhow!("Label not found: {}", key))
    }

    pub fn resolve_labels(&self, keys: &[String]) -> anyhow::Result<Vec<LabelId>> {
        keys.iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(|k| self.resolve_label(k))
            .collect()
    }
}
