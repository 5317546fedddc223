use std::collections::BTreeSet;
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{Label, LabelColor, LabelId, Task};
use taskboard_persistence::CacheAdapter;

/// Answers whether any task, active or archived, carries a label.
pub trait LabelUsage {
    fn label_in_use(&self, label_id: LabelId) -> bool;
}

/// Shared catalog of labels plus the current filter selection.
pub struct LabelRegistry {
    cache: CacheAdapter,
    labels: Vec<Label>,
    selected: BTreeSet<LabelId>,
}

impl LabelRegistry {
    pub fn new(cache: CacheAdapter) -> Self {
        let labels = cache.load_labels();
        let selected = cache
            .load_selected_labels()
            .into_iter()
            .filter(|id| labels.iter().any(|l| l.id == *id))
            .collect();
        Self {
            cache,
            labels,
            selected,
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn selected(&self) -> &BTreeSet<LabelId> {
        &self.selected
    }

    pub fn get(&self, label_id: LabelId) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == label_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Label> {
        self.labels
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn create(&mut self, name: String, color: LabelColor) -> BoardResult<Label> {
        let label = Label::new(name, color);
        self.add(label.clone())?;
        Ok(label)
    }

    pub fn add(&mut self, label: Label) -> BoardResult<()> {
        tracing::info!("Adding label: {} ({})", label.name, label.color);
        self.labels.push(label);
        if let Err(e) = self.cache.save_labels(&self.labels) {
            self.labels.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove a label nobody references. Referenced labels are refused with
    /// a guard error and the registry is left as it was.
    pub fn remove(&mut self, label_id: LabelId, usage: &impl LabelUsage) -> BoardResult<Label> {
        let Some(index) = self.labels.iter().position(|l| l.id == label_id) else {
            return Err(BoardError::not_found(format!("label {}", label_id)));
        };
        if usage.label_in_use(label_id) {
            return Err(BoardError::Guard(format!(
                "label '{}' is still attached to tasks",
                self.labels[index].name
            )));
        }

        let label = self.labels.remove(index);
        let was_selected = self.selected.remove(&label_id);
        if let Err(e) = self.persist() {
            self.labels.insert(index, label);
            if was_selected {
                self.selected.insert(label_id);
            }
            return Err(e);
        }
        tracing::info!("Removed label: {}", label.name);
        Ok(label)
    }

    /// Replace the filter selection. Unknown ids are dropped.
    pub fn toggle_selection(&mut self, ids: impl IntoIterator<Item = LabelId>) -> BoardResult<()> {
        let next: BTreeSet<LabelId> = ids
            .into_iter()
            .filter(|id| self.get(*id).is_some())
            .collect();
        self.cache.save_selected_labels(&next)?;
        self.selected = next;
        Ok(())
    }

    /// Tasks visible under the current selection: those carrying any
    /// selected label, or all of them when nothing is selected.
    pub fn filter_tasks<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks
            .iter()
            .filter(|t| {
                self.selected.is_empty() || t.labels.iter().any(|l| self.selected.contains(l))
            })
            .collect()
    }

    fn persist(&self) -> BoardResult<()> {
        self.cache.save_labels(&self.labels)?;
        self.cache.save_selected_labels(&self.selected)
    }
}
