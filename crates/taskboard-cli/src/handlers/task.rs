use crate::cli::{TaskAction, TaskAddArgs, TaskEditArgs};
use crate::context::CliContext;
use crate::output;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use taskboard_domain::{TaskDraft, TaskId, TaskPriority, TaskStatus, TaskType, TaskUpdate};
use taskboard_state::{DragContext, DropOutcome, DropTarget};

pub async fn handle(ctx: &mut CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::Add(args) => {
            let draft = build_draft(ctx, args)?;
            let task = ctx.store.add(draft).await?;
            output::output_success(&task);
        }
        TaskAction::Edit(args) => {
            let id = args.id;
            let changes = build_update(ctx, args)?;
            if changes.is_empty() {
                anyhow::bail!("Nothing to update for task {}", id);
            }
            let task = ctx.store.edit(id, changes).await?;
            output::output_success(&task);
        }
        TaskAction::Move { id, to, over } => {
            let source = ctx.task(id)?.status;
            let target = match over {
                Some(over_id) => DropTarget::Task {
                    task_id: over_id,
                    status: ctx.task(over_id)?.status,
                },
                None => {
                    let to = to.ok_or_else(|| anyhow::anyhow!("--to or --over is required"))?;
                    DropTarget::Column(parse_status(&to)?)
                }
            };
            let outcome = drop_task(ctx, id, source, target).await?;
            output::output_success(outcome);
        }
        TaskAction::Reorder { id, index } => {
            let status = ctx.task(id)?.status;
            let target = match ctx.store.column(status).get(index) {
                Some(row) => DropTarget::Task {
                    task_id: row.id,
                    status,
                },
                None => DropTarget::Column(status),
            };
            let outcome = drop_task(ctx, id, status, target).await?;
            output::output_success(outcome);
        }
        TaskAction::Archive { id } => {
            ctx.store.archive(id)?;
            output::output_success(json!({"archived": id}));
        }
        TaskAction::Restore { id } => {
            let task = ctx.store.restore(id)?;
            output::output_success(&task);
        }
        TaskAction::Delete { id } => {
            let status = ctx.task(id)?.status;
            ctx.store.remove(id, status).await?;
            output::output_success(json!({"deleted": id}));
        }
        TaskAction::Archived => {
            output::output_list(ctx.store.archived().to_vec());
        }
    }
    Ok(())
}

/// Play a pick-up and drop through the drag slot.
async fn drop_task(
    ctx: &mut CliContext,
    id: TaskId,
    source: TaskStatus,
    target: DropTarget,
) -> anyhow::Result<Value> {
    if !ctx.drag.start(DragContext::new(id, source)) {
        anyhow::bail!("Another drag is already in progress");
    }
    let outcome = ctx.drag.end(&mut ctx.store, Some(target)).await?;
    Ok(outcome_json(&outcome))
}

fn outcome_json(outcome: &DropOutcome) -> Value {
    match outcome {
        DropOutcome::Ignored | DropOutcome::Cancelled | DropOutcome::Unchanged => {
            json!({"outcome": "unchanged"})
        }
        DropOutcome::Reordered { status, from, to } => json!({
            "outcome": "reordered",
            "status": status,
            "from": from,
            "to": to,
        }),
        DropOutcome::Moved(task) => json!({"outcome": "moved", "task": task}),
    }
}

fn parse_status(s: &str) -> anyhow::Result<TaskStatus> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn parse_priority(s: &str) -> anyhow::Result<TaskPriority> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn parse_type(s: &str) -> anyhow::Result<TaskType> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn build_draft(ctx: &CliContext, args: TaskAddArgs) -> anyhow::Result<TaskDraft> {
    let mut draft = TaskDraft::new(args.title, parse_status(&args.status)?)
        .with_labels(ctx.resolve_labels(&args.labels)?);
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(priority) = args.priority {
        draft.priority = parse_priority(&priority)?;
    }
    if let Some(task_type) = args.task_type {
        draft.task_type = parse_type(&task_type)?;
    }
    Ok(draft)
}

fn build_update(ctx: &CliContext, args: TaskEditArgs) -> anyhow::Result<TaskUpdate> {
    let labels = match args.labels {
        Some(keys) => Some(
            ctx.resolve_labels(&keys)?
                .into_iter()
                .collect::<BTreeSet<_>>(),
        ),
        None => None,
    };
    Ok(TaskUpdate {
        title: args.title,
        description: args.description,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        task_type: args.task_type.as_deref().map(parse_type).transpose()?,
        labels,
    })
}
