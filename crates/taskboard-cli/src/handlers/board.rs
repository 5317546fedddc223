use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;
use serde_json::{json, Value};
use taskboard_domain::TaskStatus;

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Show { all } => {
            output::output_success(board_view(ctx, all));
        }
        BoardAction::Load => {
            ctx.store.load().await?;
            output::output_success(board_view(ctx, true));
        }
    }
    Ok(())
}

fn board_view(ctx: &CliContext, all: bool) -> Value {
    let column = |status: TaskStatus| {
        let tasks = ctx.store.column(status);
        if all {
            json!(tasks)
        } else {
            json!(ctx.labels.filter_tasks(tasks))
        }
    };
    json!({
        "project_id": ctx.store.session().project_id,
        "todo": column(TaskStatus::ToDo),
        "in_progress": column(TaskStatus::InProgress),
        "done": column(TaskStatus::Done),
        "archived_count": ctx.store.archived().len(),
        "selected_labels": ctx.labels.selected(),
    })
}
