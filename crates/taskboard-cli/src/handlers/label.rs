use crate::cli::LabelAction;
use crate::context::CliContext;
use crate::output;
use serde_json::json;
use taskboard_domain::LabelColor;

pub async fn handle(ctx: &mut CliContext, action: LabelAction) -> anyhow::Result<()> {
    match action {
        LabelAction::Add { name, color } => {
            if ctx.labels.find_by_name(&name).is_some() {
                anyhow::bail!("Label already exists: {}", name);
            }
            let color: LabelColor = color.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let label = ctx.labels.create(name, color)?;
            output::output_success(&label);
        }
        LabelAction::Remove { label } => {
            let id = ctx.resolve_label(&label)?;
            let removed = ctx.labels.remove(id, &ctx.store)?;
            output::output_success(json!({"removed": removed.id.to_string(), "name": removed.name}));
        }
        LabelAction::List => {
            let items: Vec<_> = ctx
                .labels
                .labels()
                .iter()
                .map(|l| {
                    json!({
                        "id": l.id,
                        "name": l.name,
                        "color": l.color,
                        "selected": ctx.labels.selected().contains(&l.id),
                    })
                })
                .collect();
            output::output_list(items);
        }
        LabelAction::Select { labels } => {
            let ids = ctx.resolve_labels(&labels)?;
            ctx.labels.toggle_selection(ids)?;
            output::output_success(json!({"selected": ctx.labels.selected()}));
        }
    }
    Ok(())
}
