use plantwatch_ui::HierarchyLevel;
use plantwatch_ui::core::filter::PickedItem;

use crate::cli::{HierarchyCommand, HierarchyLevelArgs, HierarchySetArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_hierarchy;

fn ensure_editable(ctx: &AppContext, level: HierarchyLevel) -> CliResult<()> {
    let fixed = level
        .with_descendants()
        .iter()
        .copied()
        .find(|candidate| ctx.session.hierarchy().level(*candidate).readonly);
    match fixed {
        Some(fixed) => Err(CliError::validation(format!(
            "{fixed} is fixed by your account scope; {level} cannot be changed"
        ))),
        None => Ok(()),
    }
}

pub(crate) fn handle_hierarchy(
    ctx: &AppContext,
    command: HierarchyCommand,
    format: OutputFormat,
) -> CliResult<()> {
    let filter = ctx.session.hierarchy_filter();
    match command {
        HierarchyCommand::Show => {}
        HierarchyCommand::Set(HierarchySetArgs {
            level,
            id,
            description,
        }) => {
            ensure_editable(ctx, level)?;
            let item = PickedItem {
                id,
                description,
                name: None,
            };
            filter.update_hierarchy_level(level, &item);
        }
        HierarchyCommand::Clear(HierarchyLevelArgs { level }) => {
            ensure_editable(ctx, level)?;
            filter.clear_hierarchy_level(level);
        }
        HierarchyCommand::Reset => ctx.session.hierarchy().reset(),
        HierarchyCommand::Forget => ctx.session.hierarchy().clear(),
    }
    render_hierarchy(&ctx.session.hierarchy().snapshot(), format)
}
