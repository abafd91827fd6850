use crate::cli::io;
use crate::cli::output;
use crate::cli::shell_context::{confirmation_prompt, CommandError, CommandResult, ShellContext};
use crate::core::HISTORY_CAPACITY;
use crate::domain::{Displayable, SnapshotId};

use super::{resolve_entry, usage_error, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "history",
            "List saved bills, newest first",
            "history",
            cmd_history,
        )
        .with_aliases(&["ls"]),
        CommandDefinition::new(
            "restore",
            "Load a saved bill back into the calculator",
            "restore <#|id>",
            cmd_restore,
        ),
        CommandDefinition::new(
            "delete",
            "Delete one saved bill",
            "delete <#|id>",
            cmd_delete,
        ),
        CommandDefinition::new(
            "select",
            "Toggle a saved bill in the selection",
            "select <#|id>",
            cmd_select,
        ),
        CommandDefinition::new(
            "select-all",
            "Select every saved bill, or clear the selection if all are selected",
            "select-all",
            cmd_select_all,
        ),
        CommandDefinition::new(
            "delete-selected",
            "Delete the selected bills after confirmation",
            "delete-selected [--yes]",
            cmd_delete_selected,
        ),
    ]
}

fn cmd_history(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let history = context.session.history();
    if history.is_empty() {
        io::print_info("No saved bills yet. Use `save` or `share` to keep one.");
        return Ok(());
    }

    output::section(format!("History ({}/{HISTORY_CAPACITY})", history.len()));
    let selection = context.session.selection();
    for (index, entry) in history.entries().iter().enumerate() {
        let marker = if selection.is_selected(&entry.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let fees = entry.fees().short_codes();
        let fees = if fees.is_empty() {
            String::new()
        } else {
            format!(" {fees}")
        };
        output::raw(format!(
            "{marker} {:>2}. {}{}",
            index + 1,
            entry.display_label(),
            fees
        ));
    }
    if !selection.is_empty() {
        io::print_info(format!(
            "{} selected. Use `delete-selected` to remove them.",
            selection.len()
        ));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = entry_argument(context, args, "restore <#|id>")?;
    if context.session.restore(&id)? {
        io::print_success("Bill restored.");
        super::bill::print_split(context);
    } else {
        io::print_warning("That bill is no longer in history.");
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = entry_argument(context, args, "delete <#|id>")?;
    if context.session.delete_history_entry(&id)? {
        io::print_success("Bill deleted.");
    }
    Ok(())
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = entry_argument(context, args, "select <#|id>")?;
    if context.session.toggle_selection(&id) {
        io::print_info("Selected.");
    } else {
        io::print_info("Deselected.");
    }
    Ok(())
}

fn cmd_select_all(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.history().is_empty() {
        io::print_info("Nothing to select.");
        return Ok(());
    }
    context.session.toggle_select_all();
    io::print_info(format!(
        "{} of {} selected.",
        context.session.selection().len(),
        context.session.history().len()
    ));
    Ok(())
}

fn cmd_delete_selected(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.session.selection().is_empty() {
        io::print_info("No bills selected.");
        return Ok(());
    }
    let assume_yes = args.iter().any(|arg| matches!(*arg, "--yes" | "-y"));
    let ShellContext {
        mode,
        theme,
        session,
        ..
    } = context;
    let prompt = confirmation_prompt(*mode, theme, assume_yes);
    let removed = session.delete_selected(prompt.as_ref())?;
    if removed > 0 {
        io::print_success(format!("Deleted {removed} bill(s)."));
    }
    Ok(())
}

fn entry_argument(
    context: &ShellContext,
    args: &[&str],
    usage: &str,
) -> Result<SnapshotId, CommandError> {
    let token = args.first().ok_or_else(|| usage_error(usage))?;
    resolve_entry(context, token).ok_or_else(|| {
        CommandError::Message(format!(
            "No saved bill matches `{token}`. Use `history` to list them."
        ))
    })
}
