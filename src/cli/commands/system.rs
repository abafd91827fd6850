use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::shell_context::{
    apply_output_preferences, CommandError, CommandResult, ShellContext,
};
use crate::core::session::{MAX_PEOPLE_COUNT, MIN_PEOPLE_COUNT};
use crate::core::utils::PathResolver;
use crate::utils::build_info;

use super::{parse_toggle, usage_error, CommandDefinition};

const CONFIG_USAGE: &str = "config [set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "config",
            "Show or change preferences",
            CONFIG_USAGE,
            cmd_config,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit)
            .with_aliases(&["quit"]),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            show_config(context);
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            set_config(context, key, &value.join(" "))
        }
        _ => Err(usage_error(CONFIG_USAGE)),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!(
        "  default_people_count : {}",
        config.default_people_count
    ));
    io::print_info(format!("  share_title          : {}", config.share_title));
    io::print_info(format!("  ui_color_enabled     : {}", config.ui_color_enabled));
    io::print_info(format!("  plain_output         : {}", config.plain_output));
    io::print_info(format!(
        "  Config file : {}",
        context.config_manager.path().display()
    ));
    io::print_info(format!(
        "  State file  : {}",
        PathResolver::state_file_in(&context.data_dir).display()
    ));
}

fn set_config(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    match key {
        "default_people_count" => {
            let count: u32 = value
                .parse()
                .ok()
                .filter(|count| (MIN_PEOPLE_COUNT..=MAX_PEOPLE_COUNT).contains(count))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "default_people_count must be between {MIN_PEOPLE_COUNT} and {MAX_PEOPLE_COUNT}."
                    ))
                })?;
            updated.default_people_count = count;
        }
        "share_title" => updated.share_title = value.to_string(),
        "ui_color_enabled" => updated.ui_color_enabled = bool_value(key, value)?,
        "plain_output" => updated.plain_output = bool_value(key, value)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown config key `{other}`."
            )))
        }
    }

    context.config_manager.save(&updated)?;
    apply_output_preferences(&updated);
    context.config = updated;
    io::print_success(format!("{key} updated."));
    Ok(())
}

fn bool_value(key: &str, value: &str) -> Result<bool, CommandError> {
    parse_toggle(value)
        .ok_or_else(|| CommandError::InvalidArguments(format!("{key} expects on or off.")))
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("splitbill {}", meta.version));
    io::print_info(format!("  Build hash   : {}", meta.git_hash));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Profile      : {}", meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
