//! Shell state, dispatch, and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    cli::{
        commands::{self, CommandDefinition, CommandRegistry},
        io as cli_io,
        output::{self, OutputPreferences},
        shell::parse_command_line,
    },
    config::{Config, ConfigManager},
    core::{utils::PathResolver, BillSession, ConfirmationPrompt, SystemClock},
    errors::SplitError,
    storage::{JsonStore, KeyValueStore, MemoryStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Errors that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SplitError),
    #[error("Line editor failed: {0}")]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors reported for a single command; the shell keeps running after them.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(#[from] SplitError),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: BillSession,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub data_dir: PathBuf,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Builds a shell whose store and configuration live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone()).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "config directory unavailable, using defaults");
            ConfigManager::in_base_dir(&base)
        });
        let config = config_manager.load_or_default();
        apply_output_preferences(&config);

        let store: Arc<dyn KeyValueStore> = match JsonStore::new(Some(base.clone())) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                tracing::warn!(
                    data_dir = %base.display(),
                    error = %err,
                    "data directory unavailable, keeping state in memory"
                );
                cli_io::print_warning(format!(
                    "Cannot use {} for saved data; changes will not be kept after exit.",
                    base.display()
                ));
                Arc::new(MemoryStore::new())
            }
        };
        let session = BillSession::open_with_default_people(
            store,
            Box::new(SystemClock),
            config.default_people_count,
        );
        tracing::debug!(data_dir = %base.display(), ?mode, "shell context ready");

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            session,
            config,
            config_manager,
            data_dir: base,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        let split = self.session.split();
        if self.session.state().raw_bill_amount == 0.0 {
            "splitbill> ".to_string()
        } else {
            format!(
                "splitbill [${:.2} x{}]> ",
                split.amount_per_person,
                self.session.state().people_count
            )
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    /// Tokenises and runs one line of input.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        tracing::debug!(command, "dispatching command");
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirmation(&self, assume_yes: bool) -> Box<dyn ConfirmationPrompt + '_> {
        confirmation_prompt(self.mode, &self.theme, assume_yes)
    }

    pub(crate) fn confirm_exit(&self) -> bool {
        match self.mode {
            CliMode::Script => true,
            CliMode::Interactive => self.confirmation(false).confirm("Exit splitbill?"),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_info("Use `help <command>` for usage details.");
            }
            CommandError::Message(message) => cli_io::print_error(message),
            CommandError::Core(err) => {
                tracing::warn!(error = %err, "command failed");
                cli_io::print_error(err);
            }
        }
    }
}

/// Prompt used before bulk deletes: dialoguer when interactive, otherwise the
/// caller's explicit `--yes`.
pub(crate) fn confirmation_prompt(
    mode: CliMode,
    theme: &ColorfulTheme,
    assume_yes: bool,
) -> Box<dyn ConfirmationPrompt + '_> {
    match (mode, assume_yes) {
        (_, true) => Box::new(cli_io::PresetConfirm(true)),
        (CliMode::Interactive, false) => Box::new(cli_io::DialoguerConfirm { theme }),
        (CliMode::Script, false) => Box::new(cli_io::PresetConfirm(false)),
    }
}

pub(crate) fn apply_output_preferences(config: &Config) {
    if !config.ui_color_enabled {
        colored::control::set_override(false);
    }
    output::set_preferences(OutputPreferences {
        plain_output: config.plain_output,
        color_enabled: config.ui_color_enabled,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fees;
    use tempfile::TempDir;

    fn script_shell() -> (ShellContext, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let shell =
            ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).expect("shell");
        (shell, temp)
    }

    fn run(shell: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            if let Err(err) = shell.process_line(line) {
                shell.report_error(err);
            }
        }
    }

    #[test]
    fn commands_drive_the_session() {
        let (mut shell, _guard) = script_shell();
        run(&mut shell, &["bill 100", "people 3", "tax on", "name \"Team lunch\""]);

        let state = shell.session.state();
        assert_eq!(state.raw_bill_amount, 100.0);
        assert_eq!(state.people_count, 3);
        assert_eq!(state.fees, Fees::new(true, true));
        assert_eq!(state.label, "Team lunch");
        assert_eq!(shell.session.split().amount_per_person, 40.0);
        assert_eq!(shell.prompt(), "splitbill [$40.00 x3]> ");
    }

    #[test]
    fn invalid_arguments_do_not_stop_the_shell() {
        let (mut shell, _guard) = script_shell();
        let result = shell.process_line("people many");
        assert!(matches!(result, Err(CommandError::InvalidArguments(_))));
        assert!(shell.running);
    }

    #[test]
    fn unknown_commands_continue() {
        let (mut shell, _guard) = script_shell();
        let result = shell.process_line("shar").expect("dispatch");
        assert_eq!(result, LoopControl::Continue);
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut shell, _guard) = script_shell();
        assert_eq!(shell.process_line("exit").expect("exit"), LoopControl::Exit);
        assert!(!shell.running);
    }

    #[test]
    fn bulk_delete_in_script_mode_needs_yes() {
        let (mut shell, _guard) = script_shell();
        run(&mut shell, &["bill 10", "save", "bill 20", "save", "select-all"]);
        assert_eq!(shell.session.selection().len(), 2);

        run(&mut shell, &["delete-selected"]);
        assert_eq!(shell.session.history().len(), 2);

        run(&mut shell, &["delete-selected --yes"]);
        assert!(shell.session.history().is_empty());
        assert!(shell.session.selection().is_empty());
    }

    #[test]
    fn restore_by_position_reloads_the_bill() {
        let (mut shell, _guard) = script_shell();
        run(
            &mut shell,
            &["bill 64.2", "service off", "people 2", "save", "reset", "restore 1"],
        );
        let state = shell.session.state();
        assert_eq!(state.raw_bill_amount, 64.2);
        assert_eq!(state.fees, Fees::NONE);
        assert_eq!(state.people_count, 2);
    }

    #[test]
    fn state_persists_between_shells() {
        let (mut shell, guard) = script_shell();
        run(&mut shell, &["people 6", "payee 91234567", "bill 30", "save"]);

        let reopened =
            ShellContext::with_base_dir(CliMode::Script, guard.path().to_path_buf()).expect("shell");
        assert_eq!(reopened.session.state().people_count, 6);
        assert_eq!(reopened.session.state().payee, "91234567");
        assert_eq!(reopened.session.history().len(), 1);
        assert_eq!(reopened.session.state().raw_bill_amount, 0.0);
    }

    #[test]
    fn unusable_data_dir_falls_back_to_memory() {
        let temp = TempDir::new().expect("temp dir");
        let not_a_dir = temp.path().join("occupied");
        std::fs::write(&not_a_dir, "plain file").expect("write file");

        let mut shell = ShellContext::with_base_dir(CliMode::Script, not_a_dir.clone())
            .expect("shell starts anyway");
        run(&mut shell, &["bill 100", "people 3", "tax on", "save"]);
        assert_eq!(shell.session.split().amount_per_person, 40.0);
        assert_eq!(shell.session.history().len(), 1);
        assert_eq!(shell.config, Config::default());
        assert!(not_a_dir.is_file());
    }
}
