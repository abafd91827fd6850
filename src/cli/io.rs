use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::output;
use crate::core::{ConfirmationPrompt, ShareOutcome, ShareTarget};
use crate::errors::Result;

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

/// Print a warning message via the standard CLI output helpers.
pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

/// Print an error message via the standard CLI output helpers.
pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

/// Print a success message via the standard CLI output helpers.
pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

/// Terminal yes/no prompt. Esc, `q` and read errors count as "no".
pub struct DialoguerConfirm<'a> {
    pub theme: &'a ColorfulTheme,
}

impl ConfirmationPrompt for DialoguerConfirm<'_> {
    fn confirm(&self, message: &str) -> bool {
        match Confirm::with_theme(self.theme)
            .with_prompt(message)
            .default(false)
            .interact_opt()
        {
            Ok(Some(answer)) => answer,
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "confirmation prompt failed");
                false
            }
        }
    }
}

/// Non-interactive answer decided up front, e.g. from a `--yes` flag.
pub struct PresetConfirm(pub bool);

impl ConfirmationPrompt for PresetConfirm {
    fn confirm(&self, message: &str) -> bool {
        if !self.0 {
            print_warning(format!("{message} Re-run with --yes to confirm."));
        }
        self.0
    }
}

/// Share target that prints the summary to stdout for copy and paste.
#[derive(Debug, Default)]
pub struct StdoutShare;

impl ShareTarget for StdoutShare {
    fn share(&mut self, title: &str, text: &str) -> Result<ShareOutcome> {
        output::section(title);
        output::raw(text);
        Ok(ShareOutcome::Shared)
    }
}
