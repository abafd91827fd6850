use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::core::{session::MAX_PEOPLE_COUNT, session::MIN_PEOPLE_COUNT, ShareOutcome};

use super::{parse_toggle, usage_error, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("bill", "Set the bill amount before fees", "bill <amount>", cmd_bill),
        CommandDefinition::new(
            "people",
            "Set how many people share the bill (1-20)",
            "people <count>",
            cmd_people,
        ),
        CommandDefinition::new(
            "service",
            "Toggle the 10% service charge",
            "service [on|off]",
            cmd_service,
        ),
        CommandDefinition::new("tax", "Toggle the 9% GST", "tax [on|off]", cmd_tax),
        CommandDefinition::new("name", "Name the bill", "name [label...]", cmd_name),
        CommandDefinition::new(
            "payee",
            "Set the PayNow number shown when sharing",
            "payee [number]",
            cmd_payee,
        ),
        CommandDefinition::new("show", "Show the current split", "show", cmd_show)
            .with_aliases(&["status"]),
        CommandDefinition::new(
            "reset",
            "Clear the bill, name and fee toggles",
            "reset",
            cmd_reset,
        ),
        CommandDefinition::new("save", "Save the current bill to history", "save", cmd_save),
        CommandDefinition::new(
            "share",
            "Save the bill and print a shareable summary",
            "share",
            cmd_share,
        ),
    ]
}

fn cmd_bill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("bill <amount>"))?;
    let raw = raw.trim_start_matches('$');
    context.session.set_bill_amount_input(raw);
    if let Some(warning) = amount_warning(raw, context.session.state().raw_bill_amount) {
        io::print_warning(warning);
    }
    print_split(context);
    Ok(())
}

fn cmd_people(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("people <count>"))?;
    let requested: i64 = raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a whole number of people."))
    })?;
    let applied = context.session.set_people_count(requested)?;
    if i64::from(applied) != requested {
        io::print_warning(format!(
            "Headcount must be between {MIN_PEOPLE_COUNT} and {MAX_PEOPLE_COUNT}; using {applied}."
        ));
    }
    print_split(context);
    Ok(())
}

fn cmd_service(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let current = context.session.state().fees.service_charge;
    let enabled = toggle_argument(args, current, "service [on|off]")?;
    context.session.set_service_charge(enabled);
    print_split(context);
    Ok(())
}

fn cmd_tax(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let current = context.session.state().fees.tax;
    let enabled = toggle_argument(args, current, "tax [on|off]")?;
    context.session.set_tax(enabled);
    print_split(context);
    Ok(())
}

fn cmd_name(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let label = args.join(" ");
    context.session.set_label(&label);
    if label.trim().is_empty() {
        io::print_info("Bill name cleared.");
    } else {
        io::print_success(format!("Bill named `{}`.", label.trim()));
    }
    Ok(())
}

fn cmd_payee(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let payee = args.join(" ");
    context.session.set_payee(&payee)?;
    if payee.trim().is_empty() {
        io::print_info("PayNow number cleared.");
    } else {
        io::print_success(format!("PayNow number set to {}.", payee.trim()));
    }
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.session.state();
    output_section("Current bill");
    let label = if state.label.trim().is_empty() {
        "(unnamed)"
    } else {
        state.label.as_str()
    };
    io::print_info(format!("  Name        : {label}"));
    io::print_info(format!("  Bill        : ${:.2}", state.raw_bill_amount));
    io::print_info(format!("  Service 10% : {}", on_off(state.fees.service_charge)));
    io::print_info(format!("  GST 9%      : {}", on_off(state.fees.tax)));
    io::print_info(format!("  People      : {}", state.people_count));
    let payee = if state.payee.is_empty() {
        "(not set)"
    } else {
        state.payee.as_str()
    };
    io::print_info(format!("  PayNow      : {payee}"));
    print_split(context);
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.reset();
    io::print_success("Calculator reset.");
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.save_to_history()? {
        Some(snapshot) => io::print_success(format!("Saved `{}` to history.", snapshot.label)),
        None => io::print_warning("Enter a bill amount before saving."),
    }
    Ok(())
}

fn cmd_share(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let title = context.config.share_title.clone();
    let report = context.session.share(&mut io::StdoutShare, &title);
    if report.saved.is_some() {
        io::print_success("Bill saved to history.");
    }
    match report.outcome {
        Some(ShareOutcome::Shared) => {}
        Some(ShareOutcome::Cancelled) => io::print_info("Share cancelled."),
        Some(ShareOutcome::Unsupported) => io::print_warning("Sharing is not supported here."),
        None => io::print_warning("Could not share the bill; see the log for details."),
    }
    Ok(())
}

/// Explains why the applied amount differs from what was typed, if it does.
fn amount_warning(raw: &str, applied: f64) -> Option<String> {
    match raw.trim().parse::<f64>() {
        Err(_) => Some(format!("`{raw}` is not a number; bill set to ${applied:.2}.")),
        Ok(parsed) if parsed != applied => Some(format!(
            "`{raw}` is not a usable amount; bill set to ${applied:.2}."
        )),
        Ok(_) => None,
    }
}

fn toggle_argument(args: &[&str], current: bool, usage: &str) -> Result<bool, CommandError> {
    match args.first() {
        None => Ok(!current),
        Some(value) => parse_toggle(value).ok_or_else(|| usage_error(usage)),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub(crate) fn print_split(context: &ShellContext) {
    let split = context.session.split();
    let fees = context.session.state().fees.short_codes();
    let fees = if fees.is_empty() {
        String::new()
    } else {
        format!(" ({fees})")
    };
    io::print_info(format!(
        "Total with fees: ${:.2}{} · Each person pays: ${:.2}",
        split.total_with_fees, fees, split.amount_per_person
    ));
}

#[cfg(test)]
mod tests {
    use super::amount_warning;
    use crate::cli::shell_context::{CliMode, ShellContext};
    use tempfile::TempDir;

    #[test]
    fn unusable_amounts_fall_back_to_zero() {
        let temp = TempDir::new().expect("temp dir");
        let mut shell =
            ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).expect("shell");
        for input in ["bill -5", "bill 1e400", "bill NaN", "bill lots"] {
            shell.process_line("bill 12").expect("bill");
            shell.process_line(input).expect("bill");
            assert_eq!(shell.session.state().raw_bill_amount, 0.0, "{input}");
        }
    }

    #[test]
    fn coerced_amounts_are_reported() {
        assert!(amount_warning("-5", 0.0).is_some());
        assert!(amount_warning("1e400", 0.0).is_some());
        assert!(amount_warning("lots", 0.0).is_some());
        assert_eq!(amount_warning("0", 0.0), None);
        assert_eq!(amount_warning(" 42.5 ", 42.5), None);
    }
}
