//! Shell command handlers. Each one maps user input onto the ledger API.

use chrono::Local;
use expense_core::{filter_by, totals_by_category, LedgerError};
use expense_domain::{Category, CategoryFilter, RecordId, DATE_FORMAT};
use strsim::levenshtein;

use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::render::{self, DEFAULT_BAR_WIDTH};
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::errors::{CommandError, CommandResult};

const MIN_ID_PREFIX: usize = 4;

pub(crate) fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(CommandEntry::new(
        "add",
        "Record an expense (date defaults to today)",
        "add <amount> <category> [YYYY-MM-DD] [note...]",
        cmd_add,
    ));
    registry.register(CommandEntry::new(
        "list",
        "Show expenses, optionally filtered by category and note text",
        "list [category|All] [search...]",
        cmd_list,
    ));
    registry.register(CommandEntry::new(
        "delete",
        "Delete an expense by id or unique id prefix",
        "delete <id>",
        cmd_delete,
    ));
    registry.register(CommandEntry::new(
        "totals",
        "Chart spending per category",
        "totals",
        cmd_totals,
    ));
    registry.register(CommandEntry::new(
        "categories",
        "List the available categories",
        "categories",
        cmd_categories,
    ));
    registry.register(CommandEntry::new(
        "config",
        "Show settings or change one",
        "config [show|set <currency|color|confirm_deletes> <value>]",
        cmd_config,
    ));
    registry.register(CommandEntry::new(
        "help",
        "Show this help",
        "help",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "exit",
        "Leave the shell",
        "exit",
        cmd_exit,
    ));
    registry.alias("quit", "exit");
    registry.alias("rm", "delete");
    registry
}

fn usage(context: &ShellContext, command: &str) -> CommandError {
    let usage = context
        .registry
        .get(command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount, category, rest @ ..] = args else {
        return Err(usage(context, "add"));
    };

    let (date, note_words) = match rest.split_first() {
        Some((first, tail)) if looks_like_date(first) => (first.to_string(), tail),
        _ => (Local::now().date_naive().format(DATE_FORMAT).to_string(), rest),
    };
    let note = note_words.join(" ");

    let record = context
        .ledger
        .add_raw(amount, category, &date, &note)
        .map_err(|err| match err {
            LedgerError::UnknownCategory(label) => unknown_category(&label),
            other => CommandError::from(other),
        })?;

    output::success(format!(
        "Added {} {} on {} [{}]",
        render::format_amount(&context.config.currency_symbol, record.amount.value()),
        record.category,
        record.date.format(DATE_FORMAT),
        record.id
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (filter, search_words) = match args.split_first() {
        Some((first, tail)) => match first.parse::<CategoryFilter>() {
            Ok(filter) => (filter, tail),
            Err(_) => (CategoryFilter::All, args),
        },
        None => (CategoryFilter::All, args),
    };
    let search = search_words.join(" ");

    let snapshot = context.ledger.snapshot();
    let matches = filter_by(&snapshot, filter, &search);
    output::section(format!("Expenses ({})", matches.len()));
    if matches.is_empty() {
        output::info("No expenses match.");
    } else {
        output::info(render::expense_table(
            &matches,
            &context.config.currency_symbol,
        ));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(usage(context, "delete"));
    };
    let id = resolve_id(context, needle)?;

    if context.mode == CliMode::Interactive
        && context.config.confirm_deletes
        && !context.confirm("Delete this expense?")?
    {
        output::info("Deletion cancelled.");
        return Ok(());
    }

    let removed = context.ledger.remove(&id)?;
    output::success(format!("Deleted {}", removed.display_label()));
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = totals_by_category(&context.ledger.snapshot());
    output::section("Category-wise Expenses");
    output::info(render::totals_chart(
        &totals,
        &context.config.currency_symbol,
        DEFAULT_BAR_WIDTH,
    ));
    Ok(())
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let labels: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    output::info(labels.join(", "));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    let width = context
        .registry
        .list()
        .iter()
        .map(|entry| entry.usage.len())
        .max()
        .unwrap_or(0);
    for entry in context.registry.list() {
        output::info(format!(
            "{:width$}  {}",
            entry.usage,
            entry.description,
            width = width
        ));
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show_config(context);
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => set_config(context, key, &value.join(" ")),
        _ => Err(usage(context, "config")),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output::section("Settings");
    output::info(format!("storage_key      {}", config.storage_key));
    output::info(format!("currency         {}", config.currency_symbol));
    output::info(format!("color            {}", on_off(config.ui_color_enabled)));
    output::info(format!("confirm_deletes  {}", on_off(config.confirm_deletes)));
    if let Some(manager) = &context.config_manager {
        output::info(format!(
            "data_dir         {}",
            manager.data_dir(config).display()
        ));
        output::info(format!(
            "config_file      {}",
            manager.config_path().display()
        ));
    }
}

fn set_config(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    match key.to_ascii_lowercase().as_str() {
        "currency" => context.config.currency_symbol = value.to_string(),
        "color" => {
            context.config.ui_color_enabled = parse_switch(value)?;
            context.apply_output_preferences();
        }
        "confirm_deletes" => context.config.confirm_deletes = parse_switch(value)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown setting `{other}`. Use currency, color or confirm_deletes."
            )))
        }
    }

    match &context.config_manager {
        Some(manager) => {
            manager.save(&context.config)?;
            output::success(format!("Saved {key} = {value}"));
        }
        None => output::info(format!("Set {key} = {value} for this session.")),
    }
    Ok(())
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "Expected on or off, got `{value}`."
        ))),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

/// Digits and dashes only: the word was meant as a date, valid or not.
fn looks_like_date(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit())
        && word.contains('-')
        && word.chars().all(|c| c.is_ascii_digit() || c == '-')
}

/// Accepts a full id or a prefix that matches exactly one expense.
fn resolve_id(context: &ShellContext, needle: &str) -> Result<RecordId, CommandError> {
    let exact = RecordId::try_from(needle).map_err(LedgerError::from)?;
    if context.ledger.get(&exact).is_some() {
        return Ok(exact);
    }
    if needle.len() < MIN_ID_PREFIX {
        return Err(LedgerError::NotFound(exact).into());
    }

    let snapshot = context.ledger.snapshot();
    let mut candidates = snapshot
        .iter()
        .filter(|record| record.id.as_str().starts_with(needle));
    match (candidates.next(), candidates.next()) {
        (Some(record), None) => Ok(record.id.clone()),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "Id prefix `{needle}` matches several expenses; type more characters."
        ))),
        (None, _) => Err(LedgerError::NotFound(exact).into()),
    }
}

fn unknown_category(label: &str) -> CommandError {
    let needle = label.to_ascii_lowercase();
    let closest = Category::ALL
        .iter()
        .map(|category| (levenshtein(&category.as_str().to_ascii_lowercase(), &needle), category))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 2);
    let message = match closest {
        Some((_, category)) => format!("Unknown category `{label}`. Did you mean `{category}`?"),
        None => format!(
            "Unknown category `{label}`. Use one of: {}.",
            Category::ALL.map(|category| category.as_str()).join(", ")
        ),
    };
    CommandError::InvalidArguments(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell_context::LoopControl;
    use expense_config::{Config, ConfigManager};
    use expense_core::{Ledger, MemoryStore};

    fn context() -> ShellContext {
        let ledger = Ledger::open(Box::new(MemoryStore::new()));
        ShellContext::with_ledger(CliMode::Script, ledger, Config::default())
    }

    #[test]
    fn add_parses_optional_date_and_joins_note() {
        let mut ctx = context();
        cmd_add(&mut ctx, &["12.5", "food", "2024-01-01", "team", "lunch"]).unwrap();
        cmd_add(&mut ctx, &["3", "Travel", "bus", "fare"]).unwrap();

        let snapshot = ctx.ledger.snapshot();
        assert_eq!(snapshot[0].note, "bus fare");
        assert_eq!(snapshot[0].date, Local::now().date_naive());
        assert_eq!(snapshot[1].note, "team lunch");
        assert_eq!(snapshot[1].date.format(DATE_FORMAT).to_string(), "2024-01-01");
    }

    #[test]
    fn add_rejects_malformed_dates_instead_of_using_today() {
        let mut ctx = context();
        let err = cmd_add(&mut ctx, &["5", "Food", "2024-13-01", "lunch"]).expect_err("bad date");
        assert!(matches!(err, CommandError::Ledger(LedgerError::InvalidDate(_))));
        assert!(ctx.ledger.is_empty());

        cmd_add(&mut ctx, &["5", "Food", "12-2024", "pass"]).expect_err("not a calendar date");
        cmd_add(&mut ctx, &["5", "Travel", "3-day", "pass"]).unwrap();
        assert_eq!(ctx.ledger.snapshot()[0].note, "3-day pass");
    }

    #[test]
    fn config_set_persists_through_the_manager() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut ctx = context();
        ctx.config_manager = Some(manager.clone());

        cmd_config(&mut ctx, &["set", "currency", "$"]).unwrap();
        cmd_config(&mut ctx, &["set", "confirm_deletes", "off"]).unwrap();
        let saved = manager.load().unwrap();
        assert_eq!(saved.currency_symbol, "$");
        assert!(!saved.confirm_deletes);

        assert!(matches!(
            cmd_config(&mut ctx, &["set", "color", "maybe"]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            cmd_config(&mut ctx, &["set", "storage_key", "x"]),
            Err(CommandError::InvalidArguments(_))
        ));
        cmd_config(&mut ctx, &[]).unwrap();
    }

    #[test]
    fn add_suggests_close_category() {
        let mut ctx = context();
        let err = cmd_add(&mut ctx, &["5", "Fod"]).expect_err("typo");
        assert!(
            matches!(err, CommandError::InvalidArguments(ref message) if message.contains("`Food`")),
            "unexpected error: {err:?}"
        );
        let err = cmd_add(&mut ctx, &["-5", "Food"]).expect_err("negative");
        assert!(matches!(err, CommandError::Ledger(LedgerError::InvalidAmount(_))));
        assert!(matches!(cmd_add(&mut ctx, &["5"]), Err(CommandError::InvalidArguments(_))));
        assert!(ctx.ledger.is_empty());
    }

    #[test]
    fn delete_accepts_unique_prefix() {
        let mut ctx = context();
        cmd_add(&mut ctx, &["1", "Bills"]).unwrap();
        let id = ctx.ledger.snapshot()[0].id.clone();

        let prefix = &id.as_str()[..8];
        cmd_delete(&mut ctx, &[prefix]).unwrap();
        assert!(ctx.ledger.is_empty());

        let err = cmd_delete(&mut ctx, &[id.as_str()]).expect_err("already gone");
        assert!(matches!(err, CommandError::Ledger(LedgerError::NotFound(_))));
    }

    #[test]
    fn short_prefixes_are_not_guessed() {
        let mut ctx = context();
        cmd_add(&mut ctx, &["1", "Bills"]).unwrap();
        let id = ctx.ledger.snapshot()[0].id.clone();
        let err = cmd_delete(&mut ctx, &[&id.as_str()[..2]]).expect_err("too short");
        assert!(matches!(err, CommandError::Ledger(LedgerError::NotFound(_))));
        assert_eq!(ctx.ledger.len(), 1);
    }

    #[test]
    fn dispatch_handles_aliases_and_unknown_commands() {
        let mut ctx = context();
        assert_eq!(ctx.dispatch("quit", "quit", &[]).unwrap(), LoopControl::Exit);
        assert_eq!(
            ctx.dispatch("totalz", "totalz", &[]).unwrap(),
            LoopControl::Continue
        );
        assert_eq!(ctx.dispatch("list", "list", &["All", "x"]).unwrap(), LoopControl::Continue);
    }
}
