use std::{
    io::{self, BufRead, IsTerminal},
    path::PathBuf,
};

use expense_domain::Category;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};
use shell_words::split;

use crate::cli::output;
use crate::cli::shell_context::{CliMode, LoopControl, ShellContext};
use crate::errors::{CliError, CommandError};

/// Runs the shell against the store under `home`; interactive when stdin is a terminal.
pub fn run_cli(home: Option<PathBuf>) -> Result<(), CliError> {
    let mode = if io::stdin().is_terminal() {
        CliMode::Interactive
    } else {
        CliMode::Script
    };

    let mut context = ShellContext::new(mode, home)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    output::info("Smart Expense Tracker. Type `help` for commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) => match context.confirm_exit() {
                Ok(true) => break,
                Ok(false) => {}
                Err(err) => context.report_error(err),
            },
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Commands complete in first position; category names after `add <amount>` and `list`.
    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        let start = line
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = line[start..].to_ascii_lowercase();
        let words: Vec<&str> = line[..start].split_whitespace().collect();

        let pool: Vec<String> = match words.as_slice() {
            [] => self.commands.clone(),
            [command] if command.eq_ignore_ascii_case("list") => std::iter::once("All")
                .chain(Category::ALL.iter().map(Category::as_str))
                .map(str::to_string)
                .collect(),
            [command, _amount] if command.eq_ignore_ascii_case("add") => Category::ALL
                .iter()
                .map(|category| category.as_str().to_string())
                .collect(),
            _ => Vec::new(),
        };

        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.to_ascii_lowercase().starts_with(&needle))
            .collect();
        (start, matches)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_config::Config;
    use expense_core::{Ledger, MemoryStore};

    fn helper() -> CommandHelper {
        CommandHelper::new(vec!["list", "add", "delete", "add"])
    }

    #[test]
    fn completes_commands_then_categories() {
        let helper = helper();
        assert_eq!(helper.candidates("de"), (0, vec!["delete".to_string()]));
        assert_eq!(helper.candidates("add 12 tr"), (7, vec!["Travel".to_string()]));
        assert_eq!(helper.candidates("list a").1, vec!["All".to_string()]);
        assert!(helper.candidates("add 12 Food x").1.is_empty());
    }

    #[test]
    fn quoted_notes_stay_together() {
        let store = MemoryStore::new();
        let ledger = Ledger::open(Box::new(store));
        let mut context = ShellContext::with_ledger(CliMode::Script, ledger, Config::default());

        let control = handle_line(&mut context, r#"add 9 Food 2024-02-02 "pizza night""#).unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(context.ledger.snapshot()[0].note, "pizza night");

        assert_eq!(handle_line(&mut context, "# comment").unwrap(), LoopControl::Continue);
        assert_eq!(handle_line(&mut context, "exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }
}
