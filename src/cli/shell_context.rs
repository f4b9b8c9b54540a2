use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm};
use expense_config::{Config, ConfigManager};
use expense_core::{Ledger, LoadOutcome};
use expense_storage_json::JsonFileStore;
use strsim::levenshtein;
use tracing::info;

use crate::cli::{commands, output};
use crate::cli::registry::CommandRegistry;
use crate::errors::{CliError, CommandError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Composition root of the shell: owns the ledger for the lifetime of the session.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: Ledger,
    pub config: Config,
    /// Where `config set` persists changes; absent for sessions built in memory.
    pub config_manager: Option<ConfigManager>,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Loads configuration from `home` (or `~/.expense_tracker`) and opens the stored ledger.
    pub fn new(mode: CliMode, home: Option<PathBuf>) -> Result<Self, CliError> {
        let manager = match home {
            Some(base) => ConfigManager::with_base_dir(base)?,
            None => ConfigManager::new_default()?,
        };
        let config = match manager.load() {
            Ok(config) => config,
            Err(err) => {
                output::warning(format!(
                    "Could not read {} ({err}); using default settings.",
                    manager.config_path().display()
                ));
                Config::default()
            }
        };
        let store = JsonFileStore::new(manager.data_dir(&config))?;
        info!(root = %store.root().display(), "using expense store");
        let ledger = Ledger::open_with_key(Box::new(store), config.storage_key.clone());
        let mut context = Self::with_ledger(mode, ledger, config);
        context.config_manager = Some(manager);
        Ok(context)
    }

    pub fn with_ledger(mode: CliMode, ledger: Ledger, config: Config) -> Self {
        let context = Self {
            mode,
            registry: commands::registry(),
            ledger,
            config,
            config_manager: None,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        };
        context.apply_output_preferences();
        context.report_load();
        context
    }

    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(output::OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
    }

    fn report_load(&self) {
        let report = self.ledger.load_report();
        info!(
            records = report.record_count,
            skipped = report.skipped,
            "stored expenses loaded"
        );
        if let LoadOutcome::StoreReadFailure(reason) = &report.outcome {
            output::warning(format!(
                "Stored expenses could not be read ({reason}); starting with an empty list."
            ));
        }
        for warning in &report.warnings {
            output::warning(warning);
        }
        if let Some(backup_key) = &report.backup_key {
            output::warning(format!(
                "The stored data will be copied to `{backup_key}` before the next change."
            ));
        }
    }

    pub fn prompt(&self) -> String {
        format!("expenses ({})> ", self.ledger.len())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 2 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help` for usage details.");
            }
            other => output::error(other),
        }
    }

    /// Asks a yes/no question; script sessions answer yes without prompting.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        self.confirm("Exit expense tracker?")
    }
}
