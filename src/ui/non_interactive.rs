//! Non-interactive UI for CI/headless environments.
//!
//! Prompts are answered from `OPPDECK_PROMPT_<KEY>` environment variables
//! or fall back to their defaults, so scripted runs never block on input.

use std::collections::HashMap;

use crate::error::Result;

use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("OPPDECK_PROMPT_"))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn override_for(&self, key: &str) -> Option<&str> {
        let env_key = format!("OPPDECK_PROMPT_{}", key.to_uppercase().replace('-', "_"));
        self.env_overrides.get(&env_key).map(String::as_str)
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn console_line(&mut self, line: &str) {
        if self.mode.shows_console() {
            println!("{}", line);
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self
            .override_for(&prompt.key)
            .map(String::from)
            .or_else(|| prompt.default.clone());

        match &prompt.prompt_type {
            PromptType::Confirm => {
                let confirmed = answer
                    .map(|a| {
                        let a = a.to_lowercase();
                        a == "true" || a == "y" || a == "yes"
                    })
                    .unwrap_or(true);
                Ok(PromptResult::Bool(confirmed))
            }
            PromptType::Input => Ok(PromptResult::String(answer.unwrap_or_default())),
            PromptType::Select { options } => {
                // An answer outside the current option set falls back to the
                // default (or the first option), the same reconciliation the
                // slots apply.
                let choice = answer
                    .filter(|a| options.contains(a))
                    .or_else(|| options.first().cloned())
                    .unwrap_or_default();
                Ok(PromptResult::String(choice))
            }
        }
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(super::ProgressSpinner::hidden())
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
