//! Interactive confirmation before irreversible release steps.

use dialoguer::{Confirm, Input, theme::ColorfulTheme};

/// Asks the user before anything is pushed.
pub trait ConfirmationOracle {
    /// Yes/no question; anything but an explicit yes is a no.
    fn ask(&self, prompt: &str) -> bool;

    /// Let the user override the version read from the manifest.
    fn choose_version(&self, detected: &str) -> String {
        detected.to_string()
    }
}

/// Prompts on the terminal with dialoguer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl ConfirmationOracle for TerminalPrompt {
    fn ask(&self, prompt: &str) -> bool {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn choose_version(&self, detected: &str) -> String {
        let chosen: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Release version")
            .default(detected.to_string())
            .interact_text()
            .unwrap_or_else(|_| detected.to_string());
        let chosen = chosen.trim();
        if chosen.is_empty() {
            detected.to_string()
        } else {
            chosen.to_string()
        }
    }
}

/// Answers yes to everything and keeps the detected version (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl ConfirmationOracle for AssumeYes {
    fn ask(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, "auto-confirmed");
        true
    }
}

/// The oracle matching the `--yes` flag.
pub fn oracle_for(assume_yes: bool) -> Box<dyn ConfirmationOracle> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    }
}
