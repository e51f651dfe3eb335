//! Yes/no confirmations asked by the import pipeline.

use crate::cancel::CancelToken;
use dialoguer::{Confirm, theme::ColorfulTheme};
use owo_colors::OwoColorize;
use std::io::ErrorKind;

pub trait Prompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Interactive terminal prompt. Defaults to "no".
#[derive(Debug, Clone, Default)]
pub struct ConsolePrompt {
    cancel: Option<CancelToken>,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ctrl-C at the prompt cancels `token`; other read failures only answer "no".
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Prompt for ConsolePrompt {
    fn confirm(&self, message: &str) -> bool {
        match Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) if is_interrupt(&e) => {
                log::warn!("Prompt interrupted: {e}");
                if let Some(token) = &self.cancel {
                    token.cancel();
                }
                false
            }
            Err(e) => {
                log::warn!("Could not read an answer to '{message}': {e}");
                eprintln!("{} {e}; answering no", "Warning:".yellow());
                false
            }
        }
    }
}

fn is_interrupt(error: &dialoguer::Error) -> bool {
    matches!(error, dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted)
}

/// Answers every question with "yes" (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&self, message: &str) -> bool {
        println!("{} {}", message, "yes".green());
        true
    }
}
