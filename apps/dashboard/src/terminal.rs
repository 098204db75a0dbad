use std::sync::Arc;

use async_trait::async_trait;
use client_core::ConfirmPrompt;
use shared::domain::UserForm;
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin},
    sync::Mutex,
};
use tracing::warn;

/// Line-oriented stdin/stdout, shared by the command loop and interactive prompts.
#[derive(Clone)]
pub struct Terminal {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl Terminal {
    pub fn stdin() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(io::stdin()).lines())),
        }
    }

    pub async fn print(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await
    }

    /// Prints `label` and reads one line; `None` once stdin is closed.
    pub async fn prompt(&self, label: &str) -> io::Result<Option<String>> {
        self.print(label).await?;
        self.lines.lock().await.next_line().await
    }

    /// Prompts for every form field, keeping the current value on an empty answer.
    ///
    /// Returns `None` when stdin closes before the form is complete.
    pub async fn prompt_form(
        &self,
        title: &str,
        current: &UserForm,
    ) -> io::Result<Option<UserForm>> {
        self.print(&format!("{title} (empty answer keeps the value in brackets)\n"))
            .await?;

        let mut form = current.clone();
        for (label, field) in [
            ("First Name", &mut form.first_name),
            ("Last Name", &mut form.last_name),
            ("Email", &mut form.email),
            ("Job", &mut form.job),
        ] {
            let Some(answer) = self.prompt(&format!("{label} [{field}]: ")).await? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if !answer.is_empty() {
                *field = answer.to_string();
            }
        }
        Ok(Some(form))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks on the terminal; anything but an explicit yes declines.
pub struct TerminalConfirm {
    terminal: Terminal,
}

impl TerminalConfirm {
    pub fn new(terminal: Terminal) -> Self {
        Self { terminal }
    }
}

#[async_trait]
impl ConfirmPrompt for TerminalConfirm {
    async fn confirm(&self, message: &str) -> bool {
        match self.terminal.prompt(&format!("{message} [y/N] ")).await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(error) => {
                warn!(%error, "failed to read confirmation");
                false
            }
        }
    }
}
