use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use client_core::{
    view::{render, DebugPanelView},
    DashboardCommand, DashboardController,
};
use tracing::{debug, info};

use crate::{
    commands::{parse_line, Input, HELP},
    terminal::{is_yes, Terminal},
};

/// Drives the controller from typed commands and prints the rendered view after each one.
pub struct DashboardApp {
    controller: DashboardController,
    terminal: Terminal,
    html_out: Option<PathBuf>,
}

impl DashboardApp {
    pub fn new(
        controller: DashboardController,
        terminal: Terminal,
        html_out: Option<PathBuf>,
    ) -> Self {
        Self {
            controller,
            terminal,
            html_out,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        self.dispatch(DashboardCommand::Init).await;
        self.show().await?;

        while let Some(line) = self.terminal.prompt("> ").await? {
            let input = match parse_line(&line) {
                Ok(input) => input,
                Err(err) => {
                    self.terminal.print(&format!("{err}\n")).await?;
                    continue;
                }
            };

            match input {
                Input::Empty => {}
                Input::Quit => break,
                Input::Help => self.terminal.print(&format!("{HELP}\n")).await?,
                Input::Debug => self.show_debug().await?,
                Input::List => self.show().await?,
                Input::Dispatch(command) => {
                    self.dispatch(command).await;
                    self.show().await?;
                }
                Input::Add => {
                    self.dispatch(DashboardCommand::OpenCreateForm).await;
                    self.fill_form().await?;
                    self.show().await?;
                }
                Input::Edit(user_id) => {
                    if self.dispatch(DashboardCommand::OpenEditForm(user_id)).await {
                        self.fill_form().await?;
                    }
                    self.show().await?;
                }
            }
        }

        info!("dashboard closed");
        Ok(())
    }

    /// Failures are already logged by the controller and surface as notifications.
    async fn dispatch(&mut self, command: DashboardCommand) -> bool {
        self.controller.dispatch(command).await.is_ok()
    }

    /// Prompts until the open form is saved or abandoned.
    async fn fill_form(&mut self) -> anyhow::Result<()> {
        loop {
            let Some(form_view) = render(self.controller.session(), Instant::now()).form else {
                return Ok(());
            };

            let Some(form) = self
                .terminal
                .prompt_form(form_view.title, &form_view.form)
                .await?
            else {
                self.dispatch(DashboardCommand::CloseForm).await;
                return Ok(());
            };

            if self.dispatch(DashboardCommand::SubmitForm(form)).await {
                return Ok(());
            }

            if let Some(notification) = self.controller.session().notification() {
                let message = format!("{}\n", notification.message());
                self.terminal.print(&message).await?;
            }
            let retry = self.terminal.prompt("Try again? [y/N] ").await?;
            if !retry.as_deref().is_some_and(is_yes) {
                debug!("form abandoned");
                self.dispatch(DashboardCommand::CloseForm).await;
                return Ok(());
            }
        }
    }

    async fn show(&self) -> anyhow::Result<()> {
        let view = render(self.controller.session(), Instant::now());
        self.terminal.print(&view.to_string()).await?;

        if let Some(path) = &self.html_out {
            tokio::fs::write(path, view.to_html())
                .await
                .with_context(|| format!("failed to write html view to '{}'", path.display()))?;
        }
        Ok(())
    }

    async fn show_debug(&self) -> anyhow::Result<()> {
        let text = match self.controller.session().last_call() {
            Some(record) => DebugPanelView::from_record(record).to_string(),
            None => "No API calls yet\n".to_string(),
        };
        self.terminal.print(&text).await?;
        Ok(())
    }
}
