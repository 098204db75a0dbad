use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{ConfirmPrompt, DashboardController, FixedAnswer, HttpUsersApi};
use storage::{SnapshotCache, Storage};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;
mod terminal;

use app::DashboardApp;
use config::{load_settings, normalize_cache_url, Settings, DEFAULT_CONFIG_PATH};
use terminal::{Terminal, TerminalConfirm};

#[derive(Parser, Debug)]
#[command(about = "Browse and edit users of a remote user-management service")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    cache_url: Option<String>,
    /// Server-side delay for list requests in seconds; 0 turns it off.
    #[arg(long)]
    delay: Option<u32>,
    /// Confirm deletions without asking.
    #[arg(long)]
    assume_yes: bool,
    /// Also write the rendered view as HTML to this file after every command.
    #[arg(long)]
    html_out: Option<PathBuf>,
}

impl Args {
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = &self.base_url {
            settings.base_url = v.clone();
        }
        if let Some(v) = &self.api_key {
            settings.api_key = v.clone();
        }
        if let Some(v) = &self.cache_url {
            settings.cache_url = v.clone();
        }
        if let Some(v) = self.delay {
            settings.request_delay_secs = (v > 0).then_some(v);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config);
    args.apply_to(&mut settings);

    let base_url = settings.validated_base_url()?;
    let cache_url = normalize_cache_url(&settings.cache_url);
    let storage = Storage::new(&cache_url).await.map_err(|error| {
        error!(
            %cache_url,
            %error,
            "failed to open cache database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let api = HttpUsersApi::new(base_url.clone(), settings.api_key.clone())
        .with_request_delay(settings.request_delay_secs);
    let terminal = Terminal::stdin();
    let confirm: Arc<dyn ConfirmPrompt> = if args.assume_yes {
        Arc::new(FixedAnswer(true))
    } else {
        Arc::new(TerminalConfirm::new(terminal.clone()))
    };
    let controller =
        DashboardController::new(Arc::new(api), SnapshotCache::new(storage), confirm)
            .with_notification_ttl(settings.notification_ttl());

    info!(%base_url, %cache_url, "dashboard starting");
    DashboardApp::new(controller, terminal, args.html_out).run().await
}
