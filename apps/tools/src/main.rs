use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storage::{SnapshotCache, Storage};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/dashboard.db")]
    cache_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cached snapshot and every raw entry.
    Show,
    /// Remove the cached users and page entries.
    Clear,
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.cache_url).await?;
    let cache = SnapshotCache::new(storage.clone());

    match cli.command {
        Command::Show => {
            match cache.load().await.context("cached snapshot is unreadable")? {
                Some(snapshot) => {
                    println!(
                        "snapshot page={} total_pages={} users={}",
                        snapshot.current_page,
                        snapshot.total_pages,
                        snapshot.users.len()
                    );
                    for user in &snapshot.users {
                        println!(
                            "  {} {} {} <{}> {}",
                            user.id, user.first_name, user.last_name, user.email, user.job
                        );
                    }
                }
                None => println!("no complete snapshot cached"),
            }
            for entry in storage.entries().await? {
                println!(
                    "entry key={} updated_at={} bytes={}",
                    entry.key,
                    entry.updated_at,
                    entry.value.len()
                );
            }
        }
        Command::Clear => {
            cache.clear().await?;
            println!("cleared cached snapshot in {}", cli.cache_url);
        }
        Command::Health => {
            storage.health_check().await?;
            println!("cache ok: {}", cli.cache_url);
        }
    }

    Ok(())
}
