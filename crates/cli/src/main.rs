use std::path::PathBuf;

use anyhow::Context;
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookstore", about = "Bookstore service command line", version)]
struct Cli {
    /// Directory holding `base.toml` and `{env}.toml`
    #[arg(long, env = "BOOKSTORE_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Deployment environment: local, staging, or production
    #[arg(long, env = "BOOKSTORE_ENV")]
    env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Print the effective configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Allow missing `.env` files without failing.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = Settings::load_from(cli.config_dir.as_deref(), cli.env.as_deref())
        .with_context(|| "failed to load bookstore settings")?;

    match cli.command {
        Command::Serve => {
            bookstore_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "serving from CLI");
            bookstore_app::serve(settings).await
        }
        Command::Migrate => {
            let applied = bookstore_app::migrate(&settings).await?;
            println!("applied {} migration(s)", applied);
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{}", rendered);
            Ok(())
        }
    }
}
