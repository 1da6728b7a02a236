use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use week_in_music::config::Config;
use week_in_music::domain::{normalize_day, ImportMode, ImportScope};
use week_in_music::github::GitHubClient;
use week_in_music::observability::logging;
use week_in_music::pipeline::{combine, parse_day_csv, parse_week_csv, ParseOutcome};
use week_in_music::server::{start_server, AppState};
use week_in_music::storage::{FileStore, WeekStore};

#[derive(Parser)]
#[command(name = "week_in_music")]
#[command(about = "Week in Music weekly listings admin")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the admin and public HTTP server
    Serve,
    /// Import a CSV file into the local week data
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// How the import combines with the current data
        #[arg(long, value_enum, default_value_t = Mode::Replace)]
        mode: Mode,
        /// Target day for the single-day template (venue,venueUrl,artist,date,time).
        /// Without this the file must use the full-week template.
        #[arg(long)]
        day: Option<String>,
    },
    /// Publish the local week data to the configured GitHub repository
    Publish,
    /// Fetch the published week data from GitHub into the local file
    Pull,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Discard the current data for the affected scope
    Replace,
    /// Combine with the current data, skipping duplicates
    Merge,
}

impl From<Mode> for ImportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Replace => ImportMode::Replace,
            Mode::Merge => ImportMode::Merge,
        }
    }
}

async fn run_import(config: &Config, file: &PathBuf, mode: Mode, day: Option<String>) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let (outcome, scope): (ParseOutcome, ImportScope) = match day {
        Some(raw) => {
            let Some(day) = normalize_day(&raw) else {
                bail!("Invalid day: {raw} (expected Monday through Sunday)");
            };
            (parse_day_csv(&text, day)?, ImportScope::SingleDay(day))
        }
        None => (parse_week_csv(&text)?, ImportScope::FullWeek),
    };

    let store = FileStore::new(&config.server.data_file);
    let current = store.load_or_default().await?;
    let next = combine(&current, &outcome.week, mode.into(), &scope);
    store.save(&next).await?;

    println!("\n📊 Import results:");
    println!("   Rows imported: {}", outcome.imported);
    println!("   Rows skipped:  {}", outcome.skipped);
    println!("   Total events:  {}", next.total_events());
    println!("   Data file:     {}", config.server.data_file);
    Ok(())
}

fn github_client(config: &Config) -> anyhow::Result<GitHubClient> {
    if config.github.repo.is_empty() {
        bail!("No GitHub repository configured (set GH_REPO or [github] repo in config.toml)");
    }
    let token = config
        .github_token()
        .context("GH_TOKEN must be set to talk to GitHub")?;
    Ok(GitHubClient::new(
        config.github.repo.clone(),
        config.github.file_path.clone(),
        token,
    )?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve => {
            info!(port = config.server.port, "starting server");
            let state = AppState {
                store: Arc::new(FileStore::new(&config.server.data_file)),
                config: Arc::new(config),
            };
            start_server(state).await?;
        }
        Commands::Import { file, mode, day } => {
            println!("🔄 Importing {}...", file.display());
            run_import(&config, &file, mode, day).await?;
        }
        Commands::Publish => {
            println!("🔄 Publishing week data to GitHub...");
            let store = FileStore::new(&config.server.data_file);
            let week = store
                .load()
                .await
                .context("no local week data to publish")?;
            let commit = github_client(&config)?.publish(&week).await?;
            println!("✅ Published {} events (commit {})", week.total_events(), commit);
        }
        Commands::Pull => {
            println!("🔄 Fetching week data from GitHub...");
            let week = github_client(&config)?.fetch().await?;
            let store = FileStore::new(&config.server.data_file);
            store.save(&week).await?;
            println!(
                "✅ Pulled {} events into {}",
                week.total_events(),
                config.server.data_file
            );
        }
    }

    Ok(())
}
