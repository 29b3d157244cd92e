use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use songplay_etl::config::{EtlConfig, load_config_path};
use songplay_etl::{pipeline, warehouse};

#[derive(Parser)]
#[command(version, about = "Load song and activity-log JSON into the songplay warehouse")]
struct Cli {
    /// Optional TOML config file
    #[arg(long, short, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Warehouse URL (postgres://...) or SQLite path
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Load both data trees (default)
    Run(RunArgs),
    /// Drop and recreate all warehouse tables
    ResetSchema,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Root of the song-metadata tree
    #[arg(long, value_name = "DIR")]
    song_data: Option<PathBuf>,

    /// Root of the activity-log tree
    #[arg(long, value_name = "DIR")]
    log_data: Option<PathBuf>,
}

fn resolve_config(cli: &Cli, run: &RunArgs) -> Result<EtlConfig> {
    let mut cfg = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => EtlConfig::default(),
    };
    cfg.apply_env();

    if let Some(url) = &cli.database_url {
        cfg.database_url = url.clone();
    }
    if let Some(dir) = &run.song_data {
        cfg.song_data = dir.clone();
    }
    if let Some(dir) = &run.log_data {
        cfg.log_data = dir.clone();
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.cmd {
        Some(Cmd::ResetSchema) => {
            let cfg = resolve_config(&cli, &RunArgs::default())?;
            warehouse::open_reset(&cfg.database_url)
                .with_context(|| format!("failed to reset tables in {}", cfg.database_url))?;
            tracing::info!(database = %cfg.database_url, "tables recreated");
        }
        Some(Cmd::Run(args)) => run(&cli, args)?,
        None => run(&cli, &RunArgs::default())?,
    }

    Ok(())
}

fn run(cli: &Cli, args: &RunArgs) -> Result<()> {
    let cfg = resolve_config(cli, args)?;

    // One connection for both trees, dropped when the batch ends.
    let mut wh = warehouse::open(&cfg.database_url, true)
        .with_context(|| format!("failed to open warehouse {}", cfg.database_url))?;
    let report = pipeline::run(wh.as_mut(), &cfg).context("ETL batch aborted")?;

    tracing::info!(
        song_files = report.songs.files,
        log_files = report.logs.files,
        songs = report.songs.rows.songs,
        artists = report.songs.rows.artists,
        time_rows = report.logs.rows.time_rows,
        users = report.logs.rows.users,
        songplays = report.logs.rows.songplays,
        unmatched = report.logs.rows.unmatched_plays,
        "ETL finished"
    );
    Ok(())
}
