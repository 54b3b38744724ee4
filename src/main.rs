use anyhow::{Context, Result};
use clap::Parser;
use reelfeed::app::App;
use reelfeed::config::Config;
use reelfeed::feed::FeedEvent;
use reelfeed::platform::{
    CommandShare, HeadlessBackend, NativeShare, PlayerBackend, ProcessBackend, Sharer,
    SystemClipboard,
};
use reelfeed::{catalog, ui};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Get the config directory path (~/.config/reelfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("reelfeed"))
}

#[derive(Parser, Debug)]
#[command(
    name = "reelfeed",
    version,
    about = "Scroll through short videos in the terminal, one playing at a time"
)]
struct Args {
    /// Video catalog (.json or .toml). Overrides the config file.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Config file [default: ~/.config/reelfeed/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Track playback state without launching a player
    #[arg(long)]
    no_playback: bool,

    /// Validate the catalog, print the number of usable entries, and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never land on the alternate screen buffer
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog_path(&config_dir));
    let entries = catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;

    if args.check {
        println!(
            "{}: {} usable entries",
            catalog_path.display(),
            entries.len()
        );
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!("Warning: No usable videos in {}", catalog_path.display());
    }

    let backend: Box<dyn PlayerBackend> = if args.no_playback {
        Box::new(HeadlessBackend)
    } else {
        Box::new(ProcessBackend::new(
            config.player_command.clone(),
            config.mute_args.clone(),
        ))
    };

    let native = config
        .share_command
        .clone()
        .map(|cmd| Box::new(CommandShare::new(cmd)) as Box<dyn NativeShare>);
    let sharer = Sharer::new(native, Box::new(SystemClipboard::new()));

    let (event_tx, event_rx) = mpsc::channel::<FeedEvent>(32);
    let mut app = App::new(Arc::new(entries), &config, backend, sharer, event_tx)
        .context("Failed to create application")?;

    ui::run(&mut app, event_rx).await?;

    Ok(())
}
