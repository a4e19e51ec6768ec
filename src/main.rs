use anyhow::Result;
use clap::Parser;
use snake_session::game::GameConfig;
use snake_session::modes::{BoxedStore, PlayMode};
use snake_session::persistence::{JsonFileStore, MemoryStore};
use snake_session::share::{FileShareTarget, ShareTarget};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_session")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Side length of the square grid
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(2..=64))]
    grid_size: u16,

    /// Milliseconds between two moves
    #[arg(long, default_value = "150", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Keep the high score for this run only
    #[arg(long)]
    no_persist: bool,

    /// Enable sharing; shared scores are appended to this file
    #[arg(long)]
    share_file: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    snake_session::logging::init(cli.log_file.as_deref())?;

    let config = GameConfig::new(cli.grid_size as usize)
        .with_tick_interval(cli.tick_ms)
        .with_seed(cli.seed);

    let store: BoxedStore = if cli.no_persist {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(cli.high_score_file))
    };

    let share_target = cli
        .share_file
        .map(|path| Box::new(FileShareTarget::new(path)) as Box<dyn ShareTarget>);

    let mut play_mode = PlayMode::new(config, store, share_target);
    play_mode.run().await?;

    Ok(())
}
