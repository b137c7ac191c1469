use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use wrapsnake::{
    app::App,
    config::Config,
    logging,
    session::{GameSession, SessionSettings},
    store::FileStore,
};

#[derive(Parser)]
#[command(name = "wrapsnake")]
#[command(version, about = "Snake on a board whose edges wrap around")]
struct Cli {
    /// YAML configuration file
    #[arg(long, default_value = "wrapsnake.yaml")]
    config: PathBuf,

    /// Starting board size, one of the presets
    #[arg(long)]
    size: Option<usize>,

    /// Where the best score is kept
    #[arg(long)]
    store: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(store) = cli.store {
        config.storage.path = store;
    }
    if let Some(log_file) = cli.log_file {
        config.log.file = Some(log_file);
    }

    if let Some(path) = &config.log.file {
        logging::init_file_logger(path, &config.log.level)?;
    }

    let presets = config.board.presets();
    let size = cli.size.unwrap_or(config.board.base_size);
    if !presets.contains(&size) {
        bail!("board size {size} is not one of {presets:?}");
    }

    let store = FileStore::new(&config.storage.path);
    let session = GameSession::start(size, SessionSettings::from(&config), store);

    let mut app = App::new(session, presets);
    app.run()?;

    println!("\nThanks for playing! Best score: {}", app.session().best_score());
    Ok(())
}
