use std::process::ExitCode;

use decision_worker::{DecisionChannel, Recorder, Tracker};
use game_core::Mode;
use game_host::{FileStorage, GameLoop, HostConfig, MemoryStorage, Storage};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = HostConfig::from_env()?;

    let storage: Box<dyn Storage> = match &config.store_path {
        Some(path) => {
            info!(path = %path.display(), "using file storage");
            Box::new(FileStorage::new(path))
        }
        None => Box::new(MemoryStorage::new()),
    };

    let link = match DecisionChannel::spawn(|| Ok(Recorder::new(Tracker::new()))) {
        Ok(channel) => Some(channel),
        Err(e) => {
            warn!(error = %e, "could not start decision worker");
            None
        }
    };
    if link.is_none() && config.game.initial_mode.is_autonomous() {
        warn!("falling back to human mode");
        config.game.initial_mode = Mode::Human;
    }

    let mut game = GameLoop::new(config.game, link, storage)?;
    game.ping();
    info!(ticks = config.ticks, mode = %game.mode(), "running");
    let score = game.run(config.ticks);
    info!(
        left = score.left,
        right = score.right,
        round_trip_ticks = ?game.liveness().last_round_trip(),
        "finished"
    );

    if let Some(channel) = game.take_link() {
        channel.shutdown();
    }
    Ok(())
}
