//! Command line entry point for the headless board simulation

use anyhow::{Context, Result};
use board_engine::config::Config;
use board_engine::foundation::logging;
use board_engine::foundation::time::Stopwatch;
use board_game::{Game, GameConfig, Script};
use clap::{value_parser, Arg, Command};
use std::path::PathBuf;

const DEFAULT_TICKS: &str = "600";

fn main() -> Result<()> {
    let matches = Command::new("board-game")
        .about("Runs the tile board simulation headless for a fixed number of ticks")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Game configuration file (.toml or .ron)"),
        )
        .arg(
            Arg::new("map")
                .short('m')
                .long("map")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("ASCII map, overrides board.map_path"),
        )
        .arg(
            Arg::new("ticks")
                .short('t')
                .long("ticks")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Number of fixed ticks to simulate")
                .default_value(DEFAULT_TICKS),
        )
        .arg(
            Arg::new("script")
                .short('s')
                .long("script")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Input script to replay"),
        )
        .get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => GameConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(map) = matches.get_one::<PathBuf>("map") {
        config.board.map_path = map.clone();
    }
    logging::init_with_level(&config.engine.log_level);

    let script = matches
        .get_one::<PathBuf>("script")
        .map(|path| Script::load(path).with_context(|| format!("Failed to load script {}", path.display())))
        .transpose()?;
    let ticks = matches.get_one::<u64>("ticks").copied().unwrap_or_default();

    let map_path = config.board.map_path.clone();
    let mut game = Game::load(config).with_context(|| format!("Failed to load map {}", map_path.display()))?;

    let stopwatch = Stopwatch::start_new();
    game.run(ticks, script.as_ref());
    log::info!("Simulated {ticks} ticks in {:.2} ms", stopwatch.elapsed_millis());

    let body = game.body();
    log::info!(
        "Final body position ({:.2}, {:.2}) velocity ({:.2}, {:.2})",
        body.position.x,
        body.position.y,
        body.velocity.x,
        body.velocity.y
    );
    log::info!(
        "Camera at ({:.2}, {:.2}), touching {} solid tiles",
        game.camera_position().x,
        game.camera_position().y,
        game.colliding().len()
    );
    Ok(())
}
