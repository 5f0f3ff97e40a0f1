mod game;
mod term;

use std::{env, fs::File};

use anyhow::{Context, Result};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

const LOG_FILE: &str = "wrapsnake.log";
/// Overrides the log level, e.g. `WRAPSNAKE_LOG=debug`.
const LOG_LEVEL_VAR: &str = "WRAPSNAKE_LOG";

fn main() -> Result<()> {
    // The terminal is in raw mode while playing, so logs go to a file
    let level = env::var(LOG_LEVEL_VAR).ok().and_then(|v| v.parse().ok()).unwrap_or(LevelFilter::Info);
    let file = File::create(LOG_FILE).with_context(|| format!("creating {}", LOG_FILE))?;
    WriteLogger::init(level, Config::default(), file).context("installing logger")?;
    info!("starting wrapsnake");

    let mut game = game::SnakeGame::new()?;
    game.initialize()?;

    let res = run(&mut game);
    game.restore()?;
    info!("bye");
    res
}

fn run(game: &mut game::SnakeGame) -> Result<()> {
    if !game.show_intro()? {
        return Ok(());
    }
    // The game loop only returns once the player quits
    game.play()
}
