use anyhow::Result;
use tracing::info;

use patzer_game::{Difficulty, GameMode, Repl};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("patzer starting");

    let difficulty = std::env::args()
        .nth(1)
        .map(|key| Difficulty::from_key(&key))
        .unwrap_or_default();
    Repl::new(GameMode::default(), difficulty).run();
    Ok(())
}
