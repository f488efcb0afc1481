//! Brick Pong headless runner
//!
//! Plays heuristic against heuristic and prints every round summary as a
//! JSON line.
//!
//! Usage: `brick-pong [SEED] [TICKS] [TUNING]` (see `brick-pong --help`)

use std::error::Error;
use std::path::PathBuf;

use brick_pong::Match;
use brick_pong::sim::GameEvent;
use brick_pong::tuning::Tuning;
use clap::Parser;

const DEFAULT_TICKS: u64 = 60 * 60 * 5;

#[derive(Parser, Debug)]
#[command(name = "brick-pong")]
#[command(about = "Headless heuristic-vs-heuristic Brick Pong match", long_about = None)]
struct Args {
    /// Match seed (random when omitted)
    seed: Option<u64>,

    /// Tick limit
    #[arg(default_value_t = DEFAULT_TICKS)]
    ticks: u64,

    /// Tuning JSON file
    tuning: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    let ticks = args.ticks;
    let tuning = match args.tuning {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };

    log::info!("Brick Pong starting: seed {}, up to {} ticks", seed, ticks);
    let mut game = Match::demo(tuning, seed);

    let mut ran = 0;
    while ran < ticks && game.state.winner.is_none() {
        game.step(&Default::default());
        ran += 1;
        for event in &game.state.events {
            if let GameEvent::RoundEnded(summary) = event {
                println!("{}", serde_json::to_string(summary)?);
            }
        }
    }

    let stats = &game.state.stats;
    log::info!(
        "Stopped after {} ticks at round {}, level {}: player {} ({} pts), opponent {} ({} pts), winner {}",
        ran,
        game.state.round,
        game.state.level,
        stats.player.total_score,
        stats.player.points,
        stats.opponent.total_score,
        stats.opponent.points,
        game.state.winner.map_or("none", |w| w.as_str())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["brick-pong"]).unwrap();
        assert_eq!(args.seed, None);
        assert_eq!(args.ticks, DEFAULT_TICKS);
        assert!(args.tuning.is_none());

        let args = Args::try_parse_from(["brick-pong", "7", "120", "tuning.json"]).unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.ticks, 120);
        assert_eq!(args.tuning, Some(PathBuf::from("tuning.json")));
    }

    #[test]
    fn test_args_reject_bad_seed() {
        assert!(Args::try_parse_from(["brick-pong", "abc"]).is_err());
    }
}
