use std::path::PathBuf;

use blockduel_engine::{
    Actor, BatchSeed, GameConfig, GameController, GameInput, GameObserver, GameOutput,
    ShapeBatchGenerator, ShapeCatalog,
};
use rand::Rng as _;
use tracing::{debug, info};

use crate::{
    bot::GreedyBot,
    schema::report::{GameOutcome, GameRecord, SimulationReport, SimulationSummary},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Game configuration file (JSON). Built-in defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Seed for shape batches, as 32 hex characters. Random when omitted
    #[arg(long)]
    seed: Option<BatchSeed>,
    /// Stop a game after this many bot decisions
    #[arg(long, default_value_t = 500)]
    max_turns: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        games,
        seed,
        max_turns,
        output,
    } = arg;

    let config = match config {
        Some(path) => util::read_config_file(path)?,
        None => GameConfig::default(),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!(%seed, games, max_turns, "starting simulation");

    let mut generator = ShapeBatchGenerator::with_seed(ShapeCatalog::builtin(), seed);
    let mut records = Vec::with_capacity(*games);
    for game in 0..*games {
        let record = play_game(game, &config, &mut generator, *max_turns)?;
        info!(
            game,
            outcome = ?record.outcome,
            turns = record.turns,
            player_hp = record.player_hp,
            enemy_hp = record.enemy_hp,
            "game finished"
        );
        records.push(record);
    }

    let summary = SimulationSummary::from_records(&records);
    info!(
        wins = summary.wins,
        losses = summary.losses,
        turn_limits = summary.turn_limits,
        "simulation finished"
    );
    let report = SimulationReport {
        generated_at: chrono::Utc::now(),
        seed,
        max_turns: *max_turns,
        config,
        summary,
        games: records,
    };
    Output::save_json(&report, output.clone())?;
    Ok(())
}

/// Remembers what the controller asked for during one event.
#[derive(Debug, Default)]
struct TurnLog {
    shapes_requested: bool,
}

impl GameObserver for TurnLog {
    fn notify(&mut self, output: GameOutput) {
        match output {
            GameOutput::NewShapesRequested => self.shapes_requested = true,
            GameOutput::DamageReported {
                target: Actor::Enemy,
                amount,
            } => debug!(amount, "enemy hit"),
            GameOutput::DamageReported {
                target: Actor::Player,
                amount,
            } => debug!(amount, "player hit"),
            GameOutput::LinesCleared { count } => debug!(count, "lines cleared"),
            GameOutput::GameEnded { did_win } => debug!(did_win, "game ended"),
            GameOutput::ShapeReturnToStart { .. } | GameOutput::ShapeForceInactive { .. } => {}
        }
    }
}

fn play_game(
    game_index: usize,
    config: &GameConfig,
    generator: &mut ShapeBatchGenerator,
    max_turns: usize,
) -> anyhow::Result<GameRecord> {
    let mut game = GameController::new(config.clone())?;
    let mut log = TurnLog::default();
    game.start(&mut log);

    let mut turns = 0;
    while game.outcome().is_none() && turns < max_turns {
        if log.shapes_requested {
            log.shapes_requested = false;
            let shapes = generator.next_batch(config.batch_size);
            game.handle(GameInput::NewShapeBatchProduced { shapes }, &mut log)?;
            continue;
        }

        turns += 1;
        match GreedyBot.select_best_turn(&game) {
            Some(plan) => {
                game.handle(GameInput::ShapeSelected { slot: plan.slot }, &mut log)?;
                game.handle(GameInput::PlacementAttempted { cells: plan.cells }, &mut log)?;
            }
            None => {
                debug!(game = game_index, turn = turns, "no placement fits, resetting");
                game.handle(GameInput::ResetRequested, &mut log)?;
            }
        }
    }

    Ok(GameRecord {
        game: game_index,
        outcome: GameOutcome::from_terminal(game.outcome()),
        turns,
        player_hp: game.combat().player().hp(),
        enemy_hp: game.combat().enemy().hp(),
        stats: game.stats().clone(),
        final_board: game.board().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> BatchSeed {
        "00112233445566778899aabbccddeeff".parse().unwrap()
    }

    #[test]
    fn test_game_is_deterministic_for_a_seed() {
        let config = GameConfig::default();
        let mut a = ShapeBatchGenerator::with_seed(ShapeCatalog::builtin(), seed());
        let mut b = ShapeBatchGenerator::with_seed(ShapeCatalog::builtin(), seed());
        let first = play_game(0, &config, &mut a, 200).unwrap();
        let second = play_game(0, &config, &mut b, 200).unwrap();
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.turns, second.turns);
        assert_eq!(first.stats, second.stats);
        assert_eq!(first.final_board, second.final_board);
    }

    #[test]
    fn test_game_respects_turn_limit() {
        let config = GameConfig {
            starting_player_hp: 1000,
            starting_enemy_hp: 1000,
            ..GameConfig::default()
        };
        let mut generator = ShapeBatchGenerator::with_seed(ShapeCatalog::builtin(), seed());
        let record = play_game(0, &config, &mut generator, 5).unwrap();
        assert_eq!(record.turns, 5);
        assert_eq!(record.outcome, GameOutcome::TurnLimit);
    }

    #[test]
    fn test_game_ends_with_a_decision() {
        let config = GameConfig {
            starting_player_hp: 3,
            starting_enemy_hp: 3,
            ..GameConfig::default()
        };
        let mut generator = ShapeBatchGenerator::with_seed(ShapeCatalog::builtin(), seed());
        let record = play_game(0, &config, &mut generator, 10_000).unwrap();
        assert_ne!(record.outcome, GameOutcome::TurnLimit);
        assert!(record.player_hp <= 0 || record.enemy_hp <= 0);
    }
}
