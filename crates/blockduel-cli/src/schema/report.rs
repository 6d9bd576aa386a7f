use blockduel_engine::{BatchSeed, Board, GameConfig, GameStats, TerminalState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Results of a `simulate` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Timestamp when the run finished (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Seed of the shape batch generator shared by every game
    pub seed: BatchSeed,
    pub max_turns: usize,
    pub config: GameConfig,
    pub summary: SimulationSummary,
    pub games: Vec<GameRecord>,
}

/// How a simulated game finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Win,
    Lose,
    /// Stopped at the turn limit with both sides alive.
    TurnLimit,
}

impl GameOutcome {
    pub fn from_terminal(state: Option<TerminalState>) -> Self {
        match state {
            Some(TerminalState::Win) => Self::Win,
            Some(TerminalState::Lose) => Self::Lose,
            Some(TerminalState::Ongoing) | None => Self::TurnLimit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game: usize,
    pub outcome: GameOutcome,
    /// Bot decisions taken, placements and resets alike
    pub turns: usize,
    pub player_hp: i32,
    pub enemy_hp: i32,
    pub stats: GameStats,
    pub final_board: Board,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub turn_limits: usize,
    pub mean_turns: f64,
    pub total_cleared_lines: usize,
}

impl SimulationSummary {
    #[expect(clippy::cast_precision_loss)]
    pub fn from_records(records: &[GameRecord]) -> Self {
        let count = |outcome: GameOutcome| records.iter().filter(|r| r.outcome == outcome).count();
        let total_turns: usize = records.iter().map(|r| r.turns).sum();
        let mean_turns = if records.is_empty() {
            0.0
        } else {
            total_turns as f64 / records.len() as f64
        };
        Self {
            games: records.len(),
            wins: count(GameOutcome::Win),
            losses: count(GameOutcome::Lose),
            turn_limits: count(GameOutcome::TurnLimit),
            mean_turns,
            total_cleared_lines: records.iter().map(|r| r.stats.total_cleared_lines()).sum(),
        }
    }
}
