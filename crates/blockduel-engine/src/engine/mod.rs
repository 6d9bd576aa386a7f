//! Game rules and per-event orchestration.
//!
//! This module builds the duel on top of the [`crate::core`] data structures:
//!
//! - [`PlacementEngine`] - Accepts or rejects a shape over a set of board cells
//! - [`line_clear`] - Finds and clears completed lines
//! - [`CombatSystem`] - Player and enemy health pools, terminal detection
//! - [`ShapeSupply`] - Arena of reusable shape slots in the tray
//! - [`GameController`] - Applies one [`GameInput`] at a time and reports [`GameOutput`]s
//! - [`GameConfig`] - Board size, starting health, line catalog and rule policies
//! - [`ShapeBatchGenerator`] - Seeded source of shape batches
//! - [`GameStats`] - Per-session counters
//!
//! # Game Flow
//!
//! 1. The controller asks for shapes ([`GameOutput::NewShapesRequested`])
//! 2. The content source answers with [`GameInput::NewShapeBatchProduced`]
//! 3. The player selects a shape and drops it over some cells
//!    ([`GameInput::PlacementAttempted`])
//! 4. Accepted placements occupy the cells, completed lines are cleared and
//!    the enemy takes damage
//! 5. Using up the whole batch damages the player and asks for a new batch
//! 6. Repeat until one side runs out of health
//!
//! # Example
//!
//! ```
//! use blockduel_engine::{
//!     GameConfig, GameController, GameInput, GameOutput, ShapeDefinition, SlotId, cell_set,
//! };
//!
//! let mut game = GameController::new(GameConfig::default()).unwrap();
//! let mut outputs = Vec::new();
//! game.start(&mut outputs);
//! assert_eq!(outputs, vec![GameOutput::NewShapesRequested]);
//!
//! let shapes = vec![ShapeDefinition::parse("L", &["##", "#.", "#."]).unwrap()];
//! game.handle(GameInput::NewShapeBatchProduced { shapes }, &mut outputs).unwrap();
//! game.handle(GameInput::ShapeSelected { slot: SlotId::new(0) }, &mut outputs).unwrap();
//! game.handle(
//!     GameInput::PlacementAttempted { cells: cell_set([0, 1, 8, 16]) },
//!     &mut outputs,
//! )
//! .unwrap();
//!
//! assert_eq!(game.board().occupied_count(), 4);
//! ```

pub use self::{
    combat::*, config::*, game_controller::*, game_stats::*, placement::*, shape_batch::*,
    shape_supply::*,
};

mod combat;
mod config;
mod game_controller;
mod game_stats;
pub mod line_clear;
mod placement;
mod shape_batch;
mod shape_supply;
