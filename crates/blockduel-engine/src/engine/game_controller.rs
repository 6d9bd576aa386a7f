use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    BoardError,
    core::{
        board::{Board, CellSet},
        line_catalog::LineCatalog,
        shape::ShapeDefinition,
    },
};

use super::{
    combat::{Actor, CombatSystem, TerminalState},
    config::{ConfigError, GameConfig},
    game_stats::GameStats,
    line_clear,
    placement::PlacementEngine,
    shape_supply::{ShapeSupply, SlotId},
};

/// Events reported to the controller by its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameInput {
    /// The player started dragging the shape in `slot`.
    ShapeSelected { slot: SlotId },
    /// The player released the selected shape over `cells`.
    PlacementAttempted { cells: CellSet },
    /// The player asked for the board to be wiped.
    ResetRequested,
    /// The content source answered a [`GameOutput::NewShapesRequested`].
    NewShapeBatchProduced { shapes: Vec<ShapeDefinition> },
}

/// Notifications sent by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutput {
    /// The shape in `slot` snaps back to the tray.
    ShapeReturnToStart { slot: SlotId },
    /// The shape in `slot` can no longer be used.
    ShapeForceInactive { slot: SlotId },
    /// Every shape of the batch has been placed; a new batch is needed.
    NewShapesRequested,
    /// `count` lines were completed and cleared.
    LinesCleared { count: usize },
    DamageReported { target: Actor, amount: i32 },
    /// The duel has been decided. Sent once per session.
    GameEnded { did_win: bool },
}

/// Receives [`GameOutput`]s.
pub trait GameObserver {
    fn notify(&mut self, output: GameOutput);
}

impl GameObserver for Vec<GameOutput> {
    fn notify(&mut self, output: GameOutput) {
        self.push(output);
    }
}

/// Applies player and content events to the board, the shape tray and the
/// two health pools.
///
/// Every call to [`GameController::handle`] runs to completion and reports
/// its consequences to the observer before returning.
#[derive(Debug, Clone)]
pub struct GameController {
    config: GameConfig,
    board: Board,
    catalog: LineCatalog,
    placement: PlacementEngine,
    combat: CombatSystem,
    supply: ShapeSupply,
    stats: GameStats,
    outcome: Option<TerminalState>,
}

impl GameController {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.build_catalog()?;
        Ok(Self {
            board: Board::new(catalog.geometry()),
            placement: PlacementEngine::new(config.shape_matching),
            combat: CombatSystem::new(
                config.starting_player_hp,
                config.starting_enemy_hp,
                config.after_terminal,
            ),
            supply: ShapeSupply::new(),
            stats: GameStats::new(),
            outcome: None,
            catalog,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn catalog(&self) -> &LineCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn combat(&self) -> &CombatSystem {
        &self.combat
    }

    #[must_use]
    pub fn supply(&self) -> &ShapeSupply {
        &self.supply
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// The first terminal state reached this session, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<TerminalState> {
        self.outcome
    }

    /// Asks for the first batch of shapes.
    pub fn start<O>(&mut self, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        observer.notify(GameOutput::NewShapesRequested);
    }

    /// Starts a new session: empty board, full health, empty tray.
    pub fn restart<O>(&mut self, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        self.board.reset();
        self.combat.reset();
        self.supply.reset();
        self.stats = GameStats::new();
        self.outcome = None;
        info!("session restarted");
        self.start(observer);
    }

    #[instrument(level = "debug", skip(self, observer))]
    pub fn handle<O>(&mut self, input: GameInput, observer: &mut O) -> Result<(), BoardError>
    where
        O: GameObserver + ?Sized,
    {
        match input {
            GameInput::ShapeSelected { slot } => self.select_shape(slot),
            GameInput::PlacementAttempted { cells } => self.attempt_placement(&cells, observer)?,
            GameInput::ResetRequested => self.reset_board(observer),
            GameInput::NewShapeBatchProduced { shapes } => self.load_batch(shapes),
        }
        Ok(())
    }

    fn select_shape(&mut self, slot: SlotId) {
        if !self.supply.select(slot) {
            debug!(%slot, "ignoring selection of an unavailable shape");
        }
    }

    fn attempt_placement<O>(&mut self, cells: &CellSet, observer: &mut O) -> Result<(), BoardError>
    where
        O: GameObserver + ?Sized,
    {
        let Some((slot, shape)) = self.supply.selected_shape() else {
            debug!("placement attempted with no shape selected");
            return Ok(());
        };
        debug!(%slot, shape = shape.name(), cells = cells.len(), "placement attempted");

        let result = self.placement.try_place(&mut self.board, cells, shape)?;
        self.stats.record_placement(result);
        if result.is_rejected() {
            debug!(%slot, ?result, "placement rejected");
            self.supply.return_to_start(slot);
            observer.notify(GameOutput::ShapeReturnToStart { slot });
            self.evaluate_terminal(observer);
            return Ok(());
        }

        self.supply.commit(slot);
        if self.supply.all_exhausted() {
            debug!("shape batch exhausted");
            self.apply_damage(Actor::Player, self.config.damage.exhaustion, observer);
            observer.notify(GameOutput::NewShapesRequested);
        } else {
            observer.notify(GameOutput::ShapeForceInactive { slot });
            for sibling in self.supply.deactivate_off_start() {
                observer.notify(GameOutput::ShapeForceInactive { slot: sibling });
            }
        }

        let cleared = line_clear::clear_completed_lines(&mut self.board, &self.catalog);
        if cleared > 0 {
            debug!(cleared, "lines cleared");
            self.stats.record_line_clear(cleared);
            observer.notify(GameOutput::LinesCleared { count: cleared });
            let amount = self
                .config
                .damage
                .per_line
                .saturating_mul(i32::try_from(cleared).unwrap_or(i32::MAX));
            self.apply_damage(Actor::Enemy, amount, observer);
        }

        self.evaluate_terminal(observer);
        Ok(())
    }

    fn reset_board<O>(&mut self, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        info!(occupied = self.board.occupied_count(), "board reset requested");
        self.board.reset();
        self.stats.record_reset();
        self.apply_damage(Actor::Player, self.config.damage.reset, observer);
        self.evaluate_terminal(observer);
    }

    fn load_batch(&mut self, shapes: Vec<ShapeDefinition>) {
        if shapes.is_empty() {
            warn!("received an empty shape batch, keeping the current tray");
            return;
        }
        let loaded = self.supply.refill(shapes);
        self.stats.record_batch();
        debug!(loaded, "shape batch loaded");
    }

    fn apply_damage<O>(&mut self, target: Actor, amount: i32, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        if !self.combat.damage(target, amount) {
            debug!(%target, amount, "damage suppressed after the game ended");
            return;
        }
        self.stats.record_damage(target, amount);
        debug!(%target, amount, hp = self.combat.pool(target).hp(), "damage applied");
        observer.notify(GameOutput::DamageReported { target, amount });
    }

    fn evaluate_terminal<O>(&mut self, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        if self.outcome.is_some() {
            return;
        }
        let state = self.combat.check_terminal();
        if state.is_terminal() {
            info!(
                ?state,
                player_hp = self.combat.player().hp(),
                enemy_hp = self.combat.enemy().hp(),
                "game ended"
            );
            self.outcome = Some(state);
            observer.notify(GameOutput::GameEnded {
                did_win: state.is_win(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{AfterTerminal, ShapeMatching, cell_set};

    use super::*;

    fn dot() -> ShapeDefinition {
        ShapeDefinition::parse("dot", &["#"]).unwrap()
    }

    fn l_shape() -> ShapeDefinition {
        ShapeDefinition::parse("L", &["##", "#.", "#."]).unwrap()
    }

    fn game_with(config: GameConfig, shapes: Vec<ShapeDefinition>) -> GameController {
        let mut game = GameController::new(config).unwrap();
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(GameInput::NewShapeBatchProduced { shapes }, &mut outputs)
            .unwrap();
        assert!(outputs.is_empty());
        game
    }

    fn place(game: &mut GameController, slot: usize, cells: CellSet) -> Vec<GameOutput> {
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(
            GameInput::ShapeSelected {
                slot: SlotId::new(slot),
            },
            &mut outputs,
        )
        .unwrap();
        game.handle(GameInput::PlacementAttempted { cells }, &mut outputs)
            .unwrap();
        outputs
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig {
            batch_size: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            GameController::new(config).unwrap_err(),
            ConfigError::ZeroBatchSize
        );
    }

    #[test]
    fn test_placement_without_selection_is_noop() {
        let mut game = game_with(GameConfig::default(), vec![dot()]);
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(
            GameInput::PlacementAttempted {
                cells: cell_set([0]),
            },
            &mut outputs,
        )
        .unwrap();
        assert!(outputs.is_empty());
        assert!(game.board().is_empty());
        assert_eq!(game.stats().accepted_placements(), 0);
    }

    #[test]
    fn test_rejected_placement_returns_shape() {
        let mut game = game_with(GameConfig::default(), vec![l_shape(), dot()]);
        let outputs = place(&mut game, 0, cell_set([0, 1, 8]));
        assert_eq!(
            outputs,
            vec![GameOutput::ShapeReturnToStart {
                slot: SlotId::new(0)
            }]
        );
        assert!(game.board().is_empty());
        assert_eq!(game.supply().remaining(), 2);
        assert_eq!(game.supply().selected(), None);
        assert_eq!(game.stats().rejected_count_mismatch(), 1);
    }

    #[test]
    fn test_accepted_placement_hides_placed_shape() {
        let mut game = game_with(GameConfig::default(), vec![l_shape(), dot(), dot()]);
        let outputs = place(&mut game, 0, cell_set([0, 1, 8, 16]));
        assert_eq!(
            outputs,
            vec![GameOutput::ShapeForceInactive {
                slot: SlotId::new(0)
            }]
        );
        assert_eq!(game.board().occupied_count(), 4);
        assert_eq!(game.supply().remaining(), 2);
        assert_eq!(game.combat().player().hp(), 10);
    }

    #[test]
    fn test_switching_selection_only_deactivates_placed_shape() {
        let mut game = game_with(GameConfig::default(), vec![l_shape(), dot(), dot()]);
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(
            GameInput::ShapeSelected {
                slot: SlotId::new(0),
            },
            &mut outputs,
        )
        .unwrap();
        let first = game.supply().instance(SlotId::new(0)).unwrap();
        assert!(!first.is_at_start_position());

        outputs.extend(place(&mut game, 1, cell_set([9])));

        // switching to slot 1 sent slot 0 back, so only slot 1 is hidden
        assert_eq!(
            outputs,
            vec![GameOutput::ShapeForceInactive {
                slot: SlotId::new(1)
            }]
        );
        let first = game.supply().instance(SlotId::new(0)).unwrap();
        assert!(first.is_active());
        assert!(first.is_at_start_position());
        assert_eq!(game.supply().remaining(), 2);

        let outputs = place(&mut game, 0, cell_set([0, 1, 8, 16]));
        assert_eq!(
            outputs,
            vec![GameOutput::ShapeForceInactive {
                slot: SlotId::new(0)
            }]
        );
        assert_eq!(game.board().occupied_count(), 5);
    }

    #[test]
    fn test_exhaustion_damages_player_and_requests_shapes() {
        let mut game = game_with(GameConfig::default(), vec![dot(), dot()]);
        place(&mut game, 0, cell_set([0]));
        let outputs = place(&mut game, 1, cell_set([1]));
        assert_eq!(
            outputs,
            vec![
                GameOutput::DamageReported {
                    target: Actor::Player,
                    amount: 1,
                },
                GameOutput::NewShapesRequested,
            ]
        );
        assert_eq!(game.combat().player().hp(), 9);
    }

    #[test]
    fn test_line_clear_damages_enemy() {
        let mut game = game_with(GameConfig::default(), vec![dot(), dot()]);
        let mut outputs: Vec<GameOutput> = vec![];
        game.board.occupy(&cell_set(1..8));
        outputs.extend(place(&mut game, 0, cell_set([0])));
        assert_eq!(
            outputs,
            vec![
                GameOutput::ShapeForceInactive {
                    slot: SlotId::new(0)
                },
                GameOutput::LinesCleared { count: 1 },
                GameOutput::DamageReported {
                    target: Actor::Enemy,
                    amount: 2,
                },
            ]
        );
        assert!(game.board().is_empty());
        assert_eq!(game.combat().enemy().hp(), 8);
    }

    #[test]
    fn test_reset_damages_player() {
        let mut game = game_with(GameConfig::default(), vec![dot()]);
        game.board.occupy(&cell_set([3, 4, 5]));
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(GameInput::ResetRequested, &mut outputs).unwrap();
        assert!(game.board().is_empty());
        assert_eq!(game.combat().player().hp(), 8);
        assert_eq!(game.stats().resets(), 1);
        assert_eq!(
            outputs,
            vec![GameOutput::DamageReported {
                target: Actor::Player,
                amount: 2,
            }]
        );
    }

    #[test]
    fn test_game_ended_reported_once() {
        let config = GameConfig {
            starting_player_hp: 2,
            ..GameConfig::default()
        };
        let mut game = game_with(config, vec![dot()]);
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(GameInput::ResetRequested, &mut outputs).unwrap();
        game.handle(GameInput::ResetRequested, &mut outputs).unwrap();
        let ended: Vec<_> = outputs
            .iter()
            .filter(|o| matches!(o, GameOutput::GameEnded { .. }))
            .collect();
        assert_eq!(ended, vec![&GameOutput::GameEnded { did_win: false }]);
        assert_eq!(game.outcome(), Some(TerminalState::Lose));
        // damage keeps applying by default
        assert_eq!(game.combat().player().hp(), -2);
    }

    #[test]
    fn test_damage_suppressed_after_end() {
        let config = GameConfig {
            starting_player_hp: 2,
            after_terminal: AfterTerminal::Suppress,
            ..GameConfig::default()
        };
        let mut game = game_with(config, vec![dot()]);
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(GameInput::ResetRequested, &mut outputs).unwrap();
        outputs.clear();
        game.handle(GameInput::ResetRequested, &mut outputs).unwrap();
        assert!(outputs.is_empty());
        assert_eq!(game.combat().player().hp(), 0);
    }

    #[test]
    fn test_empty_batch_is_ignored() {
        let mut game = game_with(GameConfig::default(), vec![dot()]);
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(
            GameInput::NewShapeBatchProduced { shapes: vec![] },
            &mut outputs,
        )
        .unwrap();
        assert_eq!(game.supply().remaining(), 1);
        assert_eq!(game.stats().batches_loaded(), 1);
    }

    #[test]
    fn test_translate_matching() {
        let config = GameConfig {
            shape_matching: ShapeMatching::Translate,
            ..GameConfig::default()
        };
        let mut game = game_with(config, vec![l_shape(), dot()]);
        let outputs = place(&mut game, 0, cell_set([0, 9, 18, 27]));
        assert_eq!(
            outputs,
            vec![GameOutput::ShapeReturnToStart {
                slot: SlotId::new(0)
            }]
        );
        assert_eq!(game.stats().rejected_shape_mismatch(), 1);
    }

    #[test]
    fn test_out_of_range_propagates() {
        let mut game = game_with(GameConfig::default(), vec![dot()]);
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(
            GameInput::ShapeSelected {
                slot: SlotId::new(0),
            },
            &mut outputs,
        )
        .unwrap();
        let err = game
            .handle(
                GameInput::PlacementAttempted {
                    cells: cell_set([100]),
                },
                &mut outputs,
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::OutOfRange { .. }));
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_restart() {
        let mut game = game_with(GameConfig::default(), vec![dot()]);
        place(&mut game, 0, cell_set([0]));
        let mut outputs: Vec<GameOutput> = vec![];
        game.restart(&mut outputs);
        assert_eq!(outputs, vec![GameOutput::NewShapesRequested]);
        assert!(game.board().is_empty());
        assert_eq!(game.combat().player().hp(), 10);
        assert_eq!(game.stats(), &GameStats::new());
        assert!(game.supply().all_exhausted());
        assert_eq!(game.outcome(), None);
    }
}
