use blockduel_engine::{CellSet, GameController, PlacementEngine, SlotId, line_clear};

/// A placement chosen by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    pub slot: SlotId,
    pub cells: CellSet,
}

/// Picks the placement that completes the most lines.
///
/// Ties go to the lowest slot, then to the footprint whose anchor comes first
/// in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBot;

impl GreedyBot {
    #[must_use]
    pub fn select_best_turn(self, game: &GameController) -> Option<TurnPlan> {
        let board = game.board();
        let geometry = board.geometry();
        let placement = PlacementEngine::new(game.config().shape_matching);

        let mut best_score = None;
        let mut best_turn = None;
        for (slot, shape) in game.supply().available() {
            for cells in shape.footprints(geometry) {
                let accepted = placement
                    .check(board, &cells, shape)
                    .is_ok_and(|result| result.is_accepted());
                if !accepted {
                    continue;
                }
                let mut simulated = board.clone();
                simulated.occupy(&cells);
                let score = line_clear::completed_lines(&simulated, game.catalog()).count();
                if best_score.is_none_or(|best| score > best) {
                    best_score = Some(score);
                    best_turn = Some(TurnPlan { slot, cells });
                }
            }
        }
        best_turn
    }
}

#[cfg(test)]
mod tests {
    use blockduel_engine::{GameConfig, GameInput, GameOutput, ShapeDefinition, cell_set};

    use super::*;

    fn game_with(shapes: Vec<ShapeDefinition>) -> GameController {
        let mut game = GameController::new(GameConfig::default()).unwrap();
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(GameInput::NewShapeBatchProduced { shapes }, &mut outputs)
            .unwrap();
        game
    }

    fn place(game: &mut GameController, plan: TurnPlan) {
        let mut outputs: Vec<GameOutput> = vec![];
        game.handle(GameInput::ShapeSelected { slot: plan.slot }, &mut outputs)
            .unwrap();
        game.handle(GameInput::PlacementAttempted { cells: plan.cells }, &mut outputs)
            .unwrap();
    }

    #[test]
    fn test_empty_board_takes_first_anchor() {
        let l = ShapeDefinition::parse("L", &["##", "#.", "#."]).unwrap();
        let game = game_with(vec![l]);
        let plan = GreedyBot.select_best_turn(&game).unwrap();
        assert_eq!(plan.slot, SlotId::new(0));
        assert_eq!(plan.cells, cell_set([0, 1, 8, 16]));
    }

    #[test]
    fn test_prefers_completing_a_line() {
        let i4 = ShapeDefinition::parse("i4", &["####"]).unwrap();
        let dot = ShapeDefinition::parse("dot", &["#"]).unwrap();
        let mut game = game_with(vec![i4.clone(), i4.clone(), dot]);
        place(
            &mut game,
            TurnPlan {
                slot: SlotId::new(0),
                cells: cell_set([16, 17, 18, 19]),
            },
        );
        let plan = GreedyBot.select_best_turn(&game).unwrap();
        assert_eq!(plan.slot, SlotId::new(1));
        assert_eq!(plan.cells, cell_set([20, 21, 22, 23]));
    }

    #[test]
    fn test_no_room_gives_none() {
        let big = ShapeDefinition::parse("big", &["###", "###", "###"]).unwrap();
        let game = game_with(vec![big.clone()]);
        let mut blocked = game.clone();
        let mut outputs: Vec<GameOutput> = vec![];
        let dot = ShapeDefinition::parse("dot", &["#"]).unwrap();
        // every 3x3 window covers one of these cells
        for index in [18, 21, 42, 45] {
            blocked
                .handle(
                    GameInput::NewShapeBatchProduced {
                        shapes: vec![dot.clone(), dot.clone()],
                    },
                    &mut outputs,
                )
                .unwrap();
            place(
                &mut blocked,
                TurnPlan {
                    slot: SlotId::new(0),
                    cells: cell_set([index]),
                },
            );
        }
        blocked
            .handle(
                GameInput::NewShapeBatchProduced { shapes: vec![big] },
                &mut outputs,
            )
            .unwrap();
        assert!(GreedyBot.select_best_turn(&game).is_some());
        assert_eq!(GreedyBot.select_best_turn(&blocked), None);
    }

    #[test]
    fn test_exhausted_tray_gives_none() {
        let game = GameController::new(GameConfig::default()).unwrap();
        assert_eq!(GreedyBot.select_best_turn(&game), None);
    }
}
