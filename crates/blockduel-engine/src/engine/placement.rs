use serde::{Deserialize, Serialize};

use crate::{
    BoardError,
    core::{
        board::{Board, CellSet},
        shape::ShapeDefinition,
    },
};

/// Outcome of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize, Deserialize)]
pub enum PlacementResult {
    Accepted,
    /// The number of cells differs from the shape's filled-cell count.
    RejectedCountMismatch,
    /// At least one cell is already occupied.
    RejectedOccupied,
    /// The cells are not a translate of the shape. Only reported under
    /// [`ShapeMatching::Translate`].
    RejectedShapeMismatch,
}

impl PlacementResult {
    #[must_use]
    pub fn is_rejected(self) -> bool {
        !self.is_accepted()
    }
}

/// How candidate cells are matched against the selected shape.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeMatching {
    /// Any set of free cells with the shape's filled-cell count is accepted.
    #[default]
    CountOnly,
    /// The cells must also form a translate of the shape.
    Translate,
}

/// Decides whether a shape may be committed over a set of cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlacementEngine {
    matching: ShapeMatching,
}

impl PlacementEngine {
    #[must_use]
    pub const fn new(matching: ShapeMatching) -> Self {
        Self { matching }
    }

    #[must_use]
    pub const fn matching(&self) -> ShapeMatching {
        self.matching
    }

    /// Evaluates a placement without touching the board.
    ///
    /// Occupancy is checked before the cell count, so a drop over an occupied
    /// cell is reported as [`PlacementResult::RejectedOccupied`] even when the
    /// count would match.
    pub fn check(
        &self,
        board: &Board,
        candidates: &CellSet,
        shape: &ShapeDefinition,
    ) -> Result<PlacementResult, BoardError> {
        let geometry = board.geometry();
        for &index in candidates {
            geometry.check(index)?;
        }

        if candidates
            .iter()
            .any(|&index| board.is_occupied_unchecked(index))
        {
            return Ok(PlacementResult::RejectedOccupied);
        }
        if candidates.len() != shape.total_square_number() {
            return Ok(PlacementResult::RejectedCountMismatch);
        }
        if self.matching == ShapeMatching::Translate
            && !shape.matches_footprint(geometry, candidates)
        {
            return Ok(PlacementResult::RejectedShapeMismatch);
        }
        Ok(PlacementResult::Accepted)
    }

    /// Evaluates a placement and, when accepted, occupies the cells.
    pub fn try_place(
        &self,
        board: &mut Board,
        candidates: &CellSet,
        shape: &ShapeDefinition,
    ) -> Result<PlacementResult, BoardError> {
        let result = self.check(board, candidates, shape)?;
        if result.is_accepted() {
            board.occupy(candidates);
        }
        Ok(result)
    }
}
