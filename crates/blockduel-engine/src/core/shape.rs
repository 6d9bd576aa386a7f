use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::board::{BoardGeometry, CellSet};

/// Largest supported shape grid, in rows and in columns.
pub const MAX_SHAPE_SIZE: usize = 5;

const MAX_SHAPE_CELLS: usize = MAX_SHAPE_SIZE * MAX_SHAPE_SIZE;

/// Position of a filled cell relative to the top-left of its shape grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeOffset {
    pub row: u8,
    pub column: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape grid is empty")]
    EmptyGrid,
    #[display("shape grid has no filled cells")]
    NoFilledCells,
    #[display("shape grid {rows}x{columns} exceeds {MAX_SHAPE_SIZE}x{MAX_SHAPE_SIZE}")]
    TooLarge { rows: usize, columns: usize },
    #[display("shape grid row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("invalid shape cell {ch:?} in row {row}, expected '#' or '.'")]
    InvalidCell { row: usize, ch: char },
}

/// An immutable polyomino pattern.
///
/// The shape is a `rows × columns` boolean grid; its filled cells are kept as
/// offsets in row-major order.
///
/// # Example
///
/// ```
/// use blockduel_engine::{BoardGeometry, ShapeDefinition, cell_set};
///
/// let l = ShapeDefinition::parse("L", &["##", "#.", "#."]).unwrap();
/// assert_eq!(l.total_square_number(), 4);
/// assert_eq!(
///     l.footprint_at(BoardGeometry::STANDARD, 0, 0),
///     Some(cell_set([0, 1, 8, 16]))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ShapeRepr", into = "ShapeRepr")]
pub struct ShapeDefinition {
    name: String,
    rows: u8,
    columns: u8,
    offsets: ArrayVec<ShapeOffset, MAX_SHAPE_CELLS>,
}

impl ShapeDefinition {
    /// Builds a shape from a boolean grid, `grid[row][column]`.
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_grid<R>(name: impl Into<String>, grid: &[R]) -> Result<Self, ShapeError>
    where
        R: AsRef<[bool]>,
    {
        let rows = grid.len();
        let columns = grid.first().map_or(0, |row| row.as_ref().len());
        if rows == 0 || columns == 0 {
            return Err(ShapeError::EmptyGrid);
        }
        if rows > MAX_SHAPE_SIZE || columns > MAX_SHAPE_SIZE {
            return Err(ShapeError::TooLarge { rows, columns });
        }

        let mut offsets = ArrayVec::new();
        for (row, cells) in grid.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != columns {
                return Err(ShapeError::RaggedRow {
                    row,
                    expected: columns,
                    actual: cells.len(),
                });
            }
            for (column, _) in cells.iter().enumerate().filter(|(_, filled)| **filled) {
                // bounded by MAX_SHAPE_SIZE
                offsets.push(ShapeOffset {
                    row: row as u8,
                    column: column as u8,
                });
            }
        }
        if offsets.is_empty() {
            return Err(ShapeError::NoFilledCells);
        }

        Ok(Self {
            name: name.into(),
            rows: rows as u8,
            columns: columns as u8,
            offsets,
        })
    }

    /// Builds a shape from text rows, `#` for a filled cell and `.` for an empty one.
    pub fn parse<S>(name: impl Into<String>, rows: &[S]) -> Result<Self, ShapeError>
    where
        S: AsRef<str>,
    {
        let grid = rows
            .iter()
            .enumerate()
            .map(|(row, text)| {
                text.as_ref()
                    .chars()
                    .map(|ch| match ch {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        ch => Err(ShapeError::InvalidCell { row, ch }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_grid(name, &grid)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        usize::from(self.rows)
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        usize::from(self.columns)
    }

    /// Number of filled cells.
    #[must_use]
    pub fn total_square_number(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn offsets(&self) -> &[ShapeOffset] {
        &self.offsets
    }

    #[must_use]
    pub fn is_filled(&self, row: usize, column: usize) -> bool {
        self.offsets
            .iter()
            .any(|o| usize::from(o.row) == row && usize::from(o.column) == column)
    }

    /// Board cells covered when the shape grid's top-left corner sits at
    /// `(row, column)`, or `None` if any filled cell falls off the board.
    #[must_use]
    pub fn footprint_at(
        &self,
        geometry: BoardGeometry,
        row: usize,
        column: usize,
    ) -> Option<CellSet> {
        self.offsets
            .iter()
            .map(|o| geometry.index_at(row + usize::from(o.row), column + usize::from(o.column)))
            .collect()
    }

    /// Every footprint of the shape that lies fully on the board, by anchor
    /// in row-major order.
    pub fn footprints(&self, geometry: BoardGeometry) -> impl Iterator<Item = CellSet> + '_ {
        (0..geometry.rows())
            .flat_map(move |row| (0..geometry.columns()).map(move |column| (row, column)))
            .filter_map(move |(row, column)| self.footprint_at(geometry, row, column))
    }

    /// Returns `true` if `cells` is a translate of this shape's filled cells.
    ///
    /// All cells must be in range of `geometry`.
    #[must_use]
    pub fn matches_footprint(&self, geometry: BoardGeometry, cells: &CellSet) -> bool {
        if cells.len() != self.offsets.len() {
            return false;
        }
        let positions = cells.iter().map(|&index| geometry.row_column(index));
        let (Some(min_row), Some(min_column)) = (
            positions.clone().map(|(row, _)| row).min(),
            positions.map(|(_, column)| column).min(),
        ) else {
            return false;
        };
        let offset_row = self.offsets.iter().map(|o| usize::from(o.row)).min();
        let offset_column = self.offsets.iter().map(|o| usize::from(o.column)).min();
        let (Some(offset_row), Some(offset_column)) = (offset_row, offset_column) else {
            return false;
        };
        // Align the top-left filled cells; the grid itself may start with empty rows or columns.
        self.offsets
            .iter()
            .map(|o| {
                geometry.index_at(
                    min_row + usize::from(o.row) - offset_row,
                    min_column + usize::from(o.column) - offset_column,
                )
            })
            .collect::<Option<CellSet>>()
            .is_some_and(|footprint| &footprint == cells)
    }

    fn grid_rows(&self) -> Vec<String> {
        (0..self.rows())
            .map(|row| {
                (0..self.columns())
                    .map(|column| if self.is_filled(row, column) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShapeRepr {
    name: String,
    grid: Vec<String>,
}

impl TryFrom<ShapeRepr> for ShapeDefinition {
    type Error = ShapeError;

    fn try_from(repr: ShapeRepr) -> Result<Self, Self::Error> {
        Self::parse(repr.name, &repr.grid)
    }
}

impl From<ShapeDefinition> for ShapeRepr {
    fn from(shape: ShapeDefinition) -> Self {
        let grid = shape.grid_rows();
        Self {
            name: shape.name,
            grid,
        }
    }
}
