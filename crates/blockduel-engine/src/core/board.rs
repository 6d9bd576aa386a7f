use std::{collections::BTreeSet, fmt::Write as _};

use serde::{Deserialize, Serialize};

use crate::{BoardError, GeometryError};

/// Row-major index of a board cell.
///
/// For a board with `columns` columns, index `i` lives at
/// `row = i / columns`, `column = i % columns`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct CellIndex(usize);

impl CellIndex {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A set of distinct cell indices, ordered by index.
pub type CellSet = BTreeSet<CellIndex>;

/// Builds a [`CellSet`] from raw indices.
///
/// ```
/// use blockduel_engine::{CellIndex, cell_set};
///
/// let cells = cell_set([16, 0, 8, 1, 0]);
/// assert_eq!(cells.len(), 4);
/// assert_eq!(cells.first(), Some(&CellIndex::new(0)));
/// ```
pub fn cell_set<I>(indices: I) -> CellSet
where
    I: IntoIterator<Item = usize>,
{
    indices.into_iter().map(CellIndex::new).collect()
}

/// Dimensions of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GeometryRepr")]
pub struct BoardGeometry {
    rows: usize,
    columns: usize,
}

#[derive(Deserialize)]
struct GeometryRepr {
    rows: usize,
    columns: usize,
}

impl TryFrom<GeometryRepr> for BoardGeometry {
    type Error = GeometryError;

    fn try_from(repr: GeometryRepr) -> Result<Self, Self::Error> {
        Self::new(repr.rows, repr.columns)
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BoardGeometry {
    /// Each board row is stored as one 64-bit mask.
    pub const MAX_COLUMNS: usize = 64;
    pub const MAX_ROWS: usize = 64;
    pub const STANDARD: Self = Self {
        rows: 8,
        columns: 8,
    };

    pub fn new(rows: usize, columns: usize) -> Result<Self, GeometryError> {
        if !(1..=Self::MAX_ROWS).contains(&rows) || !(1..=Self::MAX_COLUMNS).contains(&columns) {
            return Err(GeometryError { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn columns(self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows * self.columns
    }

    #[must_use]
    pub const fn contains(self, index: CellIndex) -> bool {
        index.0 < self.cell_count()
    }

    pub fn check(self, index: CellIndex) -> Result<(), BoardError> {
        if self.contains(index) {
            Ok(())
        } else {
            Err(BoardError::OutOfRange {
                index,
                cell_count: self.cell_count(),
            })
        }
    }

    /// Returns `(row, column)` of an in-range index.
    #[must_use]
    pub const fn row_column(self, index: CellIndex) -> (usize, usize) {
        (index.0 / self.columns, index.0 % self.columns)
    }

    #[must_use]
    pub fn index_at(self, row: usize, column: usize) -> Option<CellIndex> {
        (row < self.rows && column < self.columns).then(|| CellIndex(row * self.columns + column))
    }

    pub fn cells(self) -> impl Iterator<Item = CellIndex> {
        (0..self.cell_count()).map(CellIndex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct BitRow {
    bits: u64,
}

impl BitRow {
    #[inline]
    fn is_set(self, column: usize) -> bool {
        self.bits & (1 << column) != 0
    }

    #[inline]
    fn set(&mut self, column: usize) {
        self.bits |= 1 << column;
    }

    #[inline]
    fn unset(&mut self, column: usize) {
        self.bits &= !(1 << column);
    }
}

/// Occupancy state of an N×M board.
///
/// Each row is a bitmask where bit `c` is set when the cell in column `c` is
/// occupied. The board is created once per session and cleared in place by
/// [`Board::reset`].
///
/// # Example
///
/// ```
/// use blockduel_engine::{Board, BoardGeometry, CellIndex, cell_set};
///
/// let mut board = Board::new(BoardGeometry::STANDARD);
/// board.occupy(&cell_set([0, 1, 8, 16]));
///
/// assert_eq!(board.is_occupied(CellIndex::new(8)), Ok(true));
/// assert_eq!(board.occupied_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    geometry: BoardGeometry,
    rows: Vec<BitRow>,
}

impl Board {
    #[must_use]
    pub fn new(geometry: BoardGeometry) -> Self {
        Self {
            geometry,
            rows: vec![BitRow::default(); geometry.rows()],
        }
    }

    #[must_use]
    pub fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    pub fn is_occupied(&self, index: CellIndex) -> Result<bool, BoardError> {
        self.geometry.check(index)?;
        Ok(self.is_occupied_unchecked(index))
    }

    #[inline]
    pub(crate) fn is_occupied_unchecked(&self, index: CellIndex) -> bool {
        let (row, column) = self.geometry.row_column(index);
        self.rows[row].is_set(column)
    }

    /// Returns `true` if every listed cell is occupied.
    ///
    /// All indices must be in range.
    #[must_use]
    pub fn all_occupied(&self, cells: &[CellIndex]) -> bool {
        cells.iter().all(|&index| self.is_occupied_unchecked(index))
    }

    /// Marks each cell occupied.
    ///
    /// Callers validate the cells first (see [`crate::PlacementEngine`]);
    /// occupying an out-of-range or already occupied cell is a logic error.
    pub fn occupy<'a, I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = &'a CellIndex>,
    {
        for &index in cells {
            debug_assert!(self.geometry.contains(index), "cell {index} out of range");
            debug_assert!(
                !self.is_occupied_unchecked(index),
                "cell {index} already occupied"
            );
            let (row, column) = self.geometry.row_column(index);
            self.rows[row].set(column);
        }
    }

    /// Marks each cell unoccupied.
    pub fn clear<'a, I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = &'a CellIndex>,
    {
        for &index in cells {
            debug_assert!(self.geometry.contains(index), "cell {index} out of range");
            let (row, column) = self.geometry.row_column(index);
            self.rows[row].unset(column);
        }
    }

    pub fn reset(&mut self) {
        self.rows.fill(BitRow::default());
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().map(|row| row.bits.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.bits == 0)
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.geometry
            .cells()
            .filter(|&index| self.is_occupied_unchecked(index))
    }

    fn hex_width(&self) -> usize {
        self.geometry.columns().div_ceil(4)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "8x8:0f,00,..." (geometry, then one hex mask per row)
        let width = self.hex_width();
        let mut s = String::with_capacity(8 + self.rows.len() * (width + 1));
        write!(
            &mut s,
            "{}x{}:",
            self.geometry.rows(),
            self.geometry.columns()
        )
        .unwrap();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                s.push(',');
            }
            write!(&mut s, "{:0width$x}", row.bits).unwrap();
        }
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;
        let (dims, rows_str) = s
            .split_once(':')
            .ok_or_else(|| D::Error::custom(format!("expected 'RxC:hex,...', got '{s}'")))?;
        let (rows, columns) = dims
            .split_once('x')
            .ok_or_else(|| D::Error::custom(format!("invalid board dimensions: '{dims}'")))?;
        let rows = rows
            .parse::<usize>()
            .map_err(|e| D::Error::custom(format!("invalid row count: {rows} ({e})")))?;
        let columns = columns
            .parse::<usize>()
            .map_err(|e| D::Error::custom(format!("invalid column count: {columns} ({e})")))?;
        let geometry = BoardGeometry::new(rows, columns).map_err(D::Error::custom)?;

        let parts: Vec<&str> = rows_str.split(',').collect();
        if parts.len() != rows {
            return Err(D::Error::custom(format!(
                "expected {rows} comma-separated hex values, got {}",
                parts.len()
            )));
        }

        let mut board = Board::new(geometry);
        for (i, hex_str) in parts.iter().enumerate() {
            let bits = u64::from_str_radix(hex_str, 16).map_err(|e| {
                D::Error::custom(format!("invalid hex at row {i}: {hex_str} ({e})"))
            })?;
            if columns < 64 && bits >> columns != 0 {
                return Err(D::Error::custom(format!(
                    "row {i} has bits set beyond column {columns}"
                )));
            }
            board.rows[i] = BitRow { bits };
        }
        Ok(board)
    }
}
