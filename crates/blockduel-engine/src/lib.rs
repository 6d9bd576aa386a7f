pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    #[display("cell index {index} out of range for a board of {cell_count} cells")]
    OutOfRange { index: CellIndex, cell_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "invalid board geometry {rows}x{columns}: need 1 to {} rows and 1 to {} columns",
    BoardGeometry::MAX_ROWS,
    BoardGeometry::MAX_COLUMNS
)]
pub struct GeometryError {
    pub rows: usize,
    pub columns: usize,
}
