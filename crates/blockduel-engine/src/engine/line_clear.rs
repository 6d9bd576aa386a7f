//! Detection and clearing of completed lines.

use crate::core::{
    board::Board,
    line_catalog::{Line, LineCatalog},
};

/// Lines of the catalog whose cells are all occupied.
pub fn completed_lines<'c>(
    board: &Board,
    catalog: &'c LineCatalog,
) -> impl Iterator<Item = &'c Line> {
    debug_assert_eq!(board.geometry(), catalog.geometry());
    catalog
        .lines()
        .iter()
        .filter(move |line| board.all_occupied(line.cells()))
}

/// Clears every completed line and returns how many lines were completed.
///
/// All lines are evaluated before any cell is cleared, so two lines that
/// share a cell are both counted and cleared in the same pass.
///
/// # Example
///
/// ```
/// use blockduel_engine::{Board, BoardGeometry, LineCatalog, cell_set, line_clear};
///
/// let geometry = BoardGeometry::STANDARD;
/// let catalog = LineCatalog::standard(geometry);
/// let mut board = Board::new(geometry);
/// // row 0 and column 0
/// board.occupy(&cell_set([0, 1, 2, 3, 4, 5, 6, 7, 8, 16, 24, 32, 40, 48, 56]));
///
/// assert_eq!(line_clear::clear_completed_lines(&mut board, &catalog), 2);
/// assert!(board.is_empty());
/// assert_eq!(line_clear::clear_completed_lines(&mut board, &catalog), 0);
/// ```
pub fn clear_completed_lines(board: &mut Board, catalog: &LineCatalog) -> usize {
    let completed: Vec<&Line> = completed_lines(board, catalog).collect();
    for line in &completed {
        board.clear(line.cells());
    }
    completed.len()
}
