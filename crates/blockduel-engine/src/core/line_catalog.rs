use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::board::{BoardGeometry, CellIndex};

/// A source of clearable lines, as written in a game configuration.
///
/// ```
/// use blockduel_engine::LineDefinition;
///
/// let defs: Vec<LineDefinition> = serde_json::from_str(
///     r#"[{"kind": "columns"}, {"kind": "group", "cells": [0, 9, 18]}]"#,
/// )
/// .unwrap();
/// assert_eq!(defs[0], LineDefinition::Columns);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineDefinition {
    /// One line per board row.
    Rows,
    /// One line per board column.
    Columns,
    /// The two main diagonals. Square boards only.
    Diagonals,
    /// Tiles the board into `height`×`width` blocks, one line per block.
    Blocks { height: usize, width: usize },
    /// An explicit group of cell indices.
    Group { cells: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LineCatalogError {
    #[display("line definition #{position} is an empty group")]
    EmptyGroup { position: usize },
    #[display(
        "line definition #{position} refers to cell {index} outside a board of {cell_count} cells"
    )]
    CellOutOfRange {
        position: usize,
        index: usize,
        cell_count: usize,
    },
    #[display("diagonal lines need a square board, got {rows}x{columns}")]
    DiagonalsNeedSquareBoard { rows: usize, columns: usize },
    #[display("{height}x{width} blocks do not tile a {rows}x{columns} board")]
    BlocksDoNotTile {
        height: usize,
        width: usize,
        rows: usize,
        columns: usize,
    },
}

/// A group of cells that clears together once every cell is occupied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    cells: Vec<CellIndex>,
}

impl Line {
    fn new(mut cells: Vec<CellIndex>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    #[must_use]
    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn contains(&self, index: CellIndex) -> bool {
        self.cells.binary_search(&index).is_ok()
    }
}

/// Every clearable line of a board, computed once per configuration.
///
/// Lines from the configured definitions come first, in definition order,
/// followed by the row lines. Row lines are always part of the catalog, and
/// a group of cells that several definitions produce is only listed once.
/// A `Group` with exactly the cells of a row therefore adds no line: filling
/// that row clears one line and deals one line's worth of damage.
///
/// # Example
///
/// ```
/// use blockduel_engine::{BoardGeometry, LineCatalog};
///
/// let catalog = LineCatalog::standard(BoardGeometry::STANDARD);
/// // 8 columns + 8 rows
/// assert_eq!(catalog.len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCatalog {
    geometry: BoardGeometry,
    lines: Vec<Line>,
}

impl LineCatalog {
    /// Rows and columns.
    #[must_use]
    pub fn standard(geometry: BoardGeometry) -> Self {
        let mut builder = CatalogBuilder::new(geometry);
        builder.extend(column_lines(geometry));
        builder.extend(row_lines(geometry));
        builder.finish()
    }

    pub fn from_definitions(
        geometry: BoardGeometry,
        definitions: &[LineDefinition],
    ) -> Result<Self, LineCatalogError> {
        let mut builder = CatalogBuilder::new(geometry);
        for (position, definition) in definitions.iter().enumerate() {
            match definition {
                LineDefinition::Rows => builder.extend(row_lines(geometry)),
                LineDefinition::Columns => builder.extend(column_lines(geometry)),
                LineDefinition::Diagonals => builder.extend(diagonal_lines(geometry)?),
                LineDefinition::Blocks { height, width } => {
                    builder.extend(block_lines(geometry, *height, *width)?);
                }
                LineDefinition::Group { cells } => {
                    builder.push(group_line(geometry, position, cells)?);
                }
            }
        }
        builder.extend(row_lines(geometry));
        Ok(builder.finish())
    }

    #[must_use]
    pub fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines that pass through the given cell.
    pub fn lines_through(&self, index: CellIndex) -> impl Iterator<Item = &Line> + '_ {
        self.lines.iter().filter(move |line| line.contains(index))
    }
}

struct CatalogBuilder {
    geometry: BoardGeometry,
    seen: HashSet<Line>,
    lines: Vec<Line>,
}

impl CatalogBuilder {
    fn new(geometry: BoardGeometry) -> Self {
        Self {
            geometry,
            seen: HashSet::new(),
            lines: vec![],
        }
    }

    fn push(&mut self, line: Line) {
        if self.seen.insert(line.clone()) {
            self.lines.push(line);
        }
    }

    fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = Line>,
    {
        for line in lines {
            self.push(line);
        }
    }

    fn finish(self) -> LineCatalog {
        LineCatalog {
            geometry: self.geometry,
            lines: self.lines,
        }
    }
}

fn row_lines(geometry: BoardGeometry) -> impl Iterator<Item = Line> {
    (0..geometry.rows()).map(move |row| {
        Line::new(
            (0..geometry.columns())
                .filter_map(|column| geometry.index_at(row, column))
                .collect(),
        )
    })
}

fn column_lines(geometry: BoardGeometry) -> impl Iterator<Item = Line> {
    (0..geometry.columns()).map(move |column| {
        Line::new(
            (0..geometry.rows())
                .filter_map(|row| geometry.index_at(row, column))
                .collect(),
        )
    })
}

fn diagonal_lines(geometry: BoardGeometry) -> Result<[Line; 2], LineCatalogError> {
    let size = geometry.rows();
    if size != geometry.columns() {
        return Err(LineCatalogError::DiagonalsNeedSquareBoard {
            rows: geometry.rows(),
            columns: geometry.columns(),
        });
    }
    let main = (0..size).filter_map(|i| geometry.index_at(i, i)).collect();
    let anti = (0..size)
        .filter_map(|i| geometry.index_at(i, size - 1 - i))
        .collect();
    Ok([Line::new(main), Line::new(anti)])
}

fn block_lines(
    geometry: BoardGeometry,
    height: usize,
    width: usize,
) -> Result<Vec<Line>, LineCatalogError> {
    if height == 0
        || width == 0
        || !geometry.rows().is_multiple_of(height)
        || !geometry.columns().is_multiple_of(width)
    {
        return Err(LineCatalogError::BlocksDoNotTile {
            height,
            width,
            rows: geometry.rows(),
            columns: geometry.columns(),
        });
    }

    let mut lines = vec![];
    for top in (0..geometry.rows()).step_by(height) {
        for left in (0..geometry.columns()).step_by(width) {
            let cells = (top..top + height)
                .flat_map(|row| (left..left + width).map(move |column| (row, column)))
                .filter_map(|(row, column)| geometry.index_at(row, column))
                .collect();
            lines.push(Line::new(cells));
        }
    }
    Ok(lines)
}

fn group_line(
    geometry: BoardGeometry,
    position: usize,
    cells: &[usize],
) -> Result<Line, LineCatalogError> {
    if cells.is_empty() {
        return Err(LineCatalogError::EmptyGroup { position });
    }
    if let Some(&index) = cells.iter().find(|&&i| i >= geometry.cell_count()) {
        return Err(LineCatalogError::CellOutOfRange {
            position,
            index,
            cell_count: geometry.cell_count(),
        });
    }
    Ok(Line::new(cells.iter().copied().map(CellIndex::new).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(line: &Line) -> Vec<usize> {
        line.cells().iter().map(|c| c.get()).collect()
    }

    #[test]
    fn test_standard_catalog_columns_then_rows() {
        let catalog = LineCatalog::standard(BoardGeometry::STANDARD);
        assert_eq!(catalog.len(), 16);
        assert_eq!(indices(&catalog.lines()[0]), vec![0, 8, 16, 24, 32, 40, 48, 56]);
        assert_eq!(indices(&catalog.lines()[8]), (0..8).collect::<Vec<_>>());
        assert_eq!(indices(&catalog.lines()[15]), (56..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_always_present() {
        let catalog = LineCatalog::from_definitions(BoardGeometry::STANDARD, &[]).unwrap();
        assert_eq!(catalog.len(), 8);
        for (row, line) in catalog.lines().iter().enumerate() {
            assert_eq!(indices(line), (row * 8..row * 8 + 8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_duplicate_definitions_are_listed_once() {
        let catalog = LineCatalog::from_definitions(
            BoardGeometry::STANDARD,
            &[
                LineDefinition::Rows,
                LineDefinition::Columns,
                LineDefinition::Columns,
                LineDefinition::Group {
                    cells: vec![7, 6, 5, 4, 3, 2, 1, 0],
                },
            ],
        )
        .unwrap();
        let expected = LineCatalog::from_definitions(
            BoardGeometry::STANDARD,
            &[LineDefinition::Rows, LineDefinition::Columns],
        )
        .unwrap();
        assert_eq!(catalog, expected);
        assert_eq!(catalog.len(), 16);
    }

    #[test]
    fn test_diagonals() {
        let catalog = LineCatalog::from_definitions(
            BoardGeometry::new(3, 3).unwrap(),
            &[LineDefinition::Diagonals],
        )
        .unwrap();
        assert_eq!(indices(&catalog.lines()[0]), vec![0, 4, 8]);
        assert_eq!(indices(&catalog.lines()[1]), vec![2, 4, 6]);
        assert_eq!(catalog.len(), 5);

        let err = LineCatalog::from_definitions(
            BoardGeometry::new(3, 4).unwrap(),
            &[LineDefinition::Diagonals],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LineCatalogError::DiagonalsNeedSquareBoard { rows: 3, columns: 4 }
        ));
    }

    #[test]
    fn test_blocks_tile_the_board() {
        let catalog = LineCatalog::from_definitions(
            BoardGeometry::STANDARD,
            &[LineDefinition::Blocks {
                height: 4,
                width: 4,
            }],
        )
        .unwrap();
        assert_eq!(catalog.len(), 4 + 8);
        assert_eq!(
            indices(&catalog.lines()[1]),
            vec![4, 5, 6, 7, 12, 13, 14, 15, 20, 21, 22, 23, 28, 29, 30, 31]
        );

        for (height, width) in [(3, 4), (4, 0), (0, 4)] {
            assert!(matches!(
                LineCatalog::from_definitions(
                    BoardGeometry::STANDARD,
                    &[LineDefinition::Blocks { height, width }],
                ),
                Err(LineCatalogError::BlocksDoNotTile { .. })
            ));
        }
    }

    #[test]
    fn test_group_validation() {
        let geometry = BoardGeometry::STANDARD;
        assert_eq!(
            LineCatalog::from_definitions(geometry, &[LineDefinition::Group { cells: vec![] }]),
            Err(LineCatalogError::EmptyGroup { position: 0 })
        );
        assert_eq!(
            LineCatalog::from_definitions(
                geometry,
                &[
                    LineDefinition::Columns,
                    LineDefinition::Group {
                        cells: vec![1, 64],
                    },
                ],
            ),
            Err(LineCatalogError::CellOutOfRange {
                position: 1,
                index: 64,
                cell_count: 64,
            })
        );
    }

    #[test]
    fn test_lines_through() {
        let catalog = LineCatalog::standard(BoardGeometry::STANDARD);
        let through: Vec<_> = catalog.lines_through(CellIndex::new(9)).map(indices).collect();
        assert_eq!(through.len(), 2);
        assert!(through.contains(&vec![1, 9, 17, 25, 33, 41, 49, 57]));
        assert!(through.contains(&(8..16).collect::<Vec<_>>()));
    }

    #[test]
    fn test_definitions_serde_shape() {
        let json = serde_json::to_string(&LineDefinition::Blocks {
            height: 2,
            width: 4,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"blocks","height":2,"width":4}"#);
    }
}
