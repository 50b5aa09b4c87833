use std::{
    fmt,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// The four orthogonal directions, in the order neighbours are examined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Offset as `(d_row, d_col)`; rows grow downwards.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Top => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Bottom => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds {
        position: Position,
        cols: usize,
        rows: usize,
    },
    Empty,
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    CellCount {
        cols: usize,
        rows: usize,
        found: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds {
                position,
                cols,
                rows,
            } => write!(
                f,
                "position {} is outside the {}x{} grid",
                position, cols, rows
            ),
            GridError::Empty => write!(f, "grid must have at least one row and one column"),
            GridError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells, expected {}",
                row, found, expected
            ),
            GridError::CellCount { cols, rows, found } => write!(
                f,
                "a {}x{} grid needs {} cells, found {}",
                cols,
                rows,
                cols * rows,
                found
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Fixed-size rectangular grid stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "RawGrid<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Grid<T> {
    cols: usize,
    rows: usize,
    cells: Vec<T>,
}

/// Wire shape of a grid, checked before it becomes a `Grid`.
#[derive(Deserialize)]
struct RawGrid<T> {
    cols: usize,
    rows: usize,
    cells: Vec<T>,
}

impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = GridError;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        if raw.cols == 0 || raw.rows == 0 {
            return Err(GridError::Empty);
        }
        if raw.cols.checked_mul(raw.rows) != Some(raw.cells.len()) {
            return Err(GridError::CellCount {
                cols: raw.cols,
                rows: raw.rows,
                found: raw.cells.len(),
            });
        }

        Ok(Self {
            cols: raw.cols,
            rows: raw.rows,
            cells: raw.cells,
        })
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(cols: usize, rows: usize, value: T) -> Self {
        Self {
            cols,
            rows,
            cells: vec![value; cols * rows],
        }
    }
}

impl<T> Grid<T> {
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(GridError::Empty);
        }

        let row_count = rows.len();
        let mut cells = Vec::with_capacity(cols * row_count);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::Ragged {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            cols,
            rows: row_count,
            cells,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn check(&self, pos: Position) -> Result<(), GridError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                position: pos,
                cols: self.cols,
                rows: self.rows,
            })
        }
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        if self.contains(pos) {
            self.cells.get(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    /// The in-bounds cell one step from `pos` in `dir`, if any.
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (d_row, d_col) = dir.offset();
        let row = pos.row.checked_add_signed(d_row)?;
        let col = pos.col.checked_add_signed(d_col)?;
        let next = Position { row, col };
        self.contains(next).then_some(next)
    }

    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Direction, Position)> + '_ {
        Direction::iter().filter_map(move |dir| self.neighbor(pos, dir).map(|next| (dir, next)))
    }

    /// Every position, top row first, left to right.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Position { row, col }))
    }

    pub fn row_slices(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.cols.max(1))
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> {
        let len = if col < self.cols { self.rows } else { 0 };
        self.cells.iter().skip(col).step_by(self.cols.max(1)).take(len)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        assert!(self.contains(pos), "position {} is out of bounds", pos);
        &self.cells[pos.row * self.cols + pos.col]
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        assert!(self.contains(pos), "position {} is out of bounds", pos);
        &mut self.cells[pos.row * self.cols + pos.col]
    }
}
