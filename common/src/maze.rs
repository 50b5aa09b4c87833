pub mod maker;

use std::{collections::VecDeque, fmt};

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::grid::{Direction, Grid, Position};
use maker::{MazeMaker, backtrack::Backtrack};

pub use maker::MazeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub const CLOSED: Walls = Walls {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn is_closed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Top => self.top,
            Direction::Right => self.right,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
        }
    }

    pub(crate) fn open(&mut self, direction: Direction) {
        match direction {
            Direction::Top => self.top = false,
            Direction::Right => self.right = false,
            Direction::Bottom => self.bottom = false,
            Direction::Left => self.left = false,
        }
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::CLOSED
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MazeCell {
    pub visited: bool,
    pub walls: Walls,
}

/// A perfect maze: exactly one path between any two cells. Read-only once
/// generated.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Maze {
    grid: Grid<MazeCell>,
}

impl Maze {
    /// Carves a `cols` x `rows` perfect maze with randomized iterative
    /// depth-first search. The same seeded `rng` always yields the same maze.
    pub fn generate<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Result<Self, MazeError> {
        let mut maker = MazeMaker::new(cols, rows, rng)?;
        maker.backtrack();

        let maze = Maze { grid: maker.grid };
        debug!(
            "generated {}x{} maze with {} open passages",
            cols,
            rows,
            maze.open_passages()
        );

        Ok(maze)
    }

    pub fn grid(&self) -> &Grid<MazeCell> {
        &self.grid
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cell(&self, pos: Position) -> Option<&MazeCell> {
        self.grid.get(pos)
    }

    pub fn start(&self) -> Position {
        Position::ORIGIN
    }

    /// Bottom-right corner.
    pub fn exit(&self) -> Position {
        Position::new(self.rows() - 1, self.cols() - 1)
    }

    pub fn can_move(&self, from: Position, direction: Direction) -> bool {
        self.cell(from)
            .is_some_and(|cell| !cell.walls.is_closed(direction))
    }

    pub fn step(&self, from: Position, direction: Direction) -> Option<Position> {
        if self.can_move(from, direction) {
            self.grid.neighbor(from, direction)
        } else {
            None
        }
    }

    /// Number of carved wall pairs. Each is counted once, from its top or left
    /// side.
    pub fn open_passages(&self) -> usize {
        self.grid
            .iter()
            .map(|cell| usize::from(!cell.walls.right) + usize::from(!cell.walls.bottom))
            .sum()
    }

    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if !self.grid.contains(from) || !self.grid.contains(to) {
            return None;
        }

        let mut prev: Grid<Option<Position>> = Grid::filled(self.cols(), self.rows(), None);
        let mut seen = Grid::filled(self.cols(), self.rows(), false);
        let mut queue = VecDeque::new();

        seen[from] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(previous) = prev[cursor] {
                    path.push(previous);
                    cursor = previous;
                }
                path.reverse();
                return Some(path);
            }

            for (direction, next) in self.grid.neighbors(current) {
                if seen[next] || !self.can_move(current, direction) {
                    continue;
                }
                seen[next] = true;
                prev[next] = Some(current);
                queue.push_back(next);
            }
        }

        None
    }

    pub fn log(&self) -> String {
        self.render(&[])
    }

    /// Draws the walls as ASCII art, placing each marker character in the
    /// middle of its cell.
    pub fn render(&self, markers: &[(Position, char)]) -> String {
        let mut lines = Vec::with_capacity(2 * self.rows() + 1);

        for (row, cells) in self.grid.row_slices().enumerate() {
            let mut top = String::from("+");
            let mut middle = String::new();

            for (col, cell) in cells.iter().enumerate() {
                top.push_str(if cell.walls.top { "---+" } else { "   +" });

                if col == 0 {
                    middle.push(if cell.walls.left { '|' } else { ' ' });
                }
                let mark = markers
                    .iter()
                    .find(|(pos, _)| *pos == Position::new(row, col))
                    .map_or(' ', |&(_, mark)| mark);
                middle.push(' ');
                middle.push(mark);
                middle.push(' ');
                middle.push(if cell.walls.right { '|' } else { ' ' });
            }

            lines.push(top);
            lines.push(middle);
        }

        let mut bottom = String::from("+");
        if let Some(last) = self.grid.row_slices().last() {
            for cell in last {
                bottom.push_str(if cell.walls.bottom { "---+" } else { "   +" });
            }
        }
        lines.push(bottom);

        lines.join("\n")
    }
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log())
    }
}
