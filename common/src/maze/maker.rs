pub mod backtrack;

use std::fmt;

use rand::prelude::{IndexedRandom, Rng};

use crate::grid::{Direction, Grid, Position};

use super::MazeCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    InvalidDimensions { cols: usize, rows: usize },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions { cols, rows } => write!(
                f,
                "maze dimensions must be positive, got {} columns and {} rows",
                cols, rows
            ),
        }
    }
}

impl std::error::Error for MazeError {}

pub struct MazeMaker<'a, R: Rng + ?Sized> {
    pub grid: Grid<MazeCell>,
    rng: &'a mut R,
    visited: usize,
}

impl<'a, R: Rng + ?Sized> MazeMaker<'a, R> {
    pub fn new(cols: usize, rows: usize, rng: &'a mut R) -> Result<Self, MazeError> {
        if cols == 0 || rows == 0 {
            return Err(MazeError::InvalidDimensions { cols, rows });
        }

        Ok(MazeMaker {
            grid: Grid::filled(cols, rows, MazeCell::default()),
            rng,
            visited: 0,
        })
    }

    fn total_cells(&self) -> usize {
        self.grid.len()
    }

    fn get_unvisited_neighbors(&self, cell: Position) -> Vec<(Direction, Position)> {
        self.grid
            .neighbors(cell)
            .filter(|&(_, neighbor)| !self.is_visited(neighbor))
            .collect()
    }

    fn pick_neighbor(&mut self, cell: Position) -> Option<(Direction, Position)> {
        let neighbors = self.get_unvisited_neighbors(cell);

        neighbors.choose(&mut *self.rng).copied()
    }

    fn visit_cell(&mut self, cell: Position) {
        let entry = &mut self.grid[cell];
        if !entry.visited {
            entry.visited = true;
            self.visited += 1;
        }
    }

    fn is_visited(&self, cell: Position) -> bool {
        self.grid[cell].visited
    }

    // Both sides of a wall are always opened together.
    fn remove_wall_between(&mut self, cell: Position, direction: Direction, next: Position) {
        self.grid[cell].walls.open(direction);
        self.grid[next].walls.open(direction.opposite());
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::maze::Walls;

    #[test]
    fn new_rejects_zero_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            MazeMaker::new(0, 4, &mut rng),
            Err(MazeError::InvalidDimensions { cols: 0, rows: 4 })
        ));
        assert!(matches!(
            MazeMaker::new(4, 0, &mut rng),
            Err(MazeError::InvalidDimensions { cols: 4, rows: 0 })
        ));
    }

    #[test]
    fn new_starts_with_every_wall_closed() {
        let mut rng = StdRng::seed_from_u64(1);
        let maker = MazeMaker::new(3, 2, &mut rng).expect("dimensions are positive");

        assert!(maker.grid.iter().all(|cell| !cell.visited));
        assert!(maker.grid.iter().all(|cell| cell.walls == Walls::CLOSED));
    }

    #[test]
    fn pick_neighbor_only_returns_unvisited_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut maker = MazeMaker::new(2, 2, &mut rng).expect("dimensions are positive");
        maker.visit_cell(Position::new(0, 0));
        maker.visit_cell(Position::new(0, 1));

        for _ in 0..16 {
            let (direction, neighbor) = maker
                .pick_neighbor(Position::new(0, 0))
                .expect("bottom neighbour is unvisited");
            assert_eq!(direction, Direction::Bottom);
            assert_eq!(neighbor, Position::new(1, 0));
        }

        maker.visit_cell(Position::new(1, 0));
        assert_eq!(maker.pick_neighbor(Position::new(0, 0)), None);
    }

    #[test]
    fn remove_wall_between_opens_both_sides() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut maker = MazeMaker::new(2, 1, &mut rng).expect("dimensions are positive");

        maker.remove_wall_between(Position::new(0, 0), Direction::Right, Position::new(0, 1));

        assert!(!maker.grid[Position::new(0, 0)].walls.right);
        assert!(!maker.grid[Position::new(0, 1)].walls.left);
        assert!(maker.grid[Position::new(0, 0)].walls.left);
        assert!(maker.grid[Position::new(0, 1)].walls.right);
    }
}
