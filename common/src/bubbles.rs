use std::{collections::BTreeSet, fmt};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{BUBBLE_COLORS, MIN_GROUP_SIZE, POINTS_PER_CELL};
use crate::grid::{Grid, GridError, Position};

pub type Color = u8;

/// `None` marks a popped cell that has not been refilled yet.
pub type BubbleGrid = Grid<Option<Color>>;

pub type Group = BTreeSet<Position>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleRules {
    pub colors: Color,
    pub points_per_cell: u64,
    pub min_group: usize,
}

impl Default for BubbleRules {
    fn default() -> Self {
        Self {
            colors: BUBBLE_COLORS,
            points_per_cell: POINTS_PER_CELL,
            min_group: MIN_GROUP_SIZE,
        }
    }
}

impl BubbleRules {
    pub fn is_poppable(&self, group: &Group) -> bool {
        group.len() >= self.min_group()
    }

    /// Never below two, whatever the configured value.
    pub fn min_group(&self) -> usize {
        self.min_group.max(MIN_GROUP_SIZE)
    }

    /// Quadratic in the group size so that big clears pay off.
    pub fn score(&self, group_size: usize) -> u64 {
        let size = group_size as u64;
        size * size * self.points_per_cell
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopError {
    InvalidGroup { size: usize, min: usize },
    NoColors,
    Grid(GridError),
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopError::InvalidGroup { size, min } => write!(
                f,
                "group of {} cells cannot be popped, at least {} are needed",
                size, min
            ),
            PopError::NoColors => write!(f, "bubble palette must have at least one color"),
            PopError::Grid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PopError::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for PopError {
    fn from(e: GridError) -> Self {
        PopError::Grid(e)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopOutcome {
    pub grid: BubbleGrid,
    pub score: u64,
    pub removed: usize,
    /// Cells that received a fresh color, in the order the rng was drawn.
    pub refilled: Vec<Position>,
}

pub fn random_grid<R: Rng + ?Sized>(
    cols: usize,
    rows: usize,
    colors: Color,
    rng: &mut R,
) -> Result<BubbleGrid, PopError> {
    if colors == 0 {
        return Err(PopError::NoColors);
    }
    if cols == 0 || rows == 0 {
        return Err(GridError::Empty.into());
    }

    let mut grid = Grid::filled(cols, rows, None);
    refill(&mut grid, colors, rng);
    Ok(grid)
}

/// The 4-connected same-color component containing `start`, found with an
/// explicit stack. An empty start cell yields an empty group.
pub fn find_group(grid: &BubbleGrid, start: Position) -> Result<Group, GridError> {
    grid.check(start)?;

    let mut group = Group::new();
    let Some(color) = grid[start] else {
        return Ok(group);
    };

    let mut stack = vec![start];
    group.insert(start);

    while let Some(current) = stack.pop() {
        for (_, next) in grid.neighbors(current) {
            if grid[next] == Some(color) && group.insert(next) {
                stack.push(next);
            }
        }
    }

    Ok(group)
}

/// The group under `pos` if it is big enough to pop, otherwise nothing.
pub fn highlight(grid: &BubbleGrid, pos: Position, rules: &BubbleRules) -> Result<Group, GridError> {
    let group = find_group(grid, pos)?;
    if rules.is_poppable(&group) {
        Ok(group)
    } else {
        Ok(Group::new())
    }
}

/// Every connected group on the board, each listed once, in row-major order of
/// their first cell.
pub fn groups(grid: &BubbleGrid) -> Vec<Group> {
    let mut seen = Grid::filled(grid.cols(), grid.rows(), false);
    let mut found = Vec::new();

    for pos in grid.positions() {
        if seen[pos] || grid[pos].is_none() {
            continue;
        }
        // `pos` is in bounds, so this cannot fail.
        let Ok(group) = find_group(grid, pos) else {
            continue;
        };
        for &member in &group {
            seen[member] = true;
        }
        found.push(group);
    }

    found
}

/// Largest poppable group; ties go to the one found first.
pub fn best_group(grid: &BubbleGrid, rules: &BubbleRules) -> Option<Group> {
    groups(grid)
        .into_iter()
        .filter(|group| rules.is_poppable(group))
        .fold(None, |best: Option<Group>, group| match best {
            Some(b) if b.len() >= group.len() => Some(b),
            _ => Some(group),
        })
}

/// Removes `group`, lets every column fall, and refills the gaps. The input
/// grid is never modified; a failed validation leaves nothing changed.
pub fn apply_pop<R: Rng + ?Sized>(
    grid: &BubbleGrid,
    group: &Group,
    rules: &BubbleRules,
    rng: &mut R,
) -> Result<PopOutcome, PopError> {
    let min = rules.min_group();
    if group.len() < min {
        return Err(PopError::InvalidGroup {
            size: group.len(),
            min,
        });
    }
    if rules.colors == 0 {
        return Err(PopError::NoColors);
    }
    for &pos in group {
        grid.check(pos)?;
    }

    let mut next = grid.clone();
    for &pos in group {
        next[pos] = None;
    }

    collapse(&mut next);
    let refilled = refill(&mut next, rules.colors, rng);
    let score = rules.score(group.len());

    debug!(
        "popped {} cells for {} points, refilled {}",
        group.len(),
        score,
        refilled.len()
    );

    Ok(PopOutcome {
        grid: next,
        score,
        removed: group.len(),
        refilled,
    })
}

/// Stable per-column compaction: surviving cells keep their top-to-bottom
/// order and settle at the bottom, empties rise to the top.
pub fn collapse(grid: &mut BubbleGrid) {
    let rows = grid.rows();

    for col in 0..grid.cols() {
        let mut write_row = rows;

        for row in (0..rows).rev() {
            let pos = Position::new(row, col);
            if let Some(color) = grid[pos] {
                write_row -= 1;
                if write_row != row {
                    grid[Position::new(write_row, col)] = Some(color);
                    grid[pos] = None;
                }
            }
        }
    }
}

/// Gives every empty cell a uniformly random color in `0..colors`. Cells are
/// filled top row first, left to right, one rng draw each, so a replay with the
/// same rng stream reproduces the board. Returns the refilled cells.
pub fn refill<R: Rng + ?Sized>(grid: &mut BubbleGrid, colors: Color, rng: &mut R) -> Vec<Position> {
    if colors == 0 {
        return Vec::new();
    }

    let empty: Vec<Position> = grid.positions().filter(|&pos| grid[pos].is_none()).collect();
    for &pos in &empty {
        grid[pos] = Some(rng.random_range(0..colors));
    }

    empty
}
