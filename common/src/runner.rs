use log::info;
use rand::Rng;

use crate::constants::{BASE_TIME_LIMIT, MAZE_COLS, MAZE_ROWS, MIN_TIME_LIMIT, TIME_LIMIT_STEP};
use crate::grid::{Direction, Position};
use crate::maze::{Maze, MazeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Playing,
    Escaped,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Ignored,
    Blocked,
    Moved(Position),
    Escaped { elapsed: u32 },
}

/// One maze-runner session: a fresh maze per level, a countdown, and the best
/// escape time so far.
#[derive(Debug, Clone)]
pub struct MazeRun {
    cols: usize,
    rows: usize,
    level: u32,
    maze: Maze,
    player: Position,
    time_left: u32,
    best_time: Option<u32>,
    state: RunState,
}

pub fn time_limit(level: u32) -> u32 {
    let penalty = level.saturating_sub(1).saturating_mul(TIME_LIMIT_STEP);
    BASE_TIME_LIMIT.saturating_sub(penalty).max(MIN_TIME_LIMIT)
}

impl MazeRun {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, MazeError> {
        Self::with_size(MAZE_COLS, MAZE_ROWS, rng)
    }

    pub fn with_size<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Result<Self, MazeError> {
        let maze = Maze::generate(cols, rows, rng)?;
        let mut run = Self {
            cols,
            rows,
            level: 1,
            maze,
            player: Position::ORIGIN,
            time_left: time_limit(1),
            best_time: None,
            state: RunState::Playing,
        };
        run.reach_exit();
        Ok(run)
    }

    fn start_level<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MazeError> {
        self.maze = Maze::generate(self.cols, self.rows, rng)?;
        self.player = self.maze.start();
        self.time_left = time_limit(self.level);
        self.state = RunState::Playing;
        info!("maze level {} started with {}s on the clock", self.level, self.time_left);
        self.reach_exit();
        Ok(())
    }

    /// Wins the level if the player stands on the exit. A single-cell maze
    /// starts there, so it is escaped in zero seconds.
    fn reach_exit(&mut self) -> Option<u32> {
        if self.state != RunState::Playing || self.player != self.maze.exit() {
            return None;
        }

        let elapsed = self.elapsed();
        self.state = RunState::Escaped;
        if self.best_time.is_none_or(|best| elapsed < best) {
            self.best_time = Some(elapsed);
        }
        info!("maze level {} escaped in {}s", self.level, elapsed);

        Some(elapsed)
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn best_time(&self) -> Option<u32> {
        self.best_time
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn elapsed(&self) -> u32 {
        time_limit(self.level) - self.time_left
    }

    pub fn try_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.state != RunState::Playing {
            return MoveOutcome::Ignored;
        }

        let Some(next) = self.maze.step(self.player, direction) else {
            return MoveOutcome::Blocked;
        };
        self.player = next;

        match self.reach_exit() {
            Some(elapsed) => MoveOutcome::Escaped { elapsed },
            None => MoveOutcome::Moved(next),
        }
    }

    /// Advances the clock by one second.
    pub fn tick(&mut self) -> RunState {
        if self.state == RunState::Playing {
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                self.state = RunState::TimedOut;
                info!("maze run timed out on level {}", self.level);
            }
        }
        self.state
    }

    /// Only valid after escaping; otherwise the run is left as it is.
    pub fn next_level<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool, MazeError> {
        if self.state != RunState::Escaped {
            return Ok(false);
        }
        self.level += 1;
        self.start_level(rng)?;
        Ok(true)
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MazeError> {
        self.level = 1;
        self.best_time = None;
        self.start_level(rng)
    }

    /// Time-based: lower is better, and nothing to submit until a level has
    /// been escaped.
    pub fn leaderboard_score(&self) -> Option<u64> {
        self.best_time.map(u64::from)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn direction_between(from: Position, to: Position) -> Direction {
        if to.row < from.row {
            Direction::Top
        } else if to.row > from.row {
            Direction::Bottom
        } else if to.col < from.col {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    fn walk_to_exit(run: &mut MazeRun) -> MoveOutcome {
        let path = run
            .maze()
            .shortest_path(run.player(), run.maze().exit())
            .expect("perfect maze is connected");
        let mut last = MoveOutcome::Ignored;
        for pair in path.windows(2) {
            last = run.try_move(direction_between(pair[0], pair[1]));
        }
        last
    }

    #[test]
    fn time_limit_shrinks_per_level_down_to_the_floor() {
        assert_eq!(time_limit(1), 60);
        assert_eq!(time_limit(2), 55);
        assert_eq!(time_limit(9), 20);
        assert_eq!(time_limit(10), 20);
        assert_eq!(time_limit(u32::MAX), 20);
    }

    #[test]
    fn moves_into_walls_are_blocked() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut run = MazeRun::new(&mut rng).expect("default size is valid");

        assert_eq!(run.try_move(Direction::Top), MoveOutcome::Blocked);
        assert_eq!(run.try_move(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(run.player(), Position::ORIGIN);
    }

    #[test]
    fn reaching_the_exit_records_the_best_time() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut run = MazeRun::with_size(6, 5, &mut rng).expect("valid size");
        for _ in 0..7 {
            run.tick();
        }

        assert_eq!(walk_to_exit(&mut run), MoveOutcome::Escaped { elapsed: 7 });
        assert_eq!(run.state(), RunState::Escaped);
        assert_eq!(run.best_time(), Some(7));
        assert_eq!(run.leaderboard_score(), Some(7));
        assert_eq!(run.try_move(Direction::Left), MoveOutcome::Ignored);
    }

    #[test]
    fn next_level_keeps_the_faster_time() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut run = MazeRun::with_size(5, 5, &mut rng).expect("valid size");
        for _ in 0..4 {
            run.tick();
        }
        walk_to_exit(&mut run);

        assert_eq!(run.next_level(&mut rng), Ok(true));
        assert_eq!(run.level(), 2);
        assert_eq!(run.time_left(), 55);
        assert_eq!(run.player(), Position::ORIGIN);

        for _ in 0..9 {
            run.tick();
        }
        walk_to_exit(&mut run);
        assert_eq!(run.best_time(), Some(4));
    }

    #[test]
    fn next_level_requires_an_escape() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut run = MazeRun::new(&mut rng).expect("default size is valid");
        assert_eq!(run.next_level(&mut rng), Ok(false));
        assert_eq!(run.level(), 1);
    }

    #[test]
    fn clock_running_out_ends_the_run() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut run = MazeRun::new(&mut rng).expect("default size is valid");

        for _ in 0..59 {
            assert_eq!(run.tick(), RunState::Playing);
        }
        assert_eq!(run.tick(), RunState::TimedOut);
        assert_eq!(run.time_left(), 0);
        assert_eq!(run.tick(), RunState::TimedOut);
        assert_eq!(run.leaderboard_score(), None);
    }

    #[test]
    fn restart_resets_level_and_best_time() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut run = MazeRun::with_size(4, 4, &mut rng).expect("valid size");
        walk_to_exit(&mut run);
        run.next_level(&mut rng).expect("valid size");

        run.restart(&mut rng).expect("valid size");

        assert_eq!(run.level(), 1);
        assert_eq!(run.best_time(), None);
        assert_eq!(run.state(), RunState::Playing);
        assert_eq!(run.time_left(), 60);
    }

    #[test]
    fn single_cell_run_is_escaped_on_arrival() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut run = MazeRun::with_size(1, 1, &mut rng).expect("valid size");

        assert_eq!(run.player(), run.maze().exit());
        assert_eq!(run.state(), RunState::Escaped);
        assert_eq!(run.best_time(), Some(0));
        assert_eq!(run.try_move(Direction::Right), MoveOutcome::Ignored);

        assert_eq!(run.next_level(&mut rng), Ok(true));
        assert_eq!(run.level(), 2);
        assert_eq!(run.state(), RunState::Escaped);

        run.restart(&mut rng).expect("valid size");
        assert_eq!(run.state(), RunState::Escaped);
        assert_eq!(run.best_time(), Some(0));
    }

    #[test]
    fn zero_sized_run_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            MazeRun::with_size(0, 5, &mut rng),
            Err(MazeError::InvalidDimensions { .. })
        ));
    }
}
