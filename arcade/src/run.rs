use std::fmt;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

use common::{
    bubble_pop::{BubblePop, ClickOutcome},
    bubbles::{BubbleGrid, BubbleRules, PopError},
    constants::DEFAULT_TOP_LIMIT,
    grid::{Direction, Position},
    leaderboard::{GameId, Leaderboard, LeaderboardError, ScoreEntry},
    maze::{Maze, MazeError},
    runner::{MazeRun, MoveOutcome, RunState},
};

use crate::config::Config;

/// Auto-player pace: moves per simulated second (one move every 125ms).
pub const MOVES_PER_SECOND: usize = 8;

#[derive(Debug)]
pub enum ArcadeError {
    Maze(MazeError),
    Pop(PopError),
    Leaderboard(LeaderboardError),
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcadeError::Maze(e) => write!(f, "maze runner failed: {}", e),
            ArcadeError::Pop(e) => write!(f, "bubble pop failed: {}", e),
            ArcadeError::Leaderboard(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ArcadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArcadeError::Maze(e) => Some(e),
            ArcadeError::Pop(e) => Some(e),
            ArcadeError::Leaderboard(e) => Some(e),
        }
    }
}

impl From<MazeError> for ArcadeError {
    fn from(e: MazeError) -> Self {
        ArcadeError::Maze(e)
    }
}

impl From<PopError> for ArcadeError {
    fn from(e: PopError) -> Self {
        ArcadeError::Pop(e)
    }
}

impl From<LeaderboardError> for ArcadeError {
    fn from(e: LeaderboardError) -> Self {
        ArcadeError::Leaderboard(e)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MazeReport {
    pub levels_cleared: u32,
    pub best_time: Option<u32>,
    pub last_maze: Maze,
    pub last_path: Vec<Position>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BubbleReport {
    pub score: u64,
    pub moves: u32,
    pub biggest_group: usize,
    pub combos: Vec<String>,
    pub final_grid: BubbleGrid,
}

#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    pub game: GameId,
    pub entries: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub seed: u64,
    pub player: String,
    pub maze: MazeReport,
    pub bubbles: BubbleReport,
    pub standings: Vec<Standing>,
}

/// Plays one auto-piloted session of each game from the configured seed and
/// submits the results to `leaderboard`.
pub fn run(config: &Config, leaderboard: &mut impl Leaderboard) -> Result<Report, ArcadeError> {
    info!("starting arcade run with seed {}", config.seed);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let maze = play_maze(config, &mut rng)?;
    if let Some(best) = maze.best_time {
        leaderboard.submit_score(GameId::MazeRunner, &config.player, u64::from(best))?;
    } else {
        warn!("no maze level cleared, nothing to submit");
    }

    let bubbles = play_bubbles(config, &mut rng)?;
    leaderboard.submit_score(GameId::BubblePop, &config.player, bubbles.score)?;

    let standings = [GameId::MazeRunner, GameId::BubblePop]
        .into_iter()
        .map(|game| {
            leaderboard
                .top_scores(game, DEFAULT_TOP_LIMIT)
                .map(|entries| Standing { game, entries })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report {
        seed: config.seed,
        player: config.player.clone(),
        maze,
        bubbles,
        standings,
    })
}

fn direction_between(from: Position, to: Position) -> Option<Direction> {
    match (
        to.row as isize - from.row as isize,
        to.col as isize - from.col as isize,
    ) {
        (-1, 0) => Some(Direction::Top),
        (1, 0) => Some(Direction::Bottom),
        (0, -1) => Some(Direction::Left),
        (0, 1) => Some(Direction::Right),
        _ => None,
    }
}

/// Walks the shortest route through each level, one simulated second per
/// `MOVES_PER_SECOND` moves, until the levels run out or the clock does.
pub fn play_maze<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<MazeReport, ArcadeError> {
    let mut run = MazeRun::with_size(config.maze_cols, config.maze_rows, rng)?;
    let mut levels_cleared = 0;
    let mut last_path = Vec::new();

    loop {
        let maze = run.maze();
        let path = maze
            .shortest_path(maze.start(), maze.exit())
            .unwrap_or_default();
        debug!("level {} route is {} cells long", run.level(), path.len());

        let mut moves = 0;
        for pair in path.windows(2) {
            let Some(direction) = direction_between(pair[0], pair[1]) else {
                break;
            };
            match run.try_move(direction) {
                MoveOutcome::Escaped { .. } | MoveOutcome::Ignored => break,
                MoveOutcome::Blocked => {
                    warn!("route blocked at {}", pair[0]);
                    break;
                }
                MoveOutcome::Moved(_) => {}
            }
            moves += 1;
            if moves % MOVES_PER_SECOND == 0 && run.tick() == RunState::TimedOut {
                break;
            }
        }
        last_path = path;

        if run.state() != RunState::Escaped {
            break;
        }
        levels_cleared += 1;
        if levels_cleared >= config.maze_levels {
            break;
        }
        run.next_level(rng)?;
    }

    Ok(MazeReport {
        levels_cleared,
        best_time: run.best_time(),
        last_maze: run.maze().clone(),
        last_path,
    })
}

/// Greedy player: always pops the biggest group on the board.
pub fn play_bubbles<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<BubbleReport, ArcadeError> {
    let rules = BubbleRules {
        colors: config.colors,
        ..BubbleRules::default()
    };
    let mut game = BubblePop::with_size(config.bubble_cols, config.bubble_rows, rules, rng)?;
    let mut moves = 0;
    let mut biggest_group = 0;
    let mut combos = Vec::new();

    while !game.is_over() {
        let Some(group) = game.best_group() else {
            info!("no poppable groups left after {} moves", moves);
            break;
        };
        let Some(&start) = group.first() else {
            break;
        };

        let ClickOutcome::Popped { group, combo, .. } = game.click(start, rng)? else {
            break;
        };
        moves += 1;
        biggest_group = biggest_group.max(group.len());
        if let Some(combo) = combo {
            combos.push(combo.to_string());
        }
    }

    Ok(BubbleReport {
        score: game.score(),
        moves,
        biggest_group,
        combos,
        final_grid: game.grid().clone(),
    })
}
