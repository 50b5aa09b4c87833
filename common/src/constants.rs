// Maze runner:
pub const MAZE_COLS: usize = 19;
pub const MAZE_ROWS: usize = 13;
pub const BASE_TIME_LIMIT: u32 = 60; // Seconds at level 1.
pub const TIME_LIMIT_STEP: u32 = 5; // Seconds removed per level.
pub const MIN_TIME_LIMIT: u32 = 20;

// Bubble pop:
pub const BUBBLE_COLS: usize = 10;
pub const BUBBLE_ROWS: usize = 12;
pub const BUBBLE_COLORS: u8 = 5;
pub const POINTS_PER_CELL: u64 = 10;
pub const MOVES_PER_GAME: u32 = 30;
pub const MIN_GROUP_SIZE: usize = 2; // Also the hover-highlight threshold.
pub const GREAT_GROUP_SIZE: usize = 5;
pub const AMAZING_GROUP_SIZE: usize = 8;

// Leaderboard:
pub const DEFAULT_TOP_LIMIT: usize = 10;
pub const MAX_NAME_LENGTH: usize = 16;
