pub mod bubble_pop;
pub mod bubbles;
pub mod constants;
pub mod grid;
pub mod leaderboard;
pub mod maze;
pub mod runner;
