use crossterm::style::{Color, Stylize};

use common::{
    bubbles::BubbleGrid,
    grid::Position,
    leaderboard::{GameId, format_entry, format_score},
    maze::Maze,
};

use crate::run::{Report, Standing};

const PALETTE: [Color; 5] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::DarkYellow,
    Color::Magenta,
];

pub fn bubble_color(index: u8) -> Color {
    PALETTE[index as usize % PALETTE.len()]
}

/// Maze walls with the start, exit, and route marked.
pub fn maze(maze: &Maze, path: &[Position]) -> String {
    // The first marker for a cell is the one drawn.
    let mut markers = vec![(maze.start(), 'S'), (maze.exit(), 'E')];
    markers.extend(path.iter().map(|&pos| (pos, '.')));
    maze.render(&markers)
}

pub fn bubbles(grid: &BubbleGrid, colored: bool) -> String {
    grid.row_slices()
        .map(|row| {
            row.iter()
                .map(|cell| match (*cell, colored) {
                    (None, _) => " .".to_string(),
                    (Some(color), true) => format!(" {}", "●".with(bubble_color(color))),
                    (Some(color), false) => format!(" {}", color),
                })
                .collect::<String>()
        })
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn standing(standing: &Standing, player: &str, colored: bool) -> String {
    let mut lines = vec![format!("TOP {}: {}", standing.entries.len(), standing.game)];

    if standing.entries.is_empty() {
        lines.push("No scores yet!".to_string());
    }

    for (i, entry) in standing.entries.iter().enumerate() {
        let line = format_entry(i + 1, entry, standing.game);
        let line = if !colored {
            line
        } else if entry.name == player {
            line.with(Color::Yellow).to_string()
        } else if i < 3 {
            line.with(Color::DarkYellow).to_string()
        } else {
            line
        };
        lines.push(line);
    }

    lines.join("\n")
}

pub fn report(report: &Report, colored: bool) -> String {
    let mut sections = Vec::new();

    sections.push(format!("seed {} / player {}", report.seed, report.player));

    let best = report
        .maze
        .best_time
        .map(|t| format_score(GameId::MazeRunner, u64::from(t)))
        .unwrap_or_else(|| "-".to_string());
    sections.push(format!(
        "MAZE RUNNER: {} level(s) cleared, best {}\n{}",
        report.maze.levels_cleared,
        best,
        maze(&report.maze.last_maze, &report.maze.last_path)
    ));

    let mut bubbles_section = format!(
        "BUBBLE POP: {} points in {} moves, biggest group {}",
        report.bubbles.score, report.bubbles.moves, report.bubbles.biggest_group
    );
    if !report.bubbles.combos.is_empty() {
        bubbles_section.push_str(&format!("\ncombos: {}", report.bubbles.combos.join(" ")));
    }
    bubbles_section.push('\n');
    bubbles_section.push_str(&bubbles(&report.bubbles.final_grid, colored));
    sections.push(bubbles_section);

    for entry in &report.standings {
        sections.push(standing(entry, &report.player, colored));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use common::{grid::Grid, leaderboard::ScoreEntry};

    use super::*;

    #[test]
    fn plain_bubbles_print_color_indices() {
        let grid = Grid::from_rows(vec![vec![Some(0), Some(4)], vec![None, Some(2)]])
            .expect("rectangular");
        assert_eq!(bubbles(&grid, false), " 0 4\n . 2");
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(bubble_color(0), Color::Red);
        assert_eq!(bubble_color(5), Color::Red);
        assert_eq!(bubble_color(4), Color::Magenta);
    }

    #[test]
    fn empty_standing_says_so() {
        let empty = Standing {
            game: GameId::BubblePop,
            entries: Vec::new(),
        };
        assert_eq!(standing(&empty, "ada", false), "TOP 0: bubble-pop\nNo scores yet!");
    }

    #[test]
    fn standing_lists_ranked_lines() {
        let standing_ = Standing {
            game: GameId::MazeRunner,
            entries: vec![ScoreEntry {
                name: "ada".to_string(),
                score: 12,
                timestamp: 0,
            }],
        };
        let text = standing(&standing_, "ada", false);
        assert!(text.ends_with(" 1. ada               12s"));
    }
}
