use log::{info, warn};
use rand::Rng;
use strum::Display;

use crate::bubbles::{self, BubbleGrid, BubbleRules, Group, PopError};
use crate::constants::{AMAZING_GROUP_SIZE, BUBBLE_COLS, BUBBLE_ROWS, GREAT_GROUP_SIZE, MOVES_PER_GAME};
use crate::grid::{GridError, Position};

/// Shout-out shown for big clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Combo {
    #[strum(to_string = "GREAT!")]
    Great,
    #[strum(to_string = "AMAZING!")]
    Amazing,
}

impl Combo {
    pub fn for_group_size(size: usize) -> Option<Combo> {
        if size >= AMAZING_GROUP_SIZE {
            Some(Combo::Amazing)
        } else if size >= GREAT_GROUP_SIZE {
            Some(Combo::Great)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Game over, or the group under the cursor is too small.
    Ignored,
    Popped {
        group: Group,
        points: u64,
        combo: Option<Combo>,
        refilled: Vec<Position>,
    },
}

#[derive(Debug, Clone)]
pub struct BubblePop {
    grid: BubbleGrid,
    rules: BubbleRules,
    score: u64,
    moves_left: u32,
}

impl BubblePop {
    pub fn new<R: Rng + ?Sized>(rules: BubbleRules, rng: &mut R) -> Result<Self, PopError> {
        Self::with_size(BUBBLE_COLS, BUBBLE_ROWS, rules, rng)
    }

    pub fn with_size<R: Rng + ?Sized>(
        cols: usize,
        rows: usize,
        rules: BubbleRules,
        rng: &mut R,
    ) -> Result<Self, PopError> {
        let grid = bubbles::random_grid(cols, rows, rules.colors, rng)?;
        Ok(Self::from_grid(grid, rules))
    }

    pub fn from_grid(grid: BubbleGrid, rules: BubbleRules) -> Self {
        Self {
            grid,
            rules,
            score: 0,
            moves_left: MOVES_PER_GAME,
        }
    }

    pub fn grid(&self) -> &BubbleGrid {
        &self.grid
    }

    pub fn rules(&self) -> &BubbleRules {
        &self.rules
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn is_over(&self) -> bool {
        self.moves_left == 0
    }

    pub fn highlight(&self, pos: Position) -> Result<Group, GridError> {
        bubbles::highlight(&self.grid, pos, &self.rules)
    }

    pub fn best_group(&self) -> Option<Group> {
        bubbles::best_group(&self.grid, &self.rules)
    }

    /// Pops the group under `pos`. Small groups and clicks after the last move
    /// cost nothing.
    pub fn click<R: Rng + ?Sized>(&mut self, pos: Position, rng: &mut R) -> Result<ClickOutcome, PopError> {
        if self.is_over() {
            warn!("click at {} after the last move", pos);
            return Ok(ClickOutcome::Ignored);
        }

        let group = bubbles::find_group(&self.grid, pos)?;
        if !self.rules.is_poppable(&group) {
            return Ok(ClickOutcome::Ignored);
        }

        let outcome = bubbles::apply_pop(&self.grid, &group, &self.rules, rng)?;
        self.grid = outcome.grid;
        self.score += outcome.score;
        self.moves_left -= 1;

        if self.is_over() {
            info!("bubble pop finished with {} points", self.score);
        }

        Ok(ClickOutcome::Popped {
            combo: Combo::for_group_size(group.len()),
            group,
            points: outcome.score,
            refilled: outcome.refilled,
        })
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), PopError> {
        *self = Self::with_size(self.grid.cols(), self.grid.rows(), self.rules, rng)?;
        Ok(())
    }

    pub fn leaderboard_score(&self) -> u64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::grid::Grid;

    fn striped_board() -> BubbleGrid {
        // Every row is one color, so any click pops a whole row of four.
        Grid::from_rows(vec![
            vec![Some(0); 4],
            vec![Some(1); 4],
            vec![Some(2); 4],
            vec![Some(3); 4],
        ])
        .expect("rectangular")
    }

    #[test]
    fn combo_labels_follow_group_size() {
        assert_eq!(Combo::for_group_size(2), None);
        assert_eq!(Combo::for_group_size(4), None);
        assert_eq!(Combo::for_group_size(5), Some(Combo::Great));
        assert_eq!(Combo::for_group_size(7), Some(Combo::Great));
        assert_eq!(Combo::for_group_size(8), Some(Combo::Amazing));
        assert_eq!(Combo::Amazing.to_string(), "AMAZING!");
        assert_eq!(Combo::Great.to_string(), "GREAT!");
    }

    #[test]
    fn click_pops_scores_and_spends_a_move() {
        let mut game = BubblePop::from_grid(striped_board(), BubbleRules::default());
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = game.click(Position::new(3, 2), &mut rng).expect("in bounds");

        let ClickOutcome::Popped {
            group,
            points,
            combo,
            refilled,
        } = outcome
        else {
            panic!("a row of four should pop");
        };
        assert_eq!(group.len(), 4);
        assert_eq!(points, 160);
        assert_eq!(combo, None);
        assert_eq!(refilled.len(), 4);
        assert_eq!(game.score(), 160);
        assert_eq!(game.moves_left(), MOVES_PER_GAME - 1);
        assert!(game.grid().iter().all(Option::is_some));
        // Everything above the popped row dropped by one.
        assert_eq!(game.grid()[Position::new(3, 0)], Some(2));
        assert_eq!(game.grid()[Position::new(1, 3)], Some(0));
    }

    #[test]
    fn click_on_singleton_is_free() {
        let grid = Grid::from_rows(vec![vec![Some(0), Some(1)], vec![Some(2), Some(3)]])
            .expect("rectangular");
        let mut game = BubblePop::from_grid(grid.clone(), BubbleRules::default());

        let outcome = game
            .click(Position::ORIGIN, &mut StdRng::seed_from_u64(0))
            .expect("in bounds");

        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(game.moves_left(), MOVES_PER_GAME);
        assert_eq!(game.grid(), &grid);
        assert!(game.highlight(Position::ORIGIN).expect("in bounds").is_empty());
    }

    #[test]
    fn click_out_of_bounds_is_an_error() {
        let mut game = BubblePop::from_grid(striped_board(), BubbleRules::default());
        let result = game.click(Position::new(9, 9), &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(PopError::Grid(GridError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn game_ends_after_the_last_move() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut game = BubblePop::new(BubbleRules::default(), &mut rng).expect("valid rules");

        let mut moves = 0;
        while !game.is_over() {
            let group = game.best_group().expect("a 10x12 board always has a pair here");
            let start = *group.first().expect("groups are never empty");
            let outcome = game.click(start, &mut rng).expect("in bounds");
            assert!(matches!(outcome, ClickOutcome::Popped { .. }));
            moves += 1;
        }

        assert_eq!(moves, MOVES_PER_GAME);
        assert!(game.score() >= u64::from(MOVES_PER_GAME) * 40);
        let best = game.best_group().expect("still pairs on the board");
        let start = *best.first().expect("groups are never empty");
        assert_eq!(game.click(start, &mut rng), Ok(ClickOutcome::Ignored));
    }

    #[test]
    fn restart_keeps_size_and_clears_score() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut game = BubblePop::from_grid(striped_board(), BubbleRules::default());
        game.click(Position::ORIGIN, &mut rng).expect("in bounds");

        game.restart(&mut rng).expect("valid rules");

        assert_eq!(game.score(), 0);
        assert_eq!(game.moves_left(), MOVES_PER_GAME);
        assert_eq!(game.grid().cols(), 4);
        assert_eq!(game.grid().rows(), 4);
    }
}
