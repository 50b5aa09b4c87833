use rand::Rng;

use crate::grid::Position;

use super::MazeMaker;

pub trait Backtrack {
    fn backtrack(&mut self);
}

impl<R: Rng + ?Sized> Backtrack for MazeMaker<'_, R> {
    /// Randomized depth-first carving with an explicit stack. The origin stays
    /// on the stack until every cell has been visited, so backtracking never
    /// runs dry before the grid is complete.
    fn backtrack(&mut self) {
        let total = self.total_cells();
        let mut stack = Vec::with_capacity(total);

        let mut current = Position::ORIGIN;
        self.visit_cell(current);
        stack.push(current);

        while self.visited < total {
            if let Some((direction, next)) = self.pick_neighbor(current) {
                stack.push(current);
                self.remove_wall_between(current, direction, next);
                current = next;
                self.visit_cell(current);
            } else if let Some(previous) = stack.pop() {
                current = previous;
            } else {
                break;
            }
        }
    }
}
