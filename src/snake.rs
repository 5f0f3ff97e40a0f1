use std::collections::VecDeque;

use crate::grid::{Cell, Grid};
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// The snake body, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    /// Lays out `size` cells trailing behind `head`, opposite to `direction`.
    ///
    /// The length is capped one short of the grid's extent along the heading,
    /// so the body never overlaps itself and the first step cannot land on
    /// the tail.
    pub fn new(head: Cell, size: usize, direction: Direction, grid: &Grid) -> Self {
        let (dc, dr) = direction.delta();
        let extent = (if dc != 0 { grid.width() } else { grid.height() }) as usize;
        let size = size.min(extent.saturating_sub(1)).max(1);
        let body = (0..size as i32)
            .map(|i| grid.wrap(head.offset(-dc * i, -dr * i)))
            .collect();
        Snake { body, direction }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Cell {
        // The body is never empty, `new` lays out at least one cell and
        // `advance` pushes before it pops.
        self.body[0]
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Commits `new_direction` unless it would reverse the snake onto itself.
    /// Returns whether the heading was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }
        self.direction = new_direction;
        true
    }

    pub fn next_head(&self, grid: &Grid) -> Cell {
        next_head(self.head(), self.direction, grid)
    }

    /// Checks `candidate` against the whole pre-move body. The tail counts as
    /// occupied even though it would be vacated by a plain move.
    pub fn would_collide(&self, candidate: Cell) -> bool {
        would_collide(&self.body, candidate)
    }

    /// Pushes `new_head`; the tail is kept when `grew`, dropped otherwise.
    /// Returns the vacated tail cell.
    pub fn advance(&mut self, new_head: Cell, grew: bool) -> Option<Cell> {
        self.body.push_front(new_head);
        if grew { None } else { self.body.pop_back() }
    }
}

pub fn next_head(current: Cell, direction: Direction, grid: &Grid) -> Cell {
    let (dc, dr) = direction.delta();
    grid.wrap(current.offset(dc, dr))
}

pub fn would_collide(body: &VecDeque<Cell>, candidate: Cell) -> bool {
    body.contains(&candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(10, 10).unwrap()
    }

    #[test]
    fn new_snake_trails_behind_head_and_wraps() {
        let snake = Snake::new(Cell::new(14, 10), 5, Right, &grid());
        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![
            Cell::new(4, 0), Cell::new(3, 0), Cell::new(2, 0), Cell::new(1, 0), Cell::new(0, 0),
        ]);

        let snake = Snake::new(Cell::new(0, 0), 3, Down, &grid());
        assert_eq!(snake.body().back(), Some(&Cell::new(0, 8)));
    }

    #[test]
    fn reversal_is_refused() {
        let mut snake = Snake::new(Cell::new(5, 5), 3, Right, &grid());
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Right);
        assert!(snake.set_direction(Up));
        assert!(!snake.set_direction(Down));
        assert_eq!(snake.get_direction(), Up);
    }

    #[test]
    fn next_head_wraps_over_every_edge() {
        let g = grid();
        assert_eq!(next_head(Cell::new(9, 3), Right, &g), Cell::new(0, 3));
        assert_eq!(next_head(Cell::new(0, 3), Left, &g), Cell::new(9, 3));
        assert_eq!(next_head(Cell::new(2, 0), Up, &g), Cell::new(2, 9));
        assert_eq!(next_head(Cell::new(2, 9), Down, &g), Cell::new(2, 0));
    }

    #[test]
    fn advance_keeps_length_unless_grown() {
        let g = grid();
        let mut snake = Snake::new(Cell::new(5, 5), 4, Right, &g);

        let head = snake.next_head(&g);
        assert_eq!(snake.advance(head, false), Some(Cell::new(2, 5)));
        assert_eq!(snake.len(), 4);

        let head = snake.next_head(&g);
        assert_eq!(snake.advance(head, true), None);
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.head(), Cell::new(7, 5));
    }

    #[test]
    fn moving_into_the_tail_is_fatal() {
        let g = grid();
        let mut ring = Snake::new(Cell::new(1, 0), 3, Right, &g);
        for (dir, grew) in [(Down, true), (Left, false)].iter() {
            ring.set_direction(*dir);
            let head = ring.next_head(&g);
            assert!(!ring.would_collide(head));
            ring.advance(head, *grew);
        }
        ring.set_direction(Up);

        // Head at (0,1) closing a 2x2 square; the next cell is the tail.
        assert_eq!(ring.body().back(), Some(&Cell::new(0, 0)));
        assert_eq!(ring.next_head(&g), Cell::new(0, 0));
        assert!(ring.would_collide(ring.next_head(&g)));
        assert!(would_collide(ring.body(), Cell::new(1, 1)));
        assert!(!would_collide(ring.body(), Cell::new(2, 1)));
    }

    #[test]
    fn opening_body_fits_narrow_grids() {
        let narrow = Grid::new(4, 4).unwrap();
        let snake = Snake::new(Cell::new(14, 10), 5, Right, &narrow);
        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![Cell::new(2, 2), Cell::new(1, 2), Cell::new(0, 2)]);
        assert!(!snake.would_collide(snake.next_head(&narrow)));

        let short = Grid::new(30, 2).unwrap();
        assert_eq!(Snake::new(Cell::new(0, 0), 5, Down, &short).len(), 1);
        assert_eq!(Snake::new(Cell::new(0, 0), 5, Right, &short).len(), 5);
    }
}
