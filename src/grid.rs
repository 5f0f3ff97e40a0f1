use crate::error::GameError;

/// A single grid position, `col` growing rightwards and `row` downwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    pub fn offset(self, dc: i32, dr: i32) -> Self {
        Cell::new(self.col + dc, self.row + dr)
    }
}

/// Maps any coordinate onto the `[0, width) x [0, height)` torus.
///
/// `width` and `height` must be positive; [`Grid`] guarantees that for every
/// caller inside the crate.
pub fn wrap(cell: Cell, width: i32, height: i32) -> Cell {
    Cell::new(cell.col.rem_euclid(width), cell.row.rem_euclid(height))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: i64, height: i64) -> Result<Self, GameError> {
        let valid = |n: i64| n > 0 && n <= i32::MAX as i64;
        if !valid(width) || !valid(height) {
            return Err(GameError::InvalidDimension { width, height });
        }

        Ok(Grid { width: width as i32, height: height as i32 })
    }

    /// Builds a grid from a drawing surface, keeping only whole cells.
    pub fn from_surface(surface_w: u32, surface_h: u32, cell_w: u32, cell_h: u32) -> Result<Self, GameError> {
        let cells = |len: u32, cell: u32| if cell == 0 { 0 } else { (len / cell) as i64 };
        Grid::new(cells(surface_w, cell_w), cells(surface_h, cell_h))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn wrap(&self, cell: Cell) -> Cell {
        wrap(cell, self.width, self.height)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.col) && (0..self.height).contains(&cell.row)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |row| (0..w).map(move |col| Cell::new(col, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_lands_inside_bounds() {
        for x in -25..25 {
            for y in [-11, -10, -1, 0, 9, 10, 11, 37].iter() {
                let c = wrap(Cell::new(x, *y), 10, 10);
                assert!((0..10).contains(&c.col), "{:?}", c);
                assert!((0..10).contains(&c.row), "{:?}", c);
            }
        }
        assert_eq!(wrap(Cell::new(-1, 10), 10, 10), Cell::new(9, 0));
        assert_eq!(wrap(Cell::new(14, -21), 10, 7), Cell::new(4, 0));
    }

    #[test]
    fn wrap_is_identity_on_valid_cells() {
        let grid = Grid::new(7, 4).unwrap();
        for cell in grid.cells() {
            assert_eq!(grid.wrap(cell), cell);
            assert_eq!(grid.wrap(grid.wrap(cell)), cell);
        }
        assert_eq!(grid.cells().count(), grid.area());
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert_eq!(Grid::new(0, 5), Err(GameError::InvalidDimension { width: 0, height: 5 }));
        assert!(Grid::new(3, -1).is_err());
        assert!(Grid::from_surface(19, 400, 20, 20).is_err());
        assert!(Grid::from_surface(400, 400, 0, 20).is_err());
    }

    #[test]
    fn surface_is_floor_divided() {
        let grid = Grid::from_surface(699, 415, 20, 20).unwrap();
        assert_eq!((grid.width(), grid.height()), (34, 20));
        assert!(grid.contains(Cell::new(33, 19)));
        assert!(!grid.contains(Cell::new(34, 0)));
        assert!(!grid.contains(Cell::new(0, -1)));
    }
}
