/// Number of cells on the 3x3 board.
pub const GRID_CELLS: usize = 9;

/// Row-major highlight vector. Holds at most one highlighted cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    active: Option<usize>,
}

impl Grid {
    /// Makes `index` the sole highlighted cell. Out-of-range indices clear the grid.
    pub fn highlight(&mut self, index: usize) {
        self.active = (index < GRID_CELLS).then_some(index);
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn cells(&self) -> [bool; GRID_CELLS] {
        let mut cells = [false; GRID_CELLS];
        if let Some(i) = self.active {
            cells[i] = true;
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_replaces_previous_cell() {
        let mut grid = Grid::default();
        grid.highlight(2);
        grid.highlight(7);
        assert_eq!(grid.cells().iter().filter(|c| **c).count(), 1);
        assert!(grid.is_active(7));
        assert!(!grid.is_active(2));
    }

    #[test]
    fn out_of_range_clears() {
        let mut grid = Grid::default();
        grid.highlight(4);
        grid.highlight(GRID_CELLS);
        assert_eq!(grid.active(), None);
        assert_eq!(grid.cells(), [false; GRID_CELLS]);
    }
}
