use std::collections::VecDeque;

use crate::grid::{Coord, Grid};

/// Breadth-first reachability over non-obstacle cells.
pub fn is_reachable(grid: &Grid, start: Coord, end: Coord) -> bool {
    if !grid.in_bounds(start) || !grid.in_bounds(end) || grid.cell(end).is_obstacle() {
        return false;
    }
    let size = grid.size();
    let mut seen = vec![vec![false; size]; size];
    let mut q = VecDeque::new();
    seen[start.row][start.col] = true;
    q.push_back(start);

    while let Some(pos) = q.pop_front() {
        if pos == end {
            return true;
        }
        for next in grid.neighbors(pos) {
            if seen[next.row][next.col] || grid.cell(next).is_obstacle() {
                continue;
            }
            seen[next.row][next.col] = true;
            q.push_back(next);
        }
    }
    false
}

/// Every cell reachable from `start`, as a row-major visited matrix.
pub fn flood(grid: &Grid, start: Coord) -> Vec<Vec<bool>> {
    let size = grid.size();
    let mut seen = vec![vec![false; size]; size];
    if !grid.in_bounds(start) || grid.cell(start).is_obstacle() {
        return seen;
    }
    let mut q = VecDeque::new();
    seen[start.row][start.col] = true;
    q.push_back(start);
    while let Some(pos) = q.pop_front() {
        for next in grid.neighbors(pos) {
            if seen[next.row][next.col] || grid.cell(next).is_obstacle() {
                continue;
            }
            seen[next.row][next.col] = true;
            q.push_back(next);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn walled(size: usize, wall_row: usize) -> Grid {
        let mut grid = Grid::new(size).unwrap();
        for col in 0..size {
            grid.set(Coord::new(wall_row, col), Cell::Obstacle).unwrap();
        }
        grid
    }

    #[test]
    fn open_grid_is_connected() {
        let grid = Grid::new(10).unwrap();
        assert!(is_reachable(&grid, grid.start(), grid.end()));
    }

    #[test]
    fn full_wall_separates_start_from_end() {
        let grid = walled(6, 3);
        assert!(!is_reachable(&grid, grid.start(), grid.end()));
        let seen = flood(&grid, grid.start());
        assert!(seen[2][5]);
        assert!(!seen[4][0]);
    }

    #[test]
    fn single_gap_reconnects() {
        let mut grid = walled(6, 3);
        grid.set(Coord::new(3, 4), Cell::Clear).unwrap();
        assert!(is_reachable(&grid, grid.start(), grid.end()));
    }

    #[test]
    fn energy_cells_are_passable() {
        let mut grid = walled(4, 2);
        grid.set(Coord::new(2, 1), Cell::Energy(5)).unwrap();
        assert!(is_reachable(&grid, grid.start(), grid.end()));
    }

    #[test]
    fn obstacle_end_is_unreachable() {
        let mut grid = Grid::new(3).unwrap();
        let end = grid.end();
        grid.set(end, Cell::Obstacle).unwrap();
        assert!(!is_reachable(&grid, grid.start(), end));
        assert!(is_reachable(&grid, grid.start(), grid.start()));
    }
}
