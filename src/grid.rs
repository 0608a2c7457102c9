use crate::error::{MazeError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Clear,
    Obstacle,
    /// Energy pickup carrying a positive bonus.
    Energy(u32),
}

impl Cell {
    pub fn is_obstacle(self) -> bool {
        self == Cell::Obstacle
    }

    pub fn bonus(self) -> u32 {
        match self {
            Cell::Energy(value) => value,
            _ => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Right,
    Left,
}

impl Dir {
    /// Neighbour enumeration order used by every search.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Right, Dir::Left];

    fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Right => (0, 1),
            Dir::Left => (0, -1),
        }
    }
}

/// Square grid of cells; start is the top-left corner, end the bottom-right.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(MazeError::InvalidConfig(format!(
                "grid size must be at least 2, got {}",
                size
            )));
        }
        Ok(Self {
            size,
            cells: vec![vec![Cell::Clear; size]; size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn end(&self) -> Coord {
        Coord::new(self.size - 1, self.size - 1)
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    pub fn is_start_or_end(&self, coord: Coord) -> bool {
        coord == self.start() || coord == self.end()
    }

    pub fn get(&self, coord: Coord) -> Result<Cell> {
        self.check(coord)?;
        Ok(self.cells[coord.row][coord.col])
    }

    pub fn set(&mut self, coord: Coord, cell: Cell) -> Result<()> {
        self.check(coord)?;
        self.cells[coord.row][coord.col] = cell;
        Ok(())
    }

    /// Unchecked read for coordinates already produced by [`Grid::neighbors`]
    /// or otherwise known to be in bounds.
    pub(crate) fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.row][coord.col]
    }

    /// Empties a collected pickup. Same bounds contract as [`Grid::cell`].
    pub(crate) fn clear(&mut self, coord: Coord) {
        self.cells[coord.row][coord.col] = Cell::Clear;
    }

    /// In-bounds 4-neighbours of `coord`, in up, down, right, left order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Dir::ALL.into_iter().filter_map(move |dir| self.step(coord, dir))
    }

    pub fn step(&self, coord: Coord, dir: Dir) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let row = coord.row.checked_add_signed(dr)?;
        let col = coord.col.checked_add_signed(dc)?;
        let next = Coord::new(row, col);
        self.in_bounds(next).then_some(next)
    }

    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| pred(**cell))
            .count()
    }

    pub fn total_energy(&self) -> u64 {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| u64::from(cell.bonus()))
            .sum()
    }

    fn check(&self, coord: Coord) -> Result<()> {
        if self.in_bounds(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                row: coord.row,
                col: coord.col,
                size: self.size,
            })
        }
    }
}
