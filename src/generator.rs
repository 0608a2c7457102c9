use rand::Rng;
use tracing::{debug, warn};

use crate::connectivity::is_reachable;
use crate::error::{MazeError, Result};
use crate::grid::{Cell, Coord, Grid};

pub const DEFAULT_SIZE: usize = 10;
pub const DEFAULT_OBSTACLES: usize = 15;
pub const DEFAULT_ENERGY_COUNT: usize = 5;
pub const DEFAULT_ENERGY_VALUE: u32 = 5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;
/// Random draws allowed per placement, as a multiple of the cell count.
const DRAWS_PER_CELL: usize = 64;

/// `count` energy cells, each granting `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnergyTier {
    pub count: usize,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeConfig {
    pub size: usize,
    pub obstacles: usize,
    pub energy_tiers: Vec<EnergyTier>,
    pub max_attempts: u32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            obstacles: DEFAULT_OBSTACLES,
            energy_tiers: vec![EnergyTier {
                count: DEFAULT_ENERGY_COUNT,
                value: DEFAULT_ENERGY_VALUE,
            }],
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl MazeConfig {
    /// Total energy cells across tiers, saturating at `usize::MAX`.
    pub fn energy_cells(&self) -> usize {
        self.energy_tiers
            .iter()
            .fold(0usize, |total, tier| total.saturating_add(tier.count))
    }

    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(MazeError::InvalidConfig(format!(
                "grid size must be at least 2, got {}",
                self.size
            )));
        }
        if self.max_attempts == 0 {
            return Err(MazeError::InvalidConfig(
                "max attempts must be at least 1".to_string(),
            ));
        }
        if let Some(tier) = self.energy_tiers.iter().find(|tier| tier.value == 0) {
            return Err(MazeError::InvalidConfig(format!(
                "energy tier of {} cells has no bonus",
                tier.count
            )));
        }
        let available = self
            .size
            .checked_mul(self.size)
            .map(|cells| cells - 2)
            .ok_or_else(|| {
                MazeError::InvalidConfig(format!("grid size {} is too large", self.size))
            })?;
        let requested = self.obstacles.saturating_add(self.energy_cells());
        if requested > available {
            return Err(MazeError::Capacity {
                requested,
                available,
            });
        }
        Ok(())
    }
}

/// Builds random layouts until one connects start to end.
///
/// Disconnected layouts are thrown away whole; nothing is repaired in place.
pub fn generate(rng: &mut impl Rng, config: &MazeConfig) -> Result<Grid> {
    config.validate()?;
    for attempt in 1..=config.max_attempts {
        let grid = build_layout(rng, config)?;
        if is_reachable(&grid, grid.start(), grid.end()) {
            debug!(attempt, size = config.size, "maze accepted");
            return Ok(grid);
        }
        debug!(attempt, "exit unreachable, regenerating");
    }
    warn!(
        attempts = config.max_attempts,
        obstacles = config.obstacles,
        "giving up on maze generation"
    );
    Err(MazeError::GenerationRetryExceeded {
        attempts: config.max_attempts,
    })
}

fn build_layout(rng: &mut impl Rng, config: &MazeConfig) -> Result<Grid> {
    let mut grid = Grid::new(config.size)?;
    for _ in 0..config.obstacles {
        let pos = random_clear_cell(&grid, rng)?;
        grid.set(pos, Cell::Obstacle)?;
    }
    for tier in &config.energy_tiers {
        for _ in 0..tier.count {
            let pos = random_clear_cell(&grid, rng)?;
            grid.set(pos, Cell::Energy(tier.value))?;
        }
    }
    Ok(grid)
}

fn random_clear_cell(grid: &Grid, rng: &mut impl Rng) -> Result<Coord> {
    let size = grid.size();
    let max_draws = (size * size).saturating_mul(DRAWS_PER_CELL);
    for _ in 0..max_draws {
        let pos = Coord::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !grid.is_start_or_end(pos) && grid.cell(pos) == Cell::Clear {
            return Ok(pos);
        }
    }
    let available = grid.count(|cell| cell == Cell::Clear).saturating_sub(2);
    Err(MazeError::Capacity {
        requested: available + 1,
        available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn places_requested_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = MazeConfig {
            energy_tiers: vec![
                EnergyTier { count: 3, value: 5 },
                EnergyTier { count: 2, value: 10 },
            ],
            ..MazeConfig::default()
        };
        let grid = generate(&mut rng, &config).unwrap();
        assert_eq!(grid.count(Cell::is_obstacle), 15);
        assert_eq!(grid.count(|c| c == Cell::Energy(5)), 3);
        assert_eq!(grid.count(|c| c == Cell::Energy(10)), 2);
        assert_eq!(grid.total_energy(), 35);
    }

    #[test]
    fn start_and_end_stay_clear() {
        let config = MazeConfig {
            obstacles: 30,
            ..MazeConfig::default()
        };
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = match generate(&mut rng, &config) {
                Ok(grid) => grid,
                Err(MazeError::GenerationRetryExceeded { .. }) => continue,
                Err(err) => panic!("unexpected error: {err}"),
            };
            assert_eq!(grid.get(grid.start()).unwrap(), Cell::Clear);
            assert_eq!(grid.get(grid.end()).unwrap(), Cell::Clear);
            assert!(is_reachable(&grid, grid.start(), grid.end()));
        }
    }

    #[test]
    fn rejects_more_cells_than_fit() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = MazeConfig {
            size: 3,
            obstacles: 5,
            energy_tiers: vec![EnergyTier { count: 3, value: 1 }],
            ..MazeConfig::default()
        };
        assert!(matches!(
            generate(&mut rng, &config),
            Err(MazeError::Capacity {
                requested: 8,
                available: 7
            })
        ));
    }

    #[test]
    fn oversized_counts_report_capacity() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = MazeConfig {
            obstacles: usize::MAX,
            energy_tiers: vec![
                EnergyTier { count: 1, value: 5 },
                EnergyTier {
                    count: usize::MAX,
                    value: 5,
                },
            ],
            ..MazeConfig::default()
        };
        assert!(matches!(
            generate(&mut rng, &config),
            Err(MazeError::Capacity {
                requested: usize::MAX,
                available: 98
            })
        ));

        let huge = MazeConfig {
            size: usize::MAX,
            ..MazeConfig::default()
        };
        assert!(matches!(huge.validate(), Err(MazeError::InvalidConfig(_))));
    }

    #[test]
    fn full_grid_of_energy_is_accepted() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = MazeConfig {
            size: 3,
            obstacles: 0,
            energy_tiers: vec![EnergyTier { count: 7, value: 2 }],
            ..MazeConfig::default()
        };
        let grid = generate(&mut rng, &config).unwrap();
        assert_eq!(grid.count(|c| c == Cell::Energy(2)), 7);
    }

    #[test]
    fn unsatisfiable_layout_exhausts_retries() {
        // A 2x2 grid with both free cells blocked can never connect.
        let mut rng = StdRng::seed_from_u64(11);
        let config = MazeConfig {
            size: 2,
            obstacles: 2,
            energy_tiers: Vec::new(),
            max_attempts: 4,
        };
        assert!(matches!(
            generate(&mut rng, &config),
            Err(MazeError::GenerationRetryExceeded { attempts: 4 })
        ));
    }

    #[test]
    fn rejects_zero_value_tier_and_zero_attempts() {
        let mut rng = StdRng::seed_from_u64(0);
        let zero_tier = MazeConfig {
            energy_tiers: vec![EnergyTier { count: 1, value: 0 }],
            ..MazeConfig::default()
        };
        assert!(matches!(
            generate(&mut rng, &zero_tier),
            Err(MazeError::InvalidConfig(_))
        ));
        let no_attempts = MazeConfig {
            max_attempts: 0,
            ..MazeConfig::default()
        };
        assert!(matches!(
            generate(&mut rng, &no_attempts),
            Err(MazeError::InvalidConfig(_))
        ));
    }
}
