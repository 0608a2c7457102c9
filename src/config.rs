use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::agent::DEFAULT_START_ENERGY;
use crate::generator::{
    EnergyTier, MazeConfig, DEFAULT_ENERGY_COUNT, DEFAULT_ENERGY_VALUE, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_OBSTACLES, DEFAULT_SIZE,
};
use crate::pathfinder::SearchMode;

pub const DEFAULT_STEP_MS: u64 = 200;
pub const DEFAULT_RENDER_FPS: u64 = 60;
const MAX_SIZE: usize = 32;

/// Generate small energy mazes and watch an agent search its way out.
#[derive(Debug, Parser)]
#[command(name = "energy-maze", version)]
pub struct Cli {
    /// Side length of the square grid.
    #[arg(long, default_value_t = DEFAULT_SIZE, value_parser = parse_size)]
    pub size: usize,
    /// Number of obstacle cells.
    #[arg(long, default_value_t = DEFAULT_OBSTACLES)]
    pub obstacles: usize,
    /// Energy pickups as COUNTxVALUE; repeat for several tiers.
    #[arg(long = "energy", value_name = "COUNTxVALUE")]
    pub energy: Vec<EnergyTier>,
    /// Energy the agent starts each run with.
    #[arg(long, default_value_t = DEFAULT_START_ENERGY)]
    pub start_energy: u32,
    /// Layouts tried before giving up on a connected maze.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,
    /// Seed for reproducible mazes.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Milliseconds between playback steps.
    #[arg(
        long,
        env = "MAZE_STEP_MS",
        default_value_t = DEFAULT_STEP_MS,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    pub step_ms: u64,
    #[arg(long, value_enum, default_value_t = SearchArg::Reference)]
    pub search: SearchArg,
    /// Solve one maze, print it and exit.
    #[arg(long)]
    pub headless: bool,
    /// Write logs here while the interactive screen is up.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SearchArg {
    Reference,
    EnergyAware,
}

impl From<SearchArg> for SearchMode {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Reference => SearchMode::Reference,
            SearchArg::EnergyAware => SearchMode::EnergyAware,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackSettings {
    pub step: Duration,
    pub frame: Duration,
}

impl Cli {
    pub fn maze_config(&self) -> MazeConfig {
        let energy_tiers = if self.energy.is_empty() {
            vec![EnergyTier {
                count: DEFAULT_ENERGY_COUNT,
                value: DEFAULT_ENERGY_VALUE,
            }]
        } else {
            self.energy.clone()
        };
        MazeConfig {
            size: self.size,
            obstacles: self.obstacles,
            energy_tiers,
            max_attempts: self.max_attempts,
        }
    }

    pub fn playback(&self) -> PlaybackSettings {
        let fps = read_render_fps();
        PlaybackSettings {
            step: Duration::from_millis(self.step_ms),
            frame: Duration::from_micros(1_000_000 / fps.max(1)),
        }
    }
}

fn read_render_fps() -> u64 {
    std::env::var("MAZE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS)
}

fn parse_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a grid size"))?;
    if (2..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("grid size must be between 2 and {MAX_SIZE}"))
    }
}

impl FromStr for EnergyTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (count, bonus) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected format COUNTxVALUE".to_string())?;
        let count = count
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid count `{}`", count.trim()))?;
        let bonus = bonus
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid value `{}`", bonus.trim()))?;
        if bonus == 0 {
            return Err("energy value must be positive".to_string());
        }
        Ok(EnergyTier {
            count,
            value: bonus,
        })
    }
}
