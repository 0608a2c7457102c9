pub mod agent;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod generator;
pub mod grid;
pub mod pathfinder;
pub mod render;
pub mod session;

pub use agent::Agent;
pub use error::{MazeError, Result};
pub use generator::{generate, EnergyTier, MazeConfig};
pub use grid::{Cell, Coord, Grid};
pub use pathfinder::{find_path, Path, SearchMode, SearchOutcome};
pub use session::{Session, StartOutcome, Status};
