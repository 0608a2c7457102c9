use thiserror::Error;

/// Errors raised while building or driving a maze session.
///
/// A search that cannot reach the exit is not an error; see
/// [`crate::pathfinder::SearchOutcome::NotFound`].
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("coordinate ({row}, {col}) is outside a {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("invalid maze configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot place {requested} cells on a grid with {available} free cells")]
    Capacity { requested: usize, available: usize },
    #[error("no connected maze after {attempts} attempts")]
    GenerationRetryExceeded { attempts: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
