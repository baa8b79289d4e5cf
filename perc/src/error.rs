use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("grid size must be positive and n * n must fit in usize, got {size}")]
    InvalidSize { size: usize },
    #[error("site ({row}, {col}) is outside of the {size}x{size} grid")]
    OutOfRange { row: usize, col: usize, size: usize },
    #[error("grid size and trial count must be positive, got size {size} and {trials} trials")]
    InvalidParameters { size: usize, trials: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
