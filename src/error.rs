//! Error type shared by the engine, the estimator and the CLI.

/// Everything that can go wrong. Engine and estimator only ever produce the
/// first three; the rest come from the presentation side.
#[derive(Debug, thiserror::Error)]
pub enum PercolationError {
    /// Grid size must be at least 1.
    #[error("grid size must be > 0 (got {n})")]
    InvalidGridSize {
        /// Requested size.
        n: usize,
    },

    /// Trial count must be at least 1.
    #[error("trial count must be > 0 (got {trials})")]
    InvalidTrialCount {
        /// Requested trial count.
        trials: usize,
    },

    /// A site coordinate fell outside `[1, n]`.
    #[error("site ({row}, {col}) out of range for {n}x{n} grid")]
    OutOfRange {
        /// 1-based row.
        row: usize,
        /// 1-based column.
        col: usize,
        /// Grid size.
        n: usize,
    },

    /// Bad command-line input.
    #[error("{0}")]
    Usage(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PercolationError>;
