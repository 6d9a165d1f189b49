//! Viewer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid UCI move: {0}")]
    InvalidMove(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("No position selected")]
    NoPosition,

    #[error("No evaluation for the selected position")]
    NoEvaluation,

    #[error("Variation {0} is not in the current evaluation")]
    VariationOutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
