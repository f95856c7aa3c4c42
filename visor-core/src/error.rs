//! Errors for the fallible, non-interactive edges of the crate.
//!
//! Pointer, tick and navigation handlers never return these; they degrade
//! to `None` or a no-op instead.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisorError {
    #[error("malformed calibration line {0:?}")]
    CalibrationSyntax(String),

    #[error("calibration rectangle is empty or inverted: min ({min_x}, {min_y}) max ({max_x}, {max_y})")]
    CalibrationRange {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },

    #[error("unknown screen state {0:?}")]
    UnknownState(String),
}

pub type Result<T> = std::result::Result<T, VisorError>;
