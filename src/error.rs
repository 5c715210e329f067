//! Engine error types

use thiserror::Error;

/// Coordinate conversion failures on the board
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// A point or cell resolved outside `[0,width) x [0,height)`
    #[error("cell ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Problems loading or validating [`crate::Settings`]
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
