//! Error types for level generation and configuration loading
//!
//! Simulation ticks never fail. Everything that can go wrong does so up
//! front: a malformed level layout or an out-of-range tuning file.

/// Level layout invariant violations (fatal at generation time)
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LevelError {
    /// An element with non-positive or non-finite dimensions
    #[error("{kind} at x={x} has invalid size {width}x{height}")]
    InvalidDimension {
        kind: &'static str,
        x: f32,
        width: f32,
        height: f32,
    },

    /// A bridge with nothing to build
    #[error("bridge at x={x} has no planks")]
    EmptyBridge { x: f32 },

    /// The runner's start position is not above any platform
    #[error("start position x={x} is not supported by a platform")]
    UnsupportedStart { x: f32 },
}

/// Settings/tuning loading errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value outside its allowed range
    #[error("Invalid value for {field}: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Result type for level generation
pub type Result<T> = std::result::Result<T, LevelError>;
