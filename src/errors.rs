use std::fmt;

/// Custom error types for the Two Flags engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Algebraic move string could not be parsed
    InvalidNotation(String),
    /// Move rejected by the board (wrong side or empty source square)
    IllegalMove(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidNotation(msg) => write!(f, "Invalid notation: {}", msg),
            EngineError::IllegalMove(msg) => write!(f, "Illegal move: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
