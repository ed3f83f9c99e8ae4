use std::fmt::Display;

use crate::core::engine::{Color, PieceType};
use crate::core::utils::Coordinate;

#[derive(Debug)]
pub enum ChessError {
    /** Setup asked for a piece the board has no slot for. */
    Configuration { kind: PieceType, color: Option<Color> },
    /** Board state is broken, e.g. a required king is missing. */
    InvariantViolation(String),
    /** Requested move is not in the current legal move set. */
    IllegalMove {
        origin: Coordinate,
        destination: Coordinate,
    },
    InvalidSquare(String),
    Snapshot(postcard::Error),
}

impl Display for ChessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChessError::Configuration {
                kind,
                color: Some(color),
            } => write!(f, "No room for another {color} {kind:?}"),
            ChessError::Configuration { kind, color: None } => {
                write!(f, "No room for another {kind:?}")
            }
            ChessError::InvariantViolation(reason) => {
                write!(f, "Board invariant is violated: {reason}")
            }
            ChessError::IllegalMove {
                origin,
                destination,
            } => write!(f, "Illegal move {origin}-{destination}"),
            ChessError::InvalidSquare(name) => write!(f, "Invalid square name '{name}'"),
            ChessError::Snapshot(err) => write!(f, "Failed to process snapshot: {err}"),
        }
    }
}

impl std::error::Error for ChessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChessError::Snapshot(err) => Some(err),
            _ => None,
        }
    }
}

impl From<postcard::Error> for ChessError {
    fn from(value: postcard::Error) -> Self {
        ChessError::Snapshot(value)
    }
}

impl ChessError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChessError::IllegalMove { .. } | ChessError::InvalidSquare(_))
    }
}
