pub mod core;
pub mod perft;

// module re-exports
pub use crate::core::definitions::{Cell, Figure, GameState, MatchInterface, Snapshot};
pub use crate::core::engine::{Board, Color, Move, MoveKind, PieceType};
pub use crate::core::error::ChessError;
pub use crate::core::game::{Game, GameEndState};
pub use crate::core::legality::LegalMoveChecker;
pub use crate::core::utils::Coordinate;
