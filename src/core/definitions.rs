use serde::{Deserialize, Serialize};

use crate::core::engine::{Color, Move, PieceType};
use crate::core::error::ChessError;
use crate::core::game::GameEndState;
use crate::core::utils::Coordinate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub kind: PieceType,
    pub color: Color,
    /** Figure made the last move */
    pub last_move: bool,
    /** King which is in check right now */
    pub impose_check: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Figure(Figure),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameState {
    PlayerMove(Color),
    Finished(GameEndState),
}

/// Surface consumed by display and input layers.
pub trait MatchInterface {
    /** Cells indexed as `[rank][file]` */
    fn current_board(&self) -> Vec<Vec<Cell>>;
    fn cell(&self, file: usize, rank: usize) -> Option<Cell>;
    fn possible_moves(&self, file: usize, rank: usize) -> Option<Vec<Move>>;
    fn execute_move(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<GameState, ChessError>;
    // info
    fn current_player(&self) -> Color;
    fn checked(&self) -> bool;
    fn game_ended(&self) -> bool;
}

/** Everything a remote display needs to draw the position */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: Vec<Vec<Cell>>,
    pub current_player: Color,
    pub checked: bool,
    pub end_state: Option<GameEndState>,
}

impl Snapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChessError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Snapshot, ChessError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}
