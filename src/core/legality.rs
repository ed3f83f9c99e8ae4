use log::trace;

use crate::core::engine::{Board, Color, Move, MoveKind};
use crate::core::error::ChessError;

/// Filters candidate moves of one color by playing each of them on the board,
/// looking at the king and taking the move back.
///
/// The checker holds the board mutably for its whole lifetime, so no commit
/// or second probe can slip in between a simulation and its undo.
pub struct LegalMoveChecker<'a> {
    board: &'a mut Board,
    color: Color,
}

impl<'a> LegalMoveChecker<'a> {
    pub fn new(board: &'a mut Board, color: Color) -> Result<Self, ChessError> {
        board.king(color)?;
        Ok(LegalMoveChecker { board, color })
    }

    pub fn is_legal(&mut self, candidate: Move) -> Result<bool, ChessError> {
        if candidate.kind == MoveKind::Castle && !self.castle_path_is_safe(candidate) {
            return Ok(false);
        }
        #[cfg(debug_assertions)]
        let before = self.board.clone();

        let probe = self.board.simulate(candidate);
        let checked = self.board.is_in_check(self.color);
        self.board.undo(probe);

        #[cfg(debug_assertions)]
        assert!(
            before == *self.board,
            "Probing {candidate} left the board changed!"
        );
        Ok(!checked?)
    }

    /** King may not castle out of check or across an attacked square. */
    fn castle_path_is_safe(&self, castle: Move) -> bool {
        let dir = (castle.destination.x() as i8 - castle.origin.x() as i8).signum();
        let enemy = self.color.opposite();
        let crossed = castle.origin.offset(dir, 0);
        !self.board.is_attacked(castle.origin, enemy)
            && crossed.is_some_and(|at| !self.board.is_attacked(at, enemy))
    }

    pub fn filter(
        &mut self,
        candidates: impl IntoIterator<Item = Move>,
    ) -> Result<Vec<Move>, ChessError> {
        let mut legal = Vec::new();
        let mut rejected = 0;
        for candidate in candidates {
            if self.is_legal(candidate)? {
                legal.push(candidate);
            } else {
                rejected += 1;
            }
        }
        trace!(
            "{}: {} legal moves, {} rejected",
            self.color,
            legal.len(),
            rejected
        );
        Ok(legal)
    }
}
