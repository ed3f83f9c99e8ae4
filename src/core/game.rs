use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::definitions::{Cell, Figure, GameState, MatchInterface, Snapshot};
use crate::core::engine::{Board, Color, Move, PieceType};
use crate::core::error::ChessError;
use crate::core::utils::{Coordinate, BOARD_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndState {
    /** Winner of the game */
    CheckMate(Color),
    StaleMate,
    InsufficientMaterial,
}

fn ui_cell(board: &Board, at: Coordinate, checked: Option<Color>) -> Cell {
    match board.piece_at(at) {
        None => Cell::Empty,
        Some(piece) => Cell::Figure(Figure {
            kind: piece.kind(),
            color: piece.color(),
            last_move: board.last_move().is_some_and(|last| last.destination == at),
            impose_check: piece.kind() == PieceType::King && checked == Some(piece.color()),
        }),
    }
}

pub fn ui_board(board: &Board, checked: Option<Color>) -> Vec<Vec<Cell>> {
    (0..BOARD_SIZE)
        .map(|rank| {
            (0..BOARD_SIZE)
                .map(|file| ui_cell(board, Coordinate::at(file, rank), checked))
                .collect()
        })
        .collect()
}

/** Neither side keeps a pawn, rook or queen, and each has one minor piece at most.
 *
 * This is a material cut-off, not a dead position test: K+N vs K+N and
 * K+B vs K+B on opposite colors still end here although mate is possible. */
pub fn insufficient_material(board: &Board) -> bool {
    [Color::White, Color::Black].into_iter().all(|color| {
        let mut minors = 0;
        for piece in board.pieces(color) {
            match piece.kind() {
                PieceType::King => (),
                kind if kind.is_minor() => minors += 1,
                _ => return false,
            }
        }
        minors <= 1
    })
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current_player: Color,
    history: Vec<Move>,
    checked: bool,
    end_state: Option<GameEndState>,
}

impl Game {
    pub fn new() -> Result<Game, ChessError> {
        Game::with_player(Board::standard()?, Color::White)
    }

    pub fn with_player(board: Board, player: Color) -> Result<Game, ChessError> {
        if board.is_in_check(player.opposite())? {
            return Err(ChessError::InvariantViolation(format!(
                "{} king is in check, but it's {player} to move",
                player.opposite()
            )));
        }
        let mut game = Game {
            board,
            current_player: player,
            history: Vec::new(),
            checked: false,
            end_state: None,
        };
        game.refresh()?;
        Ok(game)
    }

    fn refresh(&mut self) -> Result<(), ChessError> {
        self.checked = self.board.is_in_check(self.current_player)?;
        let no_moves = self.board.legal_moves(self.current_player)?.is_empty();
        self.end_state = if no_moves && self.checked {
            Some(GameEndState::CheckMate(self.current_player.opposite()))
        } else if no_moves {
            Some(GameEndState::StaleMate)
        } else if insufficient_material(&self.board) {
            Some(GameEndState::InsufficientMaterial)
        } else {
            None
        };
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    pub fn is_in_check(&self) -> bool {
        self.checked
    }

    pub fn end_state(&self) -> Option<GameEndState> {
        self.end_state
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.end_state, Some(GameEndState::CheckMate(_)))
    }

    pub fn is_stalemate(&self) -> bool {
        self.end_state == Some(GameEndState::StaleMate)
    }

    /** Moves `try_move` accepts right now, none once the game has ended. */
    pub fn legal_moves(&self) -> Result<Vec<Move>, ChessError> {
        if self.end_state.is_some() {
            return Ok(Vec::new());
        }
        self.board.legal_moves(self.current_player)
    }

    pub fn legal_moves_from(&self, at: Coordinate) -> Result<Vec<Move>, ChessError> {
        if self.end_state.is_some() {
            return Ok(Vec::new());
        }
        self.board.legal_moves_from(self.current_player, at)
    }

    /** Play a move of the side to move, nothing changes if it's rejected. */
    pub fn try_move(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<GameEndState>, ChessError> {
        let rejected = ChessError::IllegalMove {
            origin,
            destination,
        };
        if let Some(end_state) = self.end_state {
            warn!("Move {origin}-{destination} requested after the game ended: {end_state:?}");
            return Err(rejected);
        }
        let chosen = self
            .legal_moves_from(origin)?
            .into_iter()
            .find(|candidate| candidate.destination == destination);
        match chosen {
            Some(chosen) => self.execute(chosen),
            None => {
                warn!("{} can't play {origin}-{destination}", self.current_player);
                Err(rejected)
            }
        }
    }

    fn execute(&mut self, chosen: Move) -> Result<Option<GameEndState>, ChessError> {
        let committed = self.board.commit(chosen.origin, chosen.destination)?;
        debug!("{} played {committed}", self.current_player);
        debug_assert!(
            !matches!(self.board.is_in_check(self.current_player), Ok(true)),
            "{} left own king in check with {committed}",
            self.current_player
        );
        self.history.push(committed);
        self.current_player = self.current_player.opposite();
        self.refresh()?;
        match self.end_state {
            Some(end_state) => info!("Game finished after {} plies: {end_state:?}", self.history.len()),
            None if self.checked => debug!("{} is in check", self.current_player),
            None => (),
        }
        Ok(self.end_state)
    }

    pub fn make_random_move<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<GameEndState>, ChessError> {
        if self.end_state.is_some() {
            return Ok(self.end_state);
        }
        let moves = self.legal_moves()?;
        match moves.choose(rng) {
            Some(chosen) => self.execute(*chosen),
            None => Ok(self.end_state),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.current_board(),
            current_player: self.current_player,
            checked: self.checked,
            end_state: self.end_state,
        }
    }

    fn checked_color(&self) -> Option<Color> {
        self.checked.then_some(self.current_player)
    }
}

impl MatchInterface for Game {
    fn current_board(&self) -> Vec<Vec<Cell>> {
        ui_board(&self.board, self.checked_color())
    }

    fn cell(&self, file: usize, rank: usize) -> Option<Cell> {
        let at = Coordinate::new(u8::try_from(file).ok()?, u8::try_from(rank).ok()?)?;
        Some(ui_cell(&self.board, at, self.checked_color()))
    }

    fn possible_moves(&self, file: usize, rank: usize) -> Option<Vec<Move>> {
        let at = Coordinate::new(u8::try_from(file).ok()?, u8::try_from(rank).ok()?)?;
        if self.end_state.is_some() {
            return None;
        }
        let moves = self.legal_moves_from(at).ok()?;
        if moves.is_empty() {
            None
        } else {
            Some(moves)
        }
    }

    fn execute_move(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<GameState, ChessError> {
        Ok(match self.try_move(origin, destination)? {
            Some(end_state) => GameState::Finished(end_state),
            None => GameState::PlayerMove(self.current_player),
        })
    }

    fn current_player(&self) -> Color {
        self.current_player
    }

    fn checked(&self) -> bool {
        self.checked
    }

    fn game_ended(&self) -> bool {
        self.end_state.is_some()
    }
}
