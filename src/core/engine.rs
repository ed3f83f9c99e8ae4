use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::core::error::ChessError;
use crate::core::legality::LegalMoveChecker;
use crate::core::movegen;
use crate::core::utils::{Coordinate, BOARD_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        if self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /** Rank step of pawns of this color */
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }

    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => BOARD_SIZE - 2,
        }
    }

    pub fn promotion_rank(self) -> u8 {
        self.opposite().home_rank()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(if self == &Self::White {
            "White"
        } else {
            "Black"
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub fn symbol(self, color: Color) -> char {
        let symbol = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        }
    }

    pub fn is_minor(self) -> bool {
        matches!(self, PieceType::Knight | PieceType::Bishop)
    }
}

/** Stable index of a piece inside the board arena */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u16);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Piece {
    id: PieceId,
    kind: PieceType,
    color: Color,
    position: Coordinate,
    /** Only ever set for unmoved kings and rooks */
    can_castle: bool,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn can_castle(&self) -> bool {
        self.can_castle
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Regular,
    DoublePush,
    EnPassant,
    Castle,
    Promotion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(origin: Coordinate, destination: Coordinate, kind: MoveKind) -> Move {
        Move {
            origin,
            destination,
            kind,
        }
    }

    pub fn is_castle(&self) -> bool {
        self.kind == MoveKind::Castle
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        match self.kind {
            MoveKind::Castle => write!(f, " (castle)"),
            MoveKind::EnPassant => write!(f, " (e.p.)"),
            MoveKind::Promotion => write!(f, "=Q"),
            MoveKind::Regular | MoveKind::DoublePush => Ok(()),
        }
    }
}

/** Squares touched by one castling */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Castle {
    pub king_origin: Coordinate,
    pub king_destination: Coordinate,
    pub rook_origin: Coordinate,
    pub rook_destination: Coordinate,
}

/** Landing square of an en passant capture and the pawn it removes */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnPassant {
    pub square: Coordinate,
    pub victim: Coordinate,
}

/** Inverse record of `Board::simulate` */
#[must_use = "simulated move must be undone"]
#[derive(Debug)]
pub struct Probe {
    origin: Coordinate,
    destination: Coordinate,
    captured: Option<(Coordinate, PieceId)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Space {
    coordinate: Coordinate,
    occupant: Option<PieceId>,
}

impl Space {
    fn new(coordinate: Coordinate) -> Space {
        Space {
            coordinate,
            occupant: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/** Pieces of the standard setup in order of creation */
const STANDARD_SETUP: [(PieceType, usize); 6] = [
    (PieceType::Pawn, 16),
    (PieceType::King, 2),
    (PieceType::Queen, 2),
    (PieceType::Knight, 4),
    (PieceType::Rook, 4),
    (PieceType::Bishop, 4),
];

/** Starting squares of a kind, white ones first */
fn spawn_slots(kind: PieceType) -> impl Iterator<Item = (Coordinate, Color)> {
    let files: &'static [u8] = match kind {
        PieceType::Pawn => &[0, 1, 2, 3, 4, 5, 6, 7],
        PieceType::Knight => &[1, 6],
        PieceType::Bishop => &[2, 5],
        PieceType::Rook => &[0, 7],
        PieceType::Queen => &[3],
        PieceType::King => &[4],
    };
    [Color::White, Color::Black].into_iter().flat_map(move |color| {
        let rank = if kind == PieceType::Pawn {
            color.pawn_rank()
        } else {
            color.home_rank()
        };
        files
            .iter()
            .map(move |&file| (Coordinate::at(file, rank), color))
    })
}

fn is_castle_home(kind: PieceType, color: Color, at: Coordinate) -> bool {
    at.y() == color.home_rank()
        && match kind {
            PieceType::King => at.x() == 4,
            PieceType::Rook => at.x() == 0 || at.x() == BOARD_SIZE - 1,
            _ => false,
        }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    spaces: [[Space; 8]; 8],
    pieces: Vec<Option<Piece>>,
    rosters: [BTreeSet<PieceId>; 2],
    last_move: Option<Move>,
}

impl Board {
    pub fn empty() -> Board {
        Board {
            spaces: std::array::from_fn(|x| {
                std::array::from_fn(|y| Space::new(Coordinate::at(x as u8, y as u8)))
            }),
            pieces: Vec::with_capacity(32),
            rosters: [BTreeSet::new(), BTreeSet::new()],
            last_move: None,
        }
    }

    /** Board with the standard starting position. */
    pub fn standard() -> Result<Board, ChessError> {
        let mut board = Board::empty();
        for (kind, count) in STANDARD_SETUP {
            for _ in 0..count {
                board.spawn(kind)?;
            }
        }
        Ok(board)
    }

    /** Put a piece of `kind` on its first free starting square. */
    pub fn spawn(&mut self, kind: PieceType) -> Result<PieceId, ChessError> {
        let (at, color) = spawn_slots(kind)
            .find(|(at, _)| !self.space(*at).is_occupied())
            .ok_or(ChessError::Configuration { kind, color: None })?;
        self.check_free(kind, color, at)?;
        Ok(self.insert(kind, color, at, is_castle_home(kind, color, at)))
    }

    /** Put a piece on an arbitrary empty square. */
    pub fn place(
        &mut self,
        kind: PieceType,
        color: Color,
        at: Coordinate,
    ) -> Result<PieceId, ChessError> {
        self.check_free(kind, color, at)?;
        Ok(self.insert(kind, color, at, is_castle_home(kind, color, at)))
    }

    /** Square must be empty, and a color never gets a second king. */
    fn check_free(&self, kind: PieceType, color: Color, at: Coordinate) -> Result<(), ChessError> {
        let second_king = kind == PieceType::King
            && self.pieces(color).any(|piece| piece.kind == PieceType::King);
        if self.space(at).is_occupied() || second_king {
            return Err(ChessError::Configuration {
                kind,
                color: Some(color),
            });
        }
        Ok(())
    }

    fn insert(&mut self, kind: PieceType, color: Color, at: Coordinate, can_castle: bool) -> PieceId {
        let id = PieceId(self.pieces.len() as u16);
        self.pieces.push(Some(Piece {
            id,
            kind,
            color,
            position: at,
            can_castle,
        }));
        self.rosters[color.index()].insert(id);
        self.put(at, Some(id));
        id
    }

    #[inline]
    pub fn space(&self, at: Coordinate) -> &Space {
        &self.spaces[at.x() as usize][at.y() as usize]
    }

    #[inline]
    fn space_mut(&mut self, at: Coordinate) -> &mut Space {
        &mut self.spaces[at.x() as usize][at.y() as usize]
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn piece_at(&self, at: Coordinate) -> Option<&Piece> {
        self.space(at).occupant.and_then(|id| self.piece(id))
    }

    /** Live pieces of one color which currently stand on the board */
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.rosters[color.index()]
            .iter()
            .filter_map(|id| self.piece(*id))
            .filter(|piece| self.space(piece.position).occupant == Some(piece.id))
    }

    pub fn roster(&self, color: Color) -> &BTreeSet<PieceId> {
        &self.rosters[color.index()]
    }

    pub fn king(&self, color: Color) -> Result<&Piece, ChessError> {
        self.pieces(color)
            .find(|piece| piece.kind == PieceType::King)
            .ok_or_else(|| ChessError::InvariantViolation(format!("No {color} king on board")))
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /** Capture available right after a pawn double push, valid for one ply. */
    pub fn en_passant_target(&self) -> Option<EnPassant> {
        let last = self.last_move.filter(|m| m.kind == MoveKind::DoublePush)?;
        let pawn = self.piece_at(last.destination)?;
        if pawn.kind != PieceType::Pawn {
            return None;
        }
        let square = Coordinate::new(
            last.destination.x(),
            (last.origin.y() + last.destination.y()) / 2,
        )?;
        Some(EnPassant {
            square,
            victim: last.destination,
        })
    }

    pub fn is_attacked(&self, at: Coordinate, by: Color) -> bool {
        self.pieces(by).any(|piece| movegen::covers(self, piece, at))
    }

    pub fn is_in_check(&self, color: Color) -> Result<bool, ChessError> {
        let king = self.king(color)?;
        Ok(self.is_attacked(king.position, color.opposite()))
    }

    pub fn castle_options(&self, color: Color) -> Result<Vec<Castle>, ChessError> {
        Ok(movegen::castle_options(self, self.king(color)?))
    }

    /** Candidates of every piece of `color`, king safety ignored. */
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        movegen::pseudo_legal_moves(self, color)
    }

    pub fn legal_moves(&self, color: Color) -> Result<Vec<Move>, ChessError> {
        let candidates = self.pseudo_legal_moves(color);
        self.filter_legal(color, candidates)
    }

    pub fn legal_moves_from(&self, color: Color, at: Coordinate) -> Result<Vec<Move>, ChessError> {
        match self.piece_at(at) {
            Some(piece) if piece.color == color => {
                let candidates = movegen::pseudo_legal_moves_from(self, piece);
                self.filter_legal(color, candidates)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn filter_legal(&self, color: Color, candidates: Vec<Move>) -> Result<Vec<Move>, ChessError> {
        // probing happens on a scratch copy, so queries stay `&self`
        let mut scratch = self.clone();
        let mut legal = LegalMoveChecker::new(&mut scratch, color)?.filter(candidates)?;
        let mut seen = HashSet::with_capacity(legal.len());
        legal.retain(|candidate| seen.insert(*candidate));
        Ok(legal)
    }

    /** Move occupant of `from` onto `to`, returns whoever stood on `to`. */
    fn relocate(&mut self, from: Coordinate, to: Coordinate) -> Option<PieceId> {
        let moving = self.space_mut(from).occupant.take();
        self.put(to, moving)
    }

    /** The only place where a space and its occupant's position change. */
    fn put(&mut self, at: Coordinate, occupant: Option<PieceId>) -> Option<PieceId> {
        let displaced = std::mem::replace(&mut self.space_mut(at).occupant, occupant);
        if let Some(piece) = occupant.and_then(|id| self.piece_mut(id)) {
            piece.position = at;
        }
        displaced
    }

    fn destroy(&mut self, id: PieceId) {
        if let Some(piece) = self.pieces[id.0 as usize].take() {
            self.rosters[piece.color.index()].remove(&id);
            trace!("{} {:?} removed from {}", piece.color, piece.kind, piece.position);
        }
    }

    fn promote(&mut self, at: Coordinate) {
        let Some(pawn) = self.piece_at(at).copied() else {
            return;
        };
        self.destroy(pawn.id);
        self.space_mut(at).occupant = None;
        let queen = self.insert(PieceType::Queen, pawn.color, at, false);
        trace!("{} pawn promoted on {at}, new queen {queen:?}", pawn.color);
    }

    fn classify(&self, mover: &Piece, destination: Coordinate) -> (MoveKind, Option<Castle>) {
        match mover.kind {
            PieceType::King => {
                let castle = movegen::castle_options(self, mover)
                    .into_iter()
                    .find(|castle| castle.king_destination == destination);
                match castle {
                    Some(_) => (MoveKind::Castle, castle),
                    None => (MoveKind::Regular, None),
                }
            }
            PieceType::Pawn => {
                let kind = if destination.y() == mover.color.promotion_rank() {
                    MoveKind::Promotion
                } else if mover.position.y().abs_diff(destination.y()) == 2 {
                    MoveKind::DoublePush
                } else if self
                    .en_passant_target()
                    .is_some_and(|ep| ep.square == destination && !self.space(destination).is_occupied())
                {
                    MoveKind::EnPassant
                } else {
                    MoveKind::Regular
                };
                (kind, None)
            }
            _ => (MoveKind::Regular, None),
        }
    }

    /** Execute ***legal*** move with all of its side effects. */
    pub fn commit(&mut self, origin: Coordinate, destination: Coordinate) -> Result<Move, ChessError> {
        let mover = *self
            .piece_at(origin)
            .ok_or_else(|| ChessError::InvariantViolation(format!("No piece on {origin}")))?;
        if let Some(target) = self.piece_at(destination) {
            if target.color == mover.color {
                return Err(ChessError::IllegalMove {
                    origin,
                    destination,
                });
            }
            if target.kind == PieceType::King {
                return Err(ChessError::InvariantViolation(format!(
                    "Trying to capture {} king on {destination}",
                    target.color
                )));
            }
        }
        let (kind, castle) = self.classify(&mover, destination);
        let en_passant = self.en_passant_target();

        if let Some(captured) = self.relocate(origin, destination) {
            self.destroy(captured);
        }
        match kind {
            MoveKind::Castle => {
                if let Some(castle) = castle {
                    self.relocate(castle.rook_origin, castle.rook_destination);
                    if let Some(rook) = self.space(castle.rook_destination).occupant {
                        if let Some(rook) = self.piece_mut(rook) {
                            rook.can_castle = false;
                        }
                    }
                }
            }
            MoveKind::EnPassant => {
                if let Some(victim) = en_passant.and_then(|ep| self.put(ep.victim, None)) {
                    self.destroy(victim);
                }
            }
            MoveKind::Promotion => self.promote(destination),
            MoveKind::Regular | MoveKind::DoublePush => (),
        }
        if matches!(mover.kind, PieceType::King | PieceType::Rook) {
            if let Some(piece) = self.piece_mut(mover.id) {
                piece.can_castle = false;
            }
        }

        let committed = Move::new(origin, destination, kind);
        self.last_move = Some(committed);
        trace!("Committed {} {:?} {committed}", mover.color, mover.kind);
        Ok(committed)
    }

    /** Relocate a piece for legality probing only, no rights or rosters are touched. */
    pub fn simulate(&mut self, candidate: Move) -> Probe {
        let lifted = match candidate.kind {
            MoveKind::EnPassant => self
                .en_passant_target()
                .filter(|ep| ep.square == candidate.destination)
                .and_then(|ep| self.put(ep.victim, None).map(|id| (ep.victim, id))),
            _ => None,
        };
        let displaced = self
            .relocate(candidate.origin, candidate.destination)
            .map(|id| (candidate.destination, id));
        Probe {
            origin: candidate.origin,
            destination: candidate.destination,
            captured: lifted.or(displaced),
        }
    }

    pub fn undo(&mut self, probe: Probe) {
        self.relocate(probe.destination, probe.origin);
        if let Some((at, id)) = probe.captured {
            self.put(at, Some(id));
        }
    }

    pub fn iter_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        Coordinate::all().filter_map(|at| self.piece_at(at))
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE {
                let symbol = self
                    .piece_at(Coordinate::at(file, rank))
                    .map(|piece| piece.kind.symbol(piece.color))
                    .unwrap_or('.');
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
