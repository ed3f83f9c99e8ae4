use crate::core::engine::{Board, Castle, Color, Move, MoveKind, Piece, PieceType};
use crate::core::utils::{
    between, in_direction, is_in_diagonal_line, is_in_straight_line, Coordinate,
};

/** Tables directions for pieces */
const BISHOP_DIR: &[(i8, i8)] = &[(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ROOK_DIR: &[(i8, i8)] = &[(0, 1), (-1, 0), (0, -1), (1, 0)];
const QUEEN_DIR: &[(i8, i8)] = &[
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 0),
];

/** Possible moves for pieces */
const KING_MOVES: &[(i8, i8)] = QUEEN_DIR;
const KNIGHT_MOVES: &[(i8, i8)] = &[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub type Generator = fn(&Board, &Piece, &mut Vec<Move>);

pub fn generator(kind: PieceType) -> Generator {
    match kind {
        PieceType::Pawn => pawn_moves,
        PieceType::Knight => knight_moves,
        PieceType::Bishop => bishop_moves,
        PieceType::Rook => rook_moves,
        PieceType::Queen => queen_moves,
        PieceType::King => king_moves,
    }
}

pub fn pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for piece in board.pieces(color) {
        generator(piece.kind())(board, piece, &mut moves);
    }
    moves
}

pub fn pseudo_legal_moves_from(board: &Board, piece: &Piece) -> Vec<Move> {
    let mut moves = Vec::with_capacity(28);
    generator(piece.kind())(board, piece, &mut moves);
    moves
}

#[inline]
fn is_enemy(board: &Board, at: Coordinate, color: Color) -> bool {
    board.piece_at(at).is_some_and(|piece| piece.color() != color)
}

#[inline]
fn is_free_or_enemy(board: &Board, at: Coordinate, color: Color) -> bool {
    board.piece_at(at).map_or(true, |piece| piece.color() != color)
}

fn pawn_moves(board: &Board, pawn: &Piece, moves: &mut Vec<Move>) {
    let (from, color) = (pawn.position(), pawn.color());
    if from.y() == color.home_rank() || from.y() == color.promotion_rank() {
        return;
    }
    let step = color.forward();
    let tagged = |to: Coordinate, otherwise: MoveKind| {
        if to.y() == color.promotion_rank() {
            Move::new(from, to, MoveKind::Promotion)
        } else {
            Move::new(from, to, otherwise)
        }
    };
    // push
    if let Some(front) = from.offset(0, step) {
        if board.piece_at(front).is_none() {
            moves.push(tagged(front, MoveKind::Regular));
            // double push
            if from.y() == color.pawn_rank() {
                if let Some(jump) = front.offset(0, step) {
                    if board.piece_at(jump).is_none() {
                        moves.push(Move::new(from, jump, MoveKind::DoublePush));
                    }
                }
            }
        }
    }
    // capture
    for dx in [-1, 1] {
        if let Some(to) = from.offset(dx, step) {
            if is_enemy(board, to, color) {
                moves.push(tagged(to, MoveKind::Regular));
            }
        }
    }
    // enpassant
    if let Some(ep) = board.en_passant_target() {
        let adjacent = ep.victim.y() == from.y() && ep.victim.x().abs_diff(from.x()) == 1;
        if adjacent
            && is_enemy(board, ep.victim, color)
            && board.piece_at(ep.square).is_none()
            && from.offset(ep.victim.x() as i8 - from.x() as i8, step) == Some(ep.square)
        {
            moves.push(Move::new(from, ep.square, MoveKind::EnPassant));
        }
    }
}

fn knight_moves(board: &Board, knight: &Piece, moves: &mut Vec<Move>) {
    jump(board, knight, KNIGHT_MOVES, moves)
}

fn bishop_moves(board: &Board, bishop: &Piece, moves: &mut Vec<Move>) {
    slide(board, bishop, BISHOP_DIR, moves)
}

fn rook_moves(board: &Board, rook: &Piece, moves: &mut Vec<Move>) {
    slide(board, rook, ROOK_DIR, moves)
}

fn queen_moves(board: &Board, queen: &Piece, moves: &mut Vec<Move>) {
    slide(board, queen, QUEEN_DIR, moves)
}

fn king_moves(board: &Board, king: &Piece, moves: &mut Vec<Move>) {
    jump(board, king, KING_MOVES, moves);
    moves.extend(
        castle_options(board, king)
            .into_iter()
            .map(|castle| Move::new(castle.king_origin, castle.king_destination, MoveKind::Castle)),
    );
}

fn jump(board: &Board, piece: &Piece, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
    let from = piece.position();
    moves.extend(
        offsets
            .iter()
            .filter_map(|(dx, dy)| from.offset(*dx, *dy))
            .filter(|to| is_free_or_enemy(board, *to, piece.color()))
            .map(|to| Move::new(from, to, MoveKind::Regular)),
    );
}

fn slide(board: &Board, piece: &Piece, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
    let from = piece.position();
    for dir in directions {
        for to in in_direction(from, *dir) {
            match board.piece_at(to) {
                None => moves.push(Move::new(from, to, MoveKind::Regular)),
                Some(target) => {
                    if target.color() != piece.color() {
                        moves.push(Move::new(from, to, MoveKind::Regular));
                    }
                    break;
                }
            }
        }
    }
}

/** Castlings geometrically available to `king`, attacks on its path are not checked. */
pub fn castle_options(board: &Board, king: &Piece) -> Vec<Castle> {
    if king.kind() != PieceType::King || !king.can_castle() {
        return Vec::new();
    }
    let origin = king.position();
    board
        .pieces(king.color())
        .filter(|rook| {
            rook.kind() == PieceType::Rook && rook.can_castle() && rook.position().y() == origin.y()
        })
        .filter_map(|rook| {
            let mut path = between(origin, rook.position())?;
            if !path.all(|at| board.piece_at(at).is_none()) {
                return None;
            }
            let dir = (rook.position().x() as i8 - origin.x() as i8).signum();
            Some(Castle {
                king_origin: origin,
                king_destination: origin.offset(2 * dir, 0)?,
                rook_origin: rook.position(),
                rook_destination: origin.offset(dir, 0)?,
            })
        })
        .collect()
}

/** Is `target` attacked by `piece`, regardless of what stands on `target`. */
pub fn covers(board: &Board, piece: &Piece, target: Coordinate) -> bool {
    let from = piece.position();
    let clear_line = || {
        between(from, target)
            .map(|mut path| path.all(|at| board.piece_at(at).is_none()))
            .unwrap_or(false)
    };
    match piece.kind() {
        PieceType::Pawn => {
            target.y() as i8 == from.y() as i8 + piece.color().forward()
                && target.x().abs_diff(from.x()) == 1
        }
        PieceType::Knight => KNIGHT_MOVES
            .iter()
            .any(|(dx, dy)| from.offset(*dx, *dy) == Some(target)),
        PieceType::King => {
            from != target && from.x().abs_diff(target.x()) <= 1 && from.y().abs_diff(target.y()) <= 1
        }
        PieceType::Bishop => is_in_diagonal_line(from, target) && clear_line(),
        PieceType::Rook => is_in_straight_line(from, target) && clear_line(),
        PieceType::Queen => {
            (is_in_straight_line(from, target) || is_in_diagonal_line(from, target)) && clear_line()
        }
    }
}
