use std::{fmt::Display, ops::AddAssign};

use crate::core::engine::{Board, Color, MoveKind};
use crate::core::error::ChessError;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PerftResult {
    pub all: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftResult {
    pub fn combine(self, other: PerftResult) -> Self {
        PerftResult {
            all: self.all + other.all,
            captures: self.captures + other.captures,
            en_passant: self.en_passant + other.en_passant,
            castles: self.castles + other.castles,
            promotions: self.promotions + other.promotions,
            checks: self.checks + other.checks,
            checkmates: self.checkmates + other.checkmates,
        }
    }
}

impl AddAssign for PerftResult {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.combine(rhs);
    }
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - cp: {:<4} ep: {:<4} cs: {:<4} pr: {:<4} Ch: {:<4} CM: {:4}",
            self.all,
            self.captures,
            self.en_passant,
            self.castles,
            self.promotions,
            self.checks,
            self.checkmates
        )
    }
}

/** Count leaf positions `depth` plies below `board`, `color` to move. */
pub fn perft(board: &Board, color: Color, depth: usize) -> Result<PerftResult, ChessError> {
    if depth == 0 {
        return Ok(PerftResult {
            all: 1,
            ..Default::default()
        });
    }
    let mut result = PerftResult::default();
    for candidate in board.legal_moves(color)? {
        let capture = board.piece_at(candidate.destination).is_some();
        let mut next = board.clone();
        let committed = next.commit(candidate.origin, candidate.destination)?;
        if depth > 1 {
            result += perft(&next, color.opposite(), depth - 1)?;
            continue;
        }
        result.all += 1;
        match committed.kind {
            MoveKind::EnPassant => {
                result.captures += 1;
                result.en_passant += 1;
            }
            MoveKind::Castle => result.castles += 1,
            MoveKind::Promotion => result.promotions += 1,
            MoveKind::Regular | MoveKind::DoublePush => (),
        }
        if capture {
            result.captures += 1;
        }
        if next.is_in_check(color.opposite())? {
            result.checks += 1;
            if next.legal_moves(color.opposite())?.is_empty() {
                result.checkmates += 1;
            }
        }
    }
    Ok(result)
}

/** Run perft from the standard position, optionally printing per move counts. */
pub fn perf_test(depth: usize, expected: usize, detailed: bool) -> Result<bool, ChessError> {
    let board = Board::standard()?;
    if !detailed || depth == 0 {
        let result = perft(&board, Color::White, depth)?;
        println!(" details: {result}");
        return Ok(result.all == expected);
    }
    let mut total = PerftResult::default();
    for candidate in board.legal_moves(Color::White)? {
        let mut next = board.clone();
        next.commit(candidate.origin, candidate.destination)?;
        let result = perft(&next, Color::Black, depth - 1)?;
        println!(" {candidate} : {result}");
        total += result;
    }
    println!("+ total: {total}");
    Ok(total.all == expected)
}
