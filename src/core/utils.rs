use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ChessError;

pub const BOARD_SIZE: u8 = 8;

/** Square of the board, `x` is a file (0 -- a), `y` is a rank (0 -- rank 1) */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: u8,
    y: u8,
}

impl Coordinate {
    pub fn new(x: u8, y: u8) -> Option<Coordinate> {
        if is_valid_coord(x as i8, y as i8) {
            Some(Coordinate { x, y })
        } else {
            None
        }
    }

    /** Compile-time constructor for tables, panics on out of board squares. */
    pub(crate) const fn at(x: u8, y: u8) -> Coordinate {
        assert!(x < BOARD_SIZE && y < BOARD_SIZE, "Square is out of board!");
        Coordinate { x, y }
    }

    #[inline]
    pub fn x(&self) -> u8 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn offset(&self, dx: i8, dy: i8) -> Option<Coordinate> {
        let (x, y) = (self.x as i8 + dx, self.y as i8 + dy);
        if is_valid_coord(x, y) {
            Some(Coordinate {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    /** Iterate over all 64 squares, rank by rank starting from a1. */
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Coordinate { x, y }))
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(pos_to_str(*self))
    }
}

impl FromStr for Coordinate {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => Ok(Coordinate {
                x: file as u8 - b'a',
                y: rank as u8 - b'1',
            }),
            _ => Err(ChessError::InvalidSquare(s.to_string())),
        }
    }
}

pub struct DirectionIterator {
    position: Coordinate,
    direction: (i8, i8),
}

impl Iterator for DirectionIterator {
    type Item = Coordinate;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (dx, dy) = self.direction;
        self.position = self.position.offset(dx, dy)?;
        Some(self.position)
    }
}

/** Squares from `position` (exclusive) to the board edge. */
pub fn in_direction(position: Coordinate, direction: (i8, i8)) -> DirectionIterator {
    DirectionIterator {
        position,
        direction,
    }
}

#[derive(Debug)]
pub struct BetweenIterator {
    current: Coordinate,
    target: Coordinate,
    step: (i8, i8),
}

impl Iterator for BetweenIterator {
    type Item = Coordinate;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (dx, dy) = self.step;
        self.current = self.current.offset(dx, dy)?;
        if self.current == self.target {
            None
        } else {
            Some(self.current)
        }
    }
}

/** Squares strictly between two squares on one line, `None` if they don't share one. */
pub fn between(from: Coordinate, to: Coordinate) -> Option<BetweenIterator> {
    if from == to || !(is_in_straight_line(from, to) || is_in_diagonal_line(from, to)) {
        return None;
    }
    let step = (
        (to.x as i8 - from.x as i8).signum(),
        (to.y as i8 - from.y as i8).signum(),
    );
    Some(BetweenIterator {
        current: from,
        target: to,
        step,
    })
}

pub fn is_in_straight_line(a: Coordinate, b: Coordinate) -> bool {
    a.x == b.x || a.y == b.y
}

pub fn is_in_diagonal_line(a: Coordinate, b: Coordinate) -> bool {
    a.x.abs_diff(b.x) == a.y.abs_diff(b.y)
}

#[inline]
pub fn is_valid_coord(x: i8, y: i8) -> bool {
    (0..BOARD_SIZE as i8).contains(&x) && (0..BOARD_SIZE as i8).contains(&y)
}

#[rustfmt::skip]
const POS_TO_STRING: [&str; 64] = [
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2",
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3",
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5",
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6",
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7",
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8",
];

pub fn pos_to_str(pos: Coordinate) -> &'static str {
    POS_TO_STRING[(pos.y * BOARD_SIZE + pos.x) as usize]
}
