//! Attack sets of individual pieces
//!
//! Attacks are computed by walking the board square by square, so no precomputed tables
//! are needed.

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{Color, Coord};

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

const DIAG_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const LINE_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn leaper(coord: Coord, deltas: &[(isize, isize)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(df, dr)| coord.try_shift(df, dr))
        .collect()
}

fn slider(coord: Coord, dirs: &[(isize, isize)], occupied: Bitboard) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    for &(df, dr) in dirs {
        let mut cur = coord;
        while let Some(next) = cur.try_shift(df, dr) {
            res.set(next);
            if occupied.has(next) {
                break;
            }
            cur = next;
        }
    }
    res
}

#[inline]
pub fn king(coord: Coord) -> Bitboard {
    leaper(coord, &KING_DELTAS)
}

#[inline]
pub fn knight(coord: Coord) -> Bitboard {
    leaper(coord, &KNIGHT_DELTAS)
}

/// Squares attacked by a pawn of color `color` standing on `coord`
#[inline]
pub fn pawn(color: Color, coord: Coord) -> Bitboard {
    let fwd = geometry::pawn_forward_delta(color);
    leaper(coord, &[(-1, fwd), (1, fwd)])
}

/// Squares attacked by a rook on `coord`
///
/// Each ray stops at the first occupied square, which is included into the result.
#[inline]
pub fn rook(coord: Coord, occupied: Bitboard) -> Bitboard {
    slider(coord, &LINE_DIRS, occupied)
}

/// Squares attacked by a bishop on `coord`
///
/// Each ray stops at the first occupied square, which is included into the result.
#[inline]
pub fn bishop(coord: Coord, occupied: Bitboard) -> Bitboard {
    slider(coord, &DIAG_DIRS, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    fn sq(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn squares(s: &[&str]) -> Bitboard {
        s.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn test_leapers() {
        assert_eq!(knight(sq("a1")), squares(&["b3", "c2"]));
        assert_eq!(knight(sq("e4")).len(), 8);
        assert_eq!(king(sq("h8")), squares(&["g8", "g7", "h7"]));
        assert_eq!(king(sq("d4")).len(), 8);
    }

    #[test]
    fn test_pawns() {
        assert_eq!(pawn(Color::White, sq("e4")), squares(&["d5", "f5"]));
        assert_eq!(pawn(Color::Black, sq("e4")), squares(&["d3", "f3"]));
        assert_eq!(pawn(Color::White, sq("a2")), squares(&["b3"]));
        assert_eq!(pawn(Color::Black, sq("h7")), squares(&["g6"]));
    }

    #[test]
    fn test_sliders() {
        let occupied = squares(&["d6", "f4", "b2"]);
        assert_eq!(
            rook(sq("d4"), occupied),
            squares(&["d5", "d6", "e4", "f4", "c4", "b4", "a4", "d3", "d2", "d1"])
        );
        assert_eq!(
            bishop(sq("d4"), occupied),
            squares(&["e5", "f6", "g7", "h8", "c5", "b6", "a7", "e3", "f2", "g1", "c3", "b2"])
        );
        assert_eq!(
            rook(Coord::from_parts(File::A, Rank::R1), Bitboard::EMPTY).len(),
            14
        );
    }
}
