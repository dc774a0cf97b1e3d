use crate::bitboard::Bitboard;
use crate::types::{CastlingSide, Color, Coord, File};
use crate::geometry;

const fn back_rank(c: Color, x: u64) -> Bitboard {
    Bitboard::from_raw(match c {
        Color::White => x << 56,
        Color::Black => x,
    })
}

/// Squares between the king and the rook, which must be empty to castle
#[inline]
pub const fn pass(c: Color, s: CastlingSide) -> Bitboard {
    back_rank(
        c,
        match s {
            CastlingSide::King => 0x60,
            CastlingSide::Queen => 0x0e,
        },
    )
}

/// Initial squares of the king and the rook; castling is lost once any of them changes
#[inline]
pub const fn srcs(c: Color, s: CastlingSide) -> Bitboard {
    back_rank(
        c,
        match s {
            CastlingSide::King => 0x90,
            CastlingSide::Queen => 0x11,
        },
    )
}

pub const ALL_SRCS: Bitboard = Bitboard::from_raw(0x91 | (0x91 << 56));

/// Files of the rook before and after castling
#[inline]
pub const fn rook_files(s: CastlingSide) -> (File, File) {
    match s {
        CastlingSide::King => (File::H, File::F),
        CastlingSide::Queen => (File::A, File::D),
    }
}

/// File of the king after castling
#[inline]
pub const fn king_dst_file(s: CastlingSide) -> File {
    match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    }
}

#[inline]
pub const fn king_src(c: Color) -> Coord {
    Coord::from_parts(File::E, geometry::castling_rank(c))
}
