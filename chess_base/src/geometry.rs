use crate::types::{Color, Rank};

/// Rank where the king and the rooks of color `c` start and castle
pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Rank from which pawns of color `c` may make a double move
pub const fn double_move_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Rank where pawns of color `c` get promoted
pub const fn promote_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank of the en passant target square when `c` is the side to move
///
/// The target is the square passed over by the opponent's pawn, so it lies on the 6th rank
/// when White is to move and on the 3rd rank when Black is to move.
pub const fn enpassant_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Rank index delta for a pawn of color `c` moving one square forward
///
/// Ranks are indexed from [`Rank::R8`], so White pawns move towards smaller indices.
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}
