use super::base::{Move, MoveKind};
use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::castling;
use crate::geometry;
use crate::types::{CastlingSide, Cell, Color, Coord, Piece};

fn update_castling(b: &mut Position, change: Bitboard) {
    if (change & castling::ALL_SRCS).is_empty() {
        return;
    }

    let mut castling = b.r.castling;
    for (c, s) in [
        (Color::White, CastlingSide::Queen),
        (Color::White, CastlingSide::King),
        (Color::Black, CastlingSide::Queen),
        (Color::Black, CastlingSide::King),
    ] {
        if (change & castling::srcs(c, s)).is_nonempty() {
            castling.unset(c, s);
        }
    }
    b.r.castling = castling;
}

fn do_apply(b: &mut Position, mv: Move) {
    let side = b.r.side;
    let kind = MoveKind::classify(b, mv);
    let src_cell = b.get(mv.src());
    let is_capture = b.get(mv.dst()).is_occupied() || kind == MoveKind::Enpassant;
    let fwd = geometry::pawn_forward_delta(side);

    b.put(mv.src(), Cell::EMPTY);
    if kind == MoveKind::Enpassant {
        if let Some(taken) = mv.dst().try_shift(0, -fwd) {
            b.put(taken, Cell::EMPTY);
        }
    }
    if let Ok(s) = CastlingSide::try_from(kind) {
        let (rook_src, rook_dst) = castling::rook_files(s);
        let rank = geometry::castling_rank(side);
        b.put(Coord::from_parts(rook_src, rank), Cell::EMPTY);
        b.put(
            Coord::from_parts(rook_dst, rank),
            Cell::from_parts(side, Piece::Rook),
        );
    }
    let placed = match kind.promote() {
        Some(piece) => Cell::from_parts(side, piece),
        None => src_cell,
    };
    b.put(mv.dst(), placed);

    update_castling(
        b,
        Bitboard::from_coord(mv.src()) | Bitboard::from_coord(mv.dst()),
    );
    b.r.ep_target = match kind {
        MoveKind::PawnDouble => mv.src().try_shift(0, fwd),
        _ => None,
    };
    b.r.halfmove_clock = if src_cell.piece() == Some(Piece::Pawn) || is_capture {
        0
    } else {
        b.r.halfmove_clock.saturating_add(1)
    };
    if side == Color::Black {
        b.r.fullmove_number = b.r.fullmove_number.saturating_add(1);
    }
    b.r.side = side.inv();
}

/// Applies the move `mv` to the position `p` and returns the resulting position
///
/// The move must be legal in `p`, otherwise the resulting position is unspecified (though no
/// memory unsafety happens). Use [`Position::make_move()`] to validate the move first.
///
/// Besides moving the piece, the function removes the pawn captured en passant, relocates the
/// rook on castling, replaces the promoted pawn, and updates castling rights, the en passant
/// target and the move counters.
pub fn apply(p: &Position, mv: Move) -> Position {
    let mut res = p.clone();
    do_apply(&mut res, mv);
    res
}
