//! Move generation and attack detection

use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::moves::{self, Move, PromotePiece};
use crate::types::{CastlingSide, Color, Coord, Piece};
use crate::{attack, castling, geometry};

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

fn diag_pieces(b: &Position, c: Color) -> Bitboard {
    b.piece2(c, Piece::Bishop) | b.piece2(c, Piece::Queen)
}

fn line_pieces(b: &Position, c: Color) -> Bitboard {
    b.piece2(c, Piece::Rook) | b.piece2(c, Piece::Queen)
}

/// Returns all the pieces of color `color` which attack the square `coord`
pub fn cell_attackers(b: &Position, coord: Coord, color: Color) -> Bitboard {
    // Pawn attacks are traced back from the target, so the opposite color is used
    let pawn_attacks = attack::pawn(color.inv(), coord);
    let occupied = b.occupied();
    (b.piece2(color, Piece::Pawn) & pawn_attacks)
        | (b.piece2(color, Piece::King) & attack::king(coord))
        | (b.piece2(color, Piece::Knight) & attack::knight(coord))
        | (attack::bishop(coord, occupied) & diag_pieces(b, color))
        | (attack::rook(coord, occupied) & line_pieces(b, color))
}

/// Returns `true` if the square `coord` is attacked by any piece of color `color`
pub fn is_cell_attacked(b: &Position, coord: Coord, color: Color) -> bool {
    let pawn_attacks = attack::pawn(color.inv(), coord);
    if (b.piece2(color, Piece::Pawn) & pawn_attacks).is_nonempty()
        || (b.piece2(color, Piece::King) & attack::king(coord)).is_nonempty()
        || (b.piece2(color, Piece::Knight) & attack::knight(coord)).is_nonempty()
    {
        return true;
    }
    let occupied = b.occupied();
    (attack::bishop(coord, occupied) & diag_pieces(b, color)).is_nonempty()
        || (attack::rook(coord, occupied) & line_pieces(b, color)).is_nonempty()
}

trait MaybeMovePush {
    type Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err>;
}

/// List of moves
///
/// Positions are validated to hold no more pieces than a real game can have, so there are at
/// most 218 legal moves, and the list never allocates.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

/// Sink for the generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl<T: MovePush> MaybeMovePush for T {
    type Err = Infallible;

    fn push(&mut self, m: Move) -> Result<(), Self::Err> {
        <Self as MovePush>::push(self, m);
        Ok(())
    }
}

/// Passes through only the moves which don't leave the own king attacked
struct LegalFilter<'a, P> {
    board: &'a Position,
    inner: &'a mut P,
}

impl<'a, P: MaybeMovePush> MaybeMovePush for LegalFilter<'a, P> {
    type Err = P::Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err> {
        let next = moves::apply(self.board, mv);
        match next.is_opponent_king_attacked() {
            false => self.inner.push(mv),
            true => Ok(()),
        }
    }
}

struct MoveGen<'a, P> {
    board: &'a Position,
    side: Color,
    dst: &'a mut P,
}

impl<'a, P: MaybeMovePush> MoveGen<'a, P> {
    fn new(board: &'a Position, dst: &'a mut P) -> Self {
        MoveGen {
            board,
            side: board.side(),
            dst,
        }
    }

    fn add_move(&mut self, src: Coord, dst: Coord) -> Result<(), P::Err> {
        self.dst.push(Move::new(src, dst, None))
    }

    fn add_pawn_move(&mut self, src: Coord, dst: Coord) -> Result<(), P::Err> {
        if dst.rank() == geometry::promote_dst_rank(self.side) {
            for p in PromotePiece::ALL {
                self.dst.push(Move::new(src, dst, Some(p)))?;
            }
            return Ok(());
        }
        self.add_move(src, dst)
    }

    fn gen_pawns(&mut self) -> Result<(), P::Err> {
        let b = self.board;
        let fwd = geometry::pawn_forward_delta(self.side);
        let enemies = b.color(self.side.inv());
        let occupied = b.occupied();
        for src in b.piece2(self.side, Piece::Pawn) {
            if let Some(dst) = src.try_shift(0, fwd) {
                if !occupied.has(dst) {
                    self.add_pawn_move(src, dst)?;
                    if src.rank() == geometry::double_move_src_rank(self.side) {
                        if let Some(dst2) = dst.try_shift(0, fwd) {
                            if !occupied.has(dst2) {
                                self.add_move(src, dst2)?;
                            }
                        }
                    }
                }
            }
            for dst in attack::pawn(self.side, src) {
                if enemies.has(dst) {
                    self.add_pawn_move(src, dst)?;
                } else if Some(dst) == b.ep_target() && self.is_enpassant_victim(dst) {
                    self.add_move(src, dst)?;
                }
            }
        }
        Ok(())
    }

    fn is_enpassant_victim(&self, target: Coord) -> bool {
        let fwd = geometry::pawn_forward_delta(self.side);
        target
            .try_shift(0, -fwd)
            .map_or(false, |c| self.board.get(c).is(self.side.inv(), Piece::Pawn))
    }

    fn gen_pieces(&mut self) -> Result<(), P::Err> {
        let b = self.board;
        let own = b.color(self.side);
        let occupied = b.occupied();
        for piece in [
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ] {
            for src in b.piece2(self.side, piece) {
                let targets = match piece {
                    Piece::Knight => attack::knight(src),
                    Piece::Bishop => attack::bishop(src, occupied),
                    Piece::Rook => attack::rook(src, occupied),
                    Piece::Queen => attack::bishop(src, occupied) | attack::rook(src, occupied),
                    _ => attack::king(src),
                };
                for dst in targets & !own {
                    self.add_move(src, dst)?;
                }
            }
        }
        Ok(())
    }

    fn gen_castling(&mut self) -> Result<(), P::Err> {
        let b = self.board;
        let king = castling::king_src(self.side);
        if !b.get(king).is(self.side, Piece::King) {
            return Ok(());
        }
        let rank = king.rank();
        let enemy = self.side.inv();
        for s in [CastlingSide::King, CastlingSide::Queen] {
            if !b.castling().has(self.side, s) {
                continue;
            }
            let (rook_file, transit_file) = castling::rook_files(s);
            if !b.get2(rook_file, rank).is(self.side, Piece::Rook) {
                continue;
            }
            if (castling::pass(self.side, s) & b.occupied()).is_nonempty() {
                continue;
            }
            let dst = Coord::from_parts(castling::king_dst_file(s), rank);
            let path = [king, Coord::from_parts(transit_file, rank), dst];
            if path.iter().any(|&c| is_cell_attacked(b, c, enemy)) {
                continue;
            }
            self.add_move(king, dst)?;
        }
        Ok(())
    }

    fn gen_all(&mut self) -> Result<(), P::Err> {
        self.gen_pawns()?;
        self.gen_pieces()?;
        self.gen_castling()
    }
}

/// Generation of pseudo-legal moves, which may leave the own king attacked
pub mod semilegal {
    use super::{MoveGen, MoveList, MovePush};
    use crate::board::Position;

    /// Generates all the pseudo-legal moves into `dst`
    pub fn gen_all_into<P: MovePush>(b: &Position, dst: &mut P) {
        let _ = MoveGen::new(b, dst).gen_all();
    }

    /// Generates all the pseudo-legal moves
    pub fn gen_all(b: &Position) -> MoveList {
        let mut res = MoveList::new();
        gen_all_into(b, &mut res);
        res
    }
}

/// Generation of legal moves
pub mod legal {
    use super::{LegalFilter, MoveGen, MoveList, MovePush};
    use crate::board::Position;

    /// Generates all the legal moves into `dst`
    pub fn gen_all_into<P: MovePush>(b: &Position, dst: &mut P) {
        let mut filter = LegalFilter { board: b, inner: dst };
        let _ = MoveGen::new(b, &mut filter).gen_all();
    }

    /// Generates all the legal moves
    ///
    /// The moves go in a stable order: pawn moves, then piece moves (knights, bishops, rooks,
    /// queens and the king), then castling. Promotions are emitted for knight, bishop, rook
    /// and queen in this order.
    pub fn gen_all(b: &Position) -> MoveList {
        let mut res = MoveList::new();
        gen_all_into(b, &mut res);
        res
    }
}

struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

/// Returns `true` if there is at least one legal move
///
/// Stops as soon as the first legal move is found.
pub fn has_legal_moves(b: &Position) -> bool {
    let mut err_on_first = ErrOnFirst;
    let mut filter = LegalFilter {
        board: b,
        inner: &mut err_on_first,
    };
    let mut gen = MoveGen::new(b, &mut filter);
    // Castling is skipped, as it is never the only legal move
    gen.gen_pieces().is_err() || gen.gen_pawns().is_err()
}

/// Returns `true` if `mv` is legal in `b`
pub fn is_move_legal(b: &Position, mv: Move) -> bool {
    legal::gen_all(b).contains(&mv)
}
