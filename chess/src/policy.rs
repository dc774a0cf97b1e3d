//! Policies choosing the automatic reply move
//!
//! After a move is accepted, [`MoveService`](crate::MoveService) asks its policy for a reply
//! for the opponent. The policy sees only the resulting position and must return one of its
//! legal moves, or `None` to skip the reply.

use crate::board::Position;
use crate::moves::{self, Move};
use crate::types::{Color, Piece};

use log::trace;
use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Strategy to choose a reply move
pub trait ReplyPolicy {
    /// Chooses a legal move for the side to move in `position`
    ///
    /// Returns `None` if no reply must be made.
    fn choose(&self, position: &Position) -> Option<Move>;
}

impl<T: ReplyPolicy + ?Sized> ReplyPolicy for &T {
    fn choose(&self, position: &Position) -> Option<Move> {
        (**self).choose(position)
    }
}

impl<T: ReplyPolicy + ?Sized> ReplyPolicy for Box<T> {
    fn choose(&self, position: &Position) -> Option<Move> {
        (**self).choose(position)
    }
}

/// Never replies
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct NoReply;

impl ReplyPolicy for NoReply {
    fn choose(&self, _position: &Position) -> Option<Move> {
        None
    }
}

/// Replies with the first legal move in generation order
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FirstLegal;

impl ReplyPolicy for FirstLegal {
    fn choose(&self, position: &Position) -> Option<Move> {
        position.legal_moves().first().copied()
    }
}

/// Replies with a random legal move
///
/// The choice depends only on the seed and the position, so the same position always gets
/// the same reply from the same policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RandomReply {
    seed: u64,
}

impl RandomReply {
    #[inline]
    pub fn new(seed: u64) -> RandomReply {
        RandomReply { seed }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ReplyPolicy for RandomReply {
    fn choose(&self, position: &Position) -> Option<Move> {
        let moves = position.legal_moves();
        if moves.is_empty() {
            return None;
        }
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed ^ position_key(position));
        let idx = (rng.next_u64() % moves.len() as u64) as usize;
        Some(moves[idx])
    }
}

/// FNV-1a hash of the canonical FEN, stable across builds and platforms
fn position_key(position: &Position) -> u64 {
    position
        .as_fen()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        })
}

const MATE_SCORE: i32 = 1_000_000;

fn piece_value(p: Piece) -> i32 {
    match p {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// Material balance from the point of view of the side to move
fn material(p: &Position) -> i32 {
    let mut score = 0;
    for piece in [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ] {
        let diff = p.piece2(Color::White, piece).len() as i32
            - p.piece2(Color::Black, piece).len() as i32;
        score += diff * piece_value(piece);
    }
    match p.side() {
        Color::White => score,
        Color::Black => -score,
    }
}

/// Replies with the best move found by a fixed-depth alpha-beta search over material
///
/// Mates are preferred over any material gain, and faster mates are preferred over slower
/// ones. Stalemate is scored as a draw. Among equally scored moves, the first one in
/// generation order wins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchReply {
    depth: u32,
}

impl Default for SearchReply {
    fn default() -> SearchReply {
        SearchReply { depth: 2 }
    }
}

impl SearchReply {
    /// Creates the policy searching `depth` plies deep
    ///
    /// Depth less than one is treated as one.
    #[inline]
    pub fn new(depth: u32) -> SearchReply {
        SearchReply {
            depth: depth.max(1),
        }
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

struct Search {
    nodes: u64,
}

impl Search {
    fn negamax(&mut self, p: &Position, depth: u32, ply: i32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        let moves = p.legal_moves();
        if moves.is_empty() {
            return if p.is_check() { -(MATE_SCORE - ply) } else { 0 };
        }
        if depth == 0 {
            return material(p);
        }
        for &mv in &moves {
            let score = -self.negamax(&moves::apply(p, mv), depth - 1, ply + 1, -beta, -alpha);
            if score > alpha {
                alpha = score;
                if alpha >= beta {
                    break;
                }
            }
        }
        alpha
    }
}

impl ReplyPolicy for SearchReply {
    fn choose(&self, position: &Position) -> Option<Move> {
        let mut search = Search { nodes: 0 };
        let mut best: Option<(Move, i32)> = None;
        for &mv in &position.legal_moves() {
            let alpha = best.map_or(-MATE_SCORE - 1, |(_, score)| score);
            let score = -search.negamax(
                &moves::apply(position, mv),
                self.depth - 1,
                1,
                -MATE_SCORE - 1,
                -alpha,
            );
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
        }
        if let Some((mv, score)) = best {
            trace!(
                "search: depth {}, nodes {}, best {} with score {}",
                self.depth,
                search.nodes,
                mv,
                score
            );
        }
        best.map(|(mv, _)| mv)
    }
}
