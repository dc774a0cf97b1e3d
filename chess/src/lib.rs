//! Chess rules engine which validates moves against positions given as FEN
//!
//! The crate parses a position from FEN, checks a move in coordinate notation against the
//! full set of legal moves, applies it and evaluates the resulting game status. Positions are
//! immutable values: applying a move yields a new position.
//!
//! The main entry point is [`MoveService`], which does all of the above in one call and may
//! also make a reply move for the opponent using a [`ReplyPolicy`](policy::ReplyPolicy).
//!
//! # Example
//!
//! ```
//! use chessmove::{Move, Position, Status};
//!
//! let p = Position::from_fen("6k1/pppQ1ppp/8/8/8/8/PPP2PPP/R5K1 w - - 0 1").unwrap();
//! let mv = Move::from_uci("d7e8").unwrap();
//! let p = p.make_move(mv).unwrap();
//! assert_eq!(p.calc_status(), Status::WhiteWon);
//! ```

pub use chessmove_base::{bitboard, geometry, types};

pub mod attack;
pub mod board;
mod castling;
pub mod error;
pub mod fen;
pub mod movegen;
pub mod moves;
pub mod policy;
pub mod service;
pub mod status;

pub use bitboard::Bitboard;
pub use board::{Position, RawBoard};
pub use error::{Error, ErrorKind};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind, PromotePiece};
pub use service::{MoveOutcome, MoveService};
pub use status::Status;
pub use types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Piece, Rank};
