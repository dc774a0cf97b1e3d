//! Stateless service which applies a move to a position given as FEN
//!
//! # Example
//!
//! ```
//! use chessmove::{MoveService, Status};
//!
//! let service = MoveService::new();
//! let res = service
//!     .make_move("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "e2e4")
//!     .unwrap();
//! assert_eq!(
//!     res.fen,
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! assert_eq!(res.mv, "e2e4");
//! assert_eq!(res.status, Status::InProgress);
//! ```

use crate::board::Position;
use crate::error::Error;
use crate::moves::{self, Move};
use crate::policy::{NoReply, ReplyPolicy};
use crate::status::Status;

use log::{debug, warn};
use thiserror::Error;

/// Error indicating that the move cannot be made by the service
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// The game in the given position is already over
    #[error("game is already over ({0})")]
    GameOver(Status),
    /// The move is not valid in the given position
    #[error(transparent)]
    Invalid(#[from] moves::ValidateError),
    /// The reply policy returned a move which is not legal
    #[error("reply policy returned illegal move {0}")]
    IllegalReply(Move),
}

/// Result of [`MoveService::make_move()`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Position after all the applied moves, as canonical FEN
    pub fen: String,
    /// Last applied move in coordinate notation
    ///
    /// This is the reply if the policy made one, and the normalized input move otherwise.
    pub mv: String,
    /// Status of the game after all the applied moves
    pub status: Status,
}

impl MoveOutcome {
    /// Returns the status as reported to the clients, i.e. without distinguishing check
    #[inline]
    pub fn reported_status(&self) -> Status {
        self.status.reported()
    }
}

/// Service applying moves to the positions encoded in FEN
///
/// The service keeps no state between the calls. Optionally, it makes a reply move for the
/// opponent, as chosen by the [`ReplyPolicy`] `P`. By default, no reply is made.
#[derive(Debug, Default, Clone)]
pub struct MoveService<P = NoReply> {
    policy: P,
}

impl MoveService<NoReply> {
    /// Creates the service which makes no reply moves
    #[inline]
    pub fn new() -> Self {
        MoveService { policy: NoReply }
    }
}

impl<P: ReplyPolicy> MoveService<P> {
    /// Creates the service which replies with the moves chosen by `policy`
    #[inline]
    pub fn with_policy(policy: P) -> Self {
        MoveService { policy }
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Applies the move `mv` to the position `fen`
    ///
    /// The checks are made in the following order, and the first failing one determines the
    /// error:
    ///
    /// 1. FEN must be parsed into a valid position.
    /// 2. The game in this position must not be over.
    /// 3. The move must be parsed from coordinate notation.
    /// 4. The source square must contain a piece of the side to move.
    /// 5. The move must be legal. If a pawn reaches the last rank and the promote piece is
    ///    omitted, promotion to a queen is assumed.
    ///
    /// After the move is applied, the reply policy is asked for a reply, unless the game is
    /// already over. The input strings are never modified, and no state is kept between the
    /// calls.
    pub fn make_move(&self, fen: &str, mv: &str) -> Result<MoveOutcome, Error> {
        let res = self.do_make_move(fen, mv);
        if let Err(e) = &res {
            debug!("rejected move {:?} in {:?}: {}", mv, fen, e);
        }
        res
    }

    fn do_make_move(&self, fen: &str, mv: &str) -> Result<MoveOutcome, Error> {
        let position = Position::from_fen(fen)?;
        let status = position.calc_status();
        if status.is_terminal() {
            return Err(MoveError::GameOver(status).into());
        }

        let parsed = Move::from_uci(mv)?;
        let human = parsed.with_default_promote(&position);
        human.validate(&position)?;

        let mut position = moves::apply(&position, human);
        let mut status = position.calc_status();
        let mut last = parsed;
        debug!("applied move {}, status: {}", human, status);

        if !status.is_terminal() {
            if let Some(reply) = self.policy.choose(&position) {
                if !reply.is_legal(&position) {
                    warn!("reply policy chose illegal move {} in {}", reply, position);
                    return Err(MoveError::IllegalReply(reply).into());
                }
                position = moves::apply(&position, reply);
                status = position.calc_status();
                last = reply;
                debug!("applied reply {}, status: {}", reply, status);
            }
        }

        Ok(MoveOutcome {
            fen: position.as_fen(),
            mv: last.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ValidateError;
    use crate::error::ErrorKind;
    use crate::fen::{CellsParseError, RawFenParseError};
    use crate::moves::uci;
    use crate::policy::{FirstLegal, RandomReply, SearchReply};
    use crate::types::{Color, Coord, File, Rank};

    const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    struct Bogus;

    impl ReplyPolicy for Bogus {
        fn choose(&self, _position: &Position) -> Option<Move> {
            Move::from_uci("a1a8").ok()
        }
    }

    fn kind(fen: &str, mv: &str) -> ErrorKind {
        MoveService::new().make_move(fen, mv).unwrap_err().kind()
    }

    #[test]
    fn test_opening_move() {
        let res = MoveService::new().make_move(INI_FEN, "e2e4").unwrap();
        assert_eq!(
            res.fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(res.mv, "e2e4");
        assert_eq!(res.status, Status::InProgress);

        let res = MoveService::new().make_move("", " E2E4 ").unwrap();
        assert_eq!(res.mv, "e2e4");
        assert_eq!(res.status, Status::InProgress);
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(
            kind(
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1",
                "e7e5"
            ),
            ErrorKind::Validation
        );

        let res = MoveService::new().make_move("", "e2e4").unwrap();
        assert_eq!(
            res.fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(res.reported_status(), Status::InProgress);

        let res = MoveService::new()
            .make_move("6k1/6P1/8/6K1/8/8/8/8 w - - 0 1", "g5g6")
            .unwrap();
        assert_eq!(res.status, Status::Stalemate);

        let res = MoveService::new()
            .make_move("6k1/pppQ1ppp/8/8/8/8/PPP2PPP/R5K1 w - - 0 1", "d7e8")
            .unwrap();
        assert_eq!(res.status, Status::WhiteWon);

        assert_eq!(kind(INI_FEN, "eae5"), ErrorKind::Format);
        assert_eq!(kind(INI_FEN, "e17e5"), ErrorKind::Validation);

        let res = MoveService::new()
            .make_move("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1")
            .unwrap();
        assert_eq!(res.fen, "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    }

    #[test]
    fn test_game_over() {
        let stalemate = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";
        assert_eq!(
            MoveService::new().make_move(stalemate, "h8g8"),
            Err(MoveError::GameOver(Status::Stalemate).into())
        );
        let mated = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        assert_eq!(
            MoveService::new().make_move(mated, "e2e4"),
            Err(MoveError::GameOver(Status::BlackWon).into())
        );
        assert_eq!(kind(mated, "zzzz"), ErrorKind::Validation);
    }

    #[test]
    fn test_mate() {
        let res = MoveService::new()
            .make_move(
                "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2",
                "d8h4",
            )
            .unwrap();
        assert_eq!(res.status, Status::BlackWon);
        assert_eq!(res.reported_status(), Status::BlackWon);

        let res = MoveService::new()
            .make_move("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8")
            .unwrap();
        assert_eq!(res.status, Status::WhiteWon);
        assert_eq!(res.fen, "R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1");
    }

    #[test]
    fn test_check() {
        let res = MoveService::new()
            .make_move(
                "rnbqkbnr/ppppp1pp/5p2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
                "d1h5",
            )
            .unwrap();
        assert_eq!(res.status, Status::Check);
        assert_eq!(res.reported_status(), Status::InProgress);
    }

    #[test]
    fn test_stalemate() {
        let res = MoveService::new()
            .make_move("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1", "f1f7")
            .unwrap();
        assert_eq!(res.status, Status::Stalemate);
    }

    #[test]
    fn test_rejected() {
        let svc = MoveService::new();
        assert_eq!(
            svc.make_move(INI_FEN, "e3e4"),
            Err(moves::ValidateError::EmptySource(Coord::from_parts(File::E, Rank::R3)).into())
        );
        assert_eq!(
            svc.make_move(INI_FEN, "e7e5"),
            Err(moves::ValidateError::WrongSide {
                src: Coord::from_parts(File::E, Rank::R7),
                side: Color::White,
            }
            .into())
        );
        assert_eq!(
            svc.make_move(INI_FEN, "e2e5"),
            Err(moves::ValidateError::NotLegal.into())
        );
        assert_eq!(
            svc.make_move(INI_FEN, "e2e4q"),
            Err(moves::ValidateError::NotLegal.into())
        );
        assert_eq!(
            svc.make_move("r3k2r/8/8/8/8/8/8/R3K2r w Kq - 0 1", "e1g1"),
            Err(moves::ValidateError::NotLegal.into())
        );
        for mv in ["e3e4", "e7e5", "e2e5", "b1b3", "e1e2"] {
            assert_eq!(kind(INI_FEN, mv), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_notation_errors() {
        assert_eq!(
            MoveService::new().make_move(INI_FEN, "eae5"),
            Err(uci::ParseError::NonNumericRank('a').into())
        );
        assert_eq!(kind(INI_FEN, "eae5"), ErrorKind::Format);
        assert_eq!(kind(INI_FEN, "i9e5"), ErrorKind::OutOfBounds);
        assert_eq!(kind(INI_FEN, "i1i2"), ErrorKind::Validation);
        assert_eq!(kind(INI_FEN, "zz1z"), ErrorKind::Validation);
        assert_eq!(kind(INI_FEN, "e9e5"), ErrorKind::Validation);
        assert_eq!(kind(INI_FEN, "e2z4"), ErrorKind::Validation);
        assert_eq!(kind(INI_FEN, ""), ErrorKind::Validation);
        assert_eq!(kind(INI_FEN, "e2"), ErrorKind::Validation);
    }

    #[test]
    fn test_bad_files_and_ranks() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        for mv in [
            "i1i2", "j1j2", "k4k5", "l6l7", "m5m6", "n2n3", "o3o4", "p6p7", "zz1z", "z1zz", "y7y5",
        ] {
            assert_eq!(kind(fen, mv), ErrorKind::Validation, "{}", mv);
        }
        for mv in ["e0e1", "e9e8", "e10e9"] {
            assert_eq!(kind(fen, mv), ErrorKind::Validation, "{}", mv);
        }
        assert_eq!(
            MoveService::new().make_move(fen, "i9e5"),
            Err(uci::ParseError::SrcOutOfBounds("i9".into()).into())
        );
    }

    #[test]
    fn test_fen_whitespace_and_case() {
        let svc = MoveService::new();
        for fen in [
            "6k1/6P1/8 / 6K1/8/8 / 8/8 w - - 0 54",
            "  6k1/6P1/8/6K1/8/8/8/8   W -  - 0 54 ",
        ] {
            let res = svc.make_move(fen, "g5g6").unwrap();
            assert_eq!(res.fen, "6k1/6P1/6K1/8/8/8/8/8 b - - 1 54");
            assert_eq!(res.fen, res.fen.trim());
            assert!(!res.fen.contains("  "));
            assert_eq!(res.fen.split(' ').nth(1), Some("b"));
            assert_eq!(res.status, Status::Stalemate);
        }
    }

    #[test]
    fn test_fen_errors() {
        assert_eq!(
            MoveService::new().make_move("e3", "y7y5"),
            Err(RawFenParseError::Board(CellsParseError::UnexpectedChar('e')).into())
        );
        assert_eq!(kind("e3", "y7y5"), ErrorKind::Format);
        assert_eq!(
            kind("6K1/6P1/8/6K1/8/8/8/8 w - - 0 54", "g7g8"),
            ErrorKind::Validation
        );
        assert_eq!(
            MoveService::new().make_move(
                "1Q1QQQQK/Q6Q/Q1Q4Q/Q6Q/3Q3Q/QQ5Q/ppQ4Q/knQQQQQQ w - - 0 1",
                "h8g7"
            ),
            Err(ValidateError::TooManyPieces(Color::White).into())
        );
    }

    #[test]
    fn test_promote() {
        let svc = MoveService::new();
        let fen = "8/2P5/8/8/8/8/8/k1K5 w - - 0 1";
        let res = svc.make_move(fen, "c7c8").unwrap();
        assert_eq!(res.fen, "2Q5/8/8/8/8/8/8/k1K5 b - - 0 1");
        assert_eq!(res.mv, "c7c8");
        let res = svc.make_move(fen, "c7c8N").unwrap();
        assert_eq!(res.fen, "2N5/8/8/8/8/8/8/k1K5 b - - 0 1");
        assert_eq!(res.mv, "c7c8n");
    }

    #[test]
    fn test_castling() {
        let svc = MoveService::new();
        let res = svc
            .make_move("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1")
            .unwrap();
        assert_eq!(res.fen, "r3k2r/8/8/8/8/8/8/2KR3R b kq - 1 1");
    }

    #[test]
    fn test_enpassant() {
        let res = MoveService::new()
            .make_move("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5d6")
            .unwrap();
        assert_eq!(res.fen, "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn test_reply() {
        let svc = MoveService::with_policy(FirstLegal);
        let res = svc.make_move(INI_FEN, "e2e4").unwrap();
        assert_eq!(res.mv, "a7a6");
        assert_eq!(
            res.fen,
            "rnbqkbnr/1ppppppp/p7/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
        );
        assert_eq!(res.status, Status::InProgress);

        // No reply after mate
        let res = svc
            .make_move("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8")
            .unwrap();
        assert_eq!(res.mv, "a1a8");
        assert_eq!(res.status, Status::WhiteWon);

        let svc = MoveService::with_policy(RandomReply::new(7));
        let first = svc.make_move(INI_FEN, "d2d4").unwrap();
        assert_eq!(svc.make_move(INI_FEN, "d2d4").unwrap(), first);
        assert_eq!(svc.policy().seed(), 7);

        let svc = MoveService::with_policy(SearchReply::default());
        let res = svc
            .make_move("4k3/8/8/3q4/8/8/8/R3K3 w - - 0 1", "a1a2")
            .unwrap();
        assert_eq!(res.mv, "d5a2");
    }

    #[test]
    fn test_illegal_reply() {
        let svc = MoveService::with_policy(Bogus);
        assert_eq!(
            svc.make_move(INI_FEN, "e2e4"),
            Err(MoveError::IllegalReply(Move::from_uci("a1a8").unwrap()).into())
        );
    }

    #[test]
    fn test_playout() {
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let svc = MoveService::new();
        for _ in 0..20 {
            let mut fen = INI_FEN.to_string();
            for _ in 0..80 {
                let p = Position::from_fen(&fen).unwrap();
                let moves = p.legal_moves();
                let mv = match moves.choose(&mut rng) {
                    Some(mv) => *mv,
                    None => break,
                };
                let res = svc.make_move(&fen, &mv.to_string()).unwrap();
                let next = Position::from_fen(&res.fen).unwrap();
                assert_eq!(next, moves::apply(&p, mv));
                assert_eq!(next.as_fen(), res.fen);
                assert_eq!(res.status, next.calc_status());
                if res.status.is_terminal() {
                    break;
                }
                fen = res.fen;
            }
        }
    }
}
