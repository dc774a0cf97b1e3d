//! Game status

use crate::board::Position;
use crate::types::Color;

use std::fmt;

/// Status of the game in some position
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// The game continues, and the side to move is not in check
    InProgress,
    /// The game continues, and the side to move is in check
    Check,
    /// The side to move is checkmated
    ///
    /// This value does not tell who won, see [`Status::resolve()`].
    Checkmate,
    /// The side to move has no legal moves and is not in check
    Stalemate,
    /// White won by checkmate
    WhiteWon,
    /// Black won by checkmate
    BlackWon,
}

impl Status {
    /// Creates a status with the win of color `c`
    #[inline]
    pub fn win(c: Color) -> Status {
        match c {
            Color::White => Status::WhiteWon,
            Color::Black => Status::BlackWon,
        }
    }

    /// Returns `true` if the game is over
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Checkmate | Status::Stalemate | Status::WhiteWon | Status::BlackWon
        )
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        matches!(self, Status::Check | Status::Checkmate)
    }

    /// Returns the winner, if the game is won and the winner is known
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match self {
            Status::WhiteWon => Some(Color::White),
            Status::BlackWon => Some(Color::Black),
            _ => None,
        }
    }

    /// Replaces [`Status::Checkmate`] with the win of the opponent of `side`, which is the
    /// side to move in the checkmated position
    #[inline]
    pub fn resolve(self, side: Color) -> Status {
        match self {
            Status::Checkmate => Status::win(side.inv()),
            s => s,
        }
    }

    /// Returns the status in the form reported to the clients of the move service
    ///
    /// Check is not reported separately, so [`Status::Check`] becomes [`Status::InProgress`].
    #[inline]
    pub fn reported(self) -> Status {
        match self {
            Status::Check => Status::InProgress,
            s => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match self {
            Status::InProgress => "InProgress",
            Status::Check => "Check",
            Status::Checkmate => "Checkmate",
            Status::Stalemate => "Stalemate",
            Status::WhiteWon => "WhiteWon",
            Status::BlackWon => "BlackWon",
        };
        write!(f, "{}", s)
    }
}

/// Classifies the position `p` from the point of view of the side to move
///
/// Returns one of [`Status::InProgress`], [`Status::Check`], [`Status::Checkmate`] or
/// [`Status::Stalemate`].
pub fn classify(p: &Position) -> Status {
    match (p.has_legal_moves(), p.is_check()) {
        (true, false) => Status::InProgress,
        (true, true) => Status::Check,
        (false, true) => Status::Checkmate,
        (false, false) => Status::Stalemate,
    }
}
