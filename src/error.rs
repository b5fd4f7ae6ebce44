use std::fmt::Display;

/// Why a concrete move cannot be played on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    /// The move covers no slot at all.
    Empty,
    /// The move reaches past the end of the row.
    OutOfBounds { right: usize, len: usize },
    /// The move takes more sticks than the rules allow.
    TooLarge { take: usize, max_take: usize },
    /// The move covers a slot that holds no stick.
    ContainsGap { slot: usize },
}

impl Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::Empty => write!(f, "the move takes no stick"),
            IllegalMove::OutOfBounds { right, len } => {
                write!(f, "slot {} is past the end of a row of {} slots", right, len)
            }
            IllegalMove::TooLarge { take, max_take } => {
                write!(f, "cannot take {} sticks, at most {} per turn", take, max_take)
            }
            IllegalMove::ContainsGap { slot } => write!(f, "slot {} holds no stick", slot + 1),
        }
    }
}

/// Errors reported by the engine. All of them are contract violations by the caller
/// (or an interrupted search) and are never recovered from inside the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A configuration was built with a group smaller than one stick.
    InvalidState { group: i64 },
    /// A rule or session parameter is out of range.
    InvalidParameter { name: &'static str, value: i64 },
    /// Moves were requested on the terminal configuration.
    NoMovesAvailable,
    /// A search would go past one of the evaluator's limits.
    ResourceExceeded { limit: &'static str, value: usize },
    /// The evaluator's cancel flag was raised mid-search.
    Cancelled,
    IllegalMove(IllegalMove),
    /// An interactive player stopped playing.
    Aborted,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidState { group } => {
                write!(f, "invalid group size {}, groups hold at least one stick", group)
            }
            Error::InvalidParameter { name, value } => {
                write!(f, "invalid {} {}, expected a positive integer", name, value)
            }
            Error::NoMovesAvailable => write!(f, "no sticks left, no move is available"),
            Error::ResourceExceeded { limit, value } => {
                write!(f, "search exceeds the {} limit ({})", limit, value)
            }
            Error::Cancelled => write!(f, "search cancelled"),
            Error::IllegalMove(reason) => write!(f, "illegal move: {}", reason),
            Error::Aborted => write!(f, "game aborted"),
        }
    }
}

impl std::error::Error for Error {}

impl From<IllegalMove> for Error {
    fn from(value: IllegalMove) -> Self {
        Self::IllegalMove(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Checks the per-turn take limit `K`.
pub(crate) fn check_max_take(max_take: usize) -> Result<()> {
    if max_take < 1 {
        return Err(Error::InvalidParameter {
            name: "max take",
            value: 0,
        });
    }
    Ok(())
}
