use std::fmt;

/// Error when creating a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateMatchError {
    /// Maximum number of concurrent matches reached.
    TooManyMatches,
}

impl fmt::Display for CreateMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateMatchError::TooManyMatches => write!(f, "maximum number of matches reached"),
        }
    }
}

impl std::error::Error for CreateMatchError {}

/// Error for operations on a specific match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Match not found.
    NotFound,
    /// Invalid session token.
    InvalidSession,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NotFound => write!(f, "match not found"),
            MatchError::InvalidSession => write!(f, "invalid session token"),
        }
    }
}

impl std::error::Error for MatchError {}

/// Error when joining the player seat of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// Match not found.
    NotFound,
    /// The player seat is already taken.
    SeatTaken,
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::NotFound => write!(f, "match not found"),
            JoinError::SeatTaken => write!(f, "player seat is already taken"),
        }
    }
}

impl std::error::Error for JoinError {}

/// Error when submitting an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Match not found.
    NotFound,
    /// Invalid session token.
    InvalidSession,
    /// Spectator sessions cannot act.
    Spectator,
    /// Match has finished or been terminated.
    Terminated,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::NotFound => write!(f, "match not found"),
            SubmitError::InvalidSession => write!(f, "invalid session token"),
            SubmitError::Spectator => write!(f, "spectator sessions cannot submit actions"),
            SubmitError::Terminated => write!(f, "match has terminated"),
        }
    }
}

impl std::error::Error for SubmitError {}
