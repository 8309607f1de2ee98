use thiserror::Error;

/// The `error` frame's `code` field (see the message catalogue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidMessageType,
    InvalidInput,
    InvalidAction,
    InvalidAmount,
    InvalidHand,
    Unauthorized,
    TableFull,
    SeatUnavailable,
    PlayerAlreadyConnected,
    PlayerNotFound,
    InternalError,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("both seats are occupied")]
    TableFull,
    #[error("that seat is not available")]
    SeatUnavailable,
    #[error("no such player at this table")]
    PlayerNotFound,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("no hand is currently in progress")]
    NoHandInProgress,
    #[error("it is not this player's turn to act")]
    NotYourTurn,
    #[error("that action is not legal at this decision point")]
    InvalidAction,
    #[error("the player's stack is above the top-up threshold")]
    TopUpNotEligible,
}

impl TableError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TableError::TableFull => ErrorCode::TableFull,
            TableError::SeatUnavailable => ErrorCode::SeatUnavailable,
            TableError::PlayerNotFound => ErrorCode::PlayerNotFound,
            TableError::HandInProgress | TableError::NoHandInProgress => ErrorCode::InvalidHand,
            TableError::NotYourTurn | TableError::InvalidAction => ErrorCode::InvalidAction,
            TableError::TopUpNotEligible => ErrorCode::InvalidInput,
        }
    }
}
