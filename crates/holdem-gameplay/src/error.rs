use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandError {
    #[error("it is not this player's turn to act")]
    NotYourTurn,
    #[error("that action is not legal at this decision point")]
    InvalidAction,
    #[error("the hand has already reached showdown")]
    HandComplete,
}
