use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("invalid card text: {0:?}")]
    InvalidCard(String),
    #[error("deck exhausted")]
    DeckExhausted,
}
