pub mod card;
pub mod deck;
pub mod error;
pub mod evaluator;
pub mod kickers;
pub mod rank;
pub mod ranking;
pub mod suit;

pub use card::Card;
pub use deck::Deck;
pub use error::CardError;
pub use evaluator::{compare, evaluate, Strength};
pub use kickers::Kickers;
pub use rank::Rank;
pub use ranking::RankClass;
pub use suit::Suit;
