use crate::error::CardError;
use crate::rank::Rank;
use crate::suit::Suit;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A single playing card, `rank * 4 + suit` in `0..52`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn parse(s: &str) -> std::result::Result<Self, CardError> {
        let mut chars = s.chars();
        let (rank_char, suit_char) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => (r, s),
            _ => return Err(CardError::InvalidCard(s.to_string())),
        };
        let rank = Rank::try_from(rank_char).map_err(|_| CardError::InvalidCard(s.to_string()))?;
        let suit = Suit::try_from(suit_char).map_err(|_| CardError::InvalidCard(s.to_string()))?;
        Ok(Self { rank, suit })
    }

    pub fn format(&self) -> String {
        self.to_string()
    }
}

// u8 isomorphism: `0..52`, dense and total over every byte in range.
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        (c.rank as u8) * 4 + (c.suit as u8)
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl TryFrom<String> for Card {
    type Error = CardError;
    fn try_from(s: String) -> std::result::Result<Self, CardError> {
        Card::parse(&s)
    }
}
impl From<Card> for String {
    fn from(c: Card) -> String {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_round_trip() {
        for n in 0..52u8 {
            let card = Card::from(n);
            let text = card.format();
            let back = Card::parse(&text).unwrap();
            assert_eq!(card, back);
            assert_eq!(u8::from(back), n);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(Card::parse("").is_err());
        assert!(Card::parse("Z9").is_err());
        assert!(Card::parse("As2").is_err());
        assert!(Card::parse("A").is_err());
    }

    #[test]
    fn ace_of_spades_formats_as_as() {
        let card = Card::new(Rank::Ace, Suit::Spade);
        assert_eq!(card.format(), "As");
    }
}
