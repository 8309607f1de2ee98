use crate::card::Card;
use crate::error::CardError;
use rand::seq::SliceRandom;

/// The 52 cards in canonical order, shuffled once at construction, with a
/// "next to deal" cursor. `size() == 52 - index` always holds.
pub struct Deck {
    cards: Vec<Card>,
    index: usize,
}

impl Deck {
    pub fn new() -> Self {
        let mut cards: Vec<Card> = (0..52u8).map(Card::from).collect();
        cards.shuffle(&mut rand::rng());
        Self { cards, index: 0 }
    }

    pub fn size(&self) -> usize {
        self.cards.len() - self.index
    }

    pub fn deal(&mut self) -> std::result::Result<Card, CardError> {
        let card = *self.cards.get(self.index).ok_or(CardError::DeckExhausted)?;
        self.index += 1;
        Ok(card)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn deals_without_replacement() {
        let mut deck = Deck::new();
        let mut seen = HashSet::new();
        for _ in 0..52 {
            let card = deck.deal().unwrap();
            assert!(seen.insert(u8::from(card)), "card dealt twice");
        }
    }

    #[test]
    fn size_tracks_next_to_deal_index() {
        let mut deck = Deck::new();
        assert_eq!(deck.size(), 52);
        deck.deal().unwrap();
        assert_eq!(deck.size(), 51);
    }

    #[test]
    fn dealing_past_end_is_deck_exhausted() {
        let mut deck = Deck::new();
        for _ in 0..52 {
            deck.deal().unwrap();
        }
        assert_eq!(deck.deal(), Err(CardError::DeckExhausted));
    }
}
