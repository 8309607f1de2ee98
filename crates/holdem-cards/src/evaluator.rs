use crate::card::Card;
use crate::kickers::Kickers;
use crate::rank::Rank;
use crate::ranking::RankClass;
use crate::suit::Suit;

/// A comparable hand strength: category first, then within-category
/// tiebreak. `compare(a, b)` is just `a.cmp(&b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Strength {
    pub class: RankClass,
    pub kickers: Kickers,
}

/// Evaluates the best five-card hand out of 5, 6, or 7 cards via closed-form
/// bitmask analysis rather than literal C(n,5) enumeration: each `find_*`
/// probe is itself the maximum over all five-card subsets for that category,
/// so chaining probes from the best category down is equivalent to
/// "enumerate every subset, keep the best".
pub fn evaluate(cards: &[Card]) -> Strength {
    assert!(
        (5..=7).contains(&cards.len()),
        "evaluate requires 5 to 7 cards, got {}",
        cards.len()
    );
    find_straight_flush(cards)
        .or_else(|| find_four_of_a_kind(cards))
        .or_else(|| find_full_house(cards))
        .or_else(|| find_flush(cards))
        .or_else(|| find_straight(cards))
        .or_else(|| find_three_of_a_kind(cards))
        .or_else(|| find_two_pair(cards))
        .or_else(|| find_one_pair(cards))
        .or_else(|| find_high_card(cards))
        .expect("high card is always available for 5+ cards")
}

pub fn compare(a: &[Card], b: &[Card]) -> std::cmp::Ordering {
    evaluate(a).cmp(&evaluate(b))
}

fn rank_mask(cards: &[Card]) -> u16 {
    cards.iter().fold(0u16, |acc, c| acc | (1 << c.rank() as u16))
}

fn suit_masks(cards: &[Card]) -> [u16; 4] {
    cards.iter().fold([0u16; 4], |mut suits, c| {
        suits[c.suit() as usize] |= 1 << c.rank() as u16;
        suits
    })
}

fn suit_counts(cards: &[Card]) -> [u8; 4] {
    cards.iter().fold([0u8; 4], |mut counts, c| {
        counts[c.suit() as usize] += 1;
        counts
    })
}

/// Top rank of a straight within `mask`, or `None`. The wheel (A-2-3-4-5)
/// is special-cased to a top card of Five.
fn straight_top(mask: u16) -> Option<Rank> {
    const WHEEL: u16 = 0b_1_0000_0000_1111;
    let mut bits = mask;
    bits &= bits << 1;
    bits &= bits << 1;
    bits &= bits << 1;
    bits &= bits << 1;
    if bits > 0 {
        Some(Rank::from(15 - bits.leading_zeros() as u8))
    } else if mask & WHEEL == WHEEL {
        Some(Rank::Five)
    } else {
        None
    }
}

fn counts_by_rank(cards: &[Card]) -> [u8; 13] {
    cards.iter().fold([0u8; 13], |mut counts, c| {
        counts[c.rank() as usize] += 1;
        counts
    })
}

/// Highest rank with at least `n` cards, optionally restricted to ranks
/// strictly below `under`.
fn highest_rank_with_count(counts: &[u8; 13], n: u8, under: Option<Rank>) -> Option<Rank> {
    let ceiling = under.map(|r| r as usize).unwrap_or(13);
    (0..ceiling)
        .rev()
        .find(|&r| counts[r] >= n)
        .map(|r| Rank::from(r as u8))
}

fn find_straight_flush(cards: &[Card]) -> Option<Strength> {
    let suits = suit_masks(cards);
    suits.iter().find_map(|&mask| {
        straight_top(mask).map(|top| Strength {
            class: RankClass::StraightFlush(top),
            kickers: Kickers::NONE,
        })
    })
}

fn find_four_of_a_kind(cards: &[Card]) -> Option<Strength> {
    let counts = counts_by_rank(cards);
    let quad = highest_rank_with_count(&counts, 4, None)?;
    let kickers = Kickers::top_n(rank_mask(cards) & !(1 << quad as u16), 1);
    Some(Strength {
        class: RankClass::FourOfAKind(quad),
        kickers,
    })
}

fn find_full_house(cards: &[Card]) -> Option<Strength> {
    let counts = counts_by_rank(cards);
    let trip = highest_rank_with_count(&counts, 3, None)?;
    // A second trip counts as a pair for full-house purposes.
    let pair = highest_rank_with_count(&counts, 3, Some(trip))
        .or_else(|| highest_rank_with_count(&counts, 2, Some(trip)))?;
    Some(Strength {
        class: RankClass::FullHouse(trip, pair),
        kickers: Kickers::NONE,
    })
}

fn find_flush(cards: &[Card]) -> Option<Strength> {
    let suits = suit_masks(cards);
    let counts = suit_counts(cards);
    let suit = (0..4u8).find(|&s| counts[s as usize] >= 5)?;
    let mask = suits[suit as usize];
    let top = Rank::from(15 - mask.leading_zeros() as u8);
    Some(Strength {
        class: RankClass::Flush(top),
        kickers: Kickers::top_n(mask, 5),
    })
}

fn find_straight(cards: &[Card]) -> Option<Strength> {
    straight_top(rank_mask(cards)).map(|top| Strength {
        class: RankClass::Straight(top),
        kickers: Kickers::NONE,
    })
}

fn find_three_of_a_kind(cards: &[Card]) -> Option<Strength> {
    let counts = counts_by_rank(cards);
    let trip = highest_rank_with_count(&counts, 3, None)?;
    let kickers = Kickers::top_n(rank_mask(cards) & !(1 << trip as u16), 2);
    Some(Strength {
        class: RankClass::ThreeOfAKind(trip),
        kickers,
    })
}

fn find_two_pair(cards: &[Card]) -> Option<Strength> {
    let counts = counts_by_rank(cards);
    let hi = highest_rank_with_count(&counts, 2, None)?;
    let lo = highest_rank_with_count(&counts, 2, Some(hi))?;
    let kickers = Kickers::top_n(rank_mask(cards) & !(1 << hi as u16) & !(1 << lo as u16), 1);
    Some(Strength {
        class: RankClass::TwoPair(hi, lo),
        kickers,
    })
}

fn find_one_pair(cards: &[Card]) -> Option<Strength> {
    let counts = counts_by_rank(cards);
    let pair = highest_rank_with_count(&counts, 2, None)?;
    let kickers = Kickers::top_n(rank_mask(cards) & !(1 << pair as u16), 3);
    Some(Strength {
        class: RankClass::OnePair(pair),
        kickers,
    })
}

fn find_high_card(cards: &[Card]) -> Option<Strength> {
    Some(Strength {
        class: RankClass::HighCard(Rank::from(15 - (rank_mask(cards)).leading_zeros() as u8)),
        kickers: Kickers::top_n(rank_mask(cards), 5),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use crate::suit::Suit;

    fn hand(spec: &[(Rank, Suit)]) -> Vec<Card> {
        spec.iter().map(|&(r, s)| Card::new(r, s)).collect()
    }

    #[test]
    fn a_low_straight_tops_at_five() {
        let cards = hand(&[
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Diamond),
            (Rank::Three, Suit::Club),
            (Rank::Four, Suit::Heart),
            (Rank::Five, Suit::Spade),
        ]);
        let s = evaluate(&cards);
        assert_eq!(s.class, RankClass::Straight(Rank::Five));
    }

    #[test]
    fn six_high_straight_beats_wheel() {
        let wheel = hand(&[
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Diamond),
            (Rank::Three, Suit::Club),
            (Rank::Four, Suit::Heart),
            (Rank::Five, Suit::Spade),
        ]);
        let six_high = hand(&[
            (Rank::Two, Suit::Diamond),
            (Rank::Three, Suit::Club),
            (Rank::Four, Suit::Heart),
            (Rank::Five, Suit::Spade),
            (Rank::Six, Suit::Club),
        ]);
        assert!(compare(&six_high, &wheel) == std::cmp::Ordering::Greater);
    }

    #[test]
    fn royal_flush_beats_any_other_straight_flush() {
        let royal = hand(&[
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Spade),
            (Rank::Queen, Suit::Spade),
            (Rank::King, Suit::Spade),
            (Rank::Ace, Suit::Spade),
        ]);
        let king_high_sf = hand(&[
            (Rank::Nine, Suit::Club),
            (Rank::Ten, Suit::Club),
            (Rank::Jack, Suit::Club),
            (Rank::Queen, Suit::Club),
            (Rank::King, Suit::Club),
        ]);
        assert_eq!(evaluate(&royal).class.label(), "ROYAL_FLUSH");
        assert!(compare(&royal, &king_high_sf) == std::cmp::Ordering::Greater);
    }

    #[test]
    fn full_house_beats_flush_even_though_flush_checked_first() {
        let full_house = hand(&[
            (Rank::Two, Suit::Club),
            (Rank::Two, Suit::Diamond),
            (Rank::Two, Suit::Heart),
            (Rank::Three, Suit::Club),
            (Rank::Three, Suit::Diamond),
        ]);
        let flush = hand(&[
            (Rank::Two, Suit::Spade),
            (Rank::Four, Suit::Spade),
            (Rank::Six, Suit::Spade),
            (Rank::Eight, Suit::Spade),
            (Rank::Ace, Suit::Spade),
        ]);
        assert!(compare(&full_house, &flush) == std::cmp::Ordering::Greater);
    }

    #[test]
    fn flush_tiebreak_considers_all_five_ranks() {
        let higher = hand(&[
            (Rank::Two, Suit::Spade),
            (Rank::Four, Suit::Spade),
            (Rank::Six, Suit::Spade),
            (Rank::Eight, Suit::Spade),
            (Rank::Ace, Suit::Spade),
        ]);
        let lower = hand(&[
            (Rank::Three, Suit::Club),
            (Rank::Four, Suit::Club),
            (Rank::Six, Suit::Club),
            (Rank::Eight, Suit::Club),
            (Rank::Ace, Suit::Club),
        ]);
        assert!(compare(&higher, &lower) == std::cmp::Ordering::Greater);
    }

    #[test]
    fn seven_card_hand_prefers_best_five_card_straight_over_worse_flush_material() {
        // 2c 3c 5c 7c 9c 4d 6h: flush in clubs (9-high, no straight in suit)
        // coexists with a 3-4-5-6-7 straight across suits; flush must win.
        let cards = hand(&[
            (Rank::Two, Suit::Club),
            (Rank::Three, Suit::Club),
            (Rank::Five, Suit::Club),
            (Rank::Seven, Suit::Club),
            (Rank::Nine, Suit::Club),
            (Rank::Four, Suit::Diamond),
            (Rank::Six, Suit::Heart),
        ]);
        let s = evaluate(&cards);
        assert_eq!(s.class, RankClass::Flush(Rank::Nine));
    }

    #[test]
    fn two_three_of_a_kinds_form_full_house() {
        let cards = hand(&[
            (Rank::Two, Suit::Club),
            (Rank::Two, Suit::Diamond),
            (Rank::Two, Suit::Heart),
            (Rank::Three, Suit::Club),
            (Rank::Three, Suit::Diamond),
            (Rank::Three, Suit::Heart),
            (Rank::Four, Suit::Spade),
        ]);
        let s = evaluate(&cards);
        assert_eq!(s.class, RankClass::FullHouse(Rank::Three, Rank::Two));
    }

    #[test]
    fn compare_is_antisymmetric() {
        let a = hand(&[
            (Rank::Two, Suit::Club),
            (Rank::Two, Suit::Diamond),
            (Rank::Nine, Suit::Heart),
            (Rank::Jack, Suit::Spade),
            (Rank::King, Suit::Club),
        ]);
        let b = hand(&[
            (Rank::Three, Suit::Club),
            (Rank::Three, Suit::Diamond),
            (Rank::Nine, Suit::Heart),
            (Rank::Jack, Suit::Spade),
            (Rank::King, Suit::Club),
        ]);
        assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
    }
}
