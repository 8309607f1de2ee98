use holdem_cards::Strength;
use holdem_core::Chips;

/// One participant's contribution to a hand, as seen by the pot engine.
/// `index` is the participant's position in seat order, used to break
/// odd-chip ties deterministically.
#[derive(Debug, Clone, Copy)]
pub struct Contribution {
    pub risked: Chips,
    pub folded: bool,
    pub strength: Strength,
}

/// Distributes all chips risked across the field of `Contribution`s,
/// returning each participant's winnings aligned by index with the input.
///
/// Implements the single-construction side-pot algorithm of the pot engine:
/// rather than building a `SidePot` list up front, it repeatedly finds the
/// strongest remaining strength tier, settles the smallest unresolved stake
/// gap within that tier, and proceeds to the next tier until every chip
/// risked has been awarded. This naturally produces side pots without ever
/// double-counting the main pot, avoiding the double-counting noted against
/// the reference `distributePot` quirk.
pub fn settle(contributions: &[Contribution]) -> Vec<Chips> {
    let mut rewarded = vec![0 as Chips; contributions.len()];
    let mut distributed: Chips = 0;
    let mut ceiling: Option<Strength> = None;
    let mut last_winners: Vec<usize> = Vec::new();

    loop {
        let Some(tier) = strongest_below(contributions, ceiling) else {
            break;
        };
        ceiling = Some(tier);
        loop {
            let Some(gap_ceiling) = smallest_unresolved_risk(contributions, tier, distributed)
            else {
                break;
            };
            let pot: Chips = contributions
                .iter()
                .map(|c| c.risked.min(gap_ceiling) - distributed)
                .filter(|&delta| delta > 0)
                .sum();
            let winner_idxs: Vec<usize> = contributions
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.folded && c.strength == tier && c.risked > distributed)
                .map(|(i, _)| i)
                .collect();
            distribute(&mut rewarded, &winner_idxs, pot);
            last_winners = winner_idxs;
            distributed = gap_ceiling;
            if is_complete(contributions, &rewarded) {
                return rewarded;
            }
        }
    }

    // A folded contributor can have risked more than any remaining
    // non-folded contributor ever matched (nobody left to call the
    // excess). Those chips are still in the pot and nobody can reclaim
    // them, so they go to whoever most recently won a gap.
    let remainder: Chips =
        contributions.iter().map(|c| c.risked).sum::<Chips>() - rewarded.iter().sum::<Chips>();
    if remainder > 0 {
        distribute(&mut rewarded, &last_winners, remainder);
    }
    rewarded
}

fn strongest_below(contributions: &[Contribution], ceiling: Option<Strength>) -> Option<Strength> {
    contributions
        .iter()
        .filter(|c| !c.folded)
        .map(|c| c.strength)
        .filter(|&s| ceiling.is_none_or(|ceil| s < ceil))
        .max()
}

fn smallest_unresolved_risk(
    contributions: &[Contribution],
    tier: Strength,
    distributed: Chips,
) -> Option<Chips> {
    contributions
        .iter()
        .filter(|c| !c.folded && c.strength == tier && c.risked > distributed)
        .map(|c| c.risked)
        .min()
}

/// Splits `pot` evenly among `winner_idxs`; any remainder goes one chip at
/// a time to the earliest indices (seat order from the button's left).
fn distribute(rewarded: &mut [Chips], winner_idxs: &[usize], pot: Chips) {
    if winner_idxs.is_empty() {
        return;
    }
    let n = winner_idxs.len() as Chips;
    let share = pot / n;
    let bonus = (pot % n) as usize;
    for &idx in winner_idxs {
        rewarded[idx] += share;
    }
    for &idx in winner_idxs.iter().take(bonus) {
        rewarded[idx] += 1;
    }
}

fn is_complete(contributions: &[Contribution], rewarded: &[Chips]) -> bool {
    let staked: Chips = contributions.iter().map(|c| c.risked).sum();
    let paid: Chips = rewarded.iter().sum();
    staked == paid
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_cards::RankClass;
    use holdem_cards::Rank;
    use holdem_cards::Kickers;

    fn strength(class: RankClass) -> Strength {
        Strength { class, kickers: Kickers::NONE }
    }

    fn contrib(risked: Chips, folded: bool, class: RankClass) -> Contribution {
        Contribution { risked, folded, strength: strength(class) }
    }

    #[test]
    fn heads_up_showdown_winner_takes_all() {
        let out = settle(&[
            contrib(100, false, RankClass::HighCard(Rank::Ace)),
            contrib(100, false, RankClass::OnePair(Rank::Ace)),
        ]);
        assert_eq!(out, vec![0, 200]);
    }

    #[test]
    fn single_fold_awards_entire_pot_to_survivor() {
        let out = settle(&[
            contrib(4, true, RankClass::Straight(Rank::Ace)),
            contrib(2, false, RankClass::HighCard(Rank::Two)),
        ]);
        assert_eq!(out, vec![0, 6]);
    }

    #[test]
    fn all_in_side_pot_single_pot_when_caller_matches_exactly() {
        let out = settle(&[
            contrib(100, false, RankClass::HighCard(Rank::Ace)),
            contrib(100, false, RankClass::OnePair(Rank::Two)),
        ]);
        assert_eq!(out, vec![0, 200]);
    }

    #[test]
    fn three_way_side_pot_scenario_from_spec() {
        // P1 all-in 100, P2 raises to 400, P3 calls 400.
        let out = settle(&[
            contrib(100, false, RankClass::FourOfAKind(Rank::Two)),
            contrib(400, false, RankClass::OnePair(Rank::Two)),
            contrib(400, false, RankClass::HighCard(Rank::Two)),
        ]);
        // P1 has the best hand and wins the 300-chip main pot (3 x 100).
        // P2 has the next best hand and wins the 600-chip side pot.
        assert_eq!(out, vec![300, 600, 0]);
    }

    #[test]
    fn split_pot_between_equal_strength_survivors() {
        let out = settle(&[
            contrib(100, false, RankClass::TwoPair(Rank::Ace, Rank::King)),
            contrib(100, false, RankClass::TwoPair(Rank::Ace, Rank::King)),
            contrib(100, false, RankClass::OnePair(Rank::Ace)),
        ]);
        assert_eq!(out, vec![150, 150, 0]);
    }

    #[test]
    fn odd_chip_goes_to_earliest_seat() {
        let out = settle(&[
            contrib(101, false, RankClass::OnePair(Rank::Ace)),
            contrib(101, false, RankClass::OnePair(Rank::Ace)),
        ]);
        assert_eq!(out, vec![101, 101]);

        let out = settle(&[
            contrib(51, false, RankClass::OnePair(Rank::Ace)),
            contrib(50, false, RankClass::OnePair(Rank::Ace)),
        ]);
        // the short stack's 50 is matched by 50 from each; the extra chip
        // from the 51 stays with its owner uncontested.
        assert_eq!(out, vec![51, 50]);
    }

    #[test]
    fn folded_overcommit_is_not_orphaned() {
        let contributions = [
            contrib(4, true, RankClass::Straight(Rank::Ace)),
            contrib(2, false, RankClass::HighCard(Rank::Two)),
        ];
        let out = settle(&contributions);
        let staked: Chips = contributions.iter().map(|c| c.risked).sum();
        let paid: Chips = out.iter().sum();
        assert_eq!(staked, paid);
    }

    #[test]
    fn chip_conservation_holds() {
        let contributions = [
            contrib(150, false, RankClass::Straight(Rank::Ace)),
            contrib(200, false, RankClass::ThreeOfAKind(Rank::King)),
            contrib(350, false, RankClass::OnePair(Rank::Two)),
            contrib(50, false, RankClass::HighCard(Rank::Ace)),
        ];
        let out = settle(&contributions);
        let staked: Chips = contributions.iter().map(|c| c.risked).sum();
        let paid: Chips = out.iter().sum();
        assert_eq!(staked, paid);
    }
}
