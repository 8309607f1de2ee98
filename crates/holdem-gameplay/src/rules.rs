use crate::action::Action;
use holdem_core::Chips;

/// Pure betting-rule predicates for one seat's decision point within a
/// round. Nothing here mutates anything; the hand state machine (`hand.rs`)
/// is the only caller and the only place state actually changes.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub committed_this_round: Chips,
    pub stack: Chips,
}

impl Decision {
    /// Chips still needed to call the current bet.
    pub fn call_amount(&self) -> Chips {
        (self.current_bet - self.committed_this_round).max(0)
    }

    /// Smallest legal raise total (not delta).
    pub fn min_raise_total(&self) -> Chips {
        self.current_bet + self.min_raise
    }

    /// Largest legal raise total: an all-in.
    pub fn max_raise_total(&self) -> Chips {
        self.committed_this_round + self.stack
    }

    pub fn is_legal(&self, action: &Action) -> bool {
        match *action {
            Action::Fold => true,
            Action::Call { amount } => {
                let call = self.call_amount();
                if call == 0 {
                    amount == 0
                } else {
                    amount == call || (amount == self.stack && amount < call)
                }
            }
            Action::Raise { amount } => {
                let total_committed = amount;
                if total_committed > self.committed_this_round + self.stack {
                    false
                } else if total_committed == self.committed_this_round + self.stack {
                    total_committed > self.current_bet
                } else {
                    total_committed >= self.min_raise_total()
                }
            }
        }
    }

    /// The raise increment a legal raise establishes as the new min-raise:
    /// `r - b`, where `r` is the new total bet and `b` the prior bet. Stored
    /// in `min_raise` as an increment, matching `min_raise_total`'s own
    /// reading of that field (`current_bet + min_raise`).
    pub fn next_min_raise(&self, new_total_bet: Chips) -> Chips {
        new_total_bet - self.current_bet
    }
}

/// All-in happens when an action commits the actor's entire remaining stack.
pub fn is_all_in(decision: &Decision, action: &Action) -> bool {
    match *action {
        Action::Call { amount } => amount == decision.stack && amount < decision.call_amount(),
        Action::Raise { amount } => amount == decision.committed_this_round + decision.stack,
        Action::Fold => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision() -> Decision {
        Decision {
            current_bet: 40,
            min_raise: 20,
            committed_this_round: 0,
            stack: 1000,
        }
    }

    #[test]
    fn call_must_match_exactly() {
        let d = decision();
        assert!(d.is_legal(&Action::Call { amount: 40 }));
        assert!(!d.is_legal(&Action::Call { amount: 39 }));
    }

    #[test]
    fn min_raise_boundary() {
        let d = decision();
        assert!(d.is_legal(&Action::Raise { amount: 60 }));
        assert!(!d.is_legal(&Action::Raise { amount: 59 }));
    }

    #[test]
    fn raise_equal_to_stack_is_all_in_and_legal() {
        let d = Decision {
            current_bet: 40,
            min_raise: 20,
            committed_this_round: 0,
            stack: 55,
        };
        assert!(d.is_legal(&Action::Raise { amount: 55 }));
        assert!(!d.is_legal(&Action::Raise { amount: 56 }));
    }

    #[test]
    fn call_greater_than_stack_becomes_all_in() {
        let d = Decision {
            current_bet: 100,
            min_raise: 20,
            committed_this_round: 0,
            stack: 30,
        };
        assert!(d.is_legal(&Action::Call { amount: 30 }));
        assert!(is_all_in(&d, &Action::Call { amount: 30 }));
    }

    #[test]
    fn next_min_raise_is_an_increment_not_a_total() {
        let d = decision();
        // raise to 60 over a bet of 40 is a 20-chip increment; the next
        // legal re-raise total is 60 + 20 = 80, not 60 + (60 + 20) = 140.
        assert_eq!(d.next_min_raise(60), 20);
    }

    #[test]
    fn second_raise_minimum_is_the_prior_increment_on_top() {
        let first = decision();
        let increment = first.next_min_raise(60);
        let second = Decision {
            current_bet: 60,
            min_raise: increment,
            committed_this_round: 0,
            stack: 1000,
        };
        assert!(second.is_legal(&Action::Raise { amount: 80 }));
        assert!(!second.is_legal(&Action::Raise { amount: 79 }));
    }

    #[test]
    fn check_is_a_zero_call() {
        let d = Decision {
            current_bet: 0,
            min_raise: 4,
            committed_this_round: 0,
            stack: 100,
        };
        assert!(d.is_legal(&Action::Call { amount: 0 }));
        assert!(!d.is_legal(&Action::Call { amount: 1 }));
    }
}
