use crate::action::Action;
use crate::error::HandError;
use crate::pot::{self, Contribution};
use crate::rules::Decision;
use holdem_cards::{evaluate, Card, Deck, RankClass, Strength};
use holdem_core::{Chips, Seat, BIG_BLIND, SMALL_BLIND};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

#[derive(Debug, Clone, Copy)]
pub struct Winner {
    pub seat: Seat,
    pub amount: Chips,
    pub hand_rank: Option<RankClass>,
}

/// One hand's complete lifecycle: blinds, dealing, betting rounds, and
/// showdown, for exactly two seats. A `Hand` is created by the table
/// manager at the start of a deal and discarded after settlement.
pub struct Hand {
    deck: Deck,
    board: Vec<Card>,
    hole: [[Card; 2]; 2],
    round: Round,
    dealer: Seat,
    actor: Seat,
    current_bet: Chips,
    min_raise: Chips,
    stacks: [Chips; 2],
    committed: [Chips; 2],
    round_committed: [Chips; 2],
    folded: [bool; 2],
    acted: [bool; 2],
    history: Vec<(Seat, Action)>,
    winners: Vec<Winner>,
}

fn other(seat: Seat) -> Seat {
    1 - seat
}

impl Hand {
    pub fn start(dealer: Seat, stacks: [Chips; 2]) -> Self {
        let mut deck = Deck::new();
        let hole = [
            [deck.deal().expect("fresh deck"), deck.deal().expect("fresh deck")],
            [deck.deal().expect("fresh deck"), deck.deal().expect("fresh deck")],
        ];
        let non_dealer = other(dealer);
        let mut stacks = stacks;
        let mut committed = [0 as Chips; 2];
        stacks[dealer] -= SMALL_BLIND;
        committed[dealer] += SMALL_BLIND;
        stacks[non_dealer] -= BIG_BLIND;
        committed[non_dealer] += BIG_BLIND;
        let mut round_committed = [0 as Chips; 2];
        round_committed[dealer] = SMALL_BLIND;
        round_committed[non_dealer] = BIG_BLIND;
        Self {
            deck,
            board: Vec::with_capacity(5),
            hole,
            round: Round::Preflop,
            dealer,
            actor: dealer,
            current_bet: BIG_BLIND,
            min_raise: BIG_BLIND,
            stacks,
            committed,
            round_committed,
            folded: [false, false],
            acted: [false, false],
            history: Vec::new(),
            winners: Vec::new(),
        }
    }

    pub fn round(&self) -> Round {
        self.round
    }
    pub fn actor(&self) -> Seat {
        self.actor
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn hole_cards(&self, seat: Seat) -> [Card; 2] {
        self.hole[seat]
    }
    pub fn stack(&self, seat: Seat) -> Chips {
        self.stacks[seat]
    }
    pub fn pot(&self) -> Chips {
        self.committed.iter().sum()
    }
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }
    pub fn is_complete(&self) -> bool {
        self.round == Round::Showdown
    }
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }
    pub fn history(&self) -> &[(Seat, Action)] {
        &self.history
    }

    pub fn call_amount(&self, seat: Seat) -> Chips {
        self.decision(seat).call_amount()
    }
    pub fn min_raise_total(&self, seat: Seat) -> Chips {
        self.decision(seat).min_raise_total()
    }
    pub fn max_raise_total(&self, seat: Seat) -> Chips {
        self.decision(seat).max_raise_total()
    }

    fn decision(&self, seat: Seat) -> Decision {
        Decision {
            current_bet: self.current_bet,
            min_raise: self.min_raise,
            committed_this_round: self.round_committed[seat],
            stack: self.stacks[seat],
        }
    }

    pub fn apply(&mut self, seat: Seat, action: Action) -> Result<(), HandError> {
        if self.is_complete() {
            return Err(HandError::HandComplete);
        }
        if seat != self.actor {
            return Err(HandError::NotYourTurn);
        }
        let decision = self.decision(seat);
        if !decision.is_legal(&action) {
            return Err(HandError::InvalidAction);
        }

        match action {
            Action::Fold => self.folded[seat] = true,
            Action::Call { amount: delta } => {
                self.stacks[seat] -= delta;
                self.round_committed[seat] += delta;
                self.committed[seat] += delta;
            }
            Action::Raise { amount: total } => {
                let delta = total - self.round_committed[seat];
                self.stacks[seat] -= delta;
                self.round_committed[seat] += delta;
                self.committed[seat] += delta;
                self.min_raise = decision.next_min_raise(total);
                self.current_bet = total;
            }
        }
        self.acted[seat] = true;
        self.history.push((seat, action));

        if self.folded[seat] {
            self.settle_uncontested(other(seat));
        } else if self.round_complete() {
            self.advance_round();
        } else {
            self.actor = other(seat);
        }
        Ok(())
    }

    /// Ends the hand immediately in favor of `winner`, bypassing turn order
    /// and betting legality. Used when a seat is removed from the table
    /// (disconnect-and-timeout, explicit removal) rather than folding
    /// voluntarily on its own turn.
    pub fn concede(&mut self, winner: Seat) {
        if self.is_complete() {
            return;
        }
        self.folded[other(winner)] = true;
        self.settle_uncontested(winner);
    }

    fn round_complete(&self) -> bool {
        (0..2).all(|seat| {
            self.folded[seat]
                || (self.acted[seat]
                    && (self.round_committed[seat] == self.current_bet || self.stacks[seat] == 0))
        })
    }

    fn advance_round(&mut self) {
        match self.round {
            Round::Preflop => {
                for _ in 0..3 {
                    self.board.push(self.deck.deal().expect("deck has cards"));
                }
                self.round = Round::Flop;
            }
            Round::Flop => {
                self.board.push(self.deck.deal().expect("deck has cards"));
                self.round = Round::Turn;
            }
            Round::Turn => {
                self.board.push(self.deck.deal().expect("deck has cards"));
                self.round = Round::River;
            }
            Round::River => {
                self.settle_contested();
                return;
            }
            Round::Showdown => return,
        }
        self.current_bet = 0;
        self.min_raise = BIG_BLIND;
        self.round_committed = [0, 0];
        self.acted = [false, false];
        self.actor = other(self.dealer);
    }

    fn settle_uncontested(&mut self, winner: Seat) {
        let pot = self.pot();
        self.stacks[winner] += pot;
        self.winners = vec![Winner {
            seat: winner,
            amount: pot,
            hand_rank: None,
        }];
        self.round = Round::Showdown;
    }

    fn settle_contested(&mut self) {
        let contributions: Vec<Contribution> = (0..2)
            .map(|seat| Contribution {
                risked: self.committed[seat],
                folded: self.folded[seat],
                strength: self.strength(seat),
            })
            .collect();
        let rewards = pot::settle(&contributions);
        self.winners = (0..2)
            .filter(|&seat| rewards[seat] > 0)
            .map(|seat| Winner {
                seat,
                amount: rewards[seat],
                hand_rank: Some(self.strength(seat).class),
            })
            .collect();
        for seat in 0..2 {
            self.stacks[seat] += rewards[seat];
        }
        self.round = Round::Showdown;
    }

    fn strength(&self, seat: Seat) -> Strength {
        let mut cards: Vec<Card> = self.hole[seat].to_vec();
        cards.extend_from_slice(&self.board);
        evaluate(&cards)
    }
}
