use crate::error::TableError;
use holdem_core::{Chips, Seat, ID, STARTING_STACK, TOP_UP_TARGET, TOP_UP_THRESHOLD};
use holdem_gameplay::{Action, Hand, Round, Winner};

/// Marker type for player identifiers; never constructed.
pub struct PlayerMarker;
/// Marker type for hand identifiers; never constructed.
pub struct HandMarker;

pub type PlayerId = ID<PlayerMarker>;
pub type HandId = ID<HandMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Reconnecting,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub stack: Chips,
    pub seat: Seat,
    pub connection_state: ConnectionState,
    pub disconnected_at: Option<std::time::Instant>,
    pub is_sitting_out: bool,
}

impl Player {
    fn new(id: PlayerId, name: String, seat: Seat) -> Self {
        Self {
            id,
            name,
            stack: STARTING_STACK,
            seat,
            connection_state: ConnectionState::Connected,
            disconnected_at: None,
            is_sitting_out: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    WaitingForPlayers,
    HandInProgress,
    HandComplete,
}

/// Seats two players and orchestrates the hand lifecycle between them.
/// Every mutating method assumes it runs inside the hub's single serialized
/// execution context (see the concurrency model); nothing here is `Sync`
/// by itself and none of it should be shared across threads without that
/// external discipline.
pub struct TableManager {
    seats: [Option<Player>; 2],
    hand: Option<Hand>,
    hand_id: Option<HandId>,
    dealer: Seat,
    state: TableState,
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TableManager {
    pub fn new() -> Self {
        Self {
            seats: [None, None],
            hand: None,
            hand_id: None,
            dealer: 0,
            state: TableState::WaitingForPlayers,
        }
    }

    pub fn state(&self) -> TableState {
        self.state
    }
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.seats.iter().filter_map(|s| s.as_ref())
    }
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players().find(|p| p.id == id)
    }
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.seats.iter_mut().flatten().find(|p| p.id == id)
    }
    pub fn seat_of(&self, id: PlayerId) -> Option<Seat> {
        self.player(id).map(|p| p.seat)
    }
    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }
    pub fn hand_id(&self) -> Option<HandId> {
        self.hand_id
    }
    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    /// Seats `id` at the first empty seat, provided `id` isn't already
    /// seated and no hand is running that would make the table full-width.
    pub fn seat(&mut self, id: PlayerId, name: String) -> Result<Seat, TableError> {
        if self.player(id).is_some() {
            return Err(TableError::SeatUnavailable);
        }
        let empty = self.seats.iter().position(Option::is_none);
        let Some(seat) = empty else {
            return Err(TableError::TableFull);
        };
        self.seats[seat] = Some(Player::new(id, name, seat));
        Ok(seat)
    }

    pub fn both_seats_occupied(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    /// Starts a new hand with the current dealer button. Both seats must be
    /// occupied and no hand may currently be in flight.
    pub fn start_hand(&mut self, hand_id: HandId) -> Result<(), TableError> {
        if self.state == TableState::HandInProgress {
            return Err(TableError::HandInProgress);
        }
        if !self.both_seats_occupied() {
            return Err(TableError::TableFull);
        }
        let stacks = [
            self.seats[0].as_ref().unwrap().stack,
            self.seats[1].as_ref().unwrap().stack,
        ];
        self.hand = Some(Hand::start(self.dealer, stacks));
        self.hand_id = Some(hand_id);
        self.state = TableState::HandInProgress;
        Ok(())
    }

    /// Resolves `player_id` to a seat, rejects if they aren't the current
    /// actor, and delegates to the in-flight hand.
    pub fn process_action(&mut self, player_id: PlayerId, action: Action) -> Result<(), TableError> {
        let seat = self.seat_of(player_id).ok_or(TableError::PlayerNotFound)?;
        let hand = self.hand.as_mut().ok_or(TableError::NoHandInProgress)?;
        if hand.actor() != seat {
            return Err(TableError::NotYourTurn);
        }
        hand.apply(seat, action).map_err(|_| TableError::InvalidAction)
    }

    pub fn is_hand_complete(&self) -> bool {
        self.hand.as_ref().is_some_and(Hand::is_complete)
    }

    /// Distributes the finished hand's winnings into seated stacks (already
    /// applied by `Hand::apply`/showdown internally — this records them onto
    /// the persistent `Player`s), applies between-hands top-ups, rotates the
    /// dealer button, and returns the table to `WAITING_FOR_PLAYERS`.
    pub fn end_hand(&mut self) -> Result<Vec<Winner>, TableError> {
        let hand = self.hand.take().ok_or(TableError::NoHandInProgress)?;
        if !hand.is_complete() {
            self.hand = Some(hand);
            return Err(TableError::NoHandInProgress);
        }
        for seat in 0..2 {
            if let Some(player) = self.seats[seat].as_mut() {
                player.stack = hand.stack(seat);
            }
        }
        self.hand_id = None;
        self.dealer = 1 - self.dealer;
        self.state = TableState::WaitingForPlayers;
        Ok(hand.winners().to_vec())
    }

    /// Between-hands top-up: only takes effect if the player's stack is at
    /// or below the threshold, in which case it is set (not added) to the
    /// target.
    pub fn top_up(&mut self, id: PlayerId) -> Result<Chips, TableError> {
        if self.state == TableState::HandInProgress {
            return Err(TableError::HandInProgress);
        }
        let player = self.player_mut(id).ok_or(TableError::PlayerNotFound)?;
        if player.stack > TOP_UP_THRESHOLD {
            return Err(TableError::TopUpNotEligible);
        }
        player.stack = TOP_UP_TARGET;
        Ok(player.stack)
    }

    /// Removes a player from the table. If a hand is in flight and the
    /// player is a participant, the remaining player wins uncontested.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Option<Seat>, TableError> {
        let seat = self.seat_of(id).ok_or(TableError::PlayerNotFound)?;
        if self.state == TableState::HandInProgress {
            if let Some(hand) = self.hand.as_mut() {
                if !hand.is_complete() {
                    hand.concede(1 - seat);
                }
            }
        }
        self.seats[seat] = None;
        self.state = TableState::WaitingForPlayers;
        Ok(Some(seat))
    }

    pub fn current_round(&self) -> Option<Round> {
        self.hand.as_ref().map(Hand::round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid() -> PlayerId {
        PlayerId::default()
    }

    #[test]
    fn seating_fills_empty_seats_in_order() {
        let mut table = TableManager::new();
        let a = pid();
        let b = pid();
        assert_eq!(table.seat(a, "alice".into()).unwrap(), 0);
        assert_eq!(table.seat(b, "bob".into()).unwrap(), 1);
        assert!(table.both_seats_occupied());
    }

    #[test]
    fn seating_a_third_player_is_rejected() {
        let mut table = TableManager::new();
        table.seat(pid(), "a".into()).unwrap();
        table.seat(pid(), "b".into()).unwrap();
        assert_eq!(table.seat(pid(), "c".into()), Err(TableError::TableFull));
    }

    #[test]
    fn start_hand_requires_both_seats() {
        let mut table = TableManager::new();
        table.seat(pid(), "a".into()).unwrap();
        assert_eq!(table.start_hand(HandId::default()), Err(TableError::TableFull));
    }

    #[test]
    fn process_action_rejects_non_actor() {
        let mut table = TableManager::new();
        let a = pid();
        let b = pid();
        table.seat(a, "a".into()).unwrap();
        table.seat(b, "b".into()).unwrap();
        table.start_hand(HandId::default()).unwrap();
        // dealer (seat 0, player a) acts first preflop
        assert_eq!(
            table.process_action(b, Action::Fold),
            Err(TableError::NotYourTurn)
        );
    }

    #[test]
    fn end_hand_rotates_the_dealer_button() {
        let mut table = TableManager::new();
        let a = pid();
        let b = pid();
        table.seat(a, "a".into()).unwrap();
        table.seat(b, "b".into()).unwrap();
        table.start_hand(HandId::default()).unwrap();
        table.process_action(a, Action::Fold).unwrap();
        assert!(table.is_hand_complete());
        table.end_hand().unwrap();
        assert_eq!(table.dealer(), 1);
        assert_eq!(table.state(), TableState::WaitingForPlayers);
    }

    #[test]
    fn top_up_only_applies_below_threshold() {
        let mut table = TableManager::new();
        let a = pid();
        table.seat(a, "a".into()).unwrap();
        assert_eq!(table.top_up(a), Err(TableError::TopUpNotEligible));
        table.player_mut(a).unwrap().stack = TOP_UP_THRESHOLD;
        assert_eq!(table.top_up(a), Ok(TOP_UP_TARGET));
    }

    #[test]
    fn removing_a_participant_awards_the_hand_to_the_survivor() {
        let mut table = TableManager::new();
        let a = pid();
        let b = pid();
        table.seat(a, "a".into()).unwrap();
        table.seat(b, "b".into()).unwrap();
        table.start_hand(HandId::default()).unwrap();
        table.remove_player(a).unwrap();
        assert!(table.player(a).is_none());
    }
}
