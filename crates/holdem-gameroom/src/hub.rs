use crate::error::{ErrorCode, TableError};
use crate::protocol::{
    ActionKind, ClientMessage, HandId, PlayerId, PlayerSummary, SeatSnapshot, ServerMessage,
    TableSnapshot, WinnerInfo,
};
use crate::table::{ConnectionState, TableManager, TableState};
use crate::timer::{ConnectionTimers, TimerExpired, TimerKind};
use holdem_core::{Chips, GRACE_MS, REMOVAL_MS};
use holdem_gameplay::Action;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

const PLACEHOLDER_HOLE: [&str; 2] = ["??", "??"];

/// Runtime-configurable timeouts, overridden by CLI flags rather than
/// baked into the binary (see the server's clap-derive config).
#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    pub action_timeout_ms: u64,
    pub grace_ms: u64,
    pub removal_ms: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            action_timeout_ms: holdem_core::ACTION_TIMEOUT_MS,
            grace_ms: GRACE_MS,
            removal_ms: REMOVAL_MS,
        }
    }
}

/// The game session hub: owns the table manager, the connection-timer
/// registry, and the bidirectional player-id/connection map. Everything in
/// this type must be driven from a single serialized context (the game
/// loop); it takes no locks of its own because it assumes it already is
/// that serialized context.
pub struct Hub {
    table: TableManager,
    timers: ConnectionTimers,
    connections: HashMap<PlayerId, UnboundedSender<ServerMessage>>,
    config: HubConfig,
}

impl Hub {
    pub fn new(timer_events: UnboundedSender<TimerExpired>) -> Self {
        Self::with_config(timer_events, HubConfig::default())
    }

    pub fn with_config(timer_events: UnboundedSender<TimerExpired>, config: HubConfig) -> Self {
        Self {
            table: TableManager::new(),
            timers: ConnectionTimers::new(timer_events),
            connections: HashMap::new(),
            config,
        }
    }

    fn mint_hand_id(&mut self) -> HandId {
        HandId::default()
    }

    fn send(&self, to: PlayerId, message: ServerMessage) {
        if let Some(tx) = self.connections.get(&to) {
            if tx.send(message).is_err() {
                log::warn!("[hub] send to {to} failed: peer gone");
            }
        }
    }

    fn broadcast(&self, message: ServerMessage) {
        for (id, tx) in &self.connections {
            if tx.send(message.clone()).is_err() {
                log::warn!("[hub] broadcast to {id} failed: peer gone");
            }
        }
    }

    fn snapshot(&self) -> TableSnapshot {
        let mut seats = vec![
            SeatSnapshot {
                player_id: None,
                name: None,
                stack: 0,
            },
            SeatSnapshot {
                player_id: None,
                name: None,
                stack: 0,
            },
        ];
        for player in self.table.players() {
            seats[player.seat] = SeatSnapshot {
                player_id: Some(player.id),
                name: Some(player.name.clone()),
                stack: player.stack,
            };
        }
        let hand = self.table.hand();
        TableSnapshot {
            seats,
            current_hand: self.table.hand_id(),
            pot: hand.map(|h| h.pot()).unwrap_or(0),
            community_cards: hand
                .map(|h| h.board().iter().map(|c| c.format()).collect())
                .unwrap_or_default(),
            dealer_button_position: self.table.dealer(),
        }
    }

    /// Accepts a new raw connection, mints an opaque player-id, registers
    /// the outbox, and sends `welcome`. The minted id is not yet seated;
    /// `join` performs seating (or reconnection rebinding).
    pub fn connect(&mut self, outbox: UnboundedSender<ServerMessage>) -> PlayerId {
        let id = PlayerId::default();
        self.connections.insert(id, outbox);
        self.send(
            id,
            ServerMessage::Welcome {
                player_id: id,
                table: self.snapshot(),
            },
        );
        id
    }

    /// Dispatches one inbound frame already decoded off the wire. Validation
    /// failures reply with an `error` frame rather than closing anything.
    pub fn dispatch(&mut self, from: PlayerId, message: ClientMessage) {
        match message {
            ClientMessage::Join { name, player_id } => self.handle_join(from, name, player_id),
            ClientMessage::Action {
                hand_id,
                action,
                amount,
            } => self.handle_action(from, hand_id, action, amount),
            ClientMessage::Ping => self.send(from, ServerMessage::Pong),
            ClientMessage::TopUp => self.handle_top_up(from),
        }
    }

    fn handle_join(&mut self, connection_id: PlayerId, name: String, rejoin: Option<PlayerId>) {
        if let Some(existing) = rejoin {
            if self.reconnect(existing, connection_id) {
                return;
            }
        }
        match self.table.seat(connection_id, name) {
            Ok(seat) => {
                self.send(
                    connection_id,
                    ServerMessage::JoinAck {
                        player_id: connection_id,
                        seat,
                    },
                );
                if self.table.both_seats_occupied() {
                    self.start_hand();
                }
            }
            Err(err) => self.reply_error(connection_id, err),
        }
    }

    /// Rebinds `existing`'s connection if it's disconnected/reconnecting and
    /// not currently claimed by a live connection. Returns whether the
    /// rebind happened.
    fn reconnect(&mut self, existing: PlayerId, new_connection: PlayerId) -> bool {
        let eligible = self.table.player(existing).is_some_and(|p| {
            matches!(
                p.connection_state,
                ConnectionState::Disconnected | ConnectionState::Reconnecting
            )
        });
        if !eligible {
            return false;
        }
        if let Some(outbox) = self.connections.remove(&new_connection) {
            self.connections.insert(existing, outbox);
        }
        if let Some(player) = self.table.player_mut(existing) {
            player.connection_state = ConnectionState::Connected;
            player.disconnected_at = None;
            player.is_sitting_out = false;
        }
        self.timers.cancel(existing);
        self.broadcast(ServerMessage::PlayerReconnected {
            player_id: existing,
        });
        self.send(
            existing,
            ServerMessage::JoinAck {
                player_id: existing,
                seat: self.table.seat_of(existing).expect("just verified seated"),
            },
        );
        true
    }

    fn start_hand(&mut self) {
        let hand_id = self.mint_hand_id();
        if self.table.start_hand(hand_id).is_err() {
            return;
        }
        let hand = self.table.hand().expect("just started");
        let players: Vec<PlayerSummary> = self
            .table
            .players()
            .map(|p| PlayerSummary {
                player_id: p.id,
                stack: p.stack,
                hole_cards: hand.hole_cards(p.seat).map(|c| c.format()),
            })
            .collect();
        let dealer = self.table.dealer();
        let actor_seat = hand.actor();
        let actor_id = self
            .table
            .players()
            .find(|p| p.seat == actor_seat)
            .map(|p| p.id)
            .expect("both seats occupied");
        let min_raise = hand.min_raise();
        for player in self.table.players() {
            let visible: Vec<PlayerSummary> = players
                .iter()
                .map(|summary| {
                    if summary.player_id == player.id {
                        summary.clone()
                    } else {
                        PlayerSummary {
                            player_id: summary.player_id,
                            stack: summary.stack,
                            hole_cards: [PLACEHOLDER_HOLE[0].to_string(), PLACEHOLDER_HOLE[1].to_string()],
                        }
                    }
                })
                .collect();
            self.send(
                player.id,
                ServerMessage::HandStarted {
                    hand_id,
                    players: visible,
                    small_blind: holdem_core::SMALL_BLIND,
                    big_blind: holdem_core::BIG_BLIND,
                    dealer_position: dealer,
                    current_player_to_act: actor_id,
                    min_raise,
                },
            );
        }
        self.send_action_request(actor_id);
    }

    fn send_action_request(&mut self, actor_id: PlayerId) {
        let Some(hand) = self.table.hand() else {
            return;
        };
        let hand_id = self.table.hand_id().expect("hand in flight");
        let seat = self.table.seat_of(actor_id).expect("actor is seated");
        let call_amount = hand.call_amount(seat);
        let possible_actions: Vec<&'static str> = vec!["fold", "call", "raise"];
        self.send(
            actor_id,
            ServerMessage::ActionRequest {
                hand_id,
                possible_actions,
                call_amount,
                min_raise: hand.min_raise_total(seat),
                max_raise: hand.max_raise_total(seat),
                timeout_ms: self.config.action_timeout_ms,
            },
        );
    }

    fn handle_action(&mut self, from: PlayerId, hand_id: HandId, kind: ActionKind, amount: Chips) {
        if amount < 0 {
            return self.reply_error_code(from, ErrorCode::InvalidAmount, "amount must be non-negative");
        }
        if self.table.hand_id() != Some(hand_id) {
            return self.reply_error_code(from, ErrorCode::InvalidHand, "no such hand in progress");
        }
        let action = match kind {
            ActionKind::Fold => Action::Fold,
            ActionKind::Call => Action::Call { amount },
            ActionKind::Raise => Action::Raise { amount },
        };
        let seat = match self.table.seat_of(from) {
            Some(seat) => seat,
            None => return self.reply_error_code(from, ErrorCode::PlayerNotFound, "not seated"),
        };
        let new_stack = match self.table.process_action(from, action) {
            Ok(()) => self
                .table
                .hand()
                .map(|h| h.stack(seat))
                .unwrap_or_default(),
            Err(err) => return self.reply_error(from, err),
        };
        let pot = self.table.hand().map(|h| h.pot()).unwrap_or(0);
        let next_actor = if self.table.is_hand_complete() {
            None
        } else {
            self.table
                .hand()
                .and_then(|h| self.table.players().find(|p| p.seat == h.actor()))
                .map(|p| p.id)
        };
        self.broadcast(ServerMessage::ActionApplied {
            hand_id,
            player_id: from,
            action: action.label(),
            amount: action.amount(),
            new_stack,
            pot,
            next_player_to_act: next_actor,
        });
        if self.table.is_hand_complete() {
            self.complete_hand(hand_id);
        } else if let Some(actor_id) = next_actor {
            self.send_action_request(actor_id);
        }
    }

    fn complete_hand(&mut self, hand_id: HandId) {
        let winners: Vec<WinnerInfo> = self
            .table
            .hand()
            .map(|h| {
                h.winners()
                    .iter()
                    .map(|w| WinnerInfo {
                        player_id: self
                            .table
                            .players()
                            .find(|p| p.seat == w.seat)
                            .map(|p| p.id)
                            .unwrap_or_default(),
                        amount_won: w.amount,
                        hand_rank: w.hand_rank.map(|r| r.label().to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let pot_distribution: Vec<Chips> = winners.iter().map(|w| w.amount_won).collect();
        match self.table.end_hand() {
            Ok(_) => {
                let updated_stacks: Vec<(PlayerId, Chips)> =
                    self.table.players().map(|p| (p.id, p.stack)).collect();
                self.broadcast(ServerMessage::HandCompleted {
                    hand_id,
                    winners,
                    pot_distribution,
                    updated_stacks,
                });
                if self.table.both_seats_occupied() {
                    self.start_hand();
                }
            }
            Err(_) => log::error!("[hub] end_hand failed after showdown for {hand_id}"),
        }
    }

    fn handle_top_up(&mut self, from: PlayerId) {
        match self.table.top_up(from) {
            Ok(new_stack) => self.send(
                from,
                ServerMessage::TopUpAck {
                    player_id: from,
                    new_stack,
                },
            ),
            Err(err) => self.reply_error(from, err),
        }
    }

    /// Replies to `to` with an `error` frame, for failures detected before
    /// a frame could even be decoded into a `ClientMessage` (malformed
    /// JSON, unknown `type`).
    pub fn dispatch_error(&self, to: PlayerId, code: ErrorCode, message: impl Into<String>) {
        self.reply_error_code(to, code, message);
    }

    fn reply_error(&self, to: PlayerId, err: TableError) {
        self.reply_error_code(to, err.code(), err.to_string());
    }

    fn reply_error_code(&self, to: PlayerId, code: ErrorCode, message: impl Into<String>) {
        self.send(to, ServerMessage::error(code, message));
    }

    /// Drops the connection mapping for a player whose transport died, but
    /// keeps them seated. Starts a grace timer; the removal path runs only
    /// after grace *and* removal both expire without a reconnect.
    pub fn on_disconnect(&mut self, id: PlayerId) {
        self.connections.remove(&id);
        let Some(player) = self.table.player_mut(id) else {
            return;
        };
        player.connection_state = ConnectionState::Disconnected;
        player.disconnected_at = Some(std::time::Instant::now());
        self.timers
            .start_grace(id, Duration::from_millis(self.config.grace_ms));
        self.broadcast(ServerMessage::PlayerDisconnected {
            player_id: id,
            remaining_grace_time_ms: self.config.grace_ms,
        });
    }

    /// Handles a timer firing, posted back from `ConnectionTimers`'s own
    /// task. Must be called from the same serialized context as everything
    /// else in the hub.
    pub fn on_timer_expired(&mut self, event: TimerExpired) {
        match event.kind {
            TimerKind::Grace => self.on_grace_expired(event.player_id),
            TimerKind::Removal => self.on_removal_expired(event.player_id),
        }
    }

    fn on_grace_expired(&mut self, id: PlayerId) {
        let is_actor = self
            .table
            .hand()
            .zip(self.table.seat_of(id))
            .is_some_and(|(h, seat)| h.actor() == seat);
        if let Some(player) = self.table.player_mut(id) {
            player.is_sitting_out = true;
        } else {
            return;
        }
        if is_actor {
            let hand_id = self.table.hand_id();
            if self.table.process_action(id, Action::Fold).is_ok() {
                if let Some(hand_id) = hand_id {
                    let pot = self.table.hand().map(|h| h.pot()).unwrap_or(0);
                    self.broadcast(ServerMessage::ActionApplied {
                        hand_id,
                        player_id: id,
                        action: "fold",
                        amount: 0,
                        new_stack: self
                            .table
                            .player(id)
                            .map(|p| p.stack)
                            .unwrap_or_default(),
                        pot,
                        next_player_to_act: None,
                    });
                    if self.table.is_hand_complete() {
                        self.complete_hand(hand_id);
                    }
                }
            }
        }
        self.timers
            .start_removal(id, Duration::from_millis(self.config.removal_ms));
    }

    fn on_removal_expired(&mut self, id: PlayerId) {
        self.timers.cancel(id);
        if let Ok(Some(seat)) = self.table.remove_player(id) {
            if self.table.is_hand_complete() {
                if let Some(hand_id) = self.table.hand_id() {
                    self.complete_hand(hand_id);
                }
            }
            self.broadcast(ServerMessage::PlayerRemoved { player_id: id, seat });
        }
    }

    pub fn table_state(&self) -> TableState {
        self.table.state()
    }
}
