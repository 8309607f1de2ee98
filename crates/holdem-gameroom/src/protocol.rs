use crate::error::ErrorCode;
use crate::table::{HandMarker, PlayerMarker};
use holdem_core::{Chips, Seat, ID};
use serde::{Deserialize, Serialize};

pub type PlayerId = ID<PlayerMarker>;
pub type HandId = ID<HandMarker>;

/// The three wire spellings of a player action; `call` with `amount: 0` is
/// the legal spelling of a check, matching `holdem_gameplay::Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Call,
    Raise,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub player_id: Option<PlayerId>,
    pub name: Option<String>,
    pub stack: Chips,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub seats: Vec<SeatSnapshot>,
    pub current_hand: Option<HandId>,
    pub pot: Chips,
    pub community_cards: Vec<String>,
    pub dealer_button_position: Seat,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub stack: Chips,
    pub hole_cards: [String; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct WinnerInfo {
    pub player_id: PlayerId,
    pub amount_won: Chips,
    pub hand_rank: Option<String>,
}

/// Every frame on the wire is `{"type": <variant name>, "payload": <fields>}`,
/// the `tag`/`content` (adjacently tagged) serde representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        name: String,
        #[serde(default)]
        player_id: Option<PlayerId>,
    },
    Action {
        hand_id: HandId,
        action: ActionKind,
        amount: Chips,
    },
    Ping,
    TopUp,
}

/// Why a frame failed to become a `ClientMessage`, distinguishing the three
/// cases the error taxonomy (see §7) reports separately: the text wasn't
/// JSON at all, the envelope named a `type` we don't recognize, or the
/// `type` was recognized but its `payload` was missing/malformed fields.
#[derive(Debug)]
pub enum DecodeError {
    InvalidJson(String),
    InvalidMessageType(String),
    InvalidInput(String),
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::InvalidJson(_) => ErrorCode::InvalidJson,
            DecodeError::InvalidMessageType(_) => ErrorCode::InvalidMessageType,
            DecodeError::InvalidInput(_) => ErrorCode::InvalidInput,
        }
    }
    pub fn message(&self) -> String {
        match self {
            DecodeError::InvalidJson(e) => format!("could not parse frame: {e}"),
            DecodeError::InvalidMessageType(t) => format!("unknown message type: {t}"),
            DecodeError::InvalidInput(e) => format!("invalid input: {e}"),
        }
    }
}

impl ClientMessage {
    /// Decodes one text frame, classifying failures per the error taxonomy
    /// instead of collapsing them all into "malformed JSON".
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        let Some(type_field) = value.get("type").and_then(|t| t.as_str()) else {
            return Err(DecodeError::InvalidJson(
                "frame is missing a string \"type\" field".to_string(),
            ));
        };
        match type_field {
            "join" | "action" | "ping" | "top_up" => {
                serde_json::from_value(value).map_err(|e| DecodeError::InvalidInput(e.to_string()))
            }
            other => Err(DecodeError::InvalidMessageType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        player_id: PlayerId,
        table: TableSnapshot,
    },
    JoinAck {
        player_id: PlayerId,
        seat: Seat,
    },
    HandStarted {
        hand_id: HandId,
        players: Vec<PlayerSummary>,
        small_blind: Chips,
        big_blind: Chips,
        dealer_position: Seat,
        current_player_to_act: PlayerId,
        min_raise: Chips,
    },
    ActionRequest {
        hand_id: HandId,
        possible_actions: Vec<&'static str>,
        call_amount: Chips,
        min_raise: Chips,
        max_raise: Chips,
        timeout_ms: u64,
    },
    ActionApplied {
        hand_id: HandId,
        player_id: PlayerId,
        action: &'static str,
        amount: Chips,
        new_stack: Chips,
        pot: Chips,
        next_player_to_act: Option<PlayerId>,
    },
    HandCompleted {
        hand_id: HandId,
        winners: Vec<WinnerInfo>,
        pot_distribution: Vec<Chips>,
        updated_stacks: Vec<(PlayerId, Chips)>,
    },
    TopUpAck {
        player_id: PlayerId,
        new_stack: Chips,
    },
    Pong,
    PlayerDisconnected {
        player_id: PlayerId,
        remaining_grace_time_ms: u64,
    },
    PlayerReconnected {
        player_id: PlayerId,
    },
    PlayerRemoved {
        player_id: PlayerId,
        seat: Seat,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code,
            message: message.into(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("server message always serializes")
    }
}
