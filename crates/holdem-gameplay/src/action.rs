use holdem_core::Chips;

/// A player decision. `Call` carries the exact delta needed to match the
/// current bet (zero is the legal spelling of "check"); `Raise` carries the
/// **total** chips the player is committing this action, not the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    Fold,
    Call { amount: Chips },
    Raise { amount: Chips },
}

impl Action {
    pub fn is_fold(&self) -> bool {
        matches!(self, Action::Fold)
    }
    pub fn is_call(&self) -> bool {
        matches!(self, Action::Call { .. })
    }
    pub fn is_raise(&self) -> bool {
        matches!(self, Action::Raise { .. })
    }
    /// Zero-delta call, i.e. a check.
    pub fn is_check(&self) -> bool {
        matches!(self, Action::Call { amount } if *amount == 0)
    }
    pub fn amount(&self) -> Chips {
        match self {
            Action::Fold => 0,
            Action::Call { amount } | Action::Raise { amount } => *amount,
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Call { amount } if *amount == 0 => "check",
            Action::Call { .. } => "call",
            Action::Raise { .. } => "raise",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "FOLD"),
            Action::Call { amount } => write!(f, "CALL {amount}"),
            Action::Raise { amount } => write!(f, "RAISE {amount}"),
        }
    }
}
