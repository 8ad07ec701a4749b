use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Action {
    Fold = 0,
    Check = 1,
    Call = 2,
    Raise = 3,
    AllIn = 4,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Fold,
        Action::Check,
        Action::Call,
        Action::Raise,
        Action::AllIn,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Action::Fold),
            1 => Some(Action::Check),
            2 => Some(Action::Call),
            3 => Some(Action::Raise),
            4 => Some(Action::AllIn),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Fold => "FOLD",
            Action::Check => "CHECK",
            Action::Call => "CALL",
            Action::Raise => "RAISE",
            Action::AllIn => "ALL-IN",
        };
        f.write_str(label)
    }
}
