use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Roast,
    Defend,
    Compliment,
    Joke,
    Support,
    Conflict,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 6] = [
        InteractionKind::Roast,
        InteractionKind::Defend,
        InteractionKind::Compliment,
        InteractionKind::Joke,
        InteractionKind::Support,
        InteractionKind::Conflict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Roast => "roast",
            InteractionKind::Defend => "defend",
            InteractionKind::Compliment => "compliment",
            InteractionKind::Joke => "joke",
            InteractionKind::Support => "support",
            InteractionKind::Conflict => "conflict",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.iter().copied().find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    pub fn delta(&self, success: bool) -> i32 {
        match (self, success) {
            (InteractionKind::Roast, true) => -3,
            (InteractionKind::Roast, false) => -1,
            (InteractionKind::Defend, true) => 5,
            (InteractionKind::Defend, false) => 2,
            (InteractionKind::Compliment, true) => 4,
            (InteractionKind::Compliment, false) => 1,
            (InteractionKind::Joke, true) => 2,
            (InteractionKind::Joke, false) => -1,
            (InteractionKind::Support, true) => 3,
            (InteractionKind::Support, false) => 1,
            (InteractionKind::Conflict, true) => -5,
            (InteractionKind::Conflict, false) => -2,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
