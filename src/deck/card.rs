//! Card record, view filter, and the change descriptor returned by mutations.

use serde::{Deserialize, Serialize};

/// Card identifier. Derived from the creation timestamp (milliseconds).
pub type CardId = u64;

/// One front/back study unit. Field names are the persisted JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub mastered: bool,
}

/// View-only predicate narrowing which cards are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Mastered,
    Unmastered,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Mastered, Filter::Unmastered];

    /// Parse a filter name as sent by the filter buttons.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "mastered" => Some(Self::Mastered),
            "unmastered" => Some(Self::Unmastered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Mastered => "mastered",
            Self::Unmastered => "unmastered",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Mastered => "Mastered",
            Self::Unmastered => "Unmastered",
        }
    }

    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Self::All => true,
            Self::Mastered => card.mastered,
            Self::Unmastered => !card.mastered,
        }
    }
}

/// What a store mutation did. Callers use it to decide what to re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added(CardId),
    Toggled { id: CardId, mastered: bool },
    Removed(usize),
    Cleared,
    Shuffled,
    Replaced(usize),
    Unchanged,
}

impl Change {
    /// Whether the visible list must be rebuilt.
    pub fn needs_render(&self) -> bool {
        !matches!(self, Change::Unchanged)
    }
}
