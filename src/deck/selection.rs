//! Delete-mode state machine.
//!
//! In `DeleteMode`, clicking a card checks it for removal instead of flipping
//! it. A confirmation prompt opens only when at least one card is checked;
//! confirming hands the checked ids to [`CardStore::delete_by_ids`].

use std::collections::BTreeSet;

use crate::deck::card::{CardId, Change, Filter};
use crate::deck::store::CardStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Normal,
    DeleteMode {
        selected: BTreeSet<CardId>,
        /// Whether the confirmation prompt is showing.
        confirming: bool,
    },
}

impl Selection {
    pub fn is_active(&self) -> bool {
        matches!(self, Selection::DeleteMode { .. })
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self, Selection::DeleteMode { confirming: true, .. })
    }

    /// Card flips are suppressed while delete mode is on.
    pub fn flips_allowed(&self) -> bool {
        !self.is_active()
    }

    pub fn is_selected(&self, id: CardId) -> bool {
        match self {
            Selection::DeleteMode { selected, .. } => selected.contains(&id),
            Selection::Normal => false,
        }
    }

    pub fn selected_count(&self) -> usize {
        match self {
            Selection::DeleteMode { selected, .. } => selected.len(),
            Selection::Normal => 0,
        }
    }

    /// Switch delete mode on (empty selection) or off (selection discarded).
    pub fn toggle_mode(&mut self) {
        *self = match self {
            Selection::Normal => Selection::DeleteMode {
                selected: BTreeSet::new(),
                confirming: false,
            },
            Selection::DeleteMode { .. } => Selection::Normal,
        };
        log::debug!("delete mode {}", if self.is_active() { "on" } else { "off" });
    }

    /// Check or uncheck a card. Returns the new checked state; always false in Normal.
    pub fn toggle_select(&mut self, id: CardId) -> bool {
        match self {
            Selection::DeleteMode { selected, .. } => {
                if selected.remove(&id) {
                    false
                } else {
                    selected.insert(id);
                    true
                }
            }
            Selection::Normal => false,
        }
    }

    /// Open the confirmation prompt if anything is checked. Returns whether it is open.
    pub fn request_delete(&mut self) -> bool {
        match self {
            Selection::DeleteMode {
                selected,
                confirming,
            } if !selected.is_empty() => {
                *confirming = true;
                true
            }
            _ => false,
        }
    }

    /// Delete the checked cards and close the prompt.
    ///
    /// Does nothing unless the prompt is open. An empty selection only closes
    /// the prompt. Delete mode stays on afterwards.
    pub fn confirm(&mut self, store: &mut CardStore) -> Option<Change> {
        let Selection::DeleteMode {
            selected,
            confirming,
        } = self
        else {
            return None;
        };
        if !*confirming {
            return None;
        }
        *confirming = false;
        if selected.is_empty() {
            return None;
        }
        let ids = std::mem::take(selected);
        Some(store.delete_by_ids(&ids))
    }

    /// Close the prompt without touching the deck.
    pub fn cancel(&mut self) {
        if let Selection::DeleteMode { confirming, .. } = self {
            *confirming = false;
        }
    }

    /// Drop checked ids that no longer exist in the deck.
    pub fn retain_existing(&mut self, store: &CardStore) {
        self.retain(|id| store.get(id).is_some());
    }

    /// Drop checked ids the filter hides, so a delete only removes cards the
    /// user can see. An open prompt closes if nothing checked remains.
    pub fn retain_visible(&mut self, store: &CardStore, filter: Filter) {
        self.retain(|id| store.get(id).is_some_and(|card| filter.matches(card)));
    }

    fn retain(&mut self, mut keep: impl FnMut(CardId) -> bool) {
        if let Selection::DeleteMode {
            selected,
            confirming,
        } = self
        {
            selected.retain(|id| keep(*id));
            if selected.is_empty() {
                *confirming = false;
            }
        }
    }
}
