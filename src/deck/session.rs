//! Session state container.
//!
//! Uses `thread_local!` + `RefCell` for mutable access in single-threaded
//! WASM. The module stays alive for the page's lifetime, so the session
//! persists across `handle_request` calls; only the card collection itself is
//! written to storage.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::config::Config;
use crate::deck::animator::{ShuffleAnimator, Wake};
use crate::deck::card::{CardId, Change, Filter};
use crate::deck::clock::SystemClock;
use crate::deck::persist::{KeyValueStore, MemoryStore, Persistence};
use crate::deck::selection::Selection;
use crate::deck::store::CardStore;
use crate::error::DeckError;

/// Result of clicking a card body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardClick {
    /// Delete mode: the card's checkbox was toggled.
    Selected(bool),
    /// The card turned to its back (true) or front (false).
    Flipped(bool),
    /// A shuffle is running; nothing happened.
    Ignored,
}

pub struct Session {
    pub store: CardStore,
    pub selection: Selection,
    pub filter: Filter,
    /// Cards currently showing their back face. Reset by every list rebuild.
    pub flipped: BTreeSet<CardId>,
    pub animator: ShuffleAnimator,
}

impl Session {
    pub fn new(store: CardStore, config: &Config) -> Self {
        Self {
            store,
            selection: Selection::default(),
            filter: Filter::default(),
            flipped: BTreeSet::new(),
            animator: ShuffleAnimator::new(config.timings),
        }
    }

    /// Open a session over `backend` using the wall clock for ids.
    pub fn open(backend: Box<dyn KeyValueStore>, config: &Config) -> Self {
        let persistence = Persistence::new(config.storage_key.clone(), backend);
        Self::new(CardStore::open(persistence, Box::new(SystemClock)), config)
    }

    /// A session backed by an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStore::new()), &Config::default())
    }

    /// Flips are blocked by delete mode and by a running shuffle.
    pub fn flips_allowed(&self) -> bool {
        self.selection.flips_allowed() && !self.animator.is_shuffling()
    }

    pub fn is_flipped(&self, id: CardId) -> bool {
        self.flipped.contains(&id)
    }

    /// Card body click: select in delete mode, otherwise flip when allowed.
    pub fn click_card(&mut self, id: CardId) -> CardClick {
        if self.selection.is_active() {
            return CardClick::Selected(self.selection.toggle_select(id));
        }
        if !self.flips_allowed() {
            return CardClick::Ignored;
        }
        if self.flipped.remove(&id) {
            CardClick::Flipped(false)
        } else {
            self.flipped.insert(id);
            CardClick::Flipped(true)
        }
    }

    /// Switch the visible subset. Flips reset and checks on cards the new
    /// filter hides are dropped.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.flipped.clear();
        self.selection.retain_visible(&self.store, filter);
    }

    /// Bookkeeping after a store mutation: the list is rebuilt, so flips reset
    /// and checked ids of removed cards are dropped.
    pub fn after_change(&mut self, change: &Change) {
        if change.needs_render() {
            self.flipped.clear();
            self.selection.retain_existing(&self.store);
        }
    }

    /// Permute the deck and arm the animator.
    ///
    /// `Ok(None)` when the deck is empty; `Err` while a shuffle is running.
    /// On `Ok(Some(wake))` the caller re-renders, then drives the animator at `wake`.
    pub fn begin_shuffle(&mut self) -> Result<Option<Wake>, DeckError> {
        if self.animator.is_shuffling() {
            return Err(DeckError::ShuffleInProgress);
        }
        let change = self.store.shuffle();
        if change == Change::Unchanged {
            return Ok(None);
        }
        self.after_change(&change);
        self.animator.start().map(Some)
    }
}

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::in_memory());
}

/// Execute a closure with read access to the session.
pub fn with_session<F, R>(f: F) -> R
where
    F: FnOnce(&Session) -> R,
{
    SESSION.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the session.
pub fn with_session_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Session) -> R,
{
    SESSION.with(|s| f(&mut s.borrow_mut()))
}

/// Replace the entire session (used by `init` and tests).
pub fn replace_session(session: Session) {
    SESSION.with(|s| {
        *s.borrow_mut() = session;
    });
}
