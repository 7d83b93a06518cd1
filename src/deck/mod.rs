//! Deck module — the card collection, its persistence, delete-mode selection,
//! and the shuffle animation sequence. Nothing here depends on the DOM.

pub mod animator;
pub mod card;
pub mod clock;
pub mod persist;
pub mod sample;
pub mod selection;
pub mod session;
pub mod store;
