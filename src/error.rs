//! Error taxonomy for deck operations.
//!
//! Every variant is recovered locally: route handlers turn them into HTML
//! fragments (or an alert script) and the store is left untouched.

use thiserror::Error;

use crate::deck::card::CardId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Front or back was empty after trimming.
    #[error("Enter both sides!")]
    Validation,
    /// No card carries this id.
    #[error("no card with id {0}")]
    NotFound(CardId),
    /// A shuffle animation is still running.
    #[error("a shuffle is already in progress")]
    ShuffleInProgress,
    /// No id above the highest existing one is left to hand out.
    #[error("no card ids left; clear or re-import the deck")]
    IdsExhausted,
    /// An imported deck could not be accepted.
    #[error("import rejected: {0}")]
    Import(String),
}
