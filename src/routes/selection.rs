//! `/api/delete-mode/*` and `/api/select` routes — bulk delete.
//!
//! Flow: toggle delete mode → check cards → request (opens the prompt only
//! when something is checked) → confirm or cancel. Turning delete mode off
//! discards every check mark.

use crate::deck::session::with_session_mut;
use crate::render;
use crate::routes::util::{get_card_id, parse_form_body};

// ── POST /api/delete-mode ──────────────────────────────────────────

/// Handle POST /api/delete-mode — flip delete mode on or off.
pub fn handle_mode_post(_body: &str) -> String {
    with_session_mut(|session| {
        session.selection.toggle_mode();
        render::render_deck(session)
    })
}

// ── POST /api/select ───────────────────────────────────────────────

/// Handle POST /api/select
/// Body: id={card id}
///
/// Checkbox click. Toggles the card's check mark in delete mode (no-op
/// otherwise) and returns the card node. Never flips the card.
pub fn handle_select_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(id) = get_card_id(&params) else {
        return render::render_error("Missing card id");
    };
    with_session_mut(|session| {
        let Some(card) = session.store.get(id).cloned() else {
            return String::new();
        };
        session.selection.toggle_select(id);
        render::render_card(&render::CardView::from_card(&card, session))
    })
}

// ── POST /api/delete-mode/request ──────────────────────────────────

/// Handle POST /api/delete-mode/request — open the confirmation prompt.
/// With nothing checked the deck is returned unchanged and no prompt shows.
pub fn handle_request_post(_body: &str) -> String {
    with_session_mut(|session| {
        if !session.selection.request_delete() {
            log::debug!("delete requested with nothing selected");
        }
        render::render_deck(session)
    })
}

// ── POST /api/delete-mode/confirm ──────────────────────────────────

/// Handle POST /api/delete-mode/confirm — delete the checked cards.
pub fn handle_confirm_post(_body: &str) -> String {
    with_session_mut(|session| {
        if let Some(change) = session.selection.confirm(&mut session.store) {
            session.after_change(&change);
        }
        render::render_deck(session)
    })
}

// ── POST /api/delete-mode/cancel ───────────────────────────────────

/// Handle POST /api/delete-mode/cancel — close the prompt, keep everything.
pub fn handle_cancel_post(_body: &str) -> String {
    with_session_mut(|session| {
        session.selection.cancel();
        render::render_deck(session)
    })
}
