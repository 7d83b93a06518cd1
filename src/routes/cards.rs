//! `/api/deck`, `/api/cards/*` and `/api/filter` routes — card mutations and
//! the filtered list.
//!
//! Mutating handlers run the store operation, let the session reset its
//! per-render state, then return the re-rendered fragment the caller's
//! `hx-target` expects (`#deck`, `#flashcards`, or a single `.card`).

use crate::deck::animator::Wake;
use crate::deck::card::Filter;
use crate::deck::session::{CardClick, with_session, with_session_mut};
use crate::error::DeckError;
use crate::render;
use crate::routes::util::{get_card_id, get_param, parse_form_body, parse_query};

// ── GET /api/deck ──────────────────────────────────────────────────

/// Handle GET /api/deck — the whole panel (toolbar, list, prompt).
pub fn handle_deck_get(_query: &str) -> String {
    with_session(render::render_deck)
}

// ── GET /api/cards ─────────────────────────────────────────────────

/// Handle GET /api/cards
/// Query: ?filter=all|mastered|unmastered (optional)
///
/// The `#flashcards` list. `filter` only picks which view to render; the
/// session's active filter changes through POST /api/filter.
pub fn handle_list_get(query: &str) -> String {
    let params = parse_query(query);
    match get_param(&params, "filter").map(Filter::parse) {
        None => with_session(render::render_card_list),
        Some(Some(filter)) => with_session(|session| render::render_card_list_for(session, filter)),
        Some(None) => render::render_error("Unknown filter"),
    }
}

// ── POST /api/cards/add ────────────────────────────────────────────

/// Handle POST /api/cards/add
/// Body: front={text}&back={text}
///
/// On success returns the deck with cleared inputs. On an empty side returns
/// the deck with the typed text kept, plus a blocking alert.
pub fn handle_add_post(body: &str) -> String {
    let params = parse_form_body(body);
    let front = get_param(&params, "front").unwrap_or("");
    let back = get_param(&params, "back").unwrap_or("");

    with_session_mut(|session| match session.store.add(front, back) {
        Ok(change) => {
            session.after_change(&change);
            render::render_deck(session)
        }
        Err(e) => {
            let mut html = render::render_deck_with_draft(session, front, back);
            html.push_str(&render::render_alert(&e.to_string()));
            html
        }
    })
}

// ── POST /api/cards/flip ───────────────────────────────────────────

/// Handle POST /api/cards/flip
/// Body: id={card id}
///
/// A card body click. In delete mode it toggles the card's selection; otherwise
/// it flips the card unless a shuffle is running. Returns the card node.
pub fn handle_flip_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(id) = get_card_id(&params) else {
        return render::render_error("Missing card id");
    };

    with_session_mut(|session| {
        let Some(card) = session.store.get(id) else {
            return String::new();
        };
        let card = card.clone();
        match session.click_card(id) {
            CardClick::Selected(on) => log::debug!("card {} selected={}", id, on),
            CardClick::Flipped(on) => log::trace!("card {} flipped={}", id, on),
            CardClick::Ignored => log::trace!("flip ignored for card {}", id),
        }
        render::render_card(&render::CardView::from_card(&card, session))
    })
}

// ── POST /api/cards/mastered ───────────────────────────────────────

/// Handle POST /api/cards/mastered
/// Body: id={card id}
///
/// Toggles mastery and re-renders the list. Unknown ids are ignored.
pub fn handle_mastered_post(body: &str) -> String {
    let params = parse_form_body(body);
    let id = get_card_id(&params);

    with_session_mut(|session| {
        if let Some(id) = id {
            match session.store.toggle_mastered(id) {
                Ok(change) => session.after_change(&change),
                Err(DeckError::NotFound(_)) => log::debug!("mastered toggle for missing card {}", id),
                Err(e) => log::warn!("mastered toggle failed: {}", e),
            }
        }
        render::render_card_list(session)
    })
}

// ── POST /api/cards/shuffle ────────────────────────────────────────

/// Handle POST /api/cards/shuffle
///
/// Permutes the deck, returns the re-rendered list, and hands the animator's
/// first wake to the scheduler. Ignored while a shuffle runs or when empty.
pub fn handle_shuffle_post(_body: &str) -> String {
    let (html, wake) = with_session_mut(|session| {
        let wake = match session.begin_shuffle() {
            Ok(wake) => wake,
            Err(e) => {
                log::debug!("shuffle ignored: {}", e);
                None
            }
        };
        (render::render_card_list(session), wake)
    });
    if let Some(wake) = wake {
        schedule_shuffle(wake);
    }
    html
}

#[cfg(target_arch = "wasm32")]
fn schedule_shuffle(wake: Wake) {
    crate::web::animation::schedule(wake);
}

#[cfg(not(target_arch = "wasm32"))]
fn schedule_shuffle(wake: Wake) {
    log::trace!("no browser scheduler; shuffle wake {:?} dropped", wake);
}

// ── POST /api/cards/sample ─────────────────────────────────────────

/// Handle POST /api/cards/sample — replace the deck with the easy set.
/// When no ids are left the deck stays as it was and an alert explains why.
pub fn handle_sample_post(_body: &str) -> String {
    with_session_mut(|session| match session.store.load_sample_set() {
        Ok(change) => {
            session.after_change(&change);
            render::render_deck(session)
        }
        Err(e) => {
            log::warn!("sample set not loaded: {}", e);
            let mut html = render::render_deck(session);
            html.push_str(&render::render_alert(&e.to_string()));
            html
        }
    })
}

// ── POST /api/cards/clear ──────────────────────────────────────────

/// Handle POST /api/cards/clear
/// Body: confirm=yes
///
/// The button carries `hx-confirm`, so the body only arrives once the user
/// accepted. Without `confirm=yes` nothing is deleted.
pub fn handle_clear_post(body: &str) -> String {
    let params = parse_form_body(body);
    let confirmed = get_param(&params, "confirm") == Some("yes");

    with_session_mut(|session| {
        if confirmed {
            let change = session.store.delete_all();
            session.after_change(&change);
        }
        render::render_deck(session)
    })
}

// ── POST /api/filter ───────────────────────────────────────────────

/// Handle POST /api/filter
/// Body: filter=all|mastered|unmastered
pub fn handle_filter_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(filter) = get_param(&params, "filter").and_then(Filter::parse) else {
        return render::render_error("Unknown filter");
    };
    with_session_mut(|session| {
        session.set_filter(filter);
        render::render_deck(session)
    })
}
