//! Render cycle — view models and HTML fragments for HTMX to swap in.
//!
//! Cards are first mapped to [`CardView`] records (pure, no markup), then
//! rendered. Every rebuild of `#flashcards` produces fresh, unflipped nodes in
//! filtered order, so calling it twice on unchanged state yields the same HTML.
//!
//! DOM contract: `#deck` wraps the toolbar, the `#flashcards` list and the
//! `#confirmOverlay` prompt. Each card is `.card#card-{id}`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::deck::card::{Card, CardId, Filter};
use crate::deck::session::Session;

/// Everything the renderer needs to draw one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub mastered: bool,
    pub flipped: bool,
    pub selected: bool,
}

impl CardView {
    pub fn from_card(card: &Card, session: &Session) -> Self {
        Self {
            id: card.id,
            front: card.front.clone(),
            back: card.back.clone(),
            mastered: card.mastered,
            flipped: session.is_flipped(card.id),
            selected: session.selection.is_selected(card.id),
        }
    }
}

/// View models for the current filter, in collection order.
pub fn card_views(session: &Session) -> Vec<CardView> {
    card_views_for(session, session.filter)
}

pub fn card_views_for(session: &Session, filter: Filter) -> Vec<CardView> {
    session
        .store
        .filtered_view(filter)
        .into_iter()
        .map(|card| CardView::from_card(card, session))
        .collect()
}

/// Render a single `.card` node (the flip/select target).
pub fn render_card(view: &CardView) -> String {
    let mut classes = String::from("card");
    if view.mastered {
        classes.push_str(" mastered");
    }
    if view.flipped {
        classes.push_str(" flipped");
    }
    if view.selected {
        classes.push_str(" selected-for-delete");
    }
    let id = view.id;
    let checked = if view.selected { " checked" } else { "" };
    let master_label = if view.mastered { "Unmaster" } else { "Mastered" };

    format!(
        r##"<div class="{classes}" id="card-{id}" hx-post="/api/cards/flip" hx-vals='{{"id":"{id}"}}' hx-target="this" hx-swap="outerHTML">
  <div class="front">
    <input type="checkbox" class="select-card" data-id="{id}" style="margin-bottom:6px"{checked}
      hx-post="/api/select" hx-vals='{{"id":"{id}"}}' hx-target="#card-{id}" hx-swap="outerHTML"
      onclick="event.stopPropagation()">
    <div>{front}</div>
  </div>
  <div class="back">
    <div>{back}</div>
    <button style="margin-top:10px" hx-post="/api/cards/mastered" hx-vals='{{"id":"{id}"}}'
      hx-target="#flashcards" hx-swap="outerHTML" onclick="event.stopPropagation()">{master_label}</button>
  </div>
</div>"##,
        front = encode_text(&view.front),
        back = encode_text(&view.back),
    )
}

/// Render the `#flashcards` list for the session's filter.
pub fn render_card_list(session: &Session) -> String {
    render_card_list_for(session, session.filter)
}

/// Render the `#flashcards` list for `filter`.
///
/// While a shuffle runs the container carries `data-shuffle="{generation}"`,
/// which tells the animator that this list has been swapped into the page.
pub fn render_card_list_for(session: &Session, filter: Filter) -> String {
    let views = card_views_for(session, filter);
    let mut html = String::with_capacity(512 * (views.len() + 1));
    if session.animator.is_shuffling() {
        html.push_str(&format!(
            r#"<div id="flashcards" class="flashcards" data-shuffle="{}">"#,
            session.animator.generation()
        ));
    } else {
        html.push_str(r#"<div id="flashcards" class="flashcards">"#);
    }
    for view in &views {
        html.push_str(r#"<div class="flashcard">"#);
        html.push_str(&render_card(view));
        html.push_str("</div>");
    }
    if views.is_empty() {
        html.push_str(r#"<p class="empty-deck">No cards to show.</p>"#);
    }
    html.push_str("</div>");
    html
}

/// Render the whole `#deck` panel with empty add inputs.
pub fn render_deck(session: &Session) -> String {
    render_deck_with_draft(session, "", "")
}

/// Render the `#deck` panel, keeping whatever was typed into the add inputs.
pub fn render_deck_with_draft(session: &Session, front: &str, back: &str) -> String {
    let delete_mode = session.selection.is_active();
    let mut html = String::with_capacity(4096);

    html.push_str(&format!(
        r#"<div id="deck" class="deck{}">"#,
        if delete_mode { " delete-mode" } else { "" }
    ));

    // Add form
    html.push_str(&format!(
        r##"<form class="add-card" hx-post="/api/cards/add" hx-target="#deck" hx-swap="outerHTML">
  <input type="text" id="frontInput" name="front" placeholder="Front" value="{}">
  <input type="text" id="backInput" name="back" placeholder="Back" value="{}">
  <button type="submit">Add</button>
</form>"##,
        encode_double_quoted_attribute(front),
        encode_double_quoted_attribute(back),
    ));

    html.push_str(&render_toolbar(session));
    html.push_str(&render_card_list(session));
    if session.selection.is_confirming() {
        html.push_str(&render_confirm_overlay(session.selection.selected_count()));
    }
    html.push_str(r#"<div id="deck-script"></div>"#);
    html.push_str("</div>");
    html
}

fn render_toolbar(session: &Session) -> String {
    let delete_mode = session.selection.is_active();
    let mut html = String::with_capacity(2048);
    html.push_str(r#"<div class="toolbar">"#);

    // Filter buttons
    html.push_str(r#"<div class="filters">"#);
    for filter in Filter::ALL {
        let active = if filter == session.filter { " active" } else { "" };
        html.push_str(&format!(
            r##"<button class="filter-btn{active}" hx-post="/api/filter" hx-vals='{{"filter":"{name}"}}' hx-target="#deck" hx-swap="outerHTML">{label}</button>"##,
            name = filter.as_str(),
            label = filter.label(),
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        r##"<button id="deleteModeBtn" hx-post="/api/delete-mode" hx-target="#deck" hx-swap="outerHTML">Delete Mode: {}</button>"##,
        if delete_mode { "ON" } else { "OFF" }
    ));
    if delete_mode {
        html.push_str(
            r##"<button id="deleteSelectedBtn" hx-post="/api/delete-mode/request" hx-target="#deck" hx-swap="outerHTML">Delete Selected</button>"##,
        );
    }
    html.push_str(
        r##"<button hx-post="/api/cards/clear" hx-vals='{"confirm":"yes"}' hx-confirm="Delete ALL flashcards? This cannot be undone." hx-target="#deck" hx-swap="outerHTML">Delete All</button>"##,
    );
    html.push_str(
        r##"<button hx-post="/api/cards/sample" hx-target="#deck" hx-swap="outerHTML">Load Easy Set</button>"##,
    );
    html.push_str(
        r##"<button id="shuffleBtn" hx-post="/api/cards/shuffle" hx-target="#flashcards" hx-swap="outerHTML">Shuffle</button>"##,
    );
    html.push_str(
        r##"<button hx-get="/api/deck/export" hx-target="#deck-script" hx-swap="innerHTML">Export</button>"##,
    );

    let total = session.store.len();
    html.push_str(&format!(
        r#"<span class="card-count">{} card{}</span>"#,
        total,
        if total == 1 { "" } else { "s" }
    ));
    html.push_str("</div>");
    html
}

/// The bulk-delete confirmation prompt.
pub fn render_confirm_overlay(count: usize) -> String {
    format!(
        r##"<div id="confirmOverlay" class="confirm-overlay" style="display:flex">
  <div class="confirm-box">
    <p>Delete {count} selected card{plural}?</p>
    <button hx-post="/api/delete-mode/confirm" hx-target="#deck" hx-swap="outerHTML">Delete</button>
    <button hx-post="/api/delete-mode/cancel" hx-target="#deck" hx-swap="outerHTML">Cancel</button>
  </div>
</div>"##,
        plural = if count == 1 { "" } else { "s" },
    )
}

/// A blocking browser alert, swapped in alongside a fragment.
pub fn render_alert(message: &str) -> String {
    let json = serde_json::to_string(message).unwrap_or_else(|_| "\"\"".to_string());
    format!("<script>alert({});</script>", json.replace("</", "<\\/"))
}

/// Inline error fragment.
pub fn render_error(message: &str) -> String {
    format!(
        r#"<span class="text-red-600">{}</span>"#,
        encode_text(message)
    )
}
