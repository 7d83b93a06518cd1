//! Flashdeck in-browser WASM module.
//!
//! Exports `handle_request(method, path, query, body)` for the page's HTMX
//! bridge to call, and `init_deck(config_json)` to open the deck from
//! localStorage. Uses `matchit` for URL routing — the same router engine
//! that powers Axum.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod deck;
pub mod error;
pub mod logging;
pub mod render;
pub mod routes;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::config::Config;
use crate::deck::session::{Session, replace_session};

/// Apply configuration, install the console logger and load the saved deck.
///
/// `config_json` may be empty; see [`Config`] for the accepted fields.
#[wasm_bindgen]
pub fn init_deck(config_json: &str) {
    let config = Config::from_json(config_json);
    logging::init(config.level_filter());
    let session = open_session(&config);
    log::info!(
        "flashdeck ready: {} cards under '{}'",
        session.store.len(),
        config.storage_key
    );
    replace_session(session);
}

#[cfg(target_arch = "wasm32")]
fn open_session(config: &Config) -> Session {
    Session::open(Box::new(web::storage::LocalStorageStore), config)
}

#[cfg(not(target_arch = "wasm32"))]
fn open_session(config: &Config) -> Session {
    Session::open(Box::new(deck::persist::MemoryStore::new()), config)
}

/// Process an HTTP-like request and return an HTML fragment.
///
/// # Arguments
/// * `method` — HTTP method ("GET" or "POST")
/// * `path`   — URL path (e.g., "/api/cards/add")
/// * `query`  — Query string (e.g., "?filter=mastered")
/// * `body`   — Request body (form data). Empty string for GET requests.
///
/// # Returns
/// An HTML string fragment suitable for HTMX to swap into the DOM.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    router.insert("/api/deck", "deck").ok();
    router.insert("/api/cards", "cards").ok();
    router.insert("/api/cards/add", "cards_add").ok();
    router.insert("/api/cards/flip", "cards_flip").ok();
    router.insert("/api/cards/mastered", "cards_mastered").ok();
    router.insert("/api/cards/shuffle", "cards_shuffle").ok();
    router.insert("/api/cards/sample", "cards_sample").ok();
    router.insert("/api/cards/clear", "cards_clear").ok();
    router.insert("/api/filter", "filter").ok();

    router.insert("/api/delete-mode", "delete_mode").ok();
    router.insert("/api/delete-mode/request", "delete_request").ok();
    router.insert("/api/delete-mode/confirm", "delete_confirm").ok();
    router.insert("/api/delete-mode/cancel", "delete_cancel").ok();
    router.insert("/api/select", "select").ok();

    router.insert("/api/deck/export", "deck_export").ok();
    router.insert("/api/deck/import", "deck_import").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("deck", "GET") => routes::cards::handle_deck_get(query),
            ("cards", "GET") => routes::cards::handle_list_get(query),
            ("cards_add", "POST") => routes::cards::handle_add_post(body),
            ("cards_flip", "POST") => routes::cards::handle_flip_post(body),
            ("cards_mastered", "POST") => routes::cards::handle_mastered_post(body),
            ("cards_shuffle", "POST") => routes::cards::handle_shuffle_post(body),
            ("cards_sample", "POST") => routes::cards::handle_sample_post(body),
            ("cards_clear", "POST") => routes::cards::handle_clear_post(body),
            ("filter", "POST") => routes::cards::handle_filter_post(body),

            ("delete_mode", "POST") => routes::selection::handle_mode_post(body),
            ("delete_request", "POST") => routes::selection::handle_request_post(body),
            ("delete_confirm", "POST") => routes::selection::handle_confirm_post(body),
            ("delete_cancel", "POST") => routes::selection::handle_cancel_post(body),
            ("select", "POST") => routes::selection::handle_select_post(body),

            ("deck_export", "GET") => routes::deck::handle_export_get(query),
            ("deck_import", "POST") => routes::deck::handle_import_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-600">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-600">405 — method not allowed</span>"#.to_string()
}
