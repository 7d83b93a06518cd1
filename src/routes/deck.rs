//! `/api/deck/*` routes — exporting and importing the whole deck as a file.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::deck::session::{with_session, with_session_mut};
use crate::render;
use crate::routes::util::{get_param, parse_form_body};

// ── GET /api/deck/export ───────────────────────────────────────────

/// Handle GET /api/deck/export
/// Returns a <script> tag that downloads the deck as `flashcards.json`.
/// The JSON is embedded as standard base64 so card text cannot break out of
/// the script literal.
pub fn handle_export_get(_query: &str) -> String {
    let json = with_session(|session| session.store.export_json());
    let encoded = STANDARD.encode(json.as_bytes());
    format!(
        r#"<script>
(function() {{
  var bytes = Uint8Array.from(atob('{encoded}'), function(c) {{ return c.charCodeAt(0); }});
  var b = new Blob([bytes], {{type: 'application/json'}});
  var a = document.createElement('a');
  a.href = URL.createObjectURL(b);
  a.download = 'flashcards.json';
  a.click();
  URL.revokeObjectURL(a.href);
}})();
</script>"#
    )
}

// ── POST /api/deck/import ──────────────────────────────────────────

/// Handle POST /api/deck/import
/// Body: the raw JSON array, or deck={json} (form).
/// Replaces the whole collection and returns the re-rendered deck.
///
/// A deck is always a JSON array, so a body starting with `[` is taken as-is
/// and never parsed as a form; card text containing `deck=` stays intact.
pub fn handle_import_post(body: &str) -> String {
    let raw = body.trim_start();
    let params;
    let json = if raw.starts_with('[') {
        raw
    } else {
        params = parse_form_body(body);
        match get_param(&params, "deck") {
            Some(json) => json,
            None => return render::render_error("Import failed: no deck in request"),
        }
    };

    with_session_mut(|session| match session.store.import_json(json) {
        Ok(change) => {
            session.after_change(&change);
            render::render_deck(session)
        }
        Err(e) => {
            log::warn!("deck import failed: {}", e);
            render::render_error(&format!("Import failed: {}", e))
        }
    })
}
