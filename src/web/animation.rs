//! DOM surface and browser scheduler for the shuffle animation.
//!
//! The first wake is scheduled while the shuffle request is still being
//! handled, before HTMX swaps the new list in. Each wake re-queries
//! `#flashcards`, and the animator keeps waiting frames until the container's
//! `data-shuffle` stamp matches the running shuffle.

use std::cell::RefCell;

use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::deck::animator::{Effect, Scheduler, Surface, Wake, drive};
use crate::deck::session::with_session_mut;

thread_local! {
    // The pending frame handle must outlive its callback; it is replaced by
    // the next NextFrame wake, which always fires from a timer callback.
    static PENDING_FRAME: RefCell<Option<AnimationFrame>> = const { RefCell::new(None) };
}

/// Schedules [`on_wake`] via requestAnimationFrame or setTimeout.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, wake: Wake) {
        match wake {
            Wake::NextFrame => {
                let frame = request_animation_frame(|_timestamp| on_wake());
                PENDING_FRAME.with(|cell| *cell.borrow_mut() = Some(frame));
            }
            Wake::After(ms) => {
                Timeout::new(ms, on_wake).forget();
            }
        }
    }
}

/// Hand the animator's first wake to the browser.
pub fn schedule(wake: Wake) {
    BrowserScheduler.schedule(wake);
}

fn on_wake() {
    let mut surface = DomSurface::query();
    let running = with_session_mut(|session| {
        drive(&mut session.animator, &mut surface, &mut BrowserScheduler)
    });
    if !running {
        log::debug!("shuffle animation finished");
    }
}

/// The rendered `#flashcards` container and its `.card` nodes.
pub struct DomSurface {
    container: Option<Element>,
    cards: Vec<HtmlElement>,
}

// Classes the stylesheet animates.
const CENTER_START: &str = "center-start";
const CENTER_SHUFFLE: &str = "center-shuffle";
const SPREAD: &str = "spread";

impl DomSurface {
    pub fn query() -> Self {
        let container = gloo::utils::document().get_element_by_id("flashcards");
        let mut cards = Vec::new();
        if let Some(container) = &container {
            if let Ok(nodes) = container.query_selector_all(".card") {
                for i in 0..nodes.length() {
                    if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                        cards.push(el);
                    }
                }
            }
        }
        Self { container, cards }
    }
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::warn!("style {} failed: {:?}", property, e);
    }
}

fn add_class(el: &HtmlElement, class: &str) {
    let _ = el.class_list().add_1(class);
}

fn remove_class(el: &HtmlElement, class: &str) {
    let _ = el.class_list().remove_1(class);
}

impl Surface for DomSurface {
    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn offsets_to_center(&self) -> Vec<(f64, f64)> {
        let Some(container) = &self.container else {
            return vec![(0.0, 0.0); self.cards.len()];
        };
        let rect = container.get_bounding_client_rect();
        let center_x = rect.left() + rect.width() / 2.0;
        let center_y = rect.top() + rect.height() / 2.0;
        self.cards
            .iter()
            .map(|card| {
                let r = card.get_bounding_client_rect();
                (
                    center_x - (r.left() + r.width() / 2.0),
                    center_y - (r.top() + r.height() / 2.0),
                )
            })
            .collect()
    }

    fn rendered_generation(&self) -> Option<u64> {
        self.container
            .as_ref()?
            .get_attribute("data-shuffle")?
            .parse()
            .ok()
    }

    fn apply(&mut self, index: usize, effect: Effect) {
        let Some(card) = self.cards.get(index) else {
            return;
        };
        match effect {
            Effect::Gather { dx, dy } => {
                add_class(card, CENTER_START);
                set_style(card, "transform", &format!("translate({dx}px, {dy}px)"));
            }
            Effect::Shuffle { delay_ms } => {
                set_style(card, "transform", "");
                remove_class(card, CENTER_START);
                add_class(card, CENTER_SHUFFLE);
                set_style(card, "animation-delay", &format!("{delay_ms}ms"));
            }
            Effect::Collect => {
                remove_class(card, CENTER_SHUFFLE);
                set_style(card, "animation-delay", "0ms");
            }
            Effect::Spread => {
                add_class(card, SPREAD);
                set_style(card, "transform", "");
            }
            Effect::Settle => {
                remove_class(card, SPREAD);
                set_style(card, "transform", "");
            }
        }
    }
}
