//! Persistence adapter — mirrors the whole deck as JSON under one key.
//!
//! The stored value is always fully overwritten on save. Reads never fail
//! upward: a missing or corrupt value yields an empty deck.

use std::collections::HashMap;

use crate::deck::card::Card;

/// A synchronous string key-value store (browser localStorage or in-memory).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Overwrite the value under `key`. Failures are logged by the implementor.
    fn set(&mut self, key: &str, value: &str);
}

/// HashMap-backed store used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with a raw value (e.g. a corrupt payload in tests).
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.set(key, value);
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Reads and writes the card collection under a fixed key.
pub struct Persistence {
    key: String,
    backend: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(key: impl Into<String>, backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            backend,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored deck. Absent or unparsable values give an empty deck.
    pub fn load(&self) -> Vec<Card> {
        let Some(raw) = self.backend.get(&self.key) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Card>>(&raw) {
            Ok(cards) => cards,
            Err(e) => {
                log::warn!("discarding unreadable deck under '{}': {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Serialize the full deck and overwrite the stored value.
    pub fn save(&mut self, cards: &[Card]) {
        match serde_json::to_string(cards) {
            Ok(json) => self.backend.set(&self.key, &json),
            Err(e) => log::warn!("failed to serialize deck: {}", e),
        }
    }

    /// The raw stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.backend.get(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Card> {
        vec![
            Card {
                id: 1,
                front: "2+2=?".into(),
                back: "4".into(),
                mastered: false,
            },
            Card {
                id: 2,
                front: "Capital of France?".into(),
                back: "Paris".into(),
                mastered: true,
            },
        ]
    }

    #[test]
    fn absent_value_loads_empty() {
        let p = Persistence::new("flashcards", Box::new(MemoryStore::new()));
        assert!(p.load().is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty() {
        let store = MemoryStore::with_value("flashcards", "[{not json");
        let p = Persistence::new("flashcards", Box::new(store));
        assert!(p.load().is_empty());
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let store = MemoryStore::with_value("flashcards", r#"{"cards":[]}"#);
        let p = Persistence::new("flashcards", Box::new(store));
        assert!(p.load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let mut p = Persistence::new("flashcards", Box::new(MemoryStore::new()));
        p.save(&sample());
        assert_eq!(p.load(), sample());
    }

    #[test]
    fn save_overwrites_previous_value() {
        let mut p = Persistence::new("flashcards", Box::new(MemoryStore::new()));
        p.save(&sample());
        p.save(&[]);
        assert_eq!(p.raw().as_deref(), Some("[]"));
        assert!(p.load().is_empty());
    }
}
