//! Card store — the owned, ordered card collection.
//!
//! Every mutation writes the full collection through [`Persistence`] before
//! returning, and reports what happened as a [`Change`].

use std::collections::{BTreeSet, HashSet};

use rand::Rng;

use crate::deck::card::{Card, CardId, Change, Filter};
use crate::deck::clock::Clock;
use crate::deck::persist::Persistence;
use crate::deck::sample::EASY_SET;
use crate::error::DeckError;

pub struct CardStore {
    cards: Vec<Card>,
    persistence: Persistence,
    clock: Box<dyn Clock>,
    /// Highest id handed out (or loaded) so far.
    last_id: CardId,
}

impl CardStore {
    /// Open the store, loading whatever the persistence layer holds.
    pub fn open(persistence: Persistence, clock: Box<dyn Clock>) -> Self {
        let cards = persistence.load();
        let last_id = cards.iter().map(|c| c.id).max().unwrap_or(0);
        log::debug!("opened deck with {} cards", cards.len());
        Self {
            cards,
            persistence,
            clock,
            last_id,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Reserve `count` consecutive ids, the first one timestamp-derived and
    /// strictly greater than any id seen so far. Returns the first id.
    ///
    /// Loaded or imported decks may carry ids near `u64::MAX`; when the block
    /// does not fit nothing is reserved.
    fn reserve_ids(&mut self, count: u64) -> Result<CardId, DeckError> {
        let first = self
            .last_id
            .checked_add(1)
            .map(|floor| self.clock.now_millis().max(floor))
            .ok_or(DeckError::IdsExhausted)?;
        let last = first
            .checked_add(count.saturating_sub(1))
            .ok_or(DeckError::IdsExhausted)?;
        self.last_id = last;
        Ok(first)
    }

    fn persist(&mut self) {
        self.persistence.save(&self.cards);
    }

    /// Append a new unmastered card. Both sides are trimmed and must be non-empty.
    pub fn add(&mut self, front: &str, back: &str) -> Result<Change, DeckError> {
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() || back.is_empty() {
            return Err(DeckError::Validation);
        }
        let id = self.reserve_ids(1)?;
        self.cards.push(Card {
            id,
            front: front.to_string(),
            back: back.to_string(),
            mastered: false,
        });
        self.persist();
        log::debug!("added card {}", id);
        Ok(Change::Added(id))
    }

    pub fn toggle_mastered(&mut self, id: CardId) -> Result<Change, DeckError> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DeckError::NotFound(id))?;
        card.mastered = !card.mastered;
        let mastered = card.mastered;
        self.persist();
        Ok(Change::Toggled { id, mastered })
    }

    /// Remove every card whose id is in `ids`. Persists even when nothing matched.
    pub fn delete_by_ids(&mut self, ids: &BTreeSet<CardId>) -> Change {
        let before = self.cards.len();
        self.cards.retain(|c| !ids.contains(&c.id));
        let removed = before - self.cards.len();
        self.persist();
        log::debug!("deleted {} of {} requested cards", removed, ids.len());
        Change::Removed(removed)
    }

    /// Empty the collection. Callers obtain confirmation first.
    pub fn delete_all(&mut self) -> Change {
        self.cards.clear();
        self.persist();
        log::debug!("cleared deck");
        Change::Cleared
    }

    pub fn shuffle(&mut self) -> Change {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Fisher–Yates: for i from the last index down to 1, swap with j in [0, i].
    pub fn shuffle_with<R: Rng>(&mut self, rng: &mut R) -> Change {
        if self.cards.is_empty() {
            return Change::Unchanged;
        }
        for i in (1..self.cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            self.cards.swap(i, j);
        }
        self.persist();
        Change::Shuffled
    }

    /// Cards matching `filter`, in collection order.
    pub fn filtered_view(&self, filter: Filter) -> Vec<&Card> {
        self.cards.iter().filter(|c| filter.matches(c)).collect()
    }

    /// Replace the collection with the bundled sample set.
    pub fn load_sample_set(&mut self) -> Result<Change, DeckError> {
        let first = self.reserve_ids(EASY_SET.len() as u64)?;
        self.cards = EASY_SET
            .iter()
            .enumerate()
            .map(|(offset, &(front, back))| Card {
                id: first + offset as u64,
                front: front.to_string(),
                back: back.to_string(),
                mastered: false,
            })
            .collect();
        self.persist();
        log::debug!("loaded sample set");
        Ok(Change::Replaced(self.cards.len()))
    }

    /// The deck as pretty JSON, in the persisted record format.
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.cards).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace the collection with an exported deck. Rejected input changes nothing.
    pub fn import_json(&mut self, json: &str) -> Result<Change, DeckError> {
        let mut cards: Vec<Card> =
            serde_json::from_str(json).map_err(|e| DeckError::Import(e.to_string()))?;

        let mut seen = HashSet::with_capacity(cards.len());
        for card in &mut cards {
            card.front = card.front.trim().to_string();
            card.back = card.back.trim().to_string();
            if card.front.is_empty() || card.back.is_empty() {
                return Err(DeckError::Validation);
            }
            if !seen.insert(card.id) {
                return Err(DeckError::Import(format!("duplicate card id {}", card.id)));
            }
        }

        if let Some(max) = cards.iter().map(|c| c.id).max() {
            self.last_id = self.last_id.max(max);
        }
        self.cards = cards;
        self.persist();
        log::info!("imported {} cards", self.cards.len());
        Ok(Change::Replaced(self.cards.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::clock::FixedClock;
    use crate::deck::persist::{KeyValueStore, MemoryStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn open_empty() -> CardStore {
        CardStore::open(
            Persistence::new("flashcards", Box::new(MemoryStore::new())),
            Box::new(FixedClock(1_000)),
        )
    }

    fn open_with(n: usize) -> CardStore {
        let mut store = open_empty();
        for i in 0..n {
            store.add(&format!("q{i}"), &format!("a{i}")).unwrap();
        }
        store
    }

    fn ids(store: &CardStore) -> Vec<CardId> {
        store.cards().iter().map(|c| c.id).collect()
    }

    #[test]
    fn add_appends_and_persists() {
        let mut store = open_empty();
        let change = store.add("  2+2=?  ", " 4 ").unwrap();
        assert_eq!(change, Change::Added(1_000));
        assert_eq!(
            store.cards(),
            &[Card {
                id: 1_000,
                front: "2+2=?".into(),
                back: "4".into(),
                mastered: false,
            }]
        );
        assert_eq!(store.persistence().load(), store.cards());
    }

    #[test]
    fn add_rejects_blank_sides_without_writing() {
        let mut store = open_empty();
        assert_eq!(store.add("   ", "4"), Err(DeckError::Validation));
        assert_eq!(store.add("2+2", ""), Err(DeckError::Validation));
        assert!(store.is_empty());
        assert!(store.persistence().raw().is_none());
    }

    #[test]
    fn ids_stay_unique_when_clock_stalls() {
        let store = open_with(5);
        let mut unique = ids(&store);
        unique.dedup();
        assert_eq!(unique, vec![1_000, 1_001, 1_002, 1_003, 1_004]);
    }

    #[test]
    fn ids_continue_past_loaded_cards() {
        let mut backend = MemoryStore::new();
        backend.set(
            "flashcards",
            r#"[{"id":5000,"front":"a","back":"b","mastered":false}]"#,
        );
        let mut store = CardStore::open(
            Persistence::new("flashcards", Box::new(backend)),
            Box::new(FixedClock(1_000)),
        );
        assert_eq!(store.add("c", "d").unwrap(), Change::Added(5_001));
    }

    #[test]
    fn add_after_max_id_fails_without_writing() {
        let stored = r#"[{"id":18446744073709551615,"front":"a","back":"b","mastered":false}]"#;
        let mut backend = MemoryStore::new();
        backend.set("flashcards", stored);
        let mut store = CardStore::open(
            Persistence::new("flashcards", Box::new(backend)),
            Box::new(FixedClock(1_000)),
        );
        assert_eq!(store.add("c", "d"), Err(DeckError::IdsExhausted));
        assert_eq!(store.len(), 1);
        assert_eq!(store.persistence().raw().as_deref(), Some(stored));
    }

    #[test]
    fn sample_set_needs_room_for_twenty_ids() {
        let mut store = open_with(1);
        store
            .import_json(r#"[{"id":18446744073709551600,"front":"a","back":"b"}]"#)
            .unwrap();
        assert_eq!(store.load_sample_set(), Err(DeckError::IdsExhausted));
        assert_eq!(ids(&store), vec![18_446_744_073_709_551_600]);

        // a single add still fits below the ceiling
        assert_eq!(
            store.add("c", "d"),
            Ok(Change::Added(18_446_744_073_709_551_601))
        );
    }

    #[test]
    fn sample_ids_fill_up_to_the_ceiling() {
        let mut store = open_empty();
        store
            .import_json(r#"[{"id":18446744073709551595,"front":"a","back":"b"}]"#)
            .unwrap();
        assert_eq!(store.load_sample_set(), Ok(Change::Replaced(20)));
        assert_eq!(store.cards()[19].id, u64::MAX);
        assert_eq!(store.add("c", "d"), Err(DeckError::IdsExhausted));
    }

    #[test]
    fn toggle_mastered_is_its_own_inverse() {
        let mut store = open_with(3);
        let original = store.cards().to_vec();
        let id = original[1].id;
        assert_eq!(
            store.toggle_mastered(id).unwrap(),
            Change::Toggled { id, mastered: true }
        );
        assert!(store.get(id).unwrap().mastered);
        store.toggle_mastered(id).unwrap();
        assert_eq!(store.cards(), original.as_slice());
    }

    #[test]
    fn toggle_mastered_unknown_id() {
        let mut store = open_with(1);
        assert_eq!(store.toggle_mastered(9), Err(DeckError::NotFound(9)));
    }

    #[test]
    fn filtered_views_partition_the_deck() {
        let mut store = open_with(6);
        for id in [1_000, 1_003, 1_004] {
            store.toggle_mastered(id).unwrap();
        }
        let all: Vec<CardId> = store.filtered_view(Filter::All).iter().map(|c| c.id).collect();
        let mastered: Vec<CardId> = store
            .filtered_view(Filter::Mastered)
            .iter()
            .map(|c| c.id)
            .collect();
        let unmastered: Vec<CardId> = store
            .filtered_view(Filter::Unmastered)
            .iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(mastered, vec![1_000, 1_003, 1_004]);
        assert_eq!(unmastered, vec![1_001, 1_002, 1_005]);
        let mut union: Vec<CardId> = mastered.iter().chain(&unmastered).copied().collect();
        union.sort_unstable();
        assert_eq!(union, all);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut store = open_with(10);
        let mut before = store.cards().to_vec();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(store.shuffle_with(&mut rng), Change::Shuffled);
        let mut after = store.cards().to_vec();
        before.sort_by_key(|c| c.id);
        after.sort_by_key(|c| c.id);
        assert_eq!(before, after);
        assert_eq!(store.persistence().load(), store.cards());
    }

    #[test]
    fn shuffle_empty_is_noop() {
        let mut store = open_empty();
        assert_eq!(store.shuffle(), Change::Unchanged);
        assert!(store.persistence().raw().is_none());
    }

    #[test]
    fn shuffle_reaches_every_position() {
        // First card should land in each of the 4 slots over many seeded runs.
        let mut seen = [false; 4];
        for seed in 0..200 {
            let mut store = open_with(4);
            store.shuffle_with(&mut StdRng::seed_from_u64(seed));
            let pos = store.cards().iter().position(|c| c.id == 1_000).unwrap();
            seen[pos] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn delete_by_ids_removes_exactly_those() {
        let mut store = open_with(4);
        let change = store.delete_by_ids(&BTreeSet::from([1_002]));
        assert_eq!(change, Change::Removed(1));
        assert_eq!(ids(&store), vec![1_000, 1_001, 1_003]);
        assert_eq!(store.persistence().load().len(), 3);
    }

    #[test]
    fn delete_by_unknown_or_empty_ids_keeps_deck() {
        let mut store = open_with(3);
        assert_eq!(store.delete_by_ids(&BTreeSet::from([77])), Change::Removed(0));
        assert_eq!(store.delete_by_ids(&BTreeSet::new()), Change::Removed(0));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn delete_all_empties_and_persists() {
        let mut store = open_with(3);
        assert_eq!(store.delete_all(), Change::Cleared);
        assert!(store.is_empty());
        assert_eq!(store.persistence().raw().as_deref(), Some("[]"));
    }

    #[test]
    fn sample_set_has_twenty_fresh_cards() {
        let mut store = open_with(2);
        assert_eq!(store.load_sample_set(), Ok(Change::Replaced(20)));
        assert_eq!(store.len(), 20);
        assert!(store.cards().iter().all(|c| !c.mastered));
        let unique: HashSet<CardId> = store.cards().iter().map(|c| c.id).collect();
        assert_eq!(unique.len(), 20);
        assert_eq!(store.cards()[1].front, "Capital of France?");
        // the sample set replaced the two hand-made cards
        assert!(store.get(1_000).is_none());
        // later adds do not collide with sample ids
        let Change::Added(id) = store.add("x", "y").unwrap() else {
            panic!("expected Added");
        };
        assert!(store.cards()[..20].iter().all(|c| c.id < id));
    }

    #[test]
    fn export_then_import_restores_deck() {
        let mut store = open_with(3);
        store.toggle_mastered(1_001).unwrap();
        let json = store.export_json();
        let expected = store.cards().to_vec();

        let mut other = open_empty();
        assert_eq!(other.import_json(&json).unwrap(), Change::Replaced(3));
        assert_eq!(other.cards(), expected.as_slice());
    }

    #[test]
    fn import_rejects_bad_input_and_keeps_state() {
        let mut store = open_with(2);
        let before = store.cards().to_vec();

        assert!(matches!(store.import_json("nope"), Err(DeckError::Import(_))));
        assert_eq!(
            store.import_json(r#"[{"id":1,"front":" ","back":"b"}]"#),
            Err(DeckError::Validation)
        );
        assert!(matches!(
            store.import_json(
                r#"[{"id":1,"front":"a","back":"b"},{"id":1,"front":"c","back":"d"}]"#
            ),
            Err(DeckError::Import(_))
        ));
        assert_eq!(store.cards(), before.as_slice());
    }
}
