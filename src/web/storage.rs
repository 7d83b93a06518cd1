//! localStorage-backed [`KeyValueStore`].

use gloo::storage::{LocalStorage, Storage};

use crate::deck::persist::KeyValueStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("localStorage read failed: {:?}", e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = LocalStorage::raw().set_item(key, value) {
            log::warn!("localStorage write failed: {:?}", e);
        }
    }
}
