//! Per-book cover image URIs.

use std::collections::HashMap;
use std::rc::Rc;

use crate::catalog::{book, BOOKS};
use crate::config::COVER_KEY_PREFIX;

use super::kv::KvStore;

fn cover_key(book_id: &str) -> String {
    format!("{COVER_KEY_PREFIX}{book_id}")
}

fn defaults() -> HashMap<&'static str, String> {
    BOOKS
        .iter()
        .map(|b| (b.id, b.default_cover.to_string()))
        .collect()
}

pub struct CoverStore {
    store: Rc<KvStore>,
    covers: HashMap<&'static str, String>,
}

impl CoverStore {
    pub fn load(store: Rc<KvStore>) -> Self {
        let covers = BOOKS
            .iter()
            .map(|b| {
                let uri = store
                    .get(&cover_key(b.id))
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| b.default_cover.to_string());
                (b.id, uri)
            })
            .collect();
        Self { store, covers }
    }

    pub fn get(&self, book_id: &str) -> &str {
        self.covers.get(book_id).map(String::as_str).unwrap_or("")
    }

    /// True when the user has replaced the default cover.
    pub fn is_custom(&self, book_id: &str) -> bool {
        match book(book_id) {
            Some(b) => self.get(book_id) != b.default_cover,
            None => false,
        }
    }

    pub fn set(&mut self, book_id: &str, uri: String) {
        let Some(b) = book(book_id) else {
            return;
        };
        self.store.set(&cover_key(b.id), &uri);
        self.covers.insert(b.id, uri);
    }

    pub fn reset_all(&mut self) {
        for b in &BOOKS {
            self.store.remove(&cover_key(b.id));
        }
        self.covers = defaults();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_stored() {
        let covers = CoverStore::load(Rc::new(KvStore::in_memory()));
        for b in &BOOKS {
            assert_eq!(covers.get(b.id), b.default_cover);
            assert!(!covers.is_custom(b.id));
        }
    }

    #[test]
    fn set_persists_and_survives_reload() {
        let store = Rc::new(KvStore::in_memory());
        let mut covers = CoverStore::load(store.clone());
        covers.set("atomic", "data:image/jpeg;base64,AAAA".into());
        assert!(covers.is_custom("atomic"));
        assert_eq!(
            store.get("cover_atomic").as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );

        let reloaded = CoverStore::load(store);
        assert_eq!(reloaded.get("atomic"), "data:image/jpeg;base64,AAAA");
        assert_eq!(reloaded.get("carnegie"), "/covers/carnegie.jpg");
    }

    #[test]
    fn unknown_book_is_ignored() {
        let store = Rc::new(KvStore::in_memory());
        let mut covers = CoverStore::load(store.clone());
        covers.set("nope", "x".into());
        assert_eq!(covers.get("nope"), "");
        assert_eq!(store.get("cover_nope"), None);
    }

    #[test]
    fn reset_all_restores_every_default() {
        let store = Rc::new(KvStore::in_memory());
        let mut covers = CoverStore::load(store.clone());
        for b in &BOOKS {
            covers.set(b.id, format!("data:{}", b.id));
        }
        covers.reset_all();
        for b in &BOOKS {
            assert_eq!(covers.get(b.id), b.default_cover);
            assert_eq!(store.get(&cover_key(b.id)), None);
        }
    }

    #[test]
    fn empty_stored_value_uses_default() {
        let store = Rc::new(KvStore::in_memory());
        store.set("cover_seven_habits", "");
        let covers = CoverStore::load(store);
        assert_eq!(covers.get("seven_habits"), "/covers/seven_habits.jpg");
    }
}
