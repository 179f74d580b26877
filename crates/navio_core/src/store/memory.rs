//! In-memory key-value store for tests and ephemeral sessions.

use super::{KeyValueStore, KvWrite, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw text without JSON validation.
    ///
    /// Used to simulate values written by older or foreign clients.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }

    fn apply(&self, writes: &[KvWrite]) -> StoreResult<()> {
        let mut entries = self.entries.borrow_mut();
        for write in writes {
            match write {
                KvWrite::Put { key, value } => {
                    entries.insert(key.clone(), value.clone());
                }
                KvWrite::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStore;
    use crate::store::{KeyValueStore, StoreError};

    #[test]
    fn put_get_remove_json_values() {
        let store = MemoryKeyValueStore::new();
        store.put_json("flag", &true).unwrap();
        store.put_json("names", &vec!["a", "b"]).unwrap();

        assert_eq!(store.get_json::<bool>("flag").unwrap(), Some(true));
        assert_eq!(
            store.get_json::<Vec<String>>("names").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        store.remove("flag").unwrap();
        assert_eq!(store.get_json::<bool>("flag").unwrap(), None);
        assert_eq!(store.keys().unwrap(), vec!["names".to_string()]);
    }

    #[test]
    fn malformed_value_surfaces_decode_error() {
        let store = MemoryKeyValueStore::new();
        store.insert_raw("names", "{not json");

        let err = store.get_json::<Vec<String>>("names").unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref key, .. } if key == "names"));
    }
}
