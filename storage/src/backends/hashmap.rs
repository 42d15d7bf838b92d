//! In-memory [`Database`] backend. Used by every other crate's tests and by
//! hosts that don't need persistence across restarts.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::StorageResult;
use crate::storage::{Database, WriteBatch, WriteBatchItem};

/// A `Database` backed by a `BTreeMap` guarded by an `RwLock`. `BTreeMap`
/// (rather than `HashMap`) so `list_prefix` can walk a sorted range, matching
/// the lexicographic = chronological ordering spec §6 relies on for the
/// zero-padded numeric key prefixes.
#[derive(Default)]
pub struct HashMapBackend {
    map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl HashMapBackend {
    /// Build an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database for HashMapBackend {
    fn read(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.map.read().unwrap().get(key).cloned())
    }

    fn write(&self, key: &[u8], value: Vec<u8>) -> StorageResult<()> {
        self.map.write().unwrap().insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.map.write().unwrap().remove(key);
        Ok(())
    }

    fn list_prefix(&self, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .map
            .read()
            .unwrap()
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn write_batch(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut map = self.map.write().unwrap();
        for item in batch.items {
            match item {
                WriteBatchItem::Put(k, v) => {
                    map.insert(k, v);
                }
                WriteBatchItem::Delete(k) => {
                    map.remove(&k);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_value() {
        let db = HashMapBackend::new();
        assert_eq!(db.read(b"name").unwrap(), None);
        db.write(b"name", b"john".to_vec()).unwrap();
        assert_eq!(db.read(b"name").unwrap(), Some(b"john".to_vec()));
        db.delete(b"name").unwrap();
        assert_eq!(db.read(b"name").unwrap(), None);
    }

    #[test]
    fn list_prefix_only_returns_matching_keys() {
        let db = HashMapBackend::new();
        db.write(b"trust_edge_a", b"1".to_vec()).unwrap();
        db.write(b"trust_edge_b", b"2".to_vec()).unwrap();
        db.write(b"bonded_vote_c", b"3".to_vec()).unwrap();

        let mut got = db.list_prefix(b"trust_edge_").unwrap();
        got.sort();
        assert_eq!(
            got,
            vec![
                (b"trust_edge_a".to_vec(), b"1".to_vec()),
                (b"trust_edge_b".to_vec(), b"2".to_vec()),
            ]
        );
    }

    #[test]
    fn write_batch_applies_in_order() {
        let db = HashMapBackend::new();
        db.write(b"k", b"old".to_vec()).unwrap();
        let mut batch = WriteBatch::default();
        batch.put(b"k".to_vec(), b"new".to_vec());
        batch.put(b"k2".to_vec(), b"v2".to_vec());
        batch.delete(b"k3".to_vec());
        db.write_batch(batch).unwrap();

        assert_eq!(db.read(b"k").unwrap(), Some(b"new".to_vec()));
        assert_eq!(db.read(b"k2").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(db.read(b"k3").unwrap(), None);
    }
}
