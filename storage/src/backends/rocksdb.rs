//! RocksDB-backed [`Database`] implementation, behind the `rocksdb-backend`
//! feature. Gives a host a real persistent store without having to write its
//! own `Database` impl.

use rocksdb::{IteratorMode, Options, DB};

use crate::error::{StorageError, StorageResult};
use crate::storage::{Database, WriteBatch as CoreBatch, WriteBatchItem};

/// A `Database` backed by a single RocksDB column family (the default one).
pub struct RocksDbBackend {
    db: DB,
}

impl RocksDbBackend {
    /// Open (creating if missing) a RocksDB instance at `path`.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> StorageResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(RocksDbBackend { db })
    }
}

impl Database for RocksDbBackend {
    fn read(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.db
            .get(key)
            .map_err(|e| StorageError::Read {
                key: key.to_vec(),
                msg: e.to_string(),
            })
            .map(|opt| opt.map(|v| v.to_vec()))
    }

    fn write(&self, key: &[u8], value: Vec<u8>) -> StorageResult<()> {
        self.db.put(key, value).map_err(|e| StorageError::Write {
            key: key.to_vec(),
            msg: e.to_string(),
        })
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.db.delete(key).map_err(|e| StorageError::Write {
            key: key.to_vec(),
            msg: e.to_string(),
        })
    }

    fn list_prefix(&self, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut out = Vec::new();
        let iter = self.db.iterator(IteratorMode::From(
            prefix,
            rocksdb::Direction::Forward,
        ));
        for item in iter {
            let (key, value) = item.map_err(|e| StorageError::Read {
                key: prefix.to_vec(),
                msg: e.to_string(),
            })?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.to_vec(), value.to_vec()));
        }
        Ok(out)
    }

    fn write_batch(&self, batch: CoreBatch) -> StorageResult<()> {
        let mut wb = rocksdb::WriteBatch::default();
        for item in batch.items {
            match item {
                WriteBatchItem::Put(k, v) => wb.put(k, v),
                WriteBatchItem::Delete(k) => wb.delete(k),
            }
        }
        self.db
            .write(wb)
            .map_err(|e| StorageError::Write {
                key: Vec::new(),
                msg: e.to_string(),
            })
    }
}
