//! Key-value storage seam and the typed record layer on top of it.
//!
//! The store offers nothing beyond get/set of JSON documents by key. Every
//! read-modify-write in the services runs under [`Records::lock`], which
//! serializes mutations of the same key within the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use database::Database;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use crate::error::{MarketError, Result};

/// A namespaced string-key to JSON-value map without transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the document stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// In-process store, used by tests and demo deployments.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Store backed by the SQLite `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wrap a connected and migrated database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        match database::kv::get(self.db.pool(), key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let text = serde_json::to_string(&value)?;
        database::kv::set(self.db.pool(), key, &text).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

/// Table of per-key async mutexes.
///
/// Entries are created on demand and pruned once nobody holds or waits on
/// them, so the table stays proportional to the number of hot keys.
#[derive(Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    const PRUNE_THRESHOLD: usize = 1024;

    /// Acquire the mutex for `key`, waiting for any current holder.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= Self::PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

/// Typed access to the key-value store plus per-key locking.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn KeyValueStore>,
    locks: Arc<KeyLocks>,
}

impl Records {
    /// Wrap a store with a fresh lock table.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            locks: Arc::new(KeyLocks::default()),
        }
    }

    /// Decode the record stored under `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Decode the sequence stored under `key`; an absent key is an empty list.
    pub async fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key).await? {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Encode and store `record` under `key`.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, record: &T) -> Result<()> {
        let value = serde_json::to_value(record)?;
        debug!(key = %key, store = self.store.name(), "Writing record");
        self.store.set(key, value).await
    }

    /// Serialize mutations of `key`. Hold the guard across the read and write.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        self.locks.lock(key).await
    }

    /// Read a sequence, let `mutate` edit it, and write it back if it asks to.
    ///
    /// `mutate` returns `(changed, output)`; nothing is written unless
    /// `changed` is true.
    pub async fn update_list<T, R, F>(&self, key: &str, mutate: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> (bool, R),
    {
        let _guard = self.lock(key).await;
        let mut items = self.get_list::<T>(key).await?;
        let (changed, output) = mutate(&mut items);
        if changed {
            self.put(key, &items).await?;
        }
        Ok(output)
    }

    /// Read a record, let `mutate` edit it, and write it back.
    ///
    /// Fails with `NotFound` when the key is absent.
    pub async fn update<T, F>(&self, key: &str, entity: &'static str, mutate: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _guard = self.lock(key).await;
        let mut record = self
            .get::<T>(key)
            .await?
            .ok_or_else(|| MarketError::not_found(entity, key))?;
        mutate(&mut record)?;
        self.put(key, &record).await?;
        Ok(record)
    }
}
