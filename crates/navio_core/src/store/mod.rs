//! Persisted key-value store contracts.
//!
//! # Responsibility
//! - Provide a small settings-style store: string keys to JSON values.
//! - Offer batched writes so related keys can change together.
//!
//! # Invariants
//! - Values are stored as JSON text; typed access goes through serde.
//! - `apply` is all-or-nothing for backends that support transactions.

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for key-value reads, writes and value coding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode {
        key: String,
        source: serde_json::Error,
    },
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Decode { key, source } => write!(f, "failed to decode `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One write inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Put { key: String, value: String },
    Remove { key: String },
}

impl KvWrite {
    /// Encodes `value` as JSON into a put.
    pub fn put_json<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> StoreResult<Self> {
        let key = key.into();
        match serde_json::to_string(value) {
            Ok(value) => Ok(Self::Put { key, value }),
            Err(source) => Err(StoreError::Encode { key, source }),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// Local key-value store.
pub trait KeyValueStore {
    /// Returns the raw JSON text stored under `key`.
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;

    /// Returns all stored keys, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Applies a batch of writes in order.
    fn apply(&self, writes: &[KvWrite]) -> StoreResult<()>;

    /// Reads and decodes the JSON value under `key`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        Self: Sized,
    {
        self.apply(&[KvWrite::put_json(key, value)?])
    }

    fn remove(&self, key: &str) -> StoreResult<()>
    where
        Self: Sized,
    {
        self.apply(&[KvWrite::remove(key)])
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_raw(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn apply(&self, writes: &[KvWrite]) -> StoreResult<()> {
        (**self).apply(writes)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_raw(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn apply(&self, writes: &[KvWrite]) -> StoreResult<()> {
        (**self).apply(writes)
    }
}
