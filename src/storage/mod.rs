//! Durable key-value persistence and the string encoding of persisted values.
//!
//! The session only ever talks to [`KeyValueStore`]; what a value looks like on the
//! wire is decided by its [`StoredValue`] impl, so the same logic runs against the
//! JSON file backend, the in-memory backend, or any other string store.

pub mod json_backend;
pub mod memory;

use crate::{domain::BillSnapshot, errors::SplitError};

pub use crate::errors::Result;

/// Keys used by the calculator session.
pub mod keys {
    pub const PEOPLE_COUNT: &str = "people_count";
    pub const PAYEE: &str = "payee";
    pub const BILL_HISTORY: &str = "bill_history";
}

/// Minimal string-to-string store. No transactional guarantee across keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Encoding contract for values persisted through a [`KeyValueStore`].
pub trait StoredValue: Sized {
    fn encode(&self) -> Result<String>;
    fn decode(raw: &str) -> Result<Self>;
}

impl StoredValue for Vec<BillSnapshot> {
    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl StoredValue for u32 {
    fn encode(&self) -> Result<String> {
        Ok(self.to_string())
    }

    fn decode(raw: &str) -> Result<Self> {
        raw.trim()
            .parse()
            .map_err(|_| SplitError::Storage(format!("`{}` is not a valid count", raw)))
    }
}

impl StoredValue for String {
    fn encode(&self) -> Result<String> {
        Ok(self.clone())
    }

    fn decode(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

/// Reads and decodes `key`, returning `None` when nothing is stored.
pub fn read_value<T: StoredValue, S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => T::decode(&raw).map(Some),
        None => Ok(None),
    }
}

/// Encodes `value` and writes it under `key`.
pub fn write_value<T: StoredValue, S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<()> {
    store.set(key, &value.encode()?)
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headcount_decoding_tolerates_whitespace() {
        assert_eq!(u32::decode(" 6\n").expect("decode"), 6);
        assert!(u32::decode("six").is_err());
    }

    #[test]
    fn read_value_reports_absent_keys() {
        let store = MemoryStore::new();
        let value: Option<String> = read_value(&store, keys::PAYEE).expect("read");
        assert!(value.is_none());
    }

    #[test]
    fn history_encodes_as_json_array() {
        let store = MemoryStore::new();
        write_value(&store, keys::BILL_HISTORY, &Vec::<BillSnapshot>::new()).expect("write");
        assert_eq!(
            store.get(keys::BILL_HISTORY).expect("get").as_deref(),
            Some("[]")
        );
    }
}
