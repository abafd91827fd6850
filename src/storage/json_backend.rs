use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::core::utils::{ensure_dir, write_atomic, PathResolver};
use crate::errors::SplitError;

use super::{KeyValueStore, Result};

/// Values are kept as raw JSON so keys this store did not write survive a rewrite.
type StoreState = BTreeMap<String, Value>;

/// File-backed store keeping every key in a single JSON object (`state.json`).
#[derive(Debug, Clone)]
pub struct JsonStore {
    state_file: PathBuf,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let state_file = PathResolver::state_file_in(&root);
        Ok(Self { state_file })
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    fn read_contents(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.state_file) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn read_state(&self) -> Result<StoreState> {
        match self.read_contents()? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(StoreState::new()),
        }
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.read_state()?.remove(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(SplitError::Storage(format!(
                "`{key}` holds {other} instead of a string"
            ))),
        }
    }

    /// I/O failures propagate untouched; only a file that is not a JSON object is
    /// replaced.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = match self.read_contents()? {
            None => StoreState::new(),
            Some(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %self.state_file.display(),
                    error = %err,
                    "discarding unparsable state file"
                );
                StoreState::new()
            }),
        };
        state.insert(key.to_string(), Value::String(value.to_string()));
        let json = serde_json::to_string_pretty(&state)?;
        write_atomic(&self.state_file, &json)?;
        tracing::debug!(key, "persisted value");
        Ok(())
    }
}
