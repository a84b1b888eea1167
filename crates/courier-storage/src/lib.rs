use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io")]
    Io,
    #[error("codec")]
    Codec,
    #[error("invalid namespace")]
    Invalid,
}

#[derive(Serialize, Deserialize, Default)]
struct Stored {
    entries: HashMap<String, serde_json::Value>,
}

/// A small file-backed key-value store holding JSON values.
///
/// One file per namespace; every mutation rewrites the file. Holds
/// client-side session metadata such as the address side-index.
pub struct LocalStore {
    path: PathBuf,
    data: Stored,
    namespace: String,
}

impl LocalStore {
    pub fn open_or_create(path: impl AsRef<Path>, namespace: &str) -> Result<Self, StorageError> {
        if namespace.trim().is_empty() {
            return Err(StorageError::Invalid);
        }
        let mut base = path.as_ref().to_path_buf();
        fs::create_dir_all(&base).map_err(|_| StorageError::Io)?;
        base.push(format!("{}-store.json", namespace));
        let data = if base.exists() {
            let content = fs::read_to_string(&base).map_err(|_| StorageError::Io)?;
            serde_json::from_str(&content).map_err(|_| StorageError::Codec)?
        } else {
            Stored::default()
        };
        Ok(Self {
            path: base,
            data,
            namespace: namespace.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.entries.get(key)
    }

    pub fn put(&mut self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        self.data.entries.insert(key.to_string(), value);
        self.persist()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.data.entries.remove(key);
        self.persist()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn persist(&self) -> Result<(), StorageError> {
        let serialized =
            serde_json::to_string_pretty(&self.data).map_err(|_| StorageError::Codec)?;
        fs::write(&self.path, serialized).map_err(|_| StorageError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn put_get_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut store = LocalStore::open_or_create(dir.path(), "session").unwrap();
            store.put("greeting", json!({"text": "hello"})).unwrap();
        }
        let store = LocalStore::open_or_create(dir.path(), "session").unwrap();
        assert_eq!(store.get("greeting").unwrap()["text"], "hello");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn remove_deletes_entry() {
        let dir = tempdir().unwrap();
        let mut store = LocalStore::open_or_create(dir.path(), "session").unwrap();
        store.put("k", json!(1)).unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn namespaces_are_isolated() {
        let dir = tempdir().unwrap();
        let mut a = LocalStore::open_or_create(dir.path(), "a").unwrap();
        a.put("k", json!("in-a")).unwrap();
        let b = LocalStore::open_or_create(dir.path(), "b").unwrap();
        assert!(b.get("k").is_none());
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            LocalStore::open_or_create(dir.path(), "  "),
            Err(StorageError::Invalid)
        ));
    }
}
