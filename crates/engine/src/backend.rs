//! Keyed persistence used by the store.
//!
//! Every key holds one JSON document that is read, changed and written back
//! whole. Backends only move strings around; (de)serialization lives in
//! [`load_json`] and [`save_json`].

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{ResultStore, StoreError};

pub trait StorageBackend: Send + Sync {
    /// Returns `None` when the key was never written (or was deleted).
    fn get(&self, key: &str) -> ResultStore<Option<String>>;

    /// Overwrites the whole value stored at `key`.
    fn set(&self, key: &str, value: &str) -> ResultStore<()>;

    /// Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> ResultStore<()>;
}

/// In-process backend. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> ResultStore<Option<String>> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ResultStore<()> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> ResultStore<()> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under `root`.
#[derive(Clone, Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> ResultStore<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> ResultStore<()> {
        fs::create_dir_all(&self.root)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        match fs::rename(&tmp, &path) {
            Ok(()) => Ok(()),
            Err(_) => {
                fs::copy(&tmp, &path)?;
                let _ = fs::remove_file(&tmp);
                Ok(())
            }
        }
    }

    fn delete(&self, key: &str) -> ResultStore<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads and parses the value at `key`; a missing key yields `T::default()`.
pub fn load_json<T>(backend: &dyn StorageBackend, key: &str) -> ResultStore<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = backend.get(key)? else {
        return Ok(T::default());
    };
    serde_json::from_str(&raw).map_err(|source| StoreError::Corrupted {
        key: key.to_string(),
        source,
    })
}

pub fn save_json<T>(backend: &dyn StorageBackend, key: &str, value: &T) -> ResultStore<()>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string(value)
        .map_err(|err| StoreError::Backend(format!("serialize {key}: {err}")))?;
    backend.set(key, &payload)
}
