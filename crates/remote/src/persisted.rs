use std::{
    marker::PhantomData,
    sync::{Arc, Mutex, PoisonError},
};

use engine::{ResultStore, StorageBackend, load_json, save_json};
use serde::{Serialize, de::DeserializeOwned};

/// A JSON list stored under a single backend key.
///
/// Clones share the lock, so read-modify-write cycles issued through any of
/// them never interleave.
pub(crate) struct PersistedList<T> {
    backend: Arc<dyn StorageBackend>,
    key: &'static str,
    lock: Arc<Mutex<()>>,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for PersistedList<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            key: self.key,
            lock: Arc::clone(&self.lock),
            _item: PhantomData,
        }
    }
}

impl<T> PersistedList<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(backend: Arc<dyn StorageBackend>, key: &'static str) -> Self {
        Self {
            backend,
            key,
            lock: Arc::new(Mutex::new(())),
            _item: PhantomData,
        }
    }

    pub(crate) fn list(&self) -> ResultStore<Vec<T>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        load_json(self.backend.as_ref(), self.key)
    }

    /// Apply `f` to the stored list and write it back; returns the new length.
    pub(crate) fn update(&self, f: impl FnOnce(&mut Vec<T>)) -> ResultStore<usize> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items: Vec<T> = load_json(self.backend.as_ref(), self.key)?;
        f(&mut items);
        save_json(self.backend.as_ref(), self.key, &items)?;
        Ok(items.len())
    }
}
