use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The per-peer key-value map. Clone handles share the same underlying map.
#[derive(Clone, Default)]
pub struct KvStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: &str) {
        self.inner
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.inner.write().unwrap().remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.inner.read().unwrap().clone()
    }
}
