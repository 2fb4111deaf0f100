//! In-memory output store for tests and dry runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use trendq_core::{OutputKey, TimeSeries};

use crate::error::StorageError;
use crate::{render_csv, OutputStore};

#[derive(Default)]
struct Inner {
    files: HashMap<String, String>,
    write_order: Vec<String>,
}

/// Mutex-guarded map store. Records write order so tests can assert the
/// strict plan-order delivery guarantee.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key, as if a previous run had completed it.
    pub fn seed(&self, key: &OutputKey) {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        inner.files.insert(key.as_str().to_owned(), String::new());
    }

    /// Keys written during this run, in write order.
    #[must_use]
    pub fn written_keys(&self) -> Vec<String> {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .write_order
            .clone()
    }

    /// Rendered CSV body for a key, if present.
    #[must_use]
    pub fn content(&self, key: &OutputKey) -> Option<String> {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .files
            .get(key.as_str())
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .files
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OutputStore for MemoryStore {
    async fn exists(&self, key: &OutputKey) -> Result<bool, StorageError> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        Ok(inner.files.contains_key(key.as_str()))
    }

    async fn write(
        &self,
        key: &OutputKey,
        display_name: &str,
        series: &TimeSeries,
    ) -> Result<(), StorageError> {
        let body = render_csv(display_name, series);
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        inner.files.insert(key.as_str().to_owned(), body);
        inner.write_order.push(key.as_str().to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use trendq_core::{DateRange, MonthDate};

    use super::*;

    fn key_for(name: &str) -> OutputKey {
        let range = DateRange {
            start: MonthDate::new(2010, 1).unwrap(),
            end: MonthDate::new(2010, 3).unwrap(),
        };
        OutputKey::derive(name, None, &range)
    }

    #[tokio::test]
    async fn seeded_keys_exist_without_being_written() {
        let store = MemoryStore::new();
        let key = key_for("tesla");
        store.seed(&key);
        assert!(store.exists(&key).await.unwrap());
        assert!(store.written_keys().is_empty());
    }

    #[tokio::test]
    async fn writes_are_recorded_in_order() {
        let store = MemoryStore::new();
        let (a, b) = (key_for("alpha"), key_for("beta"));
        store.write(&a, "alpha", &TimeSeries::default()).await.unwrap();
        store.write(&b, "beta", &TimeSeries::default()).await.unwrap();
        assert_eq!(
            store.written_keys(),
            vec![a.as_str().to_owned(), b.as_str().to_owned()]
        );
        assert_eq!(store.content(&a).unwrap(), "Date,alpha\n");
    }
}
