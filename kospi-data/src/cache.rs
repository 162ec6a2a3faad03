//! Populate-once, read-many cache.

use fnv::FnvHashMap;
use std::{future::Future, hash::Hash, sync::Arc};
use tracing::debug;

/// Process lifetime cache keyed by `K`.
///
/// Values are populated at most once per key via [`Memo::get_or_fetch`] and never evicted.
/// A failed fetch leaves the key vacant so the next call retries.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: FnvHashMap<K, Arc<V>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: FnvHashMap::default(),
        }
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its successful output.
    pub async fn get_or_fetch<F, Fut, E>(&mut self, key: K, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.entries.get(&key) {
            debug!(?key, "cache hit");
            return Ok(Arc::clone(value));
        }

        let value = Arc::new(fetch().await?);
        self.entries.insert(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_get_or_fetch_populates_once() {
        let mut memo = Memo::<&'static str, u32>::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let value = memo
                .get_or_fetch("kospi", || async {
                    calls.set(calls.get() + 1);
                    Ok::<_, ()>(42)
                })
                .await
                .unwrap();
            assert_eq!(*value, 42);
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_does_not_cache_failure() {
        let mut memo = Memo::<&'static str, u32>::new();

        let failed = memo
            .get_or_fetch("kospi", || async { Err::<u32, _>("offline") })
            .await;
        assert_eq!(failed, Err("offline"));
        assert!(!memo.contains(&"kospi"));

        let value = memo
            .get_or_fetch("kospi", || async { Ok::<_, &str>(7) })
            .await
            .unwrap();
        assert_eq!(*value, 7);
        assert_eq!(memo.get(&"kospi").as_deref(), Some(&7));
    }
}
