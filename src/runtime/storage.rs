//! Named response caches.

use super::http::{Request, Response};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Storage for named caches of request → response entries.
///
/// Every method is atomic with respect to the others, so concurrent fetch
/// handlers never observe a half-written entry.
pub trait CacheStorage: Sync {
    /// Create the named cache if it does not exist yet.
    fn open(&self, name: &str);

    /// Names of all existing caches.
    fn keys(&self) -> Vec<String>;

    /// Delete a cache. Returns whether it existed.
    fn delete(&self, name: &str) -> bool;

    /// Store an entry, creating the cache if needed.
    fn put(&self, cache: &str, request: &Request, response: Response);

    /// Store several entries at once; readers see all of them or none.
    fn put_all(&self, cache: &str, entries: Vec<(Request, Response)>);

    /// Look up an entry. Returns an independent copy.
    fn lookup(&self, cache: &str, request: &Request) -> Option<Response>;
}

/// In-process [`CacheStorage`] behind a single mutex.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<BTreeMap<String, HashMap<Request, Response>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a cache, `None` if it does not exist.
    pub fn entry_count(&self, cache: &str) -> Option<usize> {
        self.lock().get(cache).map(HashMap::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, HashMap<Request, Response>>> {
        // Every update is a single map operation, so a poisoned map is still whole.
        self.caches.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, name: &str) {
        self.lock().entry(name.to_string()).or_default();
    }

    fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn delete(&self, name: &str) -> bool {
        self.lock().remove(name).is_some()
    }

    fn put(&self, cache: &str, request: &Request, response: Response) {
        self.lock()
            .entry(cache.to_string())
            .or_default()
            .insert(request.clone(), response);
    }

    fn put_all(&self, cache: &str, entries: Vec<(Request, Response)>) {
        self.lock()
            .entry(cache.to_string())
            .or_default()
            .extend(entries);
    }

    fn lookup(&self, cache: &str, request: &Request) -> Option<Response> {
        self.lock().get(cache)?.get(request).cloned()
    }
}
