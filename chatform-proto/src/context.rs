//! Host-assembled context handed to rules, prompts, and submit handlers.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A bag of named, type-erased values assembled by the host for one call.
///
/// Rules and prompt callbacks see the whole bag. Submit handlers only see
/// the keys their binding declared; the engine narrows the bag with
/// [`ContextBag::select`] before invoking them.
///
/// Cloning is cheap: entries are reference counted.
#[derive(Clone, Default)]
pub struct ContextBag {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl ContextBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under `key`, replacing any previous one.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Arc::new(value));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an already shared value.
    pub fn insert_arc(&mut self, key: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.entries.insert(key.into(), value);
    }

    /// Borrow the value under `key` if it exists and has type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Whether a value exists under `key`, whatever its type.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All keys currently in the bag.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A new bag holding only `keys`. Returns the first missing key as
    /// the error.
    pub fn select<'a, I>(&self, keys: I) -> Result<ContextBag, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selected = ContextBag::new();
        for key in keys {
            let value = self.entries.get(key).ok_or_else(|| key.to_owned())?;
            selected.entries.insert(key.to_owned(), Arc::clone(value));
        }
        Ok(selected)
    }
}

impl fmt::Debug for ContextBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("ContextBag").field("keys", &keys).finish()
    }
}
