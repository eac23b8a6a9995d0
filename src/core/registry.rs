//! # Handler registry - key → ordered handler list.
//!
//! The registry is plain data; locking lives in the [`Dispatcher`](crate::Dispatcher)
//! that owns it. Every mutation goes through the methods below.
//!
//! ## Rules
//! - A missing key and an empty list are equivalent; empty lists are dropped.
//! - Lists keep insertion order.
//! - [`Registry::insert`] rejects duplicates (by identity) and enforces the cap.
//! - [`Registry::seed`] does neither dedup nor capping; callers validate first.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::handlers::{HandlerRef, same_handler};

/// Outcome of [`Registry::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insert {
    /// Appended at the end of the list.
    Added,
    /// Already present; list untouched.
    AlreadyPresent,
    /// List is at the cap; list untouched.
    LimitReached,
}

/// Event key → handler list mapping.
pub(crate) struct Registry<K, C, P> {
    lists: HashMap<K, Vec<HandlerRef<C, P>>>,
}

impl<K, C, P> Registry<K, C, P>
where
    K: Eq + Hash,
{
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    /// Appends `handlers` to `key` verbatim (no dedup, no cap).
    pub(crate) fn seed(&mut self, key: K, handlers: Vec<HandlerRef<C, P>>) {
        if handlers.is_empty() {
            return;
        }
        self.lists.entry(key).or_default().extend(handlers);
    }

    /// Adds `handler` to `key` unless it is already there or the list is full.
    pub(crate) fn insert(&mut self, key: K, handler: HandlerRef<C, P>, limit: usize) -> Insert {
        let list = self.lists.entry(key).or_default();
        if list.iter().any(|h| same_handler(h, &handler)) {
            return Insert::AlreadyPresent;
        }
        if list.len() >= limit {
            return Insert::LimitReached;
        }
        list.push(handler);
        Insert::Added
    }

    /// Removes `handler` from `key`. Returns `true` if it was present.
    pub(crate) fn remove<Q>(&mut self, key: &Q, handler: &HandlerRef<C, P>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(list) = self.lists.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|h| !same_handler(h, handler));
        let removed = list.len() != before;
        if list.is_empty() {
            self.lists.remove(key);
        }
        removed
    }

    /// Drops the whole list for `key`. Returns how many handlers were removed.
    pub(crate) fn remove_all<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lists.remove(key).map_or(0, |list| list.len())
    }

    /// Copy of the current list for `key` (empty if absent).
    pub(crate) fn snapshot<Q>(&self, key: &Q) -> Vec<HandlerRef<C, P>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lists.get(key).cloned().unwrap_or_default()
    }

    /// Number of handlers for `key`.
    pub(crate) fn len<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lists.get(key).map_or(0, Vec::len)
    }

    /// True if `handler` is registered for `key`.
    pub(crate) fn contains<Q>(&self, key: &Q, handler: &HandlerRef<C, P>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lists
            .get(key)
            .is_some_and(|list| list.iter().any(|h| same_handler(h, handler)))
    }

    /// Keys with at least one handler.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.lists.keys()
    }

    /// Number of keys with at least one handler.
    pub(crate) fn key_count(&self) -> usize {
        self.lists.len()
    }

    /// Longest list, used to validate seeded registries.
    pub(crate) fn longest(&self) -> Option<(&K, usize)> {
        self.lists
            .iter()
            .map(|(k, list)| (k, list.len()))
            .max_by_key(|(_, len)| *len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{Handler, Invocation};
    use std::sync::Arc;

    struct Noop;

    impl Handler<(), ()> for Noop {
        fn call(&self, _: (), _: ()) -> Invocation {
            Invocation::ok()
        }
    }

    fn handler() -> HandlerRef<(), ()> {
        Arc::new(Noop)
    }

    #[test]
    fn test_insert_dedups_by_identity() {
        let mut reg = Registry::new();
        let h = handler();

        assert_eq!(reg.insert("k", Arc::clone(&h), 10), Insert::Added);
        assert_eq!(reg.insert("k", Arc::clone(&h), 10), Insert::AlreadyPresent);
        assert_eq!(reg.insert("k", handler(), 10), Insert::Added);
        assert_eq!(reg.len("k"), 2);
    }

    #[test]
    fn test_insert_respects_limit() {
        let mut reg = Registry::new();
        let first = handler();
        assert_eq!(reg.insert("k", Arc::clone(&first), 2), Insert::Added);
        assert_eq!(reg.insert("k", handler(), 2), Insert::Added);
        assert_eq!(reg.insert("k", handler(), 2), Insert::LimitReached);
        assert_eq!(reg.len("k"), 2);

        // Present handlers stay idempotent even at the cap.
        assert_eq!(reg.insert("k", first, 2), Insert::AlreadyPresent);
    }

    #[test]
    fn test_remove_keeps_order_and_drops_empty_lists() {
        let mut reg = Registry::new();
        let (a, b, c) = (handler(), handler(), handler());
        for h in [&a, &b, &c] {
            reg.insert("k", Arc::clone(h), 10);
        }

        assert!(reg.remove("k", &b));
        assert!(!reg.remove("k", &b));
        let snap = reg.snapshot("k");
        assert!(same_handler(&snap[0], &a));
        assert!(same_handler(&snap[1], &c));

        reg.remove("k", &a);
        reg.remove("k", &c);
        assert_eq!(reg.key_count(), 0);
        assert!(!reg.remove("missing", &a));
    }

    #[test]
    fn test_seed_keeps_duplicates() {
        let mut reg = Registry::new();
        let h = handler();
        reg.seed("k", vec![Arc::clone(&h), Arc::clone(&h)]);
        reg.seed("empty", Vec::new());

        assert_eq!(reg.len("k"), 2);
        assert_eq!(reg.key_count(), 1);
        assert_eq!(reg.longest(), Some((&"k", 2)));
    }

    #[test]
    fn test_remove_all() {
        let mut reg = Registry::new();
        reg.insert("k", handler(), 10);
        reg.insert("k", handler(), 10);
        assert_eq!(reg.remove_all("k"), 2);
        assert_eq!(reg.remove_all("k"), 0);
        assert!(reg.snapshot("k").is_empty());
    }
}
