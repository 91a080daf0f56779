//! Store Implementation
//!
//! A Store is an observable keyed record. It tracks reads and notifies on
//! writes the same way a [`Signal`](super::Signal) does, but at whole-object
//! granularity: the store has one subscriber list shared by every key.
//! Reading any key subscribes the current effect to writes of every key.
//!
//! Tracking is shallow. Values handed out by the store are not reactive;
//! mutating something reachable through a value (a shared cell, say) does not
//! notify anyone. Only [`Store::set`] and [`Store::update`] do.

use std::borrow::Borrow;
use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::context::TrackingScope;
use super::subscriber::{NotifyPass, SubscriberList};
use crate::error::{Result, RippleError};

static STORE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

struct StoreInner<K, V> {
    id: u64,
    record: RefCell<IndexMap<K, V>>,
    subscribers: SubscriberList,
}

/// An observable record with coarse change tracking.
///
/// Cloning a store yields another handle to the same record.
///
/// # Example
///
/// ```rust
/// use ripple_core::create_store;
///
/// let profiles = create_store([("one", 1), ("two", 2)]);
/// assert_eq!(profiles.get("one"), Some(1));
///
/// profiles.set("two", 20);
/// assert_eq!(profiles.get("two"), Some(20));
/// ```
pub struct Store<K: 'static, V: 'static> {
    inner: Rc<StoreInner<K, V>>,
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + 'static,
    V: 'static,
{
    /// Wrap the given entries in a new store. Insertion order is kept.
    pub fn new(base: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                id: STORE_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
                record: RefCell::new(base.into_iter().collect()),
                subscribers: SubscriberList::new(),
            }),
        }
    }

    /// Get the store's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Borrow the value under `key`, subscribing the tracked effect if any.
    ///
    /// The record stays borrowed while `f` runs, so `f` must not write to
    /// this store.
    pub fn with<Q, R>(&self, key: &Q, f: impl FnOnce(Option<&V>) -> R) -> R
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.track();
        self.with_untracked(key, f)
    }

    /// Borrow the value under `key` without tracking dependencies.
    pub fn with_untracked<Q, R>(&self, key: &Q, f: impl FnOnce(Option<&V>) -> R) -> R
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        f(self.inner.record.borrow().get(key))
    }

    /// Tracked membership test.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.with(key, |value| value.is_some())
    }

    /// Tracked entry count.
    pub fn len(&self) -> usize {
        self.track();
        self.inner.record.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace the value under `key` and notify every subscriber.
    ///
    /// # Panics
    ///
    /// Panics if a configured notification depth limit is exceeded, and
    /// propagates any panic raised by a subscriber.
    pub fn set(&self, key: K, value: V) {
        if let Err(err) = self.try_set(key, value) {
            panic!("{err}");
        }
    }

    /// Like [`set`](Self::set), but a tripped depth limit is returned as an
    /// error and the record is left unchanged.
    pub fn try_set(&self, key: K, value: V) -> Result<()> {
        let _pass = NotifyPass::begin()?;
        self.inner.record.borrow_mut().insert(key, value);

        tracing::trace!(store = self.inner.id, "store written");
        self.inner.subscribers.notify_all();
        Ok(())
    }

    /// Mutate the value under `key` in place and notify every subscriber.
    ///
    /// Returns `false` without notifying when the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if a configured notification depth limit is exceeded, and
    /// propagates any panic raised by a subscriber.
    pub fn update<Q>(&self, key: &Q, f: impl FnOnce(&mut V)) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_update(key, f).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`update`](Self::update), but a tripped depth limit is returned
    /// as an error and the entry is left unchanged.
    pub fn try_update<Q>(&self, key: &Q, f: impl FnOnce(&mut V)) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.inner.record.borrow().contains_key(key) {
            return Ok(false);
        }

        let _pass = NotifyPass::begin()?;
        if let Some(value) = self.inner.record.borrow_mut().get_mut(key) {
            f(value);
        }

        tracing::trace!(store = self.inner.id, "store updated");
        self.inner.subscribers.notify_all();
        Ok(true)
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    fn track(&self) {
        TrackingScope::track(&self.inner.subscribers);
    }
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + 'static,
    V: Clone + 'static,
{
    /// Get a copy of the value under `key`.
    ///
    /// If called while an effect is being tracked, this also registers the
    /// effect as a subscriber of the whole store.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.with(key, |value| value.cloned())
    }

    /// Get a copy of the value under `key` without tracking dependencies.
    pub fn get_untracked<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.with_untracked(key, |value| value.cloned())
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn try_get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.get(key).ok_or_else(|| RippleError::MissingKey {
            key: format!("{key:?}"),
        })
    }
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + Clone + 'static,
    V: 'static,
{
    /// Tracked list of keys, in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.track();
        self.inner.record.borrow().keys().cloned().collect()
    }
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + Clone + 'static,
    V: Clone + 'static,
{
    /// Tracked copy of the whole record.
    pub fn snapshot(&self) -> IndexMap<K, V> {
        self.track();
        self.inner.record.borrow().clone()
    }
}

impl<K: 'static, V: 'static> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: Debug + 'static, V: Debug + 'static> Debug for Store<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("record", &*self.inner.record.borrow())
            .field("subscriber_count", &self.inner.subscribers.len())
            .finish()
    }
}

/// Serializes the record as a map. Serializing does not subscribe.
impl<K, V> Serialize for Store<K, V>
where
    K: Serialize + Hash + Eq + 'static,
    V: Serialize + 'static,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.record.borrow().serialize(serializer)
    }
}

/// Create a store over the given entries.
pub fn create_store<K, V>(base: impl IntoIterator<Item = (K, V)>) -> Store<K, V>
where
    K: Hash + Eq + 'static,
    V: 'static,
{
    Store::new(base)
}
