//! Subscriber types for the reactive system.
//!
//! A Subscriber is a callback that depends on reactive values. Effects are
//! the only producers of subscribers; signals and stores keep them in a
//! [`SubscriberList`] and invoke them on every write.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::config::RippleConfig;
use crate::error::{Result, RippleError};

/// Unique identifier for a subscriber.
///
/// Each subscriber gets a unique ID when created. Subscriber lists use the
/// ID as the identity check that keeps them duplicate-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscriber to reactive values.
///
/// Cloning a subscriber yields a handle to the same callback with the same
/// ID, so clones are interchangeable in subscriber lists.
#[derive(Clone)]
pub struct Subscriber {
    id: SubscriberId,
    notify: Rc<dyn Fn()>,
}

impl Subscriber {
    /// Create a new subscriber with the given notification callback.
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            id: SubscriberId::new(),
            notify: Rc::new(notify),
        }
    }

    /// Get the subscriber's unique ID.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Invoke the callback.
    pub fn notify(&self) {
        (self.notify)();
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}

/// Ordered, duplicate-free collection of subscribers.
///
/// Entries are never removed. A subscriber that stops reading a value is
/// still notified on every later write to it.
#[derive(Default)]
pub(crate) struct SubscriberList {
    entries: RefCell<IndexMap<SubscriberId, Subscriber>>,
}

impl SubscriberList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `subscriber` unless it is already present.
    pub(crate) fn insert(&self, subscriber: &Subscriber) -> bool {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(&subscriber.id) {
            return false;
        }
        entries.insert(subscriber.id, subscriber.clone());
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn ids(&self) -> Vec<SubscriberId> {
        self.entries.borrow().keys().copied().collect()
    }

    /// Invoke every subscriber in insertion order.
    ///
    /// The list is copied first: no borrow is held while callbacks run, and
    /// subscribers appended during this pass wait for the next write.
    pub(crate) fn notify_all(&self) {
        let snapshot: SmallVec<[Subscriber; 4]> =
            self.entries.borrow().values().cloned().collect();

        tracing::trace!(
            subscribers = snapshot.len(),
            depth = NotifyPass::depth(),
            "notifying subscribers"
        );

        for subscriber in &snapshot {
            subscriber.notify();
        }
    }
}

impl fmt::Debug for SubscriberList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

thread_local! {
    static NOTIFY_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Guard for one notification pass.
///
/// Counts how deeply writes are nested inside subscriber callbacks and
/// enforces [`RippleConfig::max_notify_depth`]. The count is restored when
/// the guard drops, including when a subscriber panics.
pub(crate) struct NotifyPass {
    _private: (),
}

impl NotifyPass {
    pub(crate) fn begin() -> Result<Self> {
        let depth = NOTIFY_DEPTH.with(|d| d.get()) + 1;

        if let Some(limit) = RippleConfig::max_notify_depth() {
            if depth > limit {
                tracing::warn!(depth, limit, "notification depth limit reached");
                return Err(RippleError::NotifyDepthExceeded { depth, limit });
            }
        }

        NOTIFY_DEPTH.with(|d| d.set(depth));
        Ok(Self { _private: () })
    }

    pub(crate) fn depth() -> usize {
        NOTIFY_DEPTH.with(|d| d.get())
    }
}

impl Drop for NotifyPass {
    fn drop(&mut self) {
        NOTIFY_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
