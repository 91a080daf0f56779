//! Tracking Context
//!
//! The tracking context records which effect is currently running. This
//! enables automatic dependency tracking: when a signal or store is read, the
//! current effect is appended to its subscriber list.
//!
//! # Implementation
//!
//! The context is a single thread-local slot, not a stack. Entering a scope
//! overwrites the slot and leaving any scope clears it. An effect created
//! inside another effect therefore clobbers the outer effect's slot, and once
//! the inner effect returns nothing is tracked for the remainder of the outer
//! run. That limitation is kept deliberately; it surfaces only as missing
//! subscriptions, never as an error. A warning is logged when it happens.

use std::cell::RefCell;

use super::subscriber::{Subscriber, SubscriberList};
use crate::config::RippleConfig;

thread_local! {
    static CURRENT: RefCell<Option<Subscriber>> = const { RefCell::new(None) };
}

/// Guard that clears the tracking slot when dropped.
///
/// The slot is cleared on every exit path, including when the tracked
/// computation panics, so a failed effect never leaks into later reads.
pub struct TrackingScope {
    _private: (),
}

impl TrackingScope {
    /// Make `subscriber` the current tracked subscriber.
    ///
    /// While the returned guard is alive, reads of signals and stores
    /// register `subscriber` as a dependent.
    pub fn enter(subscriber: Subscriber) -> Self {
        let id = subscriber.id();
        let previous = CURRENT.with(|slot| slot.borrow_mut().replace(subscriber));

        if let Some(previous) = previous {
            if RippleConfig::warn_on_nested_effect() {
                tracing::warn!(
                    outer = previous.id().raw(),
                    inner = id.raw(),
                    "nested effect replaced the active tracking context; \
                     the outer effect stops tracking after the inner one returns"
                );
            }
        }

        Self { _private: () }
    }

    /// Check if a subscriber is currently being tracked.
    pub fn is_active() -> bool {
        CURRENT.with(|slot| slot.borrow().is_some())
    }

    /// Get the current tracked subscriber, if any.
    pub fn current() -> Option<Subscriber> {
        CURRENT.with(|slot| slot.borrow().clone())
    }

    /// Register the current subscriber with `list`.
    ///
    /// Returns `true` if the list grew.
    pub(crate) fn track(list: &SubscriberList) -> bool {
        let Some(subscriber) = Self::current() else {
            return false;
        };

        let added = list.insert(&subscriber);
        if added {
            tracing::trace!(subscriber = subscriber.id().raw(), "subscribed");
        }
        added
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        CURRENT.with(|slot| slot.borrow_mut().take());
    }
}
