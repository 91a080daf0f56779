//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a value and
//! tracks which effects depend on it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read while an effect is being tracked, the signal
//!    appends that effect to its subscriber list (once).
//!
//! 2. When a signal is written, the value is replaced and every subscriber
//!    is invoked synchronously, in the order it subscribed.
//!
//! 3. There is no equality check. Writing the current value again notifies
//!    every subscriber again.
//!
//! # Re-entrancy
//!
//! No borrow is held while subscribers run, so a subscriber may read or
//! write any signal, including the one that notified it. A write that feeds
//! back into itself recurses without bound unless
//! [`RippleConfig::max_notify_depth`](crate::RippleConfig) is set.
//!
//! A subscriber that panics unwinds through the write that triggered it.
//! Subscribers after it in the list are not notified for that write.

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::context::TrackingScope;
use super::subscriber::{NotifyPass, SubscriberId, SubscriberList};
use crate::error::Result;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

struct SignalInner<T> {
    id: u64,
    value: RefCell<T>,
    subscribers: SubscriberList,
}

/// A reactive signal holding a value of type T.
///
/// Cloning a signal yields another handle to the same value and subscriber
/// list.
///
/// # Example
///
/// ```rust
/// use ripple_core::Signal;
///
/// let count = Signal::new(0);
/// assert_eq!(count.get(), 0);
///
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct Signal<T: 'static> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                id: next_signal_id(),
                value: RefCell::new(value),
                subscribers: SubscriberList::new(),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Borrow the current value, subscribing the tracked effect if any.
    ///
    /// The value stays borrowed while `f` runs; setting this signal from
    /// inside `f` panics.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        TrackingScope::track(&self.inner.subscribers);
        self.with_untracked(f)
    }

    /// Borrow the current value without tracking dependencies.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Set a new value and notify subscribers.
    ///
    /// # Panics
    ///
    /// Panics if a configured notification depth limit is exceeded, and
    /// propagates any panic raised by a subscriber.
    pub fn set(&self, value: T) {
        if let Err(err) = self.try_set(value) {
            panic!("{err}");
        }
    }

    /// Set a new value and notify subscribers, reporting a tripped
    /// notification depth limit as an error instead of panicking.
    ///
    /// When the limit is exceeded the value is left unchanged.
    pub fn try_set(&self, value: T) -> Result<()> {
        let _pass = NotifyPass::begin()?;
        *self.inner.value.borrow_mut() = value;

        tracing::trace!(signal = self.inner.id, "signal written");
        self.inner.subscribers.notify_all();
        Ok(())
    }

    /// Update the value using a function of the current value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.with_untracked(f);
        self.set(next);
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Get the IDs of the subscribers, in notification order.
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.inner.subscribers.ids()
    }

    /// Split the signal into read and write halves.
    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (ReadSignal(self.clone()), WriteSignal(self))
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Get the current value.
    ///
    /// If called while an effect is being tracked, this also registers the
    /// effect as a subscriber.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Get the current value without tracking dependencies.
    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Debug + 'static> Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.borrow())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

/// Read half of a signal created by [`create_signal`].
pub struct ReadSignal<T: 'static>(Signal<T>);

impl<T: 'static> ReadSignal<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with_untracked(f)
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subscriber_count()
    }

    pub fn id(&self) -> u64 {
        self.0.id()
    }
}

impl<T: Clone + 'static> ReadSignal<T> {
    /// Tracked read of the current value.
    pub fn get(&self) -> T {
        self.0.get()
    }

    pub fn get_untracked(&self) -> T {
        self.0.get_untracked()
    }
}

impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Debug + 'static> Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Write half of a signal created by [`create_signal`].
pub struct WriteSignal<T: 'static>(Signal<T>);

impl<T: 'static> WriteSignal<T> {
    /// Replace the value and notify every subscriber.
    pub fn set(&self, value: T) {
        self.0.set(value);
    }

    pub fn try_set(&self, value: T) -> Result<()> {
        self.0.try_set(value)
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.0.update(f);
    }
}

impl<T: 'static> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Debug + 'static> Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Create a signal and return its getter and setter.
///
/// ```rust
/// use ripple_core::{create_effect, create_signal};
///
/// let (count, set_count) = create_signal(3);
/// create_effect(move || println!("count is {}", count.get()));
/// set_count.set(5); // prints "count is 5"
/// ```
pub fn create_signal<T: 'static>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    Signal::new(initial).split()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::subscriber::Subscriber;
    use crate::{RippleConfig, RippleError};
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<i32>>, Subscriber) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let subscriber = Subscriber::new(move || count_clone.set(count_clone.get() + 1));
        (count, subscriber)
    }

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_update() {
        let signal = Signal::new(10);
        signal.update(|v| v + 5);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn signal_with_borrows_non_clone_values() {
        let signal = Signal::new(String::from("ripple"));
        assert_eq!(signal.with(|s| s.len()), 6);
    }

    #[test]
    fn untracked_reads_never_subscribe() {
        let signal = Signal::new(1);

        for _ in 0..3 {
            signal.get();
        }
        assert_eq!(signal.subscriber_count(), 0);

        let (_, subscriber) = counter();
        let _scope = TrackingScope::enter(subscriber);
        signal.get_untracked();
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn tracked_reads_subscribe_once() {
        let signal = Signal::new(0);
        let (count, subscriber) = counter();
        let id = subscriber.id();

        {
            let _scope = TrackingScope::enter(subscriber);
            signal.get();
            signal.get();
        }
        assert_eq!(signal.subscriber_ids(), vec![id]);

        signal.set(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn setting_the_same_value_notifies() {
        let signal = Signal::new(3);
        let (count, subscriber) = counter();
        {
            let _scope = TrackingScope::enter(subscriber);
            signal.get();
        }

        signal.set(3);
        signal.set(3);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn signal_clone_shares_state() {
        let signal1 = Signal::new(0);
        let signal2 = signal1.clone();

        signal1.set(42);
        assert_eq!(signal2.get(), 42);

        signal2.set(100);
        assert_eq!(signal1.get(), 100);
    }

    #[test]
    fn signal_ids_are_unique() {
        let s1 = Signal::new(0);
        let s2 = Signal::new(0);
        let s3 = Signal::new(0);

        assert_ne!(s1.id(), s2.id());
        assert_ne!(s2.id(), s3.id());
        assert_ne!(s1.id(), s3.id());
    }

    #[test]
    fn split_halves_share_the_signal() {
        let (read, write) = create_signal(1);
        write.set(2);
        assert_eq!(read.get(), 2);
        write.update(|v| v * 10);
        assert_eq!(read.get_untracked(), 20);
    }

    #[test]
    fn subscriber_can_read_and_write_inside_notification() {
        let signal = Signal::new(0);
        let seen = Rc::new(Cell::new(-1));

        let subscriber = {
            let signal = signal.clone();
            let seen = seen.clone();
            Subscriber::new(move || {
                let value = signal.get_untracked();
                seen.set(value);
                if value < 3 {
                    signal.set(value + 1);
                }
            })
        };
        {
            let _scope = TrackingScope::enter(subscriber);
            signal.get();
        }

        signal.set(1);
        assert_eq!(signal.get_untracked(), 3);
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn try_set_reports_depth_limit_and_keeps_value() {
        RippleConfig::default()
            .with_max_notify_depth(2)
            .install()
            .unwrap();

        let signal = Signal::new(0);
        let failure = Rc::new(RefCell::new(None));

        let subscriber = {
            let signal = signal.clone();
            let failure = failure.clone();
            Subscriber::new(move || {
                let next = signal.get_untracked() + 1;
                if let Err(err) = signal.try_set(next) {
                    *failure.borrow_mut() = Some(err);
                }
            })
        };
        {
            let _scope = TrackingScope::enter(subscriber);
            signal.get();
        }

        signal.set(10);
        // Depth 1 wrote 10, depth 2 wrote 11, depth 3 was refused.
        assert_eq!(signal.get_untracked(), 11);
        assert!(matches!(
            failure.borrow_mut().take(),
            Some(RippleError::NotifyDepthExceeded { depth: 3, limit: 2 })
        ));

        RippleConfig::reset();
    }
}
