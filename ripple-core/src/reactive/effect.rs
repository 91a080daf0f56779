//! Effect Runner
//!
//! An Effect is a side-effecting callback that re-runs whenever a value it
//! depends on is written.
//!
//! # How Effects Work
//!
//! 1. [`create_effect`] wraps the callback in a [`Subscriber`], makes it the
//!    current tracked subscriber and runs it once, immediately.
//!
//! 2. Every signal or store read during that first run appends the
//!    subscriber to its list.
//!
//! 3. A later write invokes the callback again, from scratch, directly from
//!    the writer. Re-runs are not tracked, so the set of dependencies is
//!    fixed by the first run and never shrinks.
//!
//! # Limitations
//!
//! - No disposal, and no way to reclaim an effect. A signal or store holds
//!   its subscribers strongly, and an effect usually holds the handles it
//!   reads. The two keep each other alive, so once every outside handle is
//!   dropped neither the value, the effect, nor anything the effect captured
//!   is ever freed.
//! - No stack of tracking contexts. An effect created from inside another
//!   effect's first run clears the outer effect's tracking slot on return;
//!   reads made by the outer effect after that point do not subscribe it.
//! - No batching or scheduling. Each write re-runs its subscribers before the
//!   write returns.

use super::context::TrackingScope;
use super::subscriber::Subscriber;

/// Register `f` as an effect and run it once.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use ripple_core::{create_effect, create_signal};
///
/// let (count, set_count) = create_signal(3);
/// let runs = Rc::new(Cell::new(0));
///
/// let runs_clone = runs.clone();
/// create_effect(move || {
///     count.get();
///     runs_clone.set(runs_clone.get() + 1);
/// });
///
/// set_count.set(3);
/// assert_eq!(runs.get(), 2);
/// ```
pub fn create_effect<F>(f: F)
where
    F: Fn() + 'static,
{
    let subscriber = Subscriber::new(f);
    tracing::debug!(effect = subscriber.id().raw(), "running effect");

    let _scope = TrackingScope::enter(subscriber.clone());
    subscriber.notify();
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
