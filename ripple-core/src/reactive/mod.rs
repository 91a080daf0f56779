//! Reactive Primitives
//!
//! This module implements the core reactive system: signals, stores, and
//! effects.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for one mutable value. When a signal is read while
//! an effect is being tracked, the signal registers that effect as a
//! subscriber. When the signal is written, every subscriber runs again.
//!
//! ## Stores
//!
//! A Store is an observable keyed record. It behaves like a signal whose
//! value is the whole record: reading any key subscribes to writes of every
//! key.
//!
//! ## Effects
//!
//! An Effect is a callback that runs once when created and again whenever a
//! value it read during that first run is written.
//!
//! # Implementation Notes
//!
//! The reactive system uses a thread-local tracking slot to detect
//! dependencies automatically. All handles are reference counted and
//! single-threaded; each thread is its own reactive world.

mod context;
mod effect;
mod signal;
mod store;
mod subscriber;

pub use context::TrackingScope;
pub use effect::create_effect;
pub use signal::{create_signal, ReadSignal, Signal, WriteSignal};
pub use store::{create_store, Store};
pub use subscriber::{Subscriber, SubscriberId};
