//! Ripple Core
//!
//! Minimal reactive primitives with automatic dependency tracking:
//!
//! - Signals: observable mutable cells
//! - Stores: observable keyed records with whole-object tracking
//! - Effects: callbacks that re-run when what they read is written
//!
//! Everything runs synchronously on the calling thread. There is no
//! batching, no scheduling and no disposal; a write re-runs its subscribers
//! before it returns.
//!
//! # Architecture
//!
//! - `reactive`: signals, stores, effects and the tracking context
//! - `config`: per-thread runtime configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```rust
//! use ripple_core::{create_effect, create_signal, create_store};
//!
//! let (count, set_count) = create_signal(3);
//! let profile = create_store([("id", "one")]);
//!
//! {
//!     let profile = profile.clone();
//!     create_effect(move || {
//!         println!("count {} profile {:?}", count.get(), profile.get("id"));
//!     });
//! }
//!
//! profile.set("id", "three"); // effect re-runs
//! set_count.set(5);           // effect re-runs
//! ```

pub mod config;
pub mod error;
pub mod reactive;

pub use config::RippleConfig;
pub use error::{Result, RippleError};
pub use reactive::{
    create_effect, create_signal, create_store, ReadSignal, Signal, Store, Subscriber,
    SubscriberId, TrackingScope, WriteSignal,
};
