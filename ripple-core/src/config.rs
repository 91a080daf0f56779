//! Runtime Configuration
//!
//! Configuration is per thread, like the tracking context itself. Each
//! thread starts with [`RippleConfig::default()`], which reproduces the bare
//! behavior of the reactive primitives: no recursion guard on notification
//! chains and a warning whenever a nested effect clobbers the tracking slot.
//!
//! # Example
//!
//! ```rust
//! use ripple_core::RippleConfig;
//!
//! RippleConfig::default()
//!     .with_max_notify_depth(64)
//!     .install()
//!     .unwrap();
//!
//! assert_eq!(RippleConfig::current().max_notify_depth, Some(64));
//! ```

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RippleError};

thread_local! {
    static CONFIG: RefCell<RippleConfig> = RefCell::new(RippleConfig::default());
}

/// Tunables for the reactive runtime on the current thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Maximum number of nested notification passes.
    ///
    /// `None` leaves re-entrant writes unguarded: a subscriber that writes
    /// back into the signal that notified it recurses until the stack is
    /// exhausted.
    pub max_notify_depth: Option<usize>,

    /// Log a warning when an effect is created while another effect is
    /// still tracking.
    pub warn_on_nested_effect: bool,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            max_notify_depth: None,
            warn_on_nested_effect: true,
        }
    }
}

impl RippleConfig {
    /// Set the notification depth limit.
    pub fn with_max_notify_depth(mut self, limit: usize) -> Self {
        self.max_notify_depth = Some(limit);
        self
    }

    /// Enable or disable the nested effect warning.
    pub fn with_nested_effect_warning(mut self, enabled: bool) -> Self {
        self.warn_on_nested_effect = enabled;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(RippleError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_notify_depth == Some(0) {
            return Err(RippleError::InvalidConfig(
                "max_notify_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Make this the active configuration for the current thread.
    pub fn install(self) -> Result<()> {
        self.validate()?;
        tracing::debug!(config = ?self, "installing reactive configuration");
        CONFIG.with(|config| *config.borrow_mut() = self);
        Ok(())
    }

    /// Get a copy of the active configuration for the current thread.
    pub fn current() -> Self {
        CONFIG.with(|config| config.borrow().clone())
    }

    /// Restore the defaults on the current thread.
    pub fn reset() {
        CONFIG.with(|config| *config.borrow_mut() = Self::default());
    }

    pub(crate) fn max_notify_depth() -> Option<usize> {
        CONFIG.with(|config| config.borrow().max_notify_depth)
    }

    pub(crate) fn warn_on_nested_effect() -> bool {
        CONFIG.with(|config| config.borrow().warn_on_nested_effect)
    }
}
