//! Interruptible, namespaced scroll animations
//!
//! A [`ScrollController`] tweens the offset of one or more [`ScrollView`]s
//! toward a target over time. Scrolls are grouped by namespace: starting a
//! scroll stops the running ones of its namespace, and an input interrupt
//! stops the whole namespace.
//!
//! # Usage
//!
//! ```ignore
//! use pagescroll_core::{ScrollConfig, ScrollController, ScrollOptions};
//!
//! let controller = ScrollController::new(ScrollConfig::default())?
//!     .with_document(document);
//!
//! controller.scroll(
//!     ScrollOptions::new()
//!         .target("chapter-2")
//!         .on_finish(|reached| tracing::info!(reached, "scroll done")),
//! );
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod easing;
pub mod error;
pub mod instance;
pub mod interrupt;
pub mod options;
pub mod timer;
pub mod timing;
pub mod view;

pub use config::{EasingType, LogLevel, ScrollConfig};
pub use controller::{ScrollController, ScrollEvent};
pub use easing::{Easing, EasingTypeExt};
pub use error::{Error, Result};
pub use instance::ScrollInstance;
pub use interrupt::{EventBus, InputEvent, InterruptKeys, InterruptSource, ListenerId};
pub use options::{FinishCallback, ScrollOptions, ScrollTarget};
pub use view::{AnchorResolver, Axis, Document, ScrollView};

/// Lock a mutex, recovering the data if a panicking holder poisoned it
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
