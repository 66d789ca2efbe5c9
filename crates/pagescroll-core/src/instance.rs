//! One scroll request and its run state

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::interrupt::{InterruptSource, ListenerId};
use crate::lock;
use crate::options::{ResolvedOptions, ScrollOptions, ScrollTarget};
use crate::timer::TickHandle;
use crate::view::{Axis, ScrollView};

/// Handle to a scroll request
///
/// Cheap to clone; clones share the same run state, so a clone can be used
/// to stop or inspect a scroll started from another.
#[derive(Clone)]
pub struct ScrollInstance {
    id: Uuid,
    options: Arc<ScrollOptions>,
    state: Arc<Mutex<RunState>>,
}

/// Mutable state of the current (or last) run, owned by the controller
#[derive(Default)]
pub(crate) struct RunState {
    pub(crate) resolved: Option<Arc<ResolvedOptions>>,
    pub(crate) start_position: f64,
    /// `None` until resolved, and when the target could not be resolved
    pub(crate) target_position: Option<f64>,
    pub(crate) distance: Option<f64>,
    pub(crate) execution_duration: Duration,
    pub(crate) start_time: Option<Instant>,
    pub(crate) end_time: Option<Instant>,
    /// Present iff the instance is running
    pub(crate) timer: Option<TickHandle>,
    pub(crate) listener: Option<(Arc<dyn InterruptSource>, ListenerId)>,
    /// Bumped on every start so ticks of an earlier run are ignored
    pub(crate) generation: u64,
}

impl ScrollInstance {
    pub fn new(options: ScrollOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            options: Arc::new(options),
            state: Arc::new(Mutex::new(RunState::default())),
        }
    }

    /// Scroll to `target` in `namespace` with everything else defaulted
    pub fn simple(target: impl Into<ScrollTarget>, namespace: impl Into<String>) -> Self {
        Self::new(ScrollOptions::new().target(target).namespace(namespace))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The partial options this instance was created with
    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    /// Whether a tick timer is active for this instance
    pub fn is_running(&self) -> bool {
        self.state().timer.is_some()
    }

    /// Namespace of the last start, `None` before the first start
    pub fn namespace(&self) -> Option<String> {
        self.state().resolved.as_ref().map(|r| r.namespace.clone())
    }

    pub fn start_position(&self) -> f64 {
        self.state().start_position
    }

    /// Resolved target of the last start, `None` if it could not be resolved
    pub fn target_position(&self) -> Option<f64> {
        self.state().target_position
    }

    pub fn distance(&self) -> Option<f64> {
        self.state().distance
    }

    pub fn execution_duration(&self) -> Duration {
        self.state().execution_duration
    }

    pub fn interrupt_listeners_attached(&self) -> bool {
        self.state().listener.is_some()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, RunState> {
        lock(&self.state)
    }

    pub(crate) fn same_as(&self, other: &ScrollInstance) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl PartialEq for ScrollInstance {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl fmt::Debug for ScrollInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollInstance")
            .field("id", &self.id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// First non-zero readable offset among `views`, in order; 0 if none
pub(crate) fn probe_start_position(views: &[Arc<dyn ScrollView>], axis: Axis) -> f64 {
    views
        .iter()
        .filter_map(|view| view.scroll_offset(axis))
        .find(|offset| offset.is_finite() && *offset != 0.0)
        .unwrap_or(0.0)
}

/// Write `position` to every view, returns whether any view took it
///
/// A view took the write when its offset changed, or when the remaining
/// movement was below `min_distance` (views may not perform tiny moves).
pub(crate) fn apply_position(
    views: &[Arc<dyn ScrollView>],
    axis: Axis,
    position: f64,
    min_distance: f64,
) -> bool {
    let mut applied = false;
    for view in views {
        let Some(before) = view.scroll_offset(axis).filter(|v| v.is_finite()) else {
            continue;
        };
        let distance = (before - position).abs();
        view.set_scroll_offset(axis, position);

        let moved = view
            .scroll_offset(axis)
            .is_some_and(|after| (after - position).abs() != distance);
        if distance < min_distance || moved {
            applied = true;
        }
    }
    applied
}
