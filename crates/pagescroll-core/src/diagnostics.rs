//! Process-wide bookkeeping behind the diagnostic warnings

use std::sync::atomic::{AtomicUsize, Ordering};

/// Controllers constructed in this process; never reset
static CONTROLLER_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Record a new controller, returns the total including it
pub(crate) fn register_controller() -> usize {
    CONTROLLER_COUNT.fetch_add(1, Ordering::SeqCst) + 1
}

/// Number of controllers constructed so far
pub fn controller_count() -> usize {
    CONTROLLER_COUNT.load(Ordering::SeqCst)
}
