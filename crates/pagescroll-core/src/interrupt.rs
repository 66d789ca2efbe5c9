//! Input events that may interrupt a running scroll
//!
//! The controller never talks to a concrete input API. It attaches a
//! listener to an [`InterruptSource`] while an interruptible scroll runs and
//! detaches it when the scroll stops. [`EventBus`] is the in-process source
//! hosts feed their translated events into.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::lock;
use crate::view::ScrollView;

/// Raw input relevant to interruption
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was released; `key` uses Vim-style notation ("j", "<PageDown>")
    KeyRelease { key: String },
    /// A mouse button went down at the given screen cell
    MousePress { column: u16, row: u16 },
}

impl InputEvent {
    pub fn key_release(key: impl Into<String>) -> Self {
        InputEvent::KeyRelease { key: key.into() }
    }

    pub fn mouse_press(column: u16, row: u16) -> Self {
        InputEvent::MousePress { column, row }
    }
}

/// Registration handle returned by [`InterruptSource::attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked for every input event while attached
pub type InterruptListener = Arc<dyn Fn(&InputEvent) + Send + Sync>;

/// Capability to observe input events
pub trait InterruptSource: Send + Sync {
    fn attach(&self, listener: InterruptListener) -> ListenerId;
    fn detach(&self, id: ListenerId);
}

/// In-process fan-out of input events to attached listeners
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<(ListenerId, InterruptListener)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every attached listener, returns how many saw it
    ///
    /// Listeners run without the bus lock held, so they may detach
    /// themselves (or others) while handling the event.
    pub fn dispatch(&self, event: &InputEvent) -> usize {
        let snapshot: Vec<InterruptListener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    /// Number of currently attached listeners
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl InterruptSource for EventBus {
    fn attach(&self, listener: InterruptListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, listener));
        id
    }

    fn detach(&self, id: ListenerId) {
        lock(&self.listeners).retain(|(existing, _)| *existing != id);
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Set of keys whose release interrupts a scroll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterruptKeys(HashSet<String>);

impl InterruptKeys {
    pub fn from_notation<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(keys.into_iter().map(|k| normalize_key(k.as_ref())).collect())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(&normalize_key(key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Decide whether `event` interrupts a scroll over `views`
///
/// Key releases interrupt only for configured keys; mouse presses only when
/// they land inside one of the scrolled views.
pub fn should_interrupt(
    event: &InputEvent,
    keys: &InterruptKeys,
    views: &[Arc<dyn ScrollView>],
) -> bool {
    match event {
        InputEvent::KeyRelease { key } => keys.contains(key),
        InputEvent::MousePress { column, row } => {
            views.iter().any(|view| view.contains(*column, *row))
        }
    }
}

/// Canonical form of a key in Vim-style notation
///
/// Special key names are case-insensitive and common aliases collapse
/// ("<CR>" and "<Enter>", "<Esc>" and "<Escape>"). Plain characters keep
/// their case since "G" and "g" are different keys.
pub fn normalize_key(key: &str) -> String {
    if key == " " {
        return "space".to_string();
    }
    let key = key.trim();
    let inner = match key.strip_prefix('<').and_then(|k| k.strip_suffix('>')) {
        Some(inner) => inner,
        None if key.chars().count() == 1 => return key.to_string(),
        None => key,
    };

    let lower = inner.to_lowercase();
    let name = match lower.as_str() {
        "cr" | "enter" | "return" => "enter",
        "esc" | "escape" => "esc",
        "space" | "spc" => "space",
        "bs" | "backspace" => "backspace",
        "del" | "delete" => "delete",
        "ins" | "insert" => "insert",
        "pgup" | "pageup" => "pageup",
        "pgdn" | "pagedown" => "pagedown",
        other => other,
    };
    name.to_string()
}
