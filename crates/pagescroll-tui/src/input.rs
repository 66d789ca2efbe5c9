//! Terminal input as interrupt events, and Vim-style key notation
//!
//! Scrolls are interrupted on key *release*. Most terminals only report
//! presses; crossterm reports releases once the keyboard enhancement flags
//! are pushed and the terminal honours them. [`InputTranslator`] is told
//! which case applies and treats a press as the release otherwise.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use pagescroll_core::InputEvent;

use crate::event::AppEvent;

/// Maps terminal events onto [`InputEvent`]s
#[derive(Debug, Clone, Copy)]
pub struct InputTranslator {
    releases_reported: bool,
}

impl InputTranslator {
    /// `releases_reported`: the terminal sends key release events
    pub fn new(releases_reported: bool) -> Self {
        Self { releases_reported }
    }

    pub fn releases_reported(&self) -> bool {
        self.releases_reported
    }

    pub fn translate(&self, event: &AppEvent) -> Option<InputEvent> {
        match event {
            AppEvent::Key(key) => {
                let wanted = if self.releases_reported {
                    KeyEventKind::Release
                } else {
                    KeyEventKind::Press
                };
                if key.kind != wanted {
                    return None;
                }
                key_notation(key).map(InputEvent::key_release)
            }
            AppEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(_) => Some(InputEvent::mouse_press(mouse.column, mouse.row)),
                _ => None,
            },
            AppEvent::Resize(..) | AppEvent::Tick => None,
        }
    }
}

/// Vim-style notation of a key event ("j", "G", "<C-d>", "<PageDown>")
pub fn key_notation(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(format!("<C-{}>", c.to_ascii_lowercase()));
        }
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Enter => "CR".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "S-Tab".to_string(),
        KeyCode::Backspace => "BS".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => return None,
    };
    Some(format!("<{}>", name))
}

/// Parse Vim-style key notation into a key code
///
/// Supported formats:
/// - Single char: "j", "G", "/"
/// - Ctrl: "<C-d>"
/// - Special keys: "<CR>", "<Esc>", "<Space>", "<PageDown>", "<F5>", ...
pub fn parse_key(s: &str) -> Option<(KeyCode, KeyModifiers)> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        if let Some(rest) = inner.strip_prefix("C-") {
            return parse_key_name(rest).map(|code| (code, KeyModifiers::CONTROL));
        }
        if let Some(rest) = inner.strip_prefix("S-") {
            return parse_key_name(rest).map(|code| match code {
                KeyCode::Tab => (KeyCode::BackTab, KeyModifiers::SHIFT),
                other => (other, KeyModifiers::SHIFT),
            });
        }
        return parse_key_name(inner).map(|code| (code, KeyModifiers::NONE));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some((KeyCode::Char(c), KeyModifiers::SHIFT)),
        (Some(c), None) => Some((KeyCode::Char(c), KeyModifiers::NONE)),
        _ => None,
    }
}

/// Entries of `keys` that are not valid key notation
pub fn invalid_keys<S: AsRef<str>>(keys: &[S]) -> Vec<&str> {
    keys.iter()
        .map(AsRef::as_ref)
        .filter(|key| parse_key(key).is_none())
        .collect()
}

fn parse_key_name(name: &str) -> Option<KeyCode> {
    let code = match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "space" | "spc" => KeyCode::Char(' '),
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        other => {
            if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Some(KeyCode::F(n));
                }
                return None;
            }
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                _ => return None,
            }
        }
    };
    Some(code)
}
