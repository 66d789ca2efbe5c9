//! Terminal host for pagescroll
//!
//! Implements the host-side collaborators of `pagescroll-core` on top of
//! ratatui and crossterm: a [`Viewport`] scroll view, an [`AnchorMap`]
//! resolver, and translation of terminal input into interrupt events.

pub mod anchors;
pub mod event;
pub mod input;
pub mod viewport;
pub mod widgets;

pub use anchors::AnchorMap;
pub use event::{AppEvent, EventHandler};
pub use input::InputTranslator;
pub use viewport::Viewport;
