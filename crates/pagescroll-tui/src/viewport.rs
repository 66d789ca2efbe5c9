//! Scrollable terminal region

use std::sync::{Mutex, MutexGuard, PoisonError};

use pagescroll_core::{Axis, ScrollView};
use ratatui::layout::Rect;

/// A screen area showing a window of larger content
///
/// Offsets are whole cells, clamped so the window never runs past the
/// content. The area is updated on every draw; the offsets are written by
/// the scroll controller from its tick task, hence the lock.
#[derive(Debug, Default)]
pub struct Viewport {
    state: Mutex<ViewportState>,
}

#[derive(Debug, Clone, Copy, Default)]
struct ViewportState {
    area: Rect,
    content_width: u16,
    content_height: u16,
    offset_x: u16,
    offset_y: u16,
}

impl ViewportState {
    fn max_offset(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Vertical => self.content_height.saturating_sub(self.area.height),
            Axis::Horizontal => self.content_width.saturating_sub(self.area.width),
        }
    }

    fn offset_mut(&mut self, axis: Axis) -> &mut u16 {
        match axis {
            Axis::Vertical => &mut self.offset_y,
            Axis::Horizontal => &mut self.offset_x,
        }
    }

    fn clamp(&mut self) {
        self.offset_y = self.offset_y.min(self.max_offset(Axis::Vertical));
        self.offset_x = self.offset_x.min(self.max_offset(Axis::Horizontal));
    }
}

impl Viewport {
    pub fn new(content_width: u16, content_height: u16) -> Self {
        Self {
            state: Mutex::new(ViewportState {
                content_width,
                content_height,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn area(&self) -> Rect {
        self.state().area
    }

    /// Move or resize the on-screen area, re-clamping the offsets
    pub fn set_area(&self, area: Rect) {
        let mut state = self.state();
        state.area = area;
        state.clamp();
    }

    pub fn set_content_size(&self, width: u16, height: u16) {
        let mut state = self.state();
        state.content_width = width;
        state.content_height = height;
        state.clamp();
    }

    pub fn offset(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Vertical => self.state().offset_y,
            Axis::Horizontal => self.state().offset_x,
        }
    }

    pub fn max_offset(&self, axis: Axis) -> u16 {
        self.state().max_offset(axis)
    }

    /// `(y, x)` offsets in the order `Paragraph::scroll` takes them
    pub fn scroll_position(&self) -> (u16, u16) {
        let state = self.state();
        (state.offset_y, state.offset_x)
    }

    /// Move by `delta` cells without animation
    pub fn scroll_by(&self, axis: Axis, delta: i32) {
        let mut state = self.state();
        let max = i32::from(state.max_offset(axis));
        let offset = state.offset_mut(axis);
        let next = (i32::from(*offset) + delta).clamp(0, max);
        *offset = u16::try_from(next).unwrap_or(0);
    }
}

impl ScrollView for Viewport {
    fn scroll_offset(&self, axis: Axis) -> Option<f64> {
        Some(f64::from(self.offset(axis)))
    }

    fn set_scroll_offset(&self, axis: Axis, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        let mut state = self.state();
        let max = state.max_offset(axis);
        // Saturating float cast, then clamp to the scrollable range
        *state.offset_mut(axis) = (offset.round().max(0.0) as u16).min(max);
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        let area = self.state().area;
        column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use pagescroll_core::{Document, ScrollConfig, ScrollController, ScrollOptions};

    use crate::anchors::AnchorMap;

    fn viewport() -> Viewport {
        let viewport = Viewport::new(80, 100);
        viewport.set_area(Rect::new(2, 1, 40, 20));
        viewport
    }

    #[test]
    fn test_offsets_are_clamped() {
        let viewport = viewport();
        assert_eq!(viewport.max_offset(Axis::Vertical), 80);
        assert_eq!(viewport.max_offset(Axis::Horizontal), 40);

        viewport.set_scroll_offset(Axis::Vertical, 500.0);
        assert_eq!(viewport.scroll_offset(Axis::Vertical), Some(80.0));

        viewport.set_scroll_offset(Axis::Vertical, -3.0);
        assert_eq!(viewport.scroll_offset(Axis::Vertical), Some(0.0));

        viewport.set_scroll_offset(Axis::Vertical, 12.6);
        assert_eq!(viewport.scroll_position(), (13, 0));

        viewport.set_scroll_offset(Axis::Vertical, f64::NAN);
        assert_eq!(viewport.offset(Axis::Vertical), 13);
    }

    #[test]
    fn test_resize_reclamps() {
        let viewport = viewport();
        viewport.set_scroll_offset(Axis::Vertical, 80.0);
        viewport.set_area(Rect::new(0, 0, 40, 50));
        assert_eq!(viewport.offset(Axis::Vertical), 50);

        viewport.set_content_size(80, 10);
        assert_eq!(viewport.offset(Axis::Vertical), 0);
    }

    #[test]
    fn test_scroll_by() {
        let viewport = viewport();
        viewport.scroll_by(Axis::Vertical, 5);
        viewport.scroll_by(Axis::Horizontal, 3);
        assert_eq!(viewport.scroll_position(), (5, 3));

        viewport.scroll_by(Axis::Vertical, -10);
        viewport.scroll_by(Axis::Horizontal, 1000);
        assert_eq!(viewport.scroll_position(), (0, 40));
    }

    #[test]
    fn test_contains_hits_area_only() {
        let viewport = viewport();
        assert!(viewport.contains(2, 1));
        assert!(viewport.contains(41, 20));
        assert!(!viewport.contains(1, 5));
        assert!(!viewport.contains(42, 5));
        assert!(!viewport.contains(10, 21));
        assert!(!viewport.contains(10, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_scrolls_viewport_to_anchors() {
        let viewport = Arc::new(viewport());
        let mut anchors = AnchorMap::new();
        anchors.insert("middle", 0, 40);
        anchors.insert("past-the-end", 0, 500);

        let controller = ScrollController::new(ScrollConfig::default())
            .unwrap()
            .with_document(
                Document::new()
                    .with_scroll_view(viewport.clone())
                    .with_anchors(Arc::new(anchors)),
            );

        let results = Arc::new(Mutex::new(Vec::new()));
        let record = |results: &Arc<Mutex<Vec<bool>>>| {
            let results = Arc::clone(results);
            move |reached: bool| results.lock().unwrap().push(reached)
        };

        controller.scroll(
            ScrollOptions::new()
                .target("middle")
                .duration(Duration::from_millis(200))
                .on_finish(record(&results)),
        );
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(viewport.offset(Axis::Vertical), 40);

        // The viewport clamps at 80, so the scroll gives up once it stops moving
        controller.scroll(
            ScrollOptions::new()
                .target("past-the-end")
                .duration(Duration::from_millis(1000))
                .on_finish(record(&results)),
        );
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(viewport.offset(Axis::Vertical), 80);
        assert_eq!(*results.lock().unwrap(), vec![true, false]);
        assert_eq!(controller.running_count(), 0);
    }
}
