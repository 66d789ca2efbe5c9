use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::palette;

pub struct StatusBarWidget;

impl StatusBarWidget {
    /// One-line bar: `status` on the left, `hint` right-aligned
    pub fn render(frame: &mut Frame, area: Rect, status: &str, hint: &str) {
        let used = status.chars().count() + hint.chars().count();
        let padding = usize::from(area.width).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                status.to_string(),
                Style::default().fg(palette::FG).bg(palette::BAR),
            ),
            Span::styled(" ".repeat(padding), Style::default().bg(palette::BAR)),
            Span::styled(
                hint.to_string(),
                Style::default().fg(palette::DIM).bg(palette::BAR),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
