use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::palette;
use crate::viewport::Viewport;

/// Bordered, scrolled view of text lines
pub struct ContentWidget;

impl ContentWidget {
    /// Draw `lines` through `viewport`
    ///
    /// Updates the viewport's area and content size first, so hit-testing and
    /// offset clamping follow the layout of the last frame.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        lines: &[String],
        viewport: &Viewport,
        focused: bool,
    ) {
        let border_style = if focused {
            Style::default().fg(palette::ACCENT)
        } else {
            Style::default().fg(palette::DIM)
        };

        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(palette::BG));

        let inner = block.inner(area);
        viewport.set_content_size(
            content_width(lines),
            u16::try_from(lines.len()).unwrap_or(u16::MAX),
        );
        viewport.set_area(inner);

        let text = Text::from(lines.iter().map(|line| style_line(line)).collect::<Vec<_>>());
        let paragraph = Paragraph::new(text)
            .block(block)
            .scroll(viewport.scroll_position());
        frame.render_widget(paragraph, area);
    }
}

/// Widest line in terminal cells
fn content_width(lines: &[String]) -> u16 {
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    u16::try_from(width).unwrap_or(u16::MAX)
}

fn style_line(line: &str) -> Line<'_> {
    if line.starts_with('#') {
        Line::from(Span::styled(
            line,
            Style::default()
                .fg(palette::HEADING)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(line, Style::default().fg(palette::FG)))
    }
}
