mod content;
mod status_bar;

pub use content::ContentWidget;
pub use status_bar::StatusBarWidget;

use ratatui::style::Color;

/// Colors shared by the widgets
pub(crate) mod palette {
    use super::Color;

    pub const BG: Color = Color::Rgb(40, 40, 40);
    pub const BAR: Color = Color::Rgb(80, 73, 69);
    pub const FG: Color = Color::Rgb(212, 190, 152);
    pub const DIM: Color = Color::Rgb(146, 131, 116);
    pub const ACCENT: Color = Color::Rgb(169, 182, 101);
    pub const HEADING: Color = Color::Rgb(231, 138, 78);
}
