use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MARKER_STYLE: Style = BASE_STYLE.fg(Color::LightYellow);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.fg(Color::Gray);
