use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static KEYS: &[(&str, &str)] = &[
    ("h, LEFT", "Drag left one column"),
    ("l, RIGHT", "Drag right one column"),
    ("H, S-LEFT", "Drag left one day"),
    ("L, S-RIGHT", "Drag right one day"),
    ("[, UP", "Previous month"),
    ("], DOWN", "Next month"),
    ("ENTER", "Select the centred day"),
    ("t, HOME", "Select today"),
    ("CLICK", "Select a day"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

static DISMISS: &str = "Press the Any Key to dismiss.";

/// Columns between a key and its description
const KEY_GUTTER: usize = 4;

/// Popup listing the picker's key bindings
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text() -> Text<'static> {
        let key_width = KEYS.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + KEY_GUTTER;
        let mut lines = KEYS
            .iter()
            .map(|(key, desc)| Line::raw(format!("{key:key_width$}{desc}")))
            .collect::<Vec<_>>();
        lines.push(Line::raw(""));
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Help::text();
        // Add room for the border plus one column of padding on either side
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.width);
        let [popup] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center)
                    .padding(ratatui::widgets::Padding::horizontal(1)),
            )
            .style(self.0)
            .render(popup, buf);
    }
}
