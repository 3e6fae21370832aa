use crate::classify::{DayStateClassifier, DayVisualState, Opacity};
use crate::scroll::ScrollView;
use ratatui::{prelude::*, widgets::StatefulWidget};
use time::Month;

/// Number of lines taken up by the strip
pub(crate) const STRIP_LINES: u16 = 3;

/// Cells narrower than this are drawn without a border, as the side borders
/// would overwrite a two-digit label
const MIN_BORDERED_WIDTH: u16 = 4;

const ACS_HLINE: char = '━';
const ACS_VLINE: char = '┃';
const ACS_ULCORNER: char = '┏';
const ACS_URCORNER: char = '┓';
const ACS_LLCORNER: char = '┗';
const ACS_LRCORNER: char = '┛';

/// A horizontal strip of day cells, scrolled according to a [`ScrollView`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayStrip<'a> {
    days: &'a [u8],
    month: Month,
    classifier: &'a DayStateClassifier,
}

impl<'a> DayStrip<'a> {
    pub(crate) fn new(days: &'a [u8], month: Month, classifier: &'a DayStateClassifier) -> Self {
        DayStrip {
            days,
            month,
            classifier,
        }
    }
}

impl StatefulWidget for DayStrip<'_> {
    type State = ScrollView;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.set_viewport(area.width);
        state.set_content_len(self.days.len());
        let geometry = state.geometry();
        let mapper = geometry.mapper();
        let text = self.classifier.colors().text;
        let mut canvas = BufferCanvas::new(area, buf);
        for &day in self.days {
            // Column of the cell's left edge relative to the viewport; may be
            // negative for cells scrolled off to the left
            let left = i64::from(geometry.inset) + i64::from(mapper.day_to_offset(day))
                - i64::from(state.offset());
            let right = left + i64::from(geometry.day_width);
            if right <= 0 || left >= i64::from(area.width) {
                continue;
            }
            let look = self.classifier.classify(day, self.month);
            canvas.draw_cell(left, geometry.day_width, day, &look, text);
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_cell(&mut self, left: i64, width: u16, day: u8, look: &DayVisualState, text: Color) {
        let mut fill = Style::new().fg(text).bg(look.background);
        if look.opacity == Opacity::Dimmed {
            fill = fill.add_modifier(Modifier::DIM);
        }
        let last_line = STRIP_LINES.min(self.area.height);
        for x in (0..width).map(|i| left + i64::from(i)) {
            for y in 0..last_line {
                self.mvaddch(y, x, ' ', fill);
            }
        }
        let label = day.to_string();
        let label_width = u16::try_from(label.len()).unwrap_or(u16::MAX);
        let label_left = left + i64::from(width.saturating_sub(label_width) / 2);
        for (x, ch) in (label_left..).zip(label.chars()) {
            self.mvaddch(1, x, ch, fill);
        }
        if let Some(border) = look.border.filter(|_| look.border_width > 0) {
            if width >= MIN_BORDERED_WIDTH {
                self.draw_border(left, width, fill.fg(border));
            }
        }
    }

    fn draw_border(&mut self, left: i64, width: u16, style: Style) {
        let right = left + i64::from(width) - 1;
        for x in (left + 1)..right {
            self.mvaddch(0, x, ACS_HLINE, style);
            self.mvaddch(2, x, ACS_HLINE, style);
        }
        self.mvaddch(0, left, ACS_ULCORNER, style);
        self.mvaddch(0, right, ACS_URCORNER, style);
        self.mvaddch(1, left, ACS_VLINE, style);
        self.mvaddch(1, right, ACS_VLINE, style);
        self.mvaddch(2, left, ACS_LLCORNER, style);
        self.mvaddch(2, right, ACS_LRCORNER, style);
    }

    fn mvaddch(&mut self, y: u16, x: i64, ch: char, style: Style) {
        let Ok(x) = u16::try_from(x) else {
            return;
        };
        if y < self.area.height && x < self.area.width {
            if let Some(cell) = self.buf.cell_mut((x + self.area.x, y + self.area.y)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }
}
