use crate::calendar::{date_from_parts, format_date, DayStrip, STRIP_LINES};
use crate::classify::DayStateClassifier;
use crate::config::PickerConfig;
use crate::controller::{PickerController, PickerState};
use crate::help::Help;
use crate::scroll::{ScrollEvent, ScrollSurface, ScrollView};
use crate::theme::{BASE_STYLE, MARKER_STYLE, MONTH_STYLE, STATUS_STYLE};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Instant;
use time::{Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub(crate) type SelectionCallback = Box<dyn FnMut(u8)>;

#[derive(Debug)]
pub(crate) struct App {
    picker: PickerController<SelectionCallback>,
    scroll: ScrollView,
    classifier: DayStateClassifier,
    /// The day most recently reported by the picker
    selected: Rc<Cell<u8>>,
    /// Where the strip was last drawn, for mapping mouse clicks to days
    strip_area: Rect,
    state: AppState,
}

impl App {
    pub(crate) fn new(config: &PickerConfig, today: PrimitiveDateTime, now: Instant) -> App {
        let selected = Rc::new(Cell::new(config.day));
        let sink = Rc::clone(&selected);
        let on_select: SelectionCallback = Box::new(move |day| sink.set(day));
        App {
            picker: PickerController::new(config.month, config.day, today, now, on_select),
            scroll: ScrollView::new(),
            classifier: DayStateClassifier::new(config, today),
            selected,
            strip_area: Rect::default(),
            state: AppState::Picker,
        }
    }

    /// Runs the picker until the user quits.  The current date is read anew
    /// on every frame in the time zone at `offset`.
    pub(crate) fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
        offset: UtcOffset,
    ) -> io::Result<()> {
        while !self.quitting() {
            let now = OffsetDateTime::now_utc().to_offset(offset);
            self.set_today(PrimitiveDateTime::new(now.date(), now.time()));
            self.draw(terminal)?;
            let deadline = self.next_deadline(Instant::now());
            let ready = match deadline {
                Some(when) => event::poll(when.saturating_duration_since(Instant::now()))?,
                None => true,
            };
            if ready {
                self.handle_event(&event::read()?, Instant::now())?;
            }
            self.tick(Instant::now());
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn set_today(&mut self, today: PrimitiveDateTime) {
        if today.date() != self.picker.today().date() {
            log::info!("Date changed to {}", format_date(today.date()));
        }
        self.picker.set_today(today);
        self.classifier.set_today(today);
    }

    fn next_deadline(&self, now: Instant) -> Option<Instant> {
        match (self.picker.next_deadline(), self.scroll.next_deadline(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires any due auto-center and moves the scroll view along
    fn tick(&mut self, now: Instant) {
        self.picker.poll(now, &mut self.scroll);
        match self.scroll.tick(now) {
            Some(ScrollEvent::MomentumEnd { offset }) => {
                self.picker.on_scroll_end(offset, &self.scroll);
            }
            Some(ScrollEvent::AnimationEnd { offset }) => {
                log::debug!("Scroll settled at offset {offset}");
                self.picker.on_animation_end();
            }
            None => (),
        }
    }

    fn handle_event(&mut self, ev: &Event, now: Instant) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match ev {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) if ev.is_key_press() => {
                if *modifiers == KeyModifiers::CONTROL && *code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                } else if !normal_modifiers.contains(*modifiers)
                    || !self.handle_key(*code, *modifiers, now)
                {
                    self.beep()?;
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) if self.state == AppState::Picker => self.handle_click(*column, *row),
            // Redraw on resize, and we might as well redraw on other stuff
            // too
            _ => (),
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers, now: Instant) -> bool {
        match self.state {
            AppState::Picker => {
                let shifted = modifiers.contains(KeyModifiers::SHIFT);
                let day_width = i32::from(self.scroll.day_width());
                match key {
                    KeyCode::Char('h') => self.drag(-1, now),
                    KeyCode::Char('l') => self.drag(1, now),
                    KeyCode::Char('H') => self.drag(-day_width, now),
                    KeyCode::Char('L') => self.drag(day_width, now),
                    KeyCode::Left => self.drag(if shifted { -day_width } else { -1 }, now),
                    KeyCode::Right => self.drag(if shifted { day_width } else { 1 }, now),
                    KeyCode::Char('[') | KeyCode::Up => {
                        self.change_month(self.picker.month().previous(), now);
                    }
                    KeyCode::Char(']') | KeyCode::Down => {
                        self.change_month(self.picker.month().next(), now);
                    }
                    KeyCode::Enter => {
                        let day = self
                            .scroll
                            .geometry()
                            .mapper()
                            .offset_to_day(self.scroll.offset());
                        self.picker.tap(day, &mut self.scroll);
                    }
                    KeyCode::Char('t') | KeyCode::Home => return self.select_today(),
                    KeyCode::Char('?') => self.state = AppState::Helping,
                    KeyCode::Char('q') | KeyCode::Esc => self.state = AppState::Quitting,
                    _ => return false,
                }
                true
            }
            AppState::Helping => {
                self.state = AppState::Picker;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        let area = self.strip_area;
        if !(area.left()..area.right()).contains(&column)
            || !(area.top()..area.bottom()).contains(&row)
        {
            return;
        }
        if let Some(day) = self.scroll.day_at_column(column - area.x) {
            self.picker.tap(day, &mut self.scroll);
        }
    }

    fn drag(&mut self, delta: i32, now: Instant) {
        self.picker.begin_gesture();
        self.scroll.drag(delta, now);
    }

    fn change_month(&mut self, month: Month, now: Instant) {
        self.picker.change_month(month, self.selected.get(), now);
        self.scroll.set_content_len(self.picker.days().len());
    }

    // Returns `false` if today is not in the month being shown
    fn select_today(&mut self) -> bool {
        let today = self.picker.today();
        if self.picker.month() == today.month() {
            self.picker.tap(today.day(), &mut self.scroll);
            true
        } else {
            false
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn month_label(&self) -> String {
        format!("{} {}", self.picker.month(), self.picker.today().year())
    }

    fn status_line(&self) -> String {
        let year = self.picker.today().year();
        let mut s = match date_from_parts(year, self.picker.month(), self.selected.get()) {
            Some(date) => format!("Selected: {}", format_date(date)),
            None => format!("Selected: day {}", self.selected.get()),
        };
        if self.picker.state() != PickerState::Idle {
            s.push_str(" …");
        }
        s
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [label_area, strip_area, marker_area, _, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(STRIP_LINES),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);
        Line::styled(self.month_label(), MONTH_STYLE)
            .centered()
            .render(label_area, buf);
        DayStrip::new(self.picker.days(), self.picker.month(), &self.classifier).render(
            strip_area,
            buf,
            &mut self.scroll,
        );
        self.strip_area = strip_area;
        let geometry = self.scroll.geometry();
        let centre = marker_area.x + geometry.inset + geometry.day_width / 2;
        if centre < marker_area.right() {
            buf.set_string(centre, marker_area.y, "▲", MARKER_STYLE);
        }
        Line::styled(self.status_line(), STATUS_STYLE)
            .centered()
            .render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Picker,
    Helping,
    Quitting,
}
