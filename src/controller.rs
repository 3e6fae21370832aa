use crate::calendar::build_range;
use crate::scroll::{ScrollPositionMapper, ScrollSurface};
use std::fmt;
use std::time::{Duration, Instant};
use time::{Month, PrimitiveDateTime};

/// How long to wait after a month change before centring the strip, giving
/// the scroll view a chance to lay out the new days first
pub(crate) const AUTO_CENTER_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum PickerState {
    Idle,
    /// The user is dragging the strip
    Scrolling,
    /// The strip is scrolling to a day chosen by the picker or a tap
    AutoCentering,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct PendingCenter {
    due: Instant,
    selected_day: u8,
}

/// Keeps the day strip's position and the consumer's selected day in step.
///
/// The selected day itself belongs to the consumer: the controller reports
/// selections through `on_select` and is told the current selection when it
/// needs it.
pub(crate) struct PickerController<F> {
    today: PrimitiveDateTime,
    month: Month,
    days: Vec<u8>,
    state: PickerState,
    pending: Option<PendingCenter>,
    on_select: F,
}

impl<F: FnMut(u8)> PickerController<F> {
    /// Creates a controller showing `month` and schedules the initial
    /// centring on `selected_day`
    pub(crate) fn new(
        month: Month,
        selected_day: u8,
        today: PrimitiveDateTime,
        now: Instant,
        on_select: F,
    ) -> Self {
        let mut this = PickerController {
            today,
            month,
            days: Vec::new(),
            state: PickerState::Idle,
            pending: None,
            on_select,
        };
        this.change_month(month, selected_day, now);
        this
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn days(&self) -> &[u8] {
        &self.days
    }

    pub(crate) fn state(&self) -> PickerState {
        self.state
    }

    pub(crate) fn today(&self) -> PrimitiveDateTime {
        self.today
    }

    /// Updates the current date.  The days are rebuilt if the year changed.
    pub(crate) fn set_today(&mut self, today: PrimitiveDateTime) {
        let new_year = today.year() != self.today.year();
        self.today = today;
        if new_year {
            self.days = build_range(self.month, today.year());
        }
    }

    /// Returns when the pending auto-center is due, if one is scheduled
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Switches to `month`, rebuilding the list of days and scheduling an
    /// auto-center.  Any auto-center still pending from an earlier change is
    /// cancelled.
    ///
    /// When the auto-center fires, the strip is centred on `selected_day` if
    /// `month` is the current month at that moment, otherwise on the first
    /// of the month.
    pub(crate) fn change_month(&mut self, month: Month, selected_day: u8, now: Instant) {
        self.month = month;
        self.days = build_range(month, self.today.year());
        if self
            .pending
            .replace(PendingCenter {
                due: now + AUTO_CENTER_DELAY,
                selected_day,
            })
            .is_some()
        {
            log::debug!("Cancelled pending auto-center");
        }
        log::debug!(
            "Showing {month} {}; centring in {AUTO_CENTER_DELAY:?}",
            self.today.year()
        );
    }

    /// Fires the pending auto-center if it is due.  Returns `true` if a
    /// scroll was issued.
    pub(crate) fn poll<S: ScrollSurface>(&mut self, now: Instant, surface: &mut S) -> bool {
        match self.pending {
            Some(PendingCenter { due, selected_day }) if due <= now => {
                self.pending = None;
                let day = if self.month == self.today.month() {
                    selected_day
                } else {
                    1
                };
                let offset = Self::mapper(surface).day_to_offset(day);
                log::debug!("Auto-centring on day {day} (offset {offset})");
                surface.scroll_to(offset, true);
                self.state = PickerState::AutoCentering;
                true
            }
            _ => false,
        }
    }

    /// Called when the user starts or continues dragging the strip.  A
    /// pending auto-center is cancelled so that it cannot yank the strip away
    /// from under the user.
    pub(crate) fn begin_gesture(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("Gesture cancelled pending auto-center");
        }
        if self.state != PickerState::Scrolling {
            log::debug!("Gesture started");
            self.state = PickerState::Scrolling;
        }
    }

    /// Called when a drag gesture has come to rest at `offset`.  The day at
    /// that offset is reported to the consumer as-is, without checking it
    /// against the days of the month.
    pub(crate) fn on_scroll_end<S: ScrollSurface>(&mut self, offset: u32, surface: &S) {
        let day = Self::mapper(surface).offset_to_day(offset);
        self.state = PickerState::Idle;
        self.select(day);
    }

    /// Called when an animated scroll has reached its target
    pub(crate) fn on_animation_end(&mut self) {
        if self.state == PickerState::AutoCentering {
            self.state = PickerState::Idle;
        }
    }

    /// Scrolls to `day` and reports it as selected without waiting for the
    /// scroll to finish
    pub(crate) fn tap<S: ScrollSurface>(&mut self, day: u8, surface: &mut S) {
        let offset = Self::mapper(surface).day_to_offset(day);
        surface.scroll_to(offset, true);
        self.state = PickerState::AutoCentering;
        self.select(day);
    }

    fn select(&mut self, day: u8) {
        log::debug!("Selected day {day} of {}", self.month);
        (self.on_select)(day);
    }

    fn mapper<S: ScrollSurface>(surface: &S) -> ScrollPositionMapper {
        ScrollPositionMapper::new(surface.day_width())
    }
}

impl<F> fmt::Debug for PickerController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerController")
            .field("today", &self.today)
            .field("month", &self.month)
            .field("days", &self.days)
            .field("state", &self.state)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::datetime;

    const TODAY: PrimitiveDateTime = datetime!(2024 - 06 - 15 13:45);

    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    struct RecordingSurface {
        day_width: u16,
        commands: Vec<(u32, bool)>,
    }

    impl RecordingSurface {
        fn new(day_width: u16) -> Self {
            RecordingSurface {
                day_width,
                commands: Vec::new(),
            }
        }
    }

    impl ScrollSurface for RecordingSurface {
        fn day_width(&self) -> u16 {
            self.day_width
        }

        fn scroll_to(&mut self, offset: u32, animated: bool) {
            self.commands.push((offset, animated));
        }
    }

    fn controller(
        month: Month,
        selected_day: u8,
        now: Instant,
    ) -> (PickerController<impl FnMut(u8)>, Rc<RefCell<Vec<u8>>>) {
        let selections = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selections);
        let ctrl = PickerController::new(month, selected_day, TODAY, now, move |day| {
            sink.borrow_mut().push(day);
        });
        (ctrl, selections)
    }

    #[test]
    fn test_initial_center_current_month() {
        let start = Instant::now();
        let mut surface = RecordingSurface::new(9);
        let (mut ctrl, selections) = controller(Month::June, 15, start);
        assert_eq!(ctrl.days().len(), 30);
        assert_eq!(ctrl.next_deadline(), Some(start + AUTO_CENTER_DELAY));
        assert!(!ctrl.poll(start + Duration::from_millis(50), &mut surface));
        assert!(surface.commands.is_empty());
        assert!(ctrl.poll(start + AUTO_CENTER_DELAY, &mut surface));
        assert_eq!(surface.commands, [(14 * 9, true)]);
        assert_eq!(ctrl.state(), PickerState::AutoCentering);
        assert_eq!(ctrl.next_deadline(), None);
        assert!(selections.borrow().is_empty());
    }

    #[test]
    fn test_other_month_centers_on_first() {
        let start = Instant::now();
        let mut surface = RecordingSurface::new(9);
        let (mut ctrl, _) = controller(Month::February, 15, start);
        assert_eq!(ctrl.days(), (1..=29).collect::<Vec<u8>>());
        assert!(ctrl.poll(start + AUTO_CENTER_DELAY, &mut surface));
        assert_eq!(surface.commands, [(0, true)]);
    }

    #[test]
    fn test_month_change_cancels_pending_center() {
        let start = Instant::now();
        let mut surface = RecordingSurface::new(9);
        let (mut ctrl, _) = controller(Month::May, 20, start);
        let later = start + Duration::from_millis(60);
        ctrl.change_month(Month::June, 20, later);
        assert_eq!(ctrl.month(), Month::June);
        assert!(!ctrl.poll(start + AUTO_CENTER_DELAY, &mut surface));
        assert!(ctrl.poll(later + AUTO_CENTER_DELAY, &mut surface));
        assert!(!ctrl.poll(later + AUTO_CENTER_DELAY * 5, &mut surface));
        assert_eq!(surface.commands, [(19 * 9, true)]);
    }

    #[test]
    fn test_auto_center_uses_date_when_due() {
        let start = Instant::now();
        let mut surface = RecordingSurface::new(9);
        let (mut ctrl, _) = controller(Month::July, 20, start);
        ctrl.set_today(datetime!(2024 - 07 - 01 0:00));
        assert!(ctrl.poll(start + AUTO_CENTER_DELAY, &mut surface));
        assert_eq!(surface.commands, [(19 * 9, true)]);
    }

    #[test]
    fn test_new_year_rebuilds_days() {
        let start = Instant::now();
        let (mut ctrl, _) = controller(Month::February, 1, start);
        assert_eq!(ctrl.days().len(), 29);
        ctrl.set_today(datetime!(2025 - 01 - 01 0:00));
        assert_eq!(ctrl.days().len(), 28);
        assert_eq!(ctrl.today().year(), 2025);
    }

    #[test]
    fn test_month_change_rebuilds_days() {
        let start = Instant::now();
        let (mut ctrl, _) = controller(Month::June, 1, start);
        ctrl.change_month(Month::July, 1, start);
        assert_eq!(ctrl.days().len(), 31);
        assert_eq!(ctrl.days().first(), Some(&1));
        assert_eq!(ctrl.days().last(), Some(&31));
    }

    #[test]
    fn test_scroll_end_selects_day() {
        let start = Instant::now();
        let surface = RecordingSurface::new(9);
        let (mut ctrl, selections) = controller(Month::June, 15, start);
        ctrl.begin_gesture();
        assert_eq!(ctrl.state(), PickerState::Scrolling);
        ctrl.on_scroll_end(9 * 9, &surface);
        assert_eq!(ctrl.state(), PickerState::Idle);
        assert_eq!(*selections.borrow(), [10]);
    }

    #[test]
    fn test_scroll_end_does_not_clamp() {
        let start = Instant::now();
        let surface = RecordingSurface::new(9);
        let (mut ctrl, selections) = controller(Month::June, 15, start);
        ctrl.on_scroll_end(40 * 9, &surface);
        assert_eq!(*selections.borrow(), [41]);
    }

    #[test]
    fn test_tap_scrolls_and_selects_immediately() {
        let start = Instant::now();
        let mut surface = RecordingSurface::new(5);
        let (mut ctrl, selections) = controller(Month::June, 15, start);
        ctrl.tap(3, &mut surface);
        assert_eq!(surface.commands, [(10, true)]);
        assert_eq!(*selections.borrow(), [3]);
        assert_eq!(ctrl.state(), PickerState::AutoCentering);
        ctrl.on_animation_end();
        assert_eq!(ctrl.state(), PickerState::Idle);
    }

    #[test]
    fn test_gesture_cancels_pending_center() {
        let start = Instant::now();
        let mut surface = RecordingSurface::new(9);
        let (mut ctrl, _) = controller(Month::June, 15, start);
        ctrl.begin_gesture();
        assert_eq!(ctrl.next_deadline(), None);
        assert!(!ctrl.poll(start + AUTO_CENTER_DELAY, &mut surface));
        assert!(surface.commands.is_empty());
        assert_eq!(ctrl.state(), PickerState::Scrolling);
    }

    #[test]
    fn test_animation_end_while_scrolling() {
        let start = Instant::now();
        let (mut ctrl, _) = controller(Month::June, 15, start);
        ctrl.begin_gesture();
        ctrl.on_animation_end();
        assert_eq!(ctrl.state(), PickerState::Scrolling);
    }
}
