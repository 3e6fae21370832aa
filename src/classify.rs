use crate::calendar::{date_from_parts, format_date, normalize_to_midnight};
use crate::config::{ColorMapping, PickerConfig, WeekdaySet};
use ratatui::style::Color;
use std::collections::BTreeSet;
use time::{Month, PrimitiveDateTime};

/// Border width given to the cell for the current day
pub(crate) const TODAY_BORDER_WIDTH: u8 = 4;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Opacity {
    Full,
    /// Drawn at 40% strength
    Dimmed,
}

/// How a single day cell should be painted
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayVisualState {
    pub(crate) background: Color,
    pub(crate) border: Option<Color>,
    pub(crate) border_width: u8,
    pub(crate) opacity: Opacity,
}

impl DayVisualState {
    fn plain(colors: &ColorMapping) -> DayVisualState {
        DayVisualState {
            background: colors.default,
            border: None,
            border_width: 0,
            opacity: Opacity::Full,
        }
    }
}

/// Computes the visual state of `day` of `month` in the year of `today`.
///
/// The rules are applied in order, later background rules overriding earlier
/// ones:
///
/// - A day equal to today gets a border in the today colour.
/// - A day on or after today gets the future background.
/// - A day on a valid weekday that is on or before today gets the highlight
///   background if it is highlighted and the past background otherwise.
/// - A day on an invalid weekday is dimmed but keeps whatever background it
///   was given.
///
/// Days that none of the background rules apply to (past days on invalid
/// weekdays) keep the default background.
pub(crate) fn classify(
    day: u8,
    month: Month,
    today: PrimitiveDateTime,
    valid_week_days: WeekdaySet,
    highlighted_days: &BTreeSet<String>,
    colors: &ColorMapping,
) -> DayVisualState {
    let today = normalize_to_midnight(today);
    let mut state = DayVisualState::plain(colors);
    let Some(date) = date_from_parts(today.year(), month, day) else {
        log::warn!(
            "day {day} of {month} {} is outside the supported date range",
            today.year()
        );
        return state;
    };
    let selected = date.midnight();
    if selected == today {
        state.border = Some(colors.today);
        state.border_width = TODAY_BORDER_WIDTH;
    }
    if selected >= today {
        state.background = colors.future;
    }
    if valid_week_days.contains(selected.weekday()) {
        if selected <= today {
            state.background = if highlighted_days.contains(&format_date(date)) {
                colors.highlight
            } else {
                colors.past
            };
        }
    } else {
        state.opacity = Opacity::Dimmed;
    }
    state
}

/// The classification context shared by every cell of a picker
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayStateClassifier {
    today: PrimitiveDateTime,
    valid_week_days: WeekdaySet,
    highlighted_days: BTreeSet<String>,
    colors: ColorMapping,
}

impl DayStateClassifier {
    pub(crate) fn new(config: &PickerConfig, today: PrimitiveDateTime) -> DayStateClassifier {
        DayStateClassifier {
            today,
            valid_week_days: config.valid_week_days,
            highlighted_days: config.highlighted_days.clone(),
            colors: config.color_mapping,
        }
    }

    pub(crate) fn set_today(&mut self, today: PrimitiveDateTime) {
        self.today = today;
    }

    pub(crate) fn colors(&self) -> &ColorMapping {
        &self.colors
    }

    pub(crate) fn classify(&self, day: u8, month: Month) -> DayVisualState {
        classify(
            day,
            month,
            self.today,
            self.valid_week_days,
            &self.highlighted_days,
            &self.colors,
        )
    }
}
