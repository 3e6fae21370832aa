use time::{Date, Duration, Month, PrimitiveDateTime, Time, Weekday};

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }
}

/// Converts a zero-based month index (0 = January) into a `Month`.  Returns
/// `None` for indices above 11.
pub(crate) fn month_from_index0(index: u8) -> Option<Month> {
    index
        .checked_add(1)
        .and_then(|n| Month::try_from(n).ok())
}

/// Returns the number of days in the given month, computed as the day of the
/// month of the day before the first of the following month
pub(crate) fn days_in_month(month: Month, year: i32) -> u8 {
    let (next_year, next_month) = if month == Month::December {
        (year.saturating_add(1), Month::January)
    } else {
        (year, month.next())
    };
    Date::from_calendar_date(next_year, next_month, 1)
        .ok()
        .and_then(Date::previous_day)
        // Only December of the last representable year has no following month
        .map_or(31, Date::day)
}

/// Builds the date for `day` of `month` in `year`.
///
/// Days are not checked against the length of the month: day 0 is the last
/// day of the previous month, and days past the end of the month spill over
/// into the following month(s).  Returns `None` only if the result falls
/// outside the range of dates that `time` can represent.
pub(crate) fn date_from_parts(year: i32, month: Month, day: u8) -> Option<Date> {
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    first.checked_add(Duration::days(i64::from(day) - 1))
}

/// Returns a copy of `datetime` with the time of day set to midnight
pub(crate) fn normalize_to_midnight(datetime: PrimitiveDateTime) -> PrimitiveDateTime {
    datetime.replace_time(Time::MIDNIGHT)
}

/// Formats a date as `YYYY-MM-DD`
pub(crate) fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
