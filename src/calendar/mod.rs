mod range;
mod util;
mod widget;
pub(crate) use self::range::build_range;
pub(crate) use self::util::{
    date_from_parts, days_in_month, format_date, month_from_index0, normalize_to_midnight,
    WeekdayExt,
};
pub(crate) use self::widget::{DayStrip, STRIP_LINES};
