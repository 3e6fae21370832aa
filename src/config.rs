use crate::calendar::{days_in_month, month_from_index0, WeekdayExt};
use ratatui::style::Color;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Month, Weekday};

pub(crate) static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Colours used to paint day cells
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ColorMapping {
    /// Border of the cell for the current day
    pub(crate) today: Color,
    /// Background of highlighted days that are not in the future
    pub(crate) highlight: Color,
    /// Background of days after today
    pub(crate) future: Color,
    /// Background of days up to and including today
    pub(crate) past: Color,
    /// Background of days that match no other rule
    pub(crate) default: Color,
    /// Foreground of the day numbers
    pub(crate) text: Color,
}

impl ColorMapping {
    /// `#e51284`, `#3cb371`, `#233287`, `#ff8055`, `#777`, and white
    pub(crate) const DEFAULT: ColorMapping = ColorMapping {
        today: Color::Rgb(0xe5, 0x12, 0x84),
        highlight: Color::Rgb(0x3c, 0xb3, 0x71),
        future: Color::Rgb(0x23, 0x32, 0x87),
        past: Color::Rgb(0xff, 0x80, 0x55),
        default: Color::Rgb(0x77, 0x77, 0x77),
        text: Color::White,
    };

    pub(crate) fn set(&mut self, role: ColorRole, color: Color) {
        let slot = match role {
            ColorRole::Today => &mut self.today,
            ColorRole::Highlight => &mut self.highlight,
            ColorRole::Future => &mut self.future,
            ColorRole::Past => &mut self.past,
            ColorRole::Default => &mut self.default,
            ColorRole::Text => &mut self.text,
        };
        *slot = color;
    }
}

impl Default for ColorMapping {
    fn default() -> ColorMapping {
        ColorMapping::DEFAULT
    }
}

/// Names of the fields of a [`ColorMapping`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ColorRole {
    Today,
    Highlight,
    Future,
    Past,
    Default,
    Text,
}

impl FromStr for ColorRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<ColorRole, ConfigError> {
        match s {
            "today" => Ok(ColorRole::Today),
            "highlight" => Ok(ColorRole::Highlight),
            "future" => Ok(ColorRole::Future),
            "past" => Ok(ColorRole::Past),
            "default" => Ok(ColorRole::Default),
            "text" => Ok(ColorRole::Text),
            _ => Err(ConfigError::ColorRole(s.to_owned())),
        }
    }
}

/// Parses a colour name, a `#rrggbb` hex triplet, or a `#rgb` shorthand
pub(crate) fn parse_color(s: &str) -> Result<Color, ConfigError> {
    let expanded = match s.strip_prefix('#') {
        Some(hex) if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            let mut long = String::from("#");
            for c in hex.chars() {
                long.push(c);
                long.push(c);
            }
            long
        }
        _ => s.to_owned(),
    };
    expanded
        .parse::<Color>()
        .map_err(|_| ConfigError::Color(s.to_owned()))
}

/// Parses a `NAME=COLOR` assignment as given on the command line
pub(crate) fn parse_color_assignment(s: &str) -> Result<(ColorRole, Color), ConfigError> {
    let Some((name, color)) = s.split_once('=') else {
        return Err(ConfigError::ColorAssignment(s.to_owned()));
    };
    Ok((name.trim().parse()?, parse_color(color.trim())?))
}

/// A set of days of the week
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct WeekdaySet(u8);

impl WeekdaySet {
    pub(crate) const ALL: WeekdaySet = WeekdaySet(0b111_1111);

    /// Builds a set from weekday indices, where 0 is Sunday and 6 is Saturday
    pub(crate) fn from_indices<I>(indices: I) -> Result<WeekdaySet, ConfigError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut bits = 0u8;
        for i in indices {
            if i > 6 {
                return Err(ConfigError::Weekday(i));
            }
            bits |= 1 << i;
        }
        Ok(WeekdaySet(bits))
    }

    pub(crate) fn contains(self, wd: Weekday) -> bool {
        self.0 & (1 << wd.index0()) != 0
    }
}

impl Default for WeekdaySet {
    fn default() -> WeekdaySet {
        WeekdaySet::ALL
    }
}

impl FromStr for WeekdaySet {
    type Err = ConfigError;

    /// Parses a comma-separated list of weekday indices, e.g. `0,6`
    fn from_str(s: &str) -> Result<WeekdaySet, ConfigError> {
        let mut indices = Vec::new();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let i = item
                .parse::<u8>()
                .map_err(|_| ConfigError::WeekdayList(s.to_owned()))?;
            indices.push(i);
        }
        WeekdaySet::from_indices(indices)
    }
}

/// Parses a month given either as an English month name (case-insensitive)
/// or as a zero-based index (0 = January)
pub(crate) fn parse_month(s: &str) -> Result<Month, ConfigError> {
    if let Ok(i) = s.parse::<u8>() {
        return month_from_index0(i).ok_or(ConfigError::MonthIndex(i));
    }
    std::iter::successors(Some(Month::January), |&m| {
        (m != Month::December).then(|| m.next())
    })
    .find(|m| m.to_string().eq_ignore_ascii_case(s))
    .ok_or_else(|| ConfigError::MonthName(s.to_owned()))
}

/// Validates a highlighted date, returning it in `YYYY-MM-DD` form
pub(crate) fn parse_highlight(s: &str) -> Result<String, ConfigError> {
    Date::parse(s, &YMD_FMT).map_err(|_| ConfigError::Date(s.to_owned()))?;
    Ok(s.to_owned())
}

/// Everything a consumer supplies to the picker apart from the selection
/// callback
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PickerConfig {
    pub(crate) month: Month,
    pub(crate) day: u8,
    pub(crate) highlighted_days: BTreeSet<String>,
    pub(crate) valid_week_days: WeekdaySet,
    pub(crate) color_mapping: ColorMapping,
}

impl PickerConfig {
    /// Creates a configuration with no highlighted days, every weekday
    /// valid, and the default colours
    pub(crate) fn new(month: Month, day: u8) -> PickerConfig {
        PickerConfig {
            month,
            day,
            highlighted_days: BTreeSet::new(),
            valid_week_days: WeekdaySet::ALL,
            color_mapping: ColorMapping::DEFAULT,
        }
    }

    pub(crate) fn highlighted_days<I>(mut self, days: I) -> PickerConfig
    where
        I: IntoIterator<Item = String>,
    {
        self.highlighted_days.extend(days);
        self
    }

    pub(crate) fn valid_week_days(mut self, days: WeekdaySet) -> PickerConfig {
        self.valid_week_days = days;
        self
    }

    pub(crate) fn color(mut self, role: ColorRole, color: Color) -> PickerConfig {
        self.color_mapping.set(role, color);
        self
    }

    /// Checks that the selected day exists in the selected month of `year`
    pub(crate) fn validate(&self, year: i32) -> Result<(), ConfigError> {
        let last = days_in_month(self.month, year);
        if (1..=last).contains(&self.day) {
            Ok(())
        } else {
            Err(ConfigError::DayOutOfRange {
                day: self.day,
                month: self.month,
                last,
            })
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("invalid colour {0:?}")]
    Color(String),
    #[error("unknown colour name {0:?}; expected today, highlight, future, past, default, or text")]
    ColorRole(String),
    #[error("invalid colour assignment {0:?}; expected NAME=COLOR")]
    ColorAssignment(String),
    #[error("weekday index {0} is out of range; expected 0 (Sunday) through 6 (Saturday)")]
    Weekday(u8),
    #[error("invalid weekday list {0:?}; expected comma-separated numbers")]
    WeekdayList(String),
    #[error("month index {0} is out of range; expected 0 (January) through 11 (December)")]
    MonthIndex(u8),
    #[error("unknown month {0:?}")]
    MonthName(String),
    #[error("invalid date {0:?}; expected YYYY-MM-DD")]
    Date(String),
    #[error("day {day} is out of range for {month}; expected 1 through {last}")]
    DayOutOfRange { day: u8, month: Month, last: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#e51284"), Ok(Color::Rgb(0xe5, 0x12, 0x84)));
        assert_eq!(parse_color("#777"), Ok(Color::Rgb(0x77, 0x77, 0x77)));
        assert_eq!(parse_color("#AbC"), Ok(Color::Rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn test_parse_color_name() {
        assert_eq!(parse_color("white"), Ok(Color::White));
        assert_eq!(parse_color("red"), Ok(Color::Red));
    }

    #[test]
    fn test_parse_color_invalid() {
        assert_eq!(parse_color("#77"), Err(ConfigError::Color("#77".into())));
        assert_eq!(
            parse_color("#ggg"),
            Err(ConfigError::Color("#ggg".into()))
        );
        assert_eq!(
            parse_color("octarine"),
            Err(ConfigError::Color("octarine".into()))
        );
    }

    #[test]
    fn test_default_colors_match_strings() {
        let colors = ColorMapping::default();
        assert_eq!(parse_color("#e51284"), Ok(colors.today));
        assert_eq!(parse_color("#3cb371"), Ok(colors.highlight));
        assert_eq!(parse_color("#233287"), Ok(colors.future));
        assert_eq!(parse_color("#ff8055"), Ok(colors.past));
        assert_eq!(parse_color("#777"), Ok(colors.default));
        assert_eq!(parse_color("white"), Ok(colors.text));
    }

    #[test]
    fn test_color_override_is_per_field() {
        let config = PickerConfig::new(Month::June, 1).color(ColorRole::Past, Color::Red);
        assert_eq!(config.color_mapping.past, Color::Red);
        assert_eq!(config.color_mapping.future, ColorMapping::DEFAULT.future);
        assert_eq!(config.color_mapping.today, ColorMapping::DEFAULT.today);
    }

    #[test]
    fn test_parse_color_assignment() {
        assert_eq!(
            parse_color_assignment("future=#000000"),
            Ok((ColorRole::Future, Color::Rgb(0, 0, 0)))
        );
        assert_eq!(
            parse_color_assignment("future"),
            Err(ConfigError::ColorAssignment("future".into()))
        );
        assert_eq!(
            parse_color_assignment("sky=blue"),
            Err(ConfigError::ColorRole("sky".into()))
        );
    }

    #[test]
    fn test_weekday_set() {
        let weekends = WeekdaySet::from_indices([0, 6]).unwrap();
        assert!(weekends.contains(Weekday::Sunday));
        assert!(weekends.contains(Weekday::Saturday));
        assert!(!weekends.contains(Weekday::Tuesday));
        assert!(WeekdaySet::default().contains(Weekday::Wednesday));
        assert!(!WeekdaySet::from_indices([])
            .unwrap()
            .contains(Weekday::Wednesday));
    }

    #[test]
    fn test_weekday_set_out_of_range() {
        assert_eq!(
            WeekdaySet::from_indices([1, 7]),
            Err(ConfigError::Weekday(7))
        );
    }

    #[test]
    fn test_weekday_set_from_str() {
        assert_eq!(
            "0, 6".parse::<WeekdaySet>(),
            WeekdaySet::from_indices([0, 6])
        );
        assert_eq!(
            "0,x".parse::<WeekdaySet>(),
            Err(ConfigError::WeekdayList("0,x".into()))
        );
        assert_eq!("".parse::<WeekdaySet>(), WeekdaySet::from_indices([]));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("0"), Ok(Month::January));
        assert_eq!(parse_month("11"), Ok(Month::December));
        assert_eq!(parse_month("12"), Err(ConfigError::MonthIndex(12)));
        assert_eq!(parse_month("june"), Ok(Month::June));
        assert_eq!(parse_month("SEPTEMBER"), Ok(Month::September));
        assert_eq!(
            parse_month("Smarch"),
            Err(ConfigError::MonthName("Smarch".into()))
        );
    }

    #[test]
    fn test_parse_highlight() {
        assert_eq!(parse_highlight("2024-06-10"), Ok("2024-06-10".into()));
        assert_eq!(
            parse_highlight("2024-6-10"),
            Err(ConfigError::Date("2024-6-10".into()))
        );
        assert_eq!(
            parse_highlight("2024-02-30"),
            Err(ConfigError::Date("2024-02-30".into()))
        );
    }

    #[test]
    fn test_validate_day() {
        assert_eq!(PickerConfig::new(Month::February, 29).validate(2024), Ok(()));
        assert_eq!(
            PickerConfig::new(Month::February, 29).validate(2023),
            Err(ConfigError::DayOutOfRange {
                day: 29,
                month: Month::February,
                last: 28
            })
        );
        assert!(PickerConfig::new(Month::June, 0).validate(2024).is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let config = PickerConfig::new(Month::June, 15)
            .highlighted_days(["2024-06-10".to_owned()])
            .valid_week_days(WeekdaySet::from_indices([0, 6]).unwrap());
        assert_eq!(config.color_mapping, ColorMapping::DEFAULT);
        assert!(config.highlighted_days.contains("2024-06-10"));
        assert!(!config.valid_week_days.contains(Weekday::Monday));
    }
}
