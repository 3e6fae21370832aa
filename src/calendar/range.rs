use super::util::days_in_month;
use time::Month;

/// Returns the days of `month` in `year` in ascending order, starting from 1
/// and with no gaps
pub(crate) fn build_range(month: Month, year: i32) -> Vec<u8> {
    (1..=days_in_month(month, year)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::month_from_index0;

    #[test]
    fn test_build_range_every_month() {
        for year in [2023, 2024] {
            for i in 0..12 {
                let month = month_from_index0(i).unwrap();
                let days = build_range(month, year);
                let expected = (1..=days_in_month(month, year)).collect::<Vec<_>>();
                assert_eq!(days, expected, "{month} {year}");
                assert!(
                    days.windows(2).all(|w| w[1] == w[0] + 1),
                    "{month} {year} is not contiguous"
                );
            }
        }
    }

    #[test]
    fn test_build_range_leap_february() {
        assert_eq!(build_range(Month::February, 2024).last(), Some(&29));
        assert_eq!(build_range(Month::February, 2023).last(), Some(&28));
        assert_eq!(build_range(Month::February, 2024).first(), Some(&1));
    }
}
