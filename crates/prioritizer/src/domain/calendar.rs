//! Working-day calendar used to shift deadlines off weekends and holidays.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::errors::{PrioritizerError, PrioritizerResult};

/// Upper bound on how far a deadline may be pushed forward.
const MAX_SHIFT_DAYS: usize = 400;

/// Weekends plus a configured set of holidays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    /// (month, day) pairs observed every year
    recurring: HashSet<(u32, u32)>,
    /// Single dates
    fixed: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Calendar with weekends only
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse holiday entries of the form `MM-DD` (recurring) or `YYYY-MM-DD` (one-off).
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> PrioritizerResult<Self> {
        let mut calendar = Self::new();

        for entry in entries {
            let entry = entry.as_ref().trim();
            let invalid = || PrioritizerError::InvalidConfigValue {
                key: "holidays".to_string(),
                reason: format!("'{entry}' is neither MM-DD nor YYYY-MM-DD"),
            };

            match entry.len() {
                5 => {
                    // Leap year so that 02-29 is accepted
                    let date = NaiveDate::parse_from_str(&format!("2000-{entry}"), "%Y-%m-%d")
                        .map_err(|_| invalid())?;
                    calendar.recurring.insert((date.month(), date.day()));
                }
                10 => {
                    let date =
                        NaiveDate::parse_from_str(entry, "%Y-%m-%d").map_err(|_| invalid())?;
                    calendar.fixed.insert(date);
                }
                _ => return Err(invalid()),
            }
        }

        Ok(calendar)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.fixed.contains(&date) || self.recurring.contains(&(date.month(), date.day()))
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    /// First working day on or after `date`.
    pub fn next_working_day(&self, date: NaiveDate) -> NaiveDate {
        let mut candidate = date;
        for _ in 0..MAX_SHIFT_DAYS {
            if self.is_working_day(candidate) {
                return candidate;
            }
            match candidate.succ_opt() {
                Some(next) => candidate = next,
                None => break,
            }
        }
        date
    }

    /// Shift a deadline onto a working day unless it already lies before `today`.
    ///
    /// Past deadlines are left untouched so overdue tasks keep their real lateness.
    pub fn adjust_due_date(&self, due: NaiveDate, today: NaiveDate) -> NaiveDate {
        if due < today {
            due
        } else {
            self.next_working_day(due)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn us_calendar() -> HolidayCalendar {
        HolidayCalendar::from_entries(&["01-01", "07-04", "12-25"]).unwrap()
    }

    #[test]
    fn test_weekend_shifts_to_monday() {
        let calendar = HolidayCalendar::new();
        // 2026-10-24 is a Saturday
        assert_eq!(calendar.next_working_day(date(2026, 10, 24)), date(2026, 10, 26));
        assert_eq!(calendar.next_working_day(date(2026, 10, 25)), date(2026, 10, 26));
        assert_eq!(calendar.next_working_day(date(2026, 10, 26)), date(2026, 10, 26));
    }

    #[test]
    fn test_holiday_after_weekend_chains_forward() {
        // 2028-12-23 is a Saturday, 12-25 the following Monday
        let calendar = us_calendar();
        assert_eq!(calendar.next_working_day(date(2028, 12, 23)), date(2028, 12, 26));
    }

    #[test]
    fn test_fixed_holiday() {
        let calendar = HolidayCalendar::from_entries(&["2026-11-26"]).unwrap();
        assert!(calendar.is_holiday(date(2026, 11, 26)));
        assert!(!calendar.is_holiday(date(2027, 11, 26)));
        assert_eq!(calendar.next_working_day(date(2026, 11, 26)), date(2026, 11, 27));
    }

    #[test]
    fn test_past_dates_are_not_shifted() {
        let calendar = us_calendar();
        let today = date(2026, 10, 19);
        // Saturday before today stays put
        assert_eq!(calendar.adjust_due_date(date(2026, 10, 17), today), date(2026, 10, 17));
        // Saturday after today moves
        assert_eq!(calendar.adjust_due_date(date(2026, 10, 24), today), date(2026, 10, 26));
    }

    #[test]
    fn test_today_on_weekend_is_shifted() {
        let calendar = HolidayCalendar::new();
        let saturday = date(2026, 10, 24);
        assert_eq!(calendar.adjust_due_date(saturday, saturday), date(2026, 10, 26));
    }

    #[test]
    fn test_invalid_entries_rejected() {
        for entry in ["13-01", "2026-02-30", "christmas", ""] {
            let result = HolidayCalendar::from_entries(&[entry]);
            assert!(
                matches!(result, Err(PrioritizerError::InvalidConfigValue { .. })),
                "expected rejection for {entry:?}"
            );
        }
        assert!(HolidayCalendar::from_entries(&["02-29"]).is_ok());
    }
}
