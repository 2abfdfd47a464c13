//! Date and timestamp display utilities.

use std::fmt;

use jiff::{civil::Date, tz::TimeZone, Timestamp};

use crate::calendar::WeekDates;

/// A `Timestamp` rendered in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Resolved week bounds, or `unscheduled`.
pub struct DateRange(pub WeekDates);

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0.start_date, self.0.end_date) {
            (Some(start), Some(end)) => write!(f, "{start} to {end}"),
            _ => write!(f, "unscheduled"),
        }
    }
}

/// Three-letter weekday name for a Monday-first `day_of_week`.
pub fn weekday_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        7 => "Sun",
        _ => "???",
    }
}

/// An optional date, or `none`.
pub struct MaybeDate(pub Option<Date>);

impl fmt::Display for MaybeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{date}"),
            None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_date_range_display() {
        let scheduled = DateRange(WeekDates {
            start_date: Some(date(2026, 4, 13)),
            end_date: Some(date(2026, 4, 19)),
        });
        assert_eq!(scheduled.to_string(), "2026-04-13 to 2026-04-19");
        assert_eq!(DateRange(WeekDates::UNSCHEDULED).to_string(), "unscheduled");
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(1), "Mon");
        assert_eq!(weekday_name(7), "Sun");
        assert_eq!(weekday_name(0), "???");
    }
}
