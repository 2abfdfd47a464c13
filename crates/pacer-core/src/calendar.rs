//! Calendar date resolution for weeks and days.
//!
//! Week dates come from one of three places, in priority order:
//!
//! 1. Explicit `start_date`/`end_date` stored on the week (both must be set).
//! 2. The plan's race date: the highest-indexed week ends on race day and
//!    every other week is offset backwards by whole weeks of index distance.
//! 3. Nothing, in which case the week is unscheduled and none of its days
//!    have a date.
//!
//! Everything here is a pure function of its inputs. Days never store a date;
//! [`day_date`] derives it from the week start on demand.

use jiff::{civil::Date, Span};
use serde::{Deserialize, Serialize};

use crate::models::{Day, Plan, Week};

/// Resolved bounds of a week. Both are `None` for an unscheduled week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekDates {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl WeekDates {
    /// A week with no resolvable dates.
    pub const UNSCHEDULED: WeekDates = WeekDates {
        start_date: None,
        end_date: None,
    };

    /// Whether the week has a calendar position.
    pub fn is_scheduled(&self) -> bool {
        self.start_date.is_some()
    }
}

/// Shift a date by a signed number of days. `None` when the result would
/// leave the supported calendar range.
pub(crate) fn shift_days(date: Date, days: i64) -> Option<Date> {
    let span = Span::new().try_days(days).ok()?;
    date.checked_add(span).ok()
}

/// Resolve the start and end date of a week.
///
/// `week_indexes` is the set of indexes currently present in the plan; the
/// largest one is the terminal (race) week. `week_count` is used as the
/// terminal index only when `week_indexes` is empty.
pub fn resolve_week_dates(
    week_index: u32,
    explicit_start: Option<Date>,
    explicit_end: Option<Date>,
    race_date: Option<Date>,
    week_count: u32,
    week_indexes: &[u32],
) -> WeekDates {
    if let (Some(start_date), Some(end_date)) = (explicit_start, explicit_end) {
        return WeekDates {
            start_date: Some(start_date),
            end_date: Some(end_date),
        };
    }

    let Some(race_date) = race_date else {
        return WeekDates::UNSCHEDULED;
    };

    let terminal_index = week_indexes.iter().copied().max().unwrap_or(week_count);
    let weeks_before_race = i64::from(terminal_index) - i64::from(week_index);

    let end_date = shift_days(race_date, -7 * weeks_before_race);
    let start_date = end_date.and_then(|end| shift_days(end, -6));

    match (start_date, end_date) {
        (Some(start), Some(end)) => WeekDates {
            start_date: Some(start),
            end_date: Some(end),
        },
        _ => WeekDates::UNSCHEDULED,
    }
}

/// Explicit bounds for week `week_index` of a plan whose week 1 starts on
/// `plan_start`. Weeks are contiguous and seven days long.
pub fn explicit_week_dates(plan_start: Date, week_index: u32) -> WeekDates {
    let start_date = shift_days(plan_start, 7 * (i64::from(week_index) - 1));
    match (start_date, start_date.and_then(|s| shift_days(s, 6))) {
        (Some(start), Some(end)) => WeekDates {
            start_date: Some(start),
            end_date: Some(end),
        },
        _ => WeekDates::UNSCHEDULED,
    }
}

/// Concrete date of a day within a week: `start + (day_of_week - 1)` days.
///
/// Returns `None` for an unscheduled week or a `day_of_week` outside 1..=7.
pub fn day_date(week_start: Option<Date>, day_of_week: u8) -> Option<Date> {
    if !(1..=7).contains(&day_of_week) {
        return None;
    }
    shift_days(week_start?, i64::from(day_of_week) - 1)
}

/// Resolve a week of `plan` using the plan's race date and index set.
pub fn week_dates(plan: &Plan, week: &Week) -> WeekDates {
    let indexes = plan.week_indexes();
    resolve_week_dates(
        week.week_index,
        week.start_date,
        week.end_date,
        plan.race_date,
        plan.week_count,
        &indexes,
    )
}

/// Resolve the date of a day in one of the plan's weeks.
pub fn date_of_day(plan: &Plan, week: &Week, day: &Day) -> Option<Date> {
    day_date(week_dates(plan, week).start_date, day.day_of_week)
}

/// The plan's current first scheduled date: the start of its lowest-indexed
/// week, or `None` when that week is unscheduled or the plan has no weeks.
pub fn effective_start_date(plan: &Plan) -> Option<Date> {
    plan.weeks
        .iter()
        .min_by_key(|w| w.week_index)
        .and_then(|first| week_dates(plan, first).start_date)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn explicit_dates_win_over_race_date() {
        let dates = resolve_week_dates(
            2,
            Some(date(2026, 1, 5)),
            Some(date(2026, 1, 11)),
            Some(date(2026, 4, 19)),
            12,
            &[1, 2, 3],
        );
        assert_eq!(dates.start_date, Some(date(2026, 1, 5)));
        assert_eq!(dates.end_date, Some(date(2026, 1, 11)));
    }

    #[test]
    fn explicit_weeks_are_contiguous() {
        let third = explicit_week_dates(date(2026, 1, 5), 3);
        assert_eq!(third.start_date, Some(date(2026, 1, 19)));
        assert_eq!(third.end_date, Some(date(2026, 1, 25)));
    }

    #[test]
    fn terminal_week_ends_on_race_day() {
        let indexes = [1, 2, 3, 4];
        let dates = resolve_week_dates(4, None, None, Some(date(2026, 4, 19)), 4, &indexes);
        assert_eq!(dates.end_date, Some(date(2026, 4, 19)));
        assert_eq!(dates.start_date, Some(date(2026, 4, 13)));

        let first = resolve_week_dates(1, None, None, Some(date(2026, 4, 19)), 4, &indexes);
        assert_eq!(first.start_date, Some(date(2026, 3, 23)));
        assert_eq!(first.end_date, Some(date(2026, 3, 29)));
    }

    #[test]
    fn partial_explicit_dates_fall_back_to_race_date() {
        let dates = resolve_week_dates(
            1,
            Some(date(2020, 1, 1)),
            None,
            Some(date(2026, 4, 19)),
            1,
            &[1],
        );
        assert_eq!(dates.end_date, Some(date(2026, 4, 19)));
    }

    #[test]
    fn no_race_date_means_unscheduled() {
        let dates = resolve_week_dates(1, None, None, None, 3, &[1, 2, 3]);
        assert_eq!(dates, WeekDates::UNSCHEDULED);
        assert!(!dates.is_scheduled());
        assert_eq!(day_date(dates.start_date, 3), None);
    }

    #[test]
    fn empty_index_set_uses_week_count() {
        let dates = resolve_week_dates(2, None, None, Some(date(2026, 4, 19)), 3, &[]);
        assert_eq!(dates.end_date, Some(date(2026, 4, 12)));
    }

    #[test]
    fn day_one_is_week_start() {
        let start = Some(date(2026, 3, 23));
        assert_eq!(day_date(start, 1), start);
        assert_eq!(day_date(start, 7), Some(date(2026, 3, 29)));
        assert_eq!(day_date(start, 0), None);
        assert_eq!(day_date(start, 8), None);
    }
}
