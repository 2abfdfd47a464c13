//! Validated request types passed from the planner to the database layer.

use jiff::civil::Date;

/// A plan to be created with empty weeks.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub title: String,
    pub race_date: Option<Date>,
    /// Monday week 1 starts on; when set every week stores explicit dates
    pub start_date: Option<Date>,
    /// Number of empty weeks (each with seven days) to create
    pub week_count: u32,
    pub owner: Option<String>,
    pub athlete: Option<String>,
}

/// Actuals recorded when the athlete logs an activity as executed.
///
/// Fields left as `None` keep whatever was logged before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLog {
    pub actual_distance: Option<f64>,
    pub actual_duration_minutes: Option<u32>,
    pub actual_pace: Option<String>,
}
