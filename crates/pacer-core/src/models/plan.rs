//! Plan, week and day model definitions.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Activity, PlanStatus};

/// Represents a complete training plan with its calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Title of the plan
    pub title: String,

    /// Lifecycle status of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// Date the final week of the plan is anchored to
    pub race_date: Option<Date>,

    /// Declared number of weeks
    pub week_count: u32,

    /// Plan this one was cloned or imported from
    pub source_id: Option<u64>,

    /// Coach or account that owns the plan
    pub owner: Option<String>,

    /// Athlete the plan is written for
    pub athlete: Option<String>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Weeks ordered by index (eagerly loaded)
    #[serde(default)]
    pub weeks: Vec<Week>,
}

impl Plan {
    /// All week indexes present in the plan.
    pub fn week_indexes(&self) -> Vec<u32> {
        self.weeks.iter().map(|w| w.week_index).collect()
    }

    /// Iterate over every day in calendar order.
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    /// Iterate over every activity in calendar order.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.days().flat_map(|d| d.activities.iter())
    }

    /// Find a day belonging to this plan.
    pub fn find_day(&self, day_id: u64) -> Option<&Day> {
        self.days().find(|d| d.id == day_id)
    }

    /// Find an activity belonging to this plan.
    pub fn find_activity(&self, activity_id: u64) -> Option<&Activity> {
        self.activities().find(|a| a.id == activity_id)
    }
}

/// One week of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Week {
    pub id: u64,

    pub plan_id: u64,

    /// 1-based position of the week in the plan
    pub week_index: u32,

    /// Explicit start date, when the plan stores one
    pub start_date: Option<Date>,

    /// Explicit end date, when the plan stores one
    pub end_date: Option<Date>,

    /// Days ordered Monday first
    #[serde(default)]
    pub days: Vec<Day>,
}

/// One day of a week. Its calendar date is always derived from the week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Day {
    pub id: u64,

    pub week_id: u64,

    /// 1..=7, Monday = 1
    pub day_of_week: u8,

    /// Source text the day was parsed from
    pub raw_text: Option<String>,

    /// Notes; also carries the manual completion marker
    pub notes: Option<String>,

    #[serde(default)]
    pub activities: Vec<Activity>,
}
