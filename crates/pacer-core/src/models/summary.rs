//! Plan summary types and functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Plan, PlanStatus};

/// Summary information about a plan with activity statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Plan ID
    pub id: u64,
    /// Title of the plan
    pub title: String,
    /// Plan status
    pub status: PlanStatus,
    /// Race the plan builds towards
    pub race_date: Option<Date>,
    /// Declared number of weeks
    pub week_count: u32,
    /// Athlete the plan is written for
    pub athlete: Option<String>,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of scheduled activities
    pub total_activities: u32,
    /// Number of activities logged as completed
    pub completed_activities: u32,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        let total_activities = plan.activities().count() as u32;
        let completed_activities = plan.activities().filter(|a| a.completed).count() as u32;

        Self {
            id: plan.id,
            title: plan.title.clone(),
            status: plan.status,
            race_date: plan.race_date,
            week_count: plan.week_count,
            athlete: plan.athlete.clone(),
            created_at: plan.created_at,
            updated_at: plan.updated_at,
            total_activities,
            completed_activities,
        }
    }
}
