//! Athlete logging operations for the Planner.

use super::Planner;
use crate::{
    error::Result,
    models::{Activity, Day, ExternalActivity},
    params::{LogActivity, MarkDayDone, RecordExternalActivity},
};

impl Planner {
    /// Marks an activity completed and records its actuals.
    pub async fn log_activity(&self, params: &LogActivity) -> Result<Activity> {
        let log = params.validate()?;
        let activity_id = params.activity_id;
        self.with_database(move |db| db.log_activity(activity_id, &log))
            .await
    }

    /// Marks a whole day done with the manual marker.
    pub async fn mark_day_done(&self, params: &MarkDayDone) -> Result<Day> {
        let day_id = params.day_id;
        self.with_database(move |db| db.mark_day_done(day_id)).await
    }

    /// Records a workout imported from an external provider.
    pub async fn record_external_activity(
        &self,
        params: &RecordExternalActivity,
    ) -> Result<ExternalActivity> {
        let (provider, external_id) = params.validate()?;
        let plan_id = params.plan_id;
        let matched_activity_id = params.matched_activity_id;
        self.with_database(move |db| {
            db.record_external_activity(plan_id, &provider, &external_id, matched_activity_id)
        })
        .await
    }
}
