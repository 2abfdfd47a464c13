//! Athlete logging: completion, manual day markers and external matches.
//!
//! These are the only writes allowed to touch execution state. The proposal
//! applier never does.

use jiff::Timestamp;
use log::{debug, info};
use rusqlite::{params, OptionalExtension};

use super::{
    plan_queries::{plan_status, UPDATE_PLAN_TIMESTAMP_SQL},
    rows::{activity_from_row, load_plan, parsed},
};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    locks::{has_manual_marker, MANUAL_DONE_MARKER},
    models::{Activity, ActivityLog, Day, ExternalActivity},
};

const SELECT_ACTIVITY_SQL: &str = "SELECT id, plan_id, day_id, activity_type, title, duration_minutes, distance, distance_unit, pace_target, effort_target, notes, priority, must_do, bail_allowed, completed, actual_distance, actual_duration_minutes, actual_pace FROM activities WHERE id = ?1";
const LOG_ACTIVITY_SQL: &str = "UPDATE activities SET completed = 1, actual_distance = COALESCE(?1, actual_distance), actual_duration_minutes = COALESCE(?2, actual_duration_minutes), actual_pace = COALESCE(?3, actual_pace) WHERE id = ?4";
const SELECT_DAY_PLAN_SQL: &str =
    "SELECT w.plan_id, d.notes FROM days d JOIN weeks w ON d.week_id = w.id WHERE d.id = ?1";
const UPDATE_DAY_NOTES_SQL: &str = "UPDATE days SET notes = ?1 WHERE id = ?2";
const CHECK_ACTIVITY_IN_PLAN_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM activities WHERE id = ?1 AND plan_id = ?2)";
const UPSERT_EXTERNAL_SQL: &str = "INSERT INTO external_activities (plan_id, provider, external_id, matched_activity_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT (provider, external_id) DO UPDATE SET plan_id = excluded.plan_id, matched_activity_id = excluded.matched_activity_id";
const SELECT_EXTERNAL_SQL: &str = "SELECT id, plan_id, provider, external_id, matched_activity_id, created_at FROM external_activities WHERE provider = ?1 AND external_id = ?2";

impl super::Database {
    /// Retrieves a single activity by ID.
    pub fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>> {
        self.connection
            .query_row(SELECT_ACTIVITY_SQL, params![activity_id as i64], activity_from_row)
            .optional()
            .db_context("Failed to query activity")
    }

    /// Marks an activity as executed and records its actuals.
    ///
    /// Actuals left as `None` keep their previous value, so logging twice
    /// only overwrites what the second call supplies.
    pub fn log_activity(&mut self, activity_id: u64, log: &ActivityLog) -> Result<Activity> {
        let tx = self.begin()?;

        let plan_id: Option<i64> = tx
            .query_row(
                "SELECT plan_id FROM activities WHERE id = ?1",
                params![activity_id as i64],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to query activity")?;
        let plan_id = plan_id.ok_or(PlannerError::TargetNotFound {
            kind: "Activity",
            id: activity_id,
        })? as u64;

        if !plan_status(&tx, plan_id)?.is_editable() {
            return Err(PlannerError::PlanNotEditable { id: plan_id });
        }

        tx.execute(
            LOG_ACTIVITY_SQL,
            params![
                log.actual_distance,
                log.actual_duration_minutes.map(i64::from),
                log.actual_pace,
                activity_id as i64
            ],
        )
        .db_context("Failed to log activity")?;

        let now = Timestamp::now().to_string();
        tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now, plan_id as i64])
            .db_context("Failed to update plan timestamp")?;

        let activity = tx
            .query_row(SELECT_ACTIVITY_SQL, params![activity_id as i64], activity_from_row)
            .db_context("Failed to reload activity")?;
        tx.commit().db_context("Failed to commit transaction")?;

        info!("logged activity {activity_id} as completed");
        Ok(activity)
    }

    /// Appends the manual completion marker to a day's notes.
    ///
    /// Idempotent: a day that already carries the marker is left unchanged.
    pub fn mark_day_done(&mut self, day_id: u64) -> Result<Day> {
        let tx = self.begin()?;

        let row: Option<(i64, Option<String>)> = tx
            .query_row(SELECT_DAY_PLAN_SQL, params![day_id as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .db_context("Failed to query day")?;
        let (plan_id, notes) = row.ok_or(PlannerError::TargetNotFound {
            kind: "Day",
            id: day_id,
        })?;
        let plan_id = plan_id as u64;

        if !plan_status(&tx, plan_id)?.is_editable() {
            return Err(PlannerError::PlanNotEditable { id: plan_id });
        }

        if has_manual_marker(notes.as_deref()) {
            debug!("day {day_id} already marked done");
        } else {
            let notes = match notes.as_deref().map(str::trim) {
                Some(existing) if !existing.is_empty() => {
                    format!("{existing} {MANUAL_DONE_MARKER}")
                }
                _ => MANUAL_DONE_MARKER.to_string(),
            };
            tx.execute(UPDATE_DAY_NOTES_SQL, params![notes, day_id as i64])
                .db_context("Failed to update day notes")?;
            let now = Timestamp::now().to_string();
            tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now, plan_id as i64])
                .db_context("Failed to update plan timestamp")?;
            info!("marked day {day_id} done");
        }

        let day = load_plan(&tx, plan_id)?
            .and_then(|plan| plan.find_day(day_id).cloned())
            .ok_or(PlannerError::TargetNotFound {
                kind: "Day",
                id: day_id,
            })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(day)
    }

    /// Records a workout imported from an external provider.
    ///
    /// Recording the same `(provider, external_id)` again replaces its match.
    pub fn record_external_activity(
        &mut self,
        plan_id: u64,
        provider: &str,
        external_id: &str,
        matched_activity_id: Option<u64>,
    ) -> Result<ExternalActivity> {
        let tx = self.begin()?;

        plan_status(&tx, plan_id)?;

        if let Some(activity_id) = matched_activity_id {
            let in_plan: bool = tx
                .query_row(
                    CHECK_ACTIVITY_IN_PLAN_SQL,
                    params![activity_id as i64, plan_id as i64],
                    |row| row.get(0),
                )
                .db_context("Failed to check activity")?;
            if !in_plan {
                return Err(PlannerError::TargetNotFound {
                    kind: "Activity",
                    id: activity_id,
                });
            }
        }

        let now = Timestamp::now().to_string();
        tx.execute(
            UPSERT_EXTERNAL_SQL,
            params![
                plan_id as i64,
                provider,
                external_id,
                matched_activity_id.map(|id| id as i64),
                &now
            ],
        )
        .db_context("Failed to record external activity")?;

        let external = tx
            .query_row(SELECT_EXTERNAL_SQL, params![provider, external_id], |row| {
                Ok(ExternalActivity {
                    id: row.get::<_, i64>(0)? as u64,
                    plan_id: row.get::<_, i64>(1)? as u64,
                    provider: row.get(2)?,
                    external_id: row.get(3)?,
                    matched_activity_id: row.get::<_, Option<i64>>(4)?.map(|id| id as u64),
                    created_at: parsed(row, 5)?,
                })
            })
            .db_context("Failed to reload external activity")?;
        tx.commit().db_context("Failed to commit transaction")?;

        debug!("recorded {provider}/{external_id} for plan {plan_id}");
        Ok(external)
    }
}
