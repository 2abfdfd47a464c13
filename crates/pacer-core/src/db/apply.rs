//! Atomic application of a validated proposal.
//!
//! Everything happens inside one `IMMEDIATE` transaction: the plan snapshot
//! and lock state are read after the write lock is taken, the proposal is
//! sanitized again against that fresh lock state, and every surviving change
//! is applied through the same transaction. Any error drops the
//! transaction uncommitted, which rolls back every earlier change.

use jiff::{civil::Date, Timestamp};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, ToSql};

use super::{
    plan_queries::{insert_empty_week, UPDATE_PLAN_TIMESTAMP_SQL},
    rows::load_plan,
};
use crate::{
    calendar::{effective_start_date, explicit_week_dates, shift_days, WeekDates},
    error::{DatabaseResultExt, PlannerError, Result},
    locks::LockState,
    models::{ActivityType, Priority},
    proposal::{sanitize, ActivityPatch, ApplyOutcome, Change, Proposal},
};

const SELECT_ACTIVITY_DAY_SQL: &str =
    "SELECT day_id FROM activities WHERE id = ?1 AND plan_id = ?2";
const CHECK_DAY_IN_PLAN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM days d JOIN weeks w ON d.week_id = w.id WHERE d.id = ?1 AND w.plan_id = ?2)";
const NEXT_SORT_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM activities WHERE day_id = ?1";
const MOVE_ACTIVITY_SQL: &str = "UPDATE activities SET day_id = ?1, sort_order = ?2 WHERE id = ?3";
const INSERT_ACTIVITY_SQL: &str = "INSERT INTO activities (plan_id, day_id, activity_type, title, duration_minutes, distance, distance_unit, pace_target, effort_target, notes, priority, must_do, bail_allowed, sort_order) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";
const CLEAR_EXTERNAL_MATCH_SQL: &str =
    "UPDATE external_activities SET matched_activity_id = NULL WHERE matched_activity_id = ?1";
const DELETE_ACTIVITY_SQL: &str = "DELETE FROM activities WHERE id = ?1";
// Renumbering goes through negative indexes so UNIQUE(plan_id, week_index)
// holds after every row update.
const SHIFT_WEEKS_NEGATIVE_SQL: &str =
    "UPDATE weeks SET week_index = -(week_index + ?2) WHERE plan_id = ?1";
const RESTORE_WEEKS_POSITIVE_SQL: &str =
    "UPDATE weeks SET week_index = -week_index WHERE plan_id = ?1";
const INCREASE_WEEK_COUNT_SQL: &str =
    "UPDATE plans SET week_count = week_count + ?1 WHERE id = ?2";

/// What applying a single change did.
enum Effect {
    Applied,
    Extended(u32),
    Skipped(String),
}

/// Applies changes for one plan through an open transaction.
struct Applier<'a> {
    tx: &'a Connection,
    plan_id: u64,
}

impl Applier<'_> {
    fn activity_day(&self, activity_id: u64) -> Result<u64> {
        let day: Option<i64> = self
            .tx
            .query_row(
                SELECT_ACTIVITY_DAY_SQL,
                params![activity_id as i64, self.plan_id as i64],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to look up activity")?;
        day.map(|d| d as u64).ok_or(PlannerError::TargetNotFound {
            kind: "Activity",
            id: activity_id,
        })
    }

    fn require_day(&self, day_id: u64) -> Result<()> {
        let exists: bool = self
            .tx
            .query_row(
                CHECK_DAY_IN_PLAN_SQL,
                params![day_id as i64, self.plan_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to look up day")?;
        if exists {
            Ok(())
        } else {
            Err(PlannerError::TargetNotFound {
                kind: "Day",
                id: day_id,
            })
        }
    }

    fn next_sort_order(&self, day_id: u64) -> Result<i64> {
        self.tx
            .query_row(NEXT_SORT_ORDER_SQL, params![day_id as i64], |row| row.get(0))
            .db_context("Failed to compute activity order")
    }

    fn apply(&self, change: &Change) -> Result<Effect> {
        match change {
            Change::MoveActivity {
                activity_id,
                target_day_id,
                ..
            } => self.move_activity(*activity_id, *target_day_id),
            Change::EditActivity {
                activity_id, patch, ..
            } => self.edit_activity(*activity_id, patch),
            Change::AddActivity {
                day_id,
                activity_type,
                title,
                patch,
                ..
            } => self.add_activity(*day_id, *activity_type, title, patch),
            Change::DeleteActivity { activity_id, .. } => self.delete_activity(*activity_id),
            Change::ExtendPlan { new_start_date, .. } => self.extend_plan(*new_start_date),
        }
    }

    fn move_activity(&self, activity_id: u64, target_day_id: u64) -> Result<Effect> {
        let current_day = self.activity_day(activity_id)?;
        self.require_day(target_day_id)?;

        if current_day == target_day_id {
            return Ok(Effect::Skipped(format!(
                "activity {activity_id} is already on day {target_day_id}"
            )));
        }

        let sort_order = self.next_sort_order(target_day_id)?;
        self.tx
            .execute(
                MOVE_ACTIVITY_SQL,
                params![target_day_id as i64, sort_order, activity_id as i64],
            )
            .db_context("Failed to move activity")?;
        debug!("moved activity {activity_id}: day {current_day} -> {target_day_id}");
        Ok(Effect::Applied)
    }

    fn edit_activity(&self, activity_id: u64, patch: &ActivityPatch) -> Result<Effect> {
        self.activity_day(activity_id)?;

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        let mut set = |column: &'static str, value: Box<dyn ToSql>| {
            assignments.push(column);
            values.push(value);
        };

        if let Some(activity_type) = patch.activity_type {
            set("activity_type = ?", Box::new(activity_type.as_str()));
        }
        if let Some(title) = &patch.title {
            set("title = ?", Box::new(title.clone()));
        }
        if let Some(duration) = patch.duration_minutes {
            set("duration_minutes = ?", Box::new(i64::from(duration)));
        }
        if let Some(distance) = patch.distance {
            set("distance = ?", Box::new(distance));
        }
        if let Some(unit) = patch.distance_unit {
            set("distance_unit = ?", Box::new(unit.as_str()));
        }
        if let Some(pace) = &patch.pace_target {
            set("pace_target = ?", Box::new(pace.clone()));
        }
        if let Some(effort) = &patch.effort_target {
            set("effort_target = ?", Box::new(effort.clone()));
        }
        if let Some(notes) = &patch.notes {
            set("notes = ?", Box::new(notes.clone()));
        }
        if let Some(must_do) = patch.must_do {
            set("must_do = ?", Box::new(must_do));
        }
        if let Some(bail_allowed) = patch.bail_allowed {
            set("bail_allowed = ?", Box::new(bail_allowed));
        }
        if let Some(priority) = patch.priority {
            set("priority = ?", Box::new(priority.as_str()));
        }

        if assignments.is_empty() {
            return Ok(Effect::Skipped(format!(
                "edit of activity {activity_id} supplied no fields"
            )));
        }

        let sql = format!(
            "UPDATE activities SET {} WHERE id = ?",
            assignments.join(", ")
        );
        values.push(Box::new(activity_id as i64));
        let params_refs: Vec<&dyn ToSql> = values.iter().map(|b| &**b).collect();

        self.tx
            .execute(&sql, &params_refs[..])
            .db_context("Failed to edit activity")?;
        debug!("edited activity {activity_id} ({} fields)", assignments.len());
        Ok(Effect::Applied)
    }

    fn add_activity(
        &self,
        day_id: u64,
        activity_type: ActivityType,
        title: &str,
        patch: &ActivityPatch,
    ) -> Result<Effect> {
        self.require_day(day_id)?;

        let sort_order = self.next_sort_order(day_id)?;
        self.tx
            .execute(
                INSERT_ACTIVITY_SQL,
                params![
                    self.plan_id as i64,
                    day_id as i64,
                    activity_type.as_str(),
                    title,
                    patch.duration_minutes.map(i64::from),
                    patch.distance,
                    patch.distance_unit.map(|u| u.as_str()),
                    patch.pace_target,
                    patch.effort_target,
                    patch.notes,
                    patch.priority.unwrap_or_default().as_str(),
                    patch.must_do.unwrap_or(false),
                    patch.bail_allowed.unwrap_or(false),
                    sort_order
                ],
            )
            .db_context("Failed to add activity")?;
        debug!(
            "added {} activity {} on day {day_id}",
            activity_type.as_str(),
            self.tx.last_insert_rowid()
        );
        Ok(Effect::Applied)
    }

    fn delete_activity(&self, activity_id: u64) -> Result<Effect> {
        self.activity_day(activity_id)?;

        let cleared = self
            .tx
            .execute(CLEAR_EXTERNAL_MATCH_SQL, params![activity_id as i64])
            .db_context("Failed to clear external matches")?;
        self.tx
            .execute(DELETE_ACTIVITY_SQL, params![activity_id as i64])
            .db_context("Failed to delete activity")?;
        debug!("deleted activity {activity_id} ({cleared} external matches cleared)");
        Ok(Effect::Applied)
    }

    /// Prepend lead-in weeks so the plan starts around `new_start`.
    ///
    /// The new weeks have no days; filling them is left to a later import.
    /// Reads the plan again so that a second extension in the same proposal
    /// sees the weeks added by the first.
    fn extend_plan(&self, new_start: Date) -> Result<Effect> {
        let plan = load_plan(self.tx, self.plan_id)?.ok_or(PlannerError::PlanNotFound {
            id: self.plan_id,
        })?;

        let Some(current_start) = effective_start_date(&plan) else {
            warn!(
                "plan {}: cannot extend to {new_start}, no scheduled start date",
                self.plan_id
            );
            return Ok(Effect::Skipped(format!(
                "extend to {new_start} skipped: the plan has no scheduled start date"
            )));
        };

        if new_start >= current_start {
            warn!(
                "plan {}: extend to {new_start} is not before current start {current_start}",
                self.plan_id
            );
            return Ok(Effect::Skipped(format!(
                "extend to {new_start} skipped: the plan already starts on {current_start}"
            )));
        }

        let days = new_start.until(current_start)?.get_days();
        let added = (f64::from(days) / 7.0).round() as i64;
        if added <= 0 {
            warn!(
                "plan {}: extend to {new_start} is less than half a week earlier",
                self.plan_id
            );
            return Ok(Effect::Skipped(format!(
                "extend to {new_start} skipped: less than half a week before {current_start}"
            )));
        }
        let added = added as u32;

        self.tx
            .execute(
                SHIFT_WEEKS_NEGATIVE_SQL,
                params![self.plan_id as i64, i64::from(added)],
            )
            .db_context("Failed to renumber weeks")?;
        self.tx
            .execute(RESTORE_WEEKS_POSITIVE_SQL, params![self.plan_id as i64])
            .db_context("Failed to renumber weeks")?;

        // Weeks pinned to explicit dates do not follow the race date, so the
        // new weeks are pinned too. Derived weeks stay derived.
        let pinned = plan
            .weeks
            .iter()
            .min_by_key(|w| w.week_index)
            .is_some_and(|first| first.start_date.is_some() && first.end_date.is_some());
        let new_plan_start = shift_days(current_start, -7 * i64::from(added));

        for week_index in 1..=added {
            let dates = match new_plan_start {
                Some(start) if pinned => explicit_week_dates(start, week_index),
                _ => WeekDates::UNSCHEDULED,
            };
            insert_empty_week(self.tx, self.plan_id, week_index, dates)?;
        }

        self.tx
            .execute(
                INCREASE_WEEK_COUNT_SQL,
                params![i64::from(added), self.plan_id as i64],
            )
            .db_context("Failed to update week count")?;

        info!(
            "plan {}: extended by {added} weeks (start {current_start} -> {new_start})",
            self.plan_id
        );
        Ok(Effect::Extended(added))
    }
}

impl super::Database {
    /// Applies a validated proposal to a plan in one `IMMEDIATE` transaction.
    ///
    /// The proposal is sanitized again against lock state read inside the
    /// transaction, so days completed since the preview stay protected.
    ///
    /// # Errors
    ///
    /// * `PlanNotFound` if the plan does not exist
    /// * `PlanNotEditable` if the plan is archived
    /// * `NothingToApply` if no change survives sanitization
    /// * `TargetNotFound` if a change references a day or activity outside
    ///   the plan; nothing is committed in that case
    pub fn apply_proposal(&mut self, plan_id: u64, proposal: &Proposal) -> Result<ApplyOutcome> {
        let tx = self.begin_immediate()?;

        let plan = load_plan(&tx, plan_id)?.ok_or(PlannerError::PlanNotFound { id: plan_id })?;
        if !plan.status.is_editable() {
            return Err(PlannerError::PlanNotEditable { id: plan_id });
        }

        let locks = LockState::from_plan(&plan);
        let sanitized = sanitize(proposal, &locks);
        if sanitized.is_empty() {
            return Err(PlannerError::NothingToApply {
                dropped: sanitized.dropped.len(),
            });
        }

        let applier = Applier { tx: &tx, plan_id };
        let mut applied_count = 0;
        let mut extended_weeks = 0;
        let mut notes = Vec::new();

        for change in &sanitized.proposal.changes {
            match applier.apply(change)? {
                Effect::Applied => applied_count += 1,
                Effect::Extended(weeks) => {
                    applied_count += 1;
                    extended_weeks += weeks;
                }
                Effect::Skipped(note) => notes.push(note),
            }
        }

        let now = Timestamp::now().to_string();
        tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now, plan_id as i64])
            .db_context("Failed to update plan timestamp")?;
        tx.commit().db_context("Failed to commit transaction")?;

        info!(
            "plan {plan_id}: applied {applied_count} change(s), {} dropped, {} skipped",
            sanitized.dropped.len(),
            notes.len()
        );

        Ok(ApplyOutcome {
            plan_id,
            applied_count,
            extended_weeks,
            summary: sanitized.proposal.summary,
            notes,
            dropped: sanitized.dropped,
        })
    }
}
