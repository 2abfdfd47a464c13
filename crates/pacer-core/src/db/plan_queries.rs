//! Plan CRUD operations and queries.

use jiff::{civil::Date, Timestamp};
use log::info;
use rusqlite::{params, Connection};

use super::rows::{load_plan, parsed, parsed_opt};
use crate::{
    calendar::{explicit_week_dates, WeekDates},
    error::{DatabaseResultExt, PlannerError, Result},
    models::{NewPlan, Plan, PlanFilter, PlanStatus, PlanSummary},
    templates::Template,
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (title, status, race_date, week_count, source_id, owner, athlete, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7, ?8)";
const INSERT_WEEK_SQL: &str =
    "INSERT INTO weeks (plan_id, week_index, start_date, end_date) VALUES (?1, ?2, ?3, ?4)";
const INSERT_DAY_SQL: &str = "INSERT INTO days (week_id, day_of_week) VALUES (?1, ?2)";
const UPDATE_DAY_RAW_TEXT_SQL: &str = "UPDATE days SET raw_text = ?1 WHERE id = ?2";
const INSERT_TEMPLATE_ACTIVITY_SQL: &str = "INSERT INTO activities (plan_id, day_id, activity_type, title, duration_minutes, distance, distance_unit, priority, sort_order) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'MEDIUM', 0)";
const SELECT_PLAN_STATUS_SQL: &str = "SELECT status FROM plans WHERE id = ?1";
const UPDATE_PLAN_STATUS_SQL: &str = "UPDATE plans SET status = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_PLAN_RACE_DATE_SQL: &str =
    "UPDATE plans SET race_date = ?1, updated_at = ?2 WHERE id = ?3";
pub(crate) const UPDATE_PLAN_TIMESTAMP_SQL: &str = "UPDATE plans SET updated_at = ?1 WHERE id = ?2";

const PLAN_SUMMARY_SQL: &str = "SELECT id, title, status, race_date, week_count, athlete, created_at, updated_at, total_activities, completed_activities FROM plan_summaries";

/// Insert a week row with no days. Returns the week id.
pub(crate) fn insert_empty_week(
    conn: &Connection,
    plan_id: u64,
    week_index: u32,
    dates: WeekDates,
) -> Result<i64> {
    conn.execute(
        INSERT_WEEK_SQL,
        params![
            plan_id as i64,
            i64::from(week_index),
            dates.start_date.map(|d| d.to_string()),
            dates.end_date.map(|d| d.to_string()),
        ],
    )
    .db_context("Failed to insert week")?;
    Ok(conn.last_insert_rowid())
}

/// Insert one week and its seven days. Returns the day ids, Monday first.
pub(crate) fn insert_week(
    conn: &Connection,
    plan_id: u64,
    week_index: u32,
    dates: WeekDates,
) -> Result<[u64; 7]> {
    let week_id = insert_empty_week(conn, plan_id, week_index, dates)?;

    let mut day_ids = [0u64; 7];
    for (slot, day_of_week) in day_ids.iter_mut().zip(1i64..=7) {
        conn.execute(INSERT_DAY_SQL, params![week_id, day_of_week])
            .db_context("Failed to insert day")?;
        *slot = conn.last_insert_rowid() as u64;
    }
    Ok(day_ids)
}

/// Dates stored on week `week_index`: explicit when the plan is anchored to
/// a start date, otherwise left for the resolver to derive.
fn stored_week_dates(start_date: Option<Date>, week_index: u32) -> WeekDates {
    start_date.map_or(WeekDates::UNSCHEDULED, |start| {
        explicit_week_dates(start, week_index)
    })
}

/// Load the current status of a plan, or `PlanNotFound`.
pub(crate) fn plan_status(conn: &Connection, plan_id: u64) -> Result<PlanStatus> {
    conn.query_row(SELECT_PLAN_STATUS_SQL, params![plan_id as i64], |row| {
        parsed::<PlanStatus>(row, 0)
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => PlannerError::PlanNotFound { id: plan_id },
        e => PlannerError::database("Failed to query plan status").with_source(e),
    })
}

impl super::Database {
    /// Creates a DRAFT plan with `week_count` empty weeks of seven days each.
    ///
    /// With a start date every week stores explicit, contiguous dates.
    pub fn create_plan(&mut self, plan: &NewPlan) -> Result<Plan> {
        let tx = self.begin()?;

        let now = Timestamp::now().to_string();
        tx.execute(
            INSERT_PLAN_SQL,
            params![
                plan.title,
                PlanStatus::Draft.as_str(),
                plan.race_date.map(|d| d.to_string()),
                i64::from(plan.week_count),
                plan.owner,
                plan.athlete,
                &now,
                &now
            ],
        )
        .db_context("Failed to insert plan")?;
        let id = tx.last_insert_rowid() as u64;

        for week_index in 1..=plan.week_count {
            insert_week(&tx, id, week_index, stored_week_dates(plan.start_date, week_index))?;
        }

        let created = load_plan(&tx, id)?.ok_or(PlannerError::PlanNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;

        info!("created plan {id} with {} weeks", plan.week_count);
        Ok(created)
    }

    /// Creates a DRAFT plan from a parsed weekly-grid template.
    ///
    /// Template weeks are renumbered `1..=n` in order of their week number;
    /// each non-empty cell becomes one activity and keeps its raw text on the
    /// day. `start_date` pins explicit week dates as in
    /// [`Database::create_plan`].
    pub fn import_template(
        &mut self,
        template: &Template,
        title: &str,
        race_date: Option<Date>,
        start_date: Option<Date>,
    ) -> Result<Plan> {
        let tx = self.begin()?;

        let now = Timestamp::now().to_string();
        let week_count = template.weeks.len() as u32;
        tx.execute(
            INSERT_PLAN_SQL,
            params![
                title,
                PlanStatus::Draft.as_str(),
                race_date.map(|d| d.to_string()),
                i64::from(week_count),
                None::<String>,
                None::<String>,
                &now,
                &now
            ],
        )
        .db_context("Failed to insert plan")?;
        let id = tx.last_insert_rowid() as u64;

        for (week_index, week) in (1u32..).zip(&template.weeks) {
            let day_ids =
                insert_week(&tx, id, week_index, stored_week_dates(start_date, week_index))?;
            for day in &week.days {
                let day_id = day_ids[usize::from(day.day_of_week - 1)];
                tx.execute(UPDATE_DAY_RAW_TEXT_SQL, params![day.raw_text, day_id as i64])
                    .db_context("Failed to store day text")?;

                if let Some(activity) = &day.activity {
                    tx.execute(
                        INSERT_TEMPLATE_ACTIVITY_SQL,
                        params![
                            id as i64,
                            day_id as i64,
                            activity.activity_type.as_str(),
                            activity.title,
                            activity.duration_minutes.map(i64::from),
                            activity.distance,
                            activity.distance_unit.map(|u| u.as_str()),
                        ],
                    )
                    .db_context("Failed to insert template activity")?;
                }
            }
        }

        let imported = load_plan(&tx, id)?.ok_or(PlannerError::PlanNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;

        info!(
            "imported plan {id} with {week_count} weeks and {} activities",
            template.activity_count()
        );
        Ok(imported)
    }

    /// Retrieves a plan with its weeks, days and activities.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        load_plan(&self.connection, id)
    }

    /// Lists plan summaries, newest first.
    ///
    /// Without an explicit status, archived plans are hidden unless
    /// `include_archived` is set.
    pub fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<PlanSummary>> {
        let mut query = PLAN_SUMMARY_SQL.to_string();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            query.push_str(" WHERE status = ?");
            params_vec.push(Box::new(status.as_str()));
        } else if !filter.include_archived {
            query.push_str(" WHERE status != ?");
            params_vec.push(Box::new(PlanStatus::Archived.as_str()));
        }
        query.push_str(" ORDER BY id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let summaries = stmt
            .query_map(&params_refs[..], |row| {
                Ok(PlanSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    title: row.get(1)?,
                    status: parsed(row, 2)?,
                    race_date: parsed_opt(row, 3)?,
                    week_count: row.get::<_, i64>(4)? as u32,
                    athlete: row.get(5)?,
                    created_at: parsed(row, 6)?,
                    updated_at: parsed(row, 7)?,
                    total_activities: row.get::<_, i64>(8)? as u32,
                    completed_activities: row.get::<_, i64>(9)? as u32,
                })
            })
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plans")?;

        Ok(summaries)
    }

    /// Moves a plan to `to` if its current status is one of `from`.
    ///
    /// A plan already in the target status is returned unchanged.
    fn transition_plan(&mut self, id: u64, from: &[PlanStatus], to: PlanStatus) -> Result<Plan> {
        let tx = self.begin()?;

        let current = plan_status(&tx, id)?;
        if current != to {
            if !from.contains(&current) {
                return Err(match current {
                    PlanStatus::Archived => PlannerError::PlanNotEditable { id },
                    _ => PlannerError::invalid_input("status").with_reason(format!(
                        "plan {id} is {} and cannot become {}",
                        current.as_str(),
                        to.as_str()
                    )),
                });
            }
            let now = Timestamp::now().to_string();
            tx.execute(UPDATE_PLAN_STATUS_SQL, params![to.as_str(), &now, id as i64])
                .db_context("Failed to update plan status")?;
            info!("plan {id}: {} -> {}", current.as_str(), to.as_str());
        }

        let plan = load_plan(&tx, id)?.ok_or(PlannerError::PlanNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }

    /// Publishes a draft plan to the athlete.
    pub fn publish_plan(&mut self, id: u64) -> Result<Plan> {
        self.transition_plan(id, &[PlanStatus::Draft], PlanStatus::Active)
    }

    /// Archives a plan. Archived plans reject every calendar edit.
    pub fn archive_plan(&mut self, id: u64) -> Result<Plan> {
        self.transition_plan(
            id,
            &[PlanStatus::Draft, PlanStatus::Active],
            PlanStatus::Archived,
        )
    }

    /// Restores an archived plan as active.
    pub fn unarchive_plan(&mut self, id: u64) -> Result<Plan> {
        self.transition_plan(id, &[PlanStatus::Archived], PlanStatus::Active)
    }

    /// Sets or clears the race date every derived week is anchored to.
    pub fn set_race_date(&mut self, id: u64, race_date: Option<Date>) -> Result<Plan> {
        let tx = self.begin()?;

        if !plan_status(&tx, id)?.is_editable() {
            return Err(PlannerError::PlanNotEditable { id });
        }

        let now = Timestamp::now().to_string();
        tx.execute(
            UPDATE_PLAN_RACE_DATE_SQL,
            params![race_date.map(|d| d.to_string()), &now, id as i64],
        )
        .db_context("Failed to update race date")?;

        let plan = load_plan(&tx, id)?.ok_or(PlannerError::PlanNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }
}
