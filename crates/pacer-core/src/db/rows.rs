//! Row mapping and eager plan loading shared by every query module.
//!
//! Loaders take a plain [`Connection`] so they run equally against the
//! database handle and inside an open transaction.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{Activity, Day, Plan, Week},
};

const SELECT_PLAN_SQL: &str = "SELECT id, title, status, race_date, week_count, source_id, owner, athlete, created_at, updated_at FROM plans WHERE id = ?1";
const SELECT_WEEKS_SQL: &str = "SELECT id, plan_id, week_index, start_date, end_date FROM weeks WHERE plan_id = ?1 ORDER BY week_index";
const SELECT_DAYS_SQL: &str = "SELECT d.id, d.week_id, d.day_of_week, d.raw_text, d.notes FROM days d JOIN weeks w ON d.week_id = w.id WHERE w.plan_id = ?1 ORDER BY d.week_id, d.day_of_week";
const SELECT_ACTIVITIES_SQL: &str = "SELECT id, plan_id, day_id, activity_type, title, duration_minutes, distance, distance_unit, pace_target, effort_target, notes, priority, must_do, bail_allowed, completed, actual_distance, actual_duration_minutes, actual_pace FROM activities WHERE plan_id = ?1 ORDER BY day_id, sort_order, id";

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// Parse a TEXT column through `FromStr`.
pub(crate) fn parsed<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| conversion_error(idx, format!("Invalid value '{raw}': {e}")))
}

/// Parse a nullable TEXT column through `FromStr`.
pub(crate) fn parsed_opt<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        raw.parse::<T>()
            .map_err(|e| conversion_error(idx, format!("Invalid value '{raw}': {e}")))
    })
    .transpose()
}

fn id(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)? as u64)
}

fn id_opt(row: &Row, idx: usize) -> rusqlite::Result<Option<u64>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(|v| v as u64))
}

fn minutes_opt(row: &Row, idx: usize) -> rusqlite::Result<Option<u32>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(|v| v as u32))
}

/// Build a plan header (without weeks) from a `plans` row.
fn plan_from_row(row: &Row) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: id(row, 0)?,
        title: row.get(1)?,
        status: parsed(row, 2)?,
        race_date: parsed_opt(row, 3)?,
        week_count: row.get::<_, i64>(4)? as u32,
        source_id: id_opt(row, 5)?,
        owner: row.get(6)?,
        athlete: row.get(7)?,
        created_at: parsed(row, 8)?,
        updated_at: parsed(row, 9)?,
        weeks: Vec::new(),
    })
}

fn week_from_row(row: &Row) -> rusqlite::Result<Week> {
    Ok(Week {
        id: id(row, 0)?,
        plan_id: id(row, 1)?,
        week_index: row.get::<_, i64>(2)? as u32,
        start_date: parsed_opt(row, 3)?,
        end_date: parsed_opt(row, 4)?,
        days: Vec::new(),
    })
}

fn day_from_row(row: &Row) -> rusqlite::Result<Day> {
    Ok(Day {
        id: id(row, 0)?,
        week_id: id(row, 1)?,
        day_of_week: row.get::<_, i64>(2)? as u8,
        raw_text: row.get(3)?,
        notes: row.get(4)?,
        activities: Vec::new(),
    })
}

/// Build an activity from a row selected in `activities` column order.
pub(crate) fn activity_from_row(row: &Row) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: id(row, 0)?,
        plan_id: id(row, 1)?,
        day_id: id(row, 2)?,
        activity_type: parsed(row, 3)?,
        title: row.get(4)?,
        duration_minutes: minutes_opt(row, 5)?,
        distance: row.get(6)?,
        distance_unit: parsed_opt(row, 7)?,
        pace_target: row.get(8)?,
        effort_target: row.get(9)?,
        notes: row.get(10)?,
        priority: parsed(row, 11)?,
        must_do: row.get(12)?,
        bail_allowed: row.get(13)?,
        completed: row.get(14)?,
        actual_distance: row.get(15)?,
        actual_duration_minutes: minutes_opt(row, 16)?,
        actual_pace: row.get(17)?,
    })
}

/// Load a plan with its weeks, days and activities.
pub(crate) fn load_plan(conn: &Connection, plan_id: u64) -> Result<Option<Plan>> {
    let plan = conn
        .query_row(SELECT_PLAN_SQL, params![plan_id as i64], plan_from_row)
        .optional()
        .db_context("Failed to query plan")?;

    let Some(mut plan) = plan else {
        return Ok(None);
    };

    let mut activities_by_day: HashMap<u64, Vec<Activity>> = HashMap::new();
    {
        let mut stmt = conn
            .prepare(SELECT_ACTIVITIES_SQL)
            .db_context("Failed to prepare activity query")?;
        let activities = stmt
            .query_map(params![plan_id as i64], activity_from_row)
            .db_context("Failed to query activities")?;
        for activity in activities {
            let activity = activity.db_context("Failed to read activity")?;
            activities_by_day
                .entry(activity.day_id)
                .or_default()
                .push(activity);
        }
    }

    let mut days_by_week: HashMap<u64, Vec<Day>> = HashMap::new();
    {
        let mut stmt = conn
            .prepare(SELECT_DAYS_SQL)
            .db_context("Failed to prepare day query")?;
        let days = stmt
            .query_map(params![plan_id as i64], day_from_row)
            .db_context("Failed to query days")?;
        for day in days {
            let mut day = day.db_context("Failed to read day")?;
            day.activities = activities_by_day.remove(&day.id).unwrap_or_default();
            days_by_week.entry(day.week_id).or_default().push(day);
        }
    }

    let mut stmt = conn
        .prepare(SELECT_WEEKS_SQL)
        .db_context("Failed to prepare week query")?;
    plan.weeks = stmt
        .query_map(params![plan_id as i64], week_from_row)
        .db_context("Failed to query weeks")?
        .map(|week| {
            week.map(|mut week| {
                week.days = days_by_week.remove(&week.id).unwrap_or_default();
                week
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to read weeks")?;

    Ok(Some(plan))
}
