//! Lock state evaluation.
//!
//! A day is locked when the athlete has already executed it: either the day's
//! notes carry the manual [`MANUAL_DONE_MARKER`], or it has at least one
//! non-rest activity and all of its non-rest activities are completed. Lock
//! state is recomputed from a fresh plan snapshot on every proposal cycle and
//! is never persisted.

use std::collections::{HashMap, HashSet};

use crate::models::{Day, Plan};

/// Marker the athlete appends to a day's notes to mark it done by hand.
pub const MANUAL_DONE_MARKER: &str = "[done]";

/// Whether day notes contain the manual completion marker.
pub fn has_manual_marker(notes: Option<&str>) -> bool {
    notes.is_some_and(|notes| notes.to_lowercase().contains(MANUAL_DONE_MARKER))
}

/// Whether a single day is protected from proposal edits.
pub fn is_day_locked(day: &Day) -> bool {
    if has_manual_marker(day.notes.as_deref()) {
        return true;
    }

    let mut work = day
        .activities
        .iter()
        .filter(|a| !a.activity_type.is_rest())
        .peekable();
    work.peek().is_some() && work.all(|a| a.completed)
}

/// Per-plan projection of which days and activities are protected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockState {
    locked_days: HashSet<u64>,
    completed_activities: HashSet<u64>,
    activity_days: HashMap<u64, u64>,
}

impl LockState {
    /// Build the lock state for every day of a plan snapshot.
    pub fn from_plan(plan: &Plan) -> Self {
        let mut state = Self::default();
        for day in plan.days() {
            if is_day_locked(day) {
                state.locked_days.insert(day.id);
            }
            for activity in &day.activities {
                state.activity_days.insert(activity.id, day.id);
                if activity.completed {
                    state.completed_activities.insert(activity.id);
                }
            }
        }
        state
    }

    /// Build a lock state from raw parts.
    pub fn from_parts(
        locked_days: impl IntoIterator<Item = u64>,
        completed_activities: impl IntoIterator<Item = u64>,
        activity_days: impl IntoIterator<Item = (u64, u64)>,
    ) -> Self {
        Self {
            locked_days: locked_days.into_iter().collect(),
            completed_activities: completed_activities.into_iter().collect(),
            activity_days: activity_days.into_iter().collect(),
        }
    }

    pub fn is_day_locked(&self, day_id: u64) -> bool {
        self.locked_days.contains(&day_id)
    }

    pub fn is_activity_completed(&self, activity_id: u64) -> bool {
        self.completed_activities.contains(&activity_id)
    }

    /// Day an activity currently sits on, if it is part of the snapshot.
    pub fn day_of(&self, activity_id: u64) -> Option<u64> {
        self.activity_days.get(&activity_id).copied()
    }

    /// Locked day ids in ascending order.
    pub fn locked_days(&self) -> Vec<u64> {
        let mut days: Vec<u64> = self.locked_days.iter().copied().collect();
        days.sort_unstable();
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, ActivityType, Priority};

    fn activity(id: u64, activity_type: ActivityType, completed: bool) -> Activity {
        Activity {
            id,
            plan_id: 1,
            day_id: 10,
            activity_type,
            title: "Workout".to_string(),
            duration_minutes: None,
            distance: None,
            distance_unit: None,
            pace_target: None,
            effort_target: None,
            notes: None,
            priority: Priority::Medium,
            must_do: false,
            bail_allowed: false,
            completed,
            actual_distance: None,
            actual_duration_minutes: None,
            actual_pace: None,
        }
    }

    fn day(notes: Option<&str>, activities: Vec<Activity>) -> Day {
        Day {
            id: 10,
            week_id: 1,
            day_of_week: 2,
            raw_text: None,
            notes: notes.map(String::from),
            activities,
        }
    }

    #[test]
    fn completed_run_locks_the_day() {
        let d = day(None, vec![activity(1, ActivityType::Run, true)]);
        assert!(is_day_locked(&d));
    }

    #[test]
    fn pending_run_leaves_day_unlocked() {
        let d = day(None, vec![activity(1, ActivityType::Run, false)]);
        assert!(!is_day_locked(&d));
    }

    #[test]
    fn manual_marker_locks_an_empty_day() {
        let d = day(Some("Felt great [DONE]"), vec![]);
        assert!(is_day_locked(&d));
    }

    #[test]
    fn empty_and_rest_only_days_are_not_locked() {
        assert!(!is_day_locked(&day(None, vec![])));
        assert!(!is_day_locked(&day(
            None,
            vec![activity(1, ActivityType::Rest, false)]
        )));
    }

    #[test]
    fn rest_activities_are_ignored_when_work_is_done() {
        let d = day(
            None,
            vec![
                activity(1, ActivityType::Rest, false),
                activity(2, ActivityType::Strength, true),
            ],
        );
        assert!(is_day_locked(&d));
    }

    #[test]
    fn partially_completed_day_is_not_locked() {
        let d = day(
            None,
            vec![
                activity(1, ActivityType::Run, true),
                activity(2, ActivityType::Strength, false),
            ],
        );
        assert!(!is_day_locked(&d));
    }
}
