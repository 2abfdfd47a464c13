mod common;

use common::{create_test_db, create_test_planner, import_plan, proposal, proposal_json};
use jiff::civil::date;
use pacer_core::{
    calendar::{date_of_day, effective_start_date, week_dates},
    models::ActivityLog,
    params::{ApplyProposal, Id, LogActivity, PreviewProposal},
    templates::Template,
    PlannerError, StaticAdvice,
};
use serde_json::json;

#[test]
fn test_changes_on_completed_day_are_never_applied() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, Some(date(2026, 4, 19)));
    let tuesday = plan.weeks[0].days[1].id;
    let easy_run = plan.weeks[0].days[1].activities[0].id;

    db.log_activity(easy_run, &ActivityLog::default()).unwrap();

    let result = db.apply_proposal(
        plan.id,
        &proposal(json!([
            {"op": "edit_activity", "activityId": easy_run, "reason": "shorter", "distance": 2},
            {"op": "add_activity", "dayId": tuesday, "type": "STRENGTH", "title": "Core", "reason": "balance"},
        ])),
    );
    assert!(matches!(
        result,
        Err(PlannerError::NothingToApply { dropped: 2 })
    ));

    let after = db.get_plan(plan.id).unwrap().unwrap();
    let day = after.find_day(tuesday).unwrap();
    assert_eq!(day.activities.len(), 1);
    assert_eq!(day.activities[0].distance, Some(3.0));
}

#[test]
fn test_partial_proposal_applies_the_rest() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, Some(date(2026, 4, 19)));
    let easy_run = plan.weeks[0].days[1].activities[0].id;
    let long_run = plan.weeks[0].days[5].activities[0].id;

    db.log_activity(easy_run, &ActivityLog::default()).unwrap();

    let outcome = db
        .apply_proposal(
            plan.id,
            &proposal(json!([
                {"op": "delete_activity", "activityId": easy_run, "reason": "skip"},
                {"op": "edit_activity", "activityId": long_run, "reason": "cut back", "duration": 50.4},
            ])),
        )
        .unwrap();

    assert_eq!(outcome.applied_count, 1);
    assert_eq!(outcome.dropped.len(), 1);
    assert_eq!(outcome.dropped[0].index, 0);
    assert!(outcome
        .summary
        .contains("1 proposed change(s) were skipped"));

    let long = db.get_activity(long_run).unwrap().unwrap();
    assert_eq!(long.duration_minutes, Some(50));
    assert!(db.get_activity(easy_run).unwrap().is_some());
}

#[test]
fn test_extend_plan_prepends_weeks() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, Some(date(2026, 4, 19)));
    assert_eq!(effective_start_date(&plan), Some(date(2026, 4, 6)));
    let old_first_week = plan.weeks[0].id;
    let easy_run = plan.weeks[0].days[1].activities[0].id;

    let outcome = db
        .apply_proposal(
            plan.id,
            &proposal(json!([
                {"op": "extend_plan", "newStartDate": "2026-03-23", "reason": "more base"},
            ])),
        )
        .unwrap();
    assert_eq!(outcome.extended_weeks, 2);
    assert_eq!(outcome.applied_count, 1);

    let after = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(after.week_count, 4);
    assert_eq!(after.week_indexes(), vec![1, 2, 3, 4]);
    assert_eq!(after.race_date, Some(date(2026, 4, 19)));
    assert_eq!(effective_start_date(&after), Some(date(2026, 3, 23)));
    for lead_in in &after.weeks[..2] {
        assert!(lead_in.days.is_empty(), "week {} has days", lead_in.week_index);
        assert_eq!(lead_in.start_date, None);
    }

    let moved = after.weeks.iter().find(|w| w.id == old_first_week).unwrap();
    assert_eq!(moved.week_index, 3);
    assert_eq!(
        week_dates(&after, moved).start_date,
        Some(date(2026, 4, 6)),
        "existing weeks keep their dates"
    );

    let tuesday = moved.days.iter().find(|d| d.day_of_week == 2).unwrap();
    assert_eq!(tuesday.activities[0].id, easy_run);
    assert_eq!(date_of_day(&after, moved, tuesday), Some(date(2026, 4, 7)));
}

#[test]
fn test_extend_dated_plan_without_race_date() {
    let (_temp_file, mut db) = create_test_db();
    let template = Template::from_json(common::TEMPLATE_JSON).unwrap();
    let plan = db
        .import_template(&template, "Base", None, Some(date(2026, 1, 12)))
        .unwrap();
    let easy_run = plan.weeks[0].days[1].activities[0].id;

    let outcome = db
        .apply_proposal(
            plan.id,
            &proposal(json!([
                {"op": "extend_plan", "newStartDate": "2026-01-05", "reason": "one more week"},
            ])),
        )
        .unwrap();
    assert_eq!(outcome.extended_weeks, 1);

    let after = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(effective_start_date(&after), Some(date(2026, 1, 5)));
    assert!(after.weeks[0].days.is_empty());
    assert_eq!(after.weeks[0].end_date, Some(date(2026, 1, 11)));

    let easy = db.get_activity(easy_run).unwrap().unwrap();
    let (week, day) = after
        .weeks
        .iter()
        .find_map(|w| w.days.iter().find(|d| d.id == easy.day_id).map(|d| (w, d)))
        .unwrap();
    assert_eq!(week.week_index, 2);
    assert_eq!(date_of_day(&after, week, day), Some(date(2026, 1, 13)));
}

#[test]
fn test_extend_plan_rounds_to_whole_weeks() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, Some(date(2026, 4, 19)));

    let outcome = db
        .apply_proposal(
            plan.id,
            &proposal(json!([
                {"op": "extend_plan", "newStartDate": "2026-03-27", "reason": "a bit more"},
                {"op": "extend_plan", "newStartDate": "2026-03-28", "reason": "again"},
            ])),
        )
        .unwrap();

    // 10 days rounds to one week. The second request is then only two days
    // before the new start and is skipped.
    assert_eq!(outcome.extended_weeks, 1);
    assert_eq!(outcome.notes.len(), 1);
    assert_eq!(db.get_plan(plan.id).unwrap().unwrap().week_count, 3);
}

#[test]
fn test_extend_plan_ignores_short_extensions() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, Some(date(2026, 4, 19)));

    let outcome = db
        .apply_proposal(
            plan.id,
            &proposal(json!([
                {"op": "extend_plan", "newStartDate": "2026-04-03", "reason": "tiny"},
            ])),
        )
        .unwrap();

    assert_eq!(outcome.extended_weeks, 0);
    assert_eq!(outcome.applied_count, 0);
    assert!(outcome.notes[0].contains("less than half a week"));
}

#[test]
fn test_move_within_plan() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, Some(date(2026, 4, 19)));
    let easy_run = plan.weeks[0].days[1].activities[0].id;
    let thursday = plan.weeks[0].days[3].id;

    let outcome = db
        .apply_proposal(
            plan.id,
            &proposal(json!([
                {"op": "move_activity", "activityId": easy_run, "targetDayId": thursday, "reason": "rest"},
            ])),
        )
        .unwrap();
    assert_eq!(outcome.applied_count, 1);

    let moved = db.get_activity(easy_run).unwrap().unwrap();
    assert_eq!(moved.day_id, thursday);
}

#[test]
fn test_move_to_foreign_day_rolls_back_everything() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, Some(date(2026, 4, 19)));
    let other = import_plan(&mut db, None);
    let easy_run = plan.weeks[0].days[1].activities[0].id;
    let long_run = plan.weeks[0].days[5].activities[0].id;
    let foreign_day = other.weeks[0].days[2].id;

    let result = db.apply_proposal(
        plan.id,
        &proposal(json!([
            {"op": "delete_activity", "activityId": long_run, "reason": "rest"},
            {"op": "move_activity", "activityId": easy_run, "targetDayId": foreign_day, "reason": "oops"},
        ])),
    );
    assert!(matches!(
        result,
        Err(PlannerError::TargetNotFound { kind: "Day", .. })
    ));

    let after = db.get_plan(plan.id).unwrap().unwrap();
    assert!(after.find_activity(long_run).is_some());
    assert_eq!(after.find_activity(easy_run).unwrap().day_id, plan.weeks[0].days[1].id);
    assert_eq!(after.updated_at, plan.updated_at);
}

#[test]
fn test_stale_activity_is_rejected() {
    let (_temp_file, mut db) = create_test_db();
    let plan = import_plan(&mut db, None);

    let result = db.apply_proposal(
        plan.id,
        &proposal(json!([
            {"op": "delete_activity", "activityId": 9999, "reason": "gone"},
        ])),
    );
    assert!(matches!(
        result,
        Err(PlannerError::TargetNotFound { kind: "Activity", id: 9999 })
    ));
}

#[tokio::test]
async fn test_lock_taken_after_preview_is_honoured() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan = planner
        .import_template(&pacer_core::ImportTemplate {
            template_json: common::TEMPLATE_JSON.to_string(),
            title: Some("Spring Half".to_string()),
            race_date: Some("2026-04-19".to_string()),
            start_date: None,
        })
        .await
        .unwrap();
    let easy_run = plan.weeks[0].days[1].activities[0].id;
    let long_run = plan.weeks[0].days[5].activities[0].id;

    let changes = json!([
        {"op": "edit_activity", "activityId": easy_run, "reason": "shorter", "distance": 2},
        {"op": "edit_activity", "activityId": long_run, "reason": "shorter", "distance": 4},
    ]);
    let preview = planner
        .preview_proposal(
            &PreviewProposal {
                plan_id: plan.id,
                feedback: "busy week".to_string(),
            },
            &StaticAdvice::new(proposal_json(changes)),
        )
        .await
        .unwrap();
    assert!(preview.sanitized.dropped.is_empty());

    planner
        .log_activity(&LogActivity {
            activity_id: easy_run,
            ..Default::default()
        })
        .await
        .unwrap();

    let outcome = planner
        .apply_proposal(&ApplyProposal {
            plan_id: plan.id,
            proposal: serde_json::to_value(&preview.proposal).unwrap(),
            confirmed: true,
        })
        .await
        .unwrap();
    assert_eq!(outcome.applied_count, 1);
    assert_eq!(outcome.dropped.len(), 1);

    let after = planner.show_plan(&Id { id: plan.id }).await.unwrap();
    assert_eq!(after.find_activity(easy_run).unwrap().distance, Some(3.0));
    assert_eq!(after.find_activity(long_run).unwrap().distance, Some(4.0));
}
