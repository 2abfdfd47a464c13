use jiff::civil::date;
use serde_json::json;

use super::*;
use crate::{
    error::PlannerError,
    locks::LockState,
    models::{ActivityType, Priority},
};

fn base(changes: serde_json::Value) -> serde_json::Value {
    json!({
        "coachReply": "Let's shift the long run so you can recover.",
        "summary": "Move Saturday long run to Sunday",
        "confidence": "medium",
        "changes": changes,
    })
}

fn assert_invalid(value: serde_json::Value, needle: &str) {
    match validate_proposal(&value) {
        Err(PlannerError::InvalidProposalShape { reason }) => {
            assert!(
                reason.contains(needle),
                "expected '{needle}' in rejection, got '{reason}'"
            );
        }
        other => panic!("expected InvalidProposalShape, got {other:?}"),
    }
}

#[test]
fn test_validates_every_change_kind() {
    let proposal = validate_proposal(&base(json!([
        {"op": "move_activity", "activityId": 1, "targetDayId": 2, "reason": "recover"},
        {"op": "edit_activity", "activityId": 3, "reason": "shorter", "duration": 45, "priority": "KEY"},
        {"op": "add_activity", "dayId": 4, "type": "STRENGTH", "title": "Core", "reason": "balance"},
        {"op": "delete_activity", "activityId": 5, "reason": "too much"},
        {"op": "extend_plan", "newStartDate": "2026-01-05", "reason": "more base"},
    ])))
    .expect("proposal should validate");

    assert_eq!(proposal.changes.len(), 5);
    assert_eq!(proposal.confidence, Confidence::Medium);
    assert!(proposal.risk_flags.is_empty());

    match &proposal.changes[1] {
        Change::EditActivity { patch, .. } => {
            assert_eq!(patch.duration_minutes, Some(45));
            assert_eq!(patch.priority, Some(Priority::Key));
            assert_eq!(patch.title, None);
        }
        other => panic!("unexpected change {other:?}"),
    }
    match &proposal.changes[2] {
        Change::AddActivity {
            activity_type,
            title,
            patch,
            ..
        } => {
            assert_eq!(*activity_type, ActivityType::Strength);
            assert_eq!(title, "Core");
            assert!(patch.is_empty());
        }
        other => panic!("unexpected change {other:?}"),
    }
    assert_eq!(
        proposal.changes[4],
        Change::ExtendPlan {
            new_start_date: date(2026, 1, 5),
            reason: "more base".to_string(),
        }
    );
}

#[test]
fn test_rejects_unknown_top_level_field() {
    let mut value = base(json!([]));
    value["mood"] = json!("happy");
    assert_invalid(value, "mood");
}

#[test]
fn test_rejects_unknown_op() {
    assert_invalid(
        base(json!([{"op": "swap_weeks", "reason": "x"}])),
        "unknown op `swap_weeks`",
    );
}

#[test]
fn test_rejects_unknown_change_field() {
    assert_invalid(
        base(json!([{"op": "delete_activity", "activityId": 1, "reason": "x", "force": true}])),
        "unknown field `force`",
    );
    assert_invalid(
        base(json!([{"op": "edit_activity", "activityId": 1, "reason": "x", "completed": true}])),
        "completed",
    );
}

#[test]
fn test_rejects_out_of_range_numbers() {
    assert_invalid(
        base(json!([{"op": "edit_activity", "activityId": 1, "reason": "x", "duration": 601}])),
        "duration",
    );
    assert_invalid(
        base(json!([{"op": "edit_activity", "activityId": 1, "reason": "x", "distance": -1}])),
        "distance",
    );
    assert_invalid(
        base(json!([{"op": "add_activity", "dayId": 1, "type": "RUN", "title": "Long", "reason": "x", "distance": 250.5}])),
        "distance",
    );
}

#[test]
fn test_accepts_range_boundaries() {
    let proposal = validate_proposal(&base(json!([
        {"op": "edit_activity", "activityId": 1, "reason": "x", "duration": 600, "distance": 0}
    ])))
    .expect("boundary values are valid");
    match &proposal.changes[0] {
        Change::EditActivity { patch, .. } => {
            assert_eq!(patch.duration_minutes, Some(600));
            assert_eq!(patch.distance, Some(0.0));
        }
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_rejects_missing_or_blank_reason() {
    assert_invalid(
        base(json!([{"op": "delete_activity", "activityId": 1}])),
        "missing field `reason`",
    );
    assert_invalid(
        base(json!([{"op": "delete_activity", "activityId": 1, "reason": "   "}])),
        "`reason` must not be empty",
    );
}

#[test]
fn test_rejects_too_many_changes() {
    let changes: Vec<_> = (0..13)
        .map(|i| json!({"op": "delete_activity", "activityId": i, "reason": "cut"}))
        .collect();
    assert_invalid(base(json!(changes)), "at most 12 changes");
}

#[test]
fn test_rejects_bad_confidence_and_types() {
    let mut value = base(json!([]));
    value["confidence"] = json!("certain");
    assert!(validate_proposal(&value).is_err());

    assert_invalid(
        base(json!([{"op": "move_activity", "activityId": "7", "targetDayId": 2, "reason": "x"}])),
        "activityId",
    );
    assert_invalid(
        base(json!([{"op": "add_activity", "dayId": 1, "type": "SWIM", "title": "Laps", "reason": "x"}])),
        "add_activity",
    );
    assert_invalid(
        base(json!([{"op": "extend_plan", "newStartDate": "next monday", "reason": "x"}])),
        "newStartDate",
    );
    assert_invalid(json!(["not", "an", "object"]), "JSON object");
}

#[test]
fn test_add_requires_type_and_title() {
    assert_invalid(
        base(json!([{"op": "add_activity", "dayId": 1, "title": "Easy", "reason": "x"}])),
        "missing field `type`",
    );
    assert_invalid(
        base(json!([{"op": "add_activity", "dayId": 1, "type": "RUN", "reason": "x"}])),
        "missing field `title`",
    );
}

#[test]
fn test_clamps_free_text() {
    let mut value = base(json!([
        {"op": "delete_activity", "activityId": 1, "reason": "r".repeat(1000)}
    ]));
    value["coachReply"] = json!(format!("  {}  ", "c".repeat(5000)));
    value["riskFlags"] = json!(["  knee  ", "", "x".repeat(500)]);
    value["followUpQuestion"] = json!("   ");

    let proposal = validate_proposal(&value).expect("long text is clamped, not rejected");
    assert_eq!(proposal.coach_reply.chars().count(), validate::MAX_COACH_REPLY_CHARS);
    assert_eq!(proposal.changes[0].reason().chars().count(), validate::MAX_REASON_CHARS);
    assert_eq!(proposal.risk_flags.len(), 2);
    assert_eq!(proposal.risk_flags[0], "knee");
    assert_eq!(proposal.risk_flags[1].len(), validate::MAX_RISK_FLAG_CHARS);
    assert_eq!(proposal.follow_up_question, None);
}

#[test]
fn test_rejects_too_many_risk_flags() {
    let mut value = base(json!([]));
    value["riskFlags"] = json!(["a", "b", "c", "d", "e", "f", "g"]);
    assert_invalid(value, "risk flags");
}

#[test]
fn test_null_optional_fields_are_absent() {
    let proposal = validate_proposal(&base(json!([
        {"op": "edit_activity", "activityId": 1, "reason": "x", "paceTarget": null, "title": "Tempo"}
    ])))
    .expect("null optional fields are allowed");
    match &proposal.changes[0] {
        Change::EditActivity { patch, .. } => {
            assert_eq!(patch.pace_target, None);
            assert_eq!(patch.title.as_deref(), Some("Tempo"));
        }
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_serialized_proposal_validates_again() {
    let proposal = validate_proposal(&base(json!([
        {"op": "add_activity", "dayId": 4, "type": "RUN", "title": "Strides", "reason": "speed",
         "distance": 3.5, "distanceUnit": "KM", "mustDo": true},
        {"op": "extend_plan", "newStartDate": "2026-01-05", "reason": "more base"},
    ])))
    .expect("valid");

    let value = serde_json::to_value(&proposal).expect("serializable");
    let again = validate_proposal(&value).expect("round-trips through the validator");
    assert_eq!(proposal, again);
}

fn locks() -> LockState {
    // Day 10 is locked; activity 1 sits on day 10, activity 2 on day 20,
    // activity 3 is completed but its day 30 is not locked.
    LockState::from_parts([10], [3], [(1, 10), (2, 20), (3, 30)])
}

fn proposal_with(changes: Vec<Change>) -> Proposal {
    Proposal {
        coach_reply: "reply".to_string(),
        summary: "summary".to_string(),
        confidence: Confidence::High,
        risk_flags: vec![],
        follow_up_question: None,
        changes,
    }
}

fn edit(activity_id: u64) -> Change {
    Change::EditActivity {
        activity_id,
        reason: "tweak".to_string(),
        patch: ActivityPatch {
            title: Some("Tweaked".to_string()),
            ..ActivityPatch::default()
        },
    }
}

#[test]
fn test_sanitize_drops_changes_on_locked_days() {
    let proposal = proposal_with(vec![
        edit(1),
        edit(2),
        Change::MoveActivity {
            activity_id: 2,
            target_day_id: 10,
            reason: "into a done day".to_string(),
        },
        Change::AddActivity {
            day_id: 10,
            activity_type: ActivityType::Run,
            title: "Extra".to_string(),
            reason: "more".to_string(),
            patch: ActivityPatch::default(),
        },
        Change::DeleteActivity {
            activity_id: 3,
            reason: "completed one".to_string(),
        },
    ]);

    let sanitized = sanitize(&proposal, &locks());
    assert_eq!(sanitized.proposal.changes, vec![edit(2)]);
    let dropped: Vec<usize> = sanitized.dropped.iter().map(|d| d.index).collect();
    assert_eq!(dropped, vec![0, 2, 3, 4]);
    assert!(sanitized.proposal.summary.contains("4 proposed change(s) were skipped"));
}

#[test]
fn test_sanitize_keeps_extend_and_unknown_activities() {
    let proposal = proposal_with(vec![
        Change::ExtendPlan {
            new_start_date: date(2026, 1, 5),
            reason: "base".to_string(),
        },
        edit(99),
    ]);
    let sanitized = sanitize(&proposal, &locks());
    assert_eq!(sanitized.proposal, proposal);
    assert!(sanitized.dropped.is_empty());
}

#[test]
fn test_sanitize_is_idempotent_for_fixed_case() {
    let proposal = proposal_with(vec![edit(1), edit(2), edit(3)]);
    let once = sanitize(&proposal, &locks());
    let twice = sanitize(&once.proposal, &locks());
    assert_eq!(once.proposal, twice.proposal);
    assert!(twice.dropped.is_empty());
}

#[test]
fn test_touched_days_for_move_includes_source_and_target() {
    let change = Change::MoveActivity {
        activity_id: 1,
        target_day_id: 20,
        reason: "r".to_string(),
    };
    assert_eq!(sanitize::touched_days(&change, &locks()), vec![10, 20]);
}
