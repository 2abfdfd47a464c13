#![allow(dead_code)]

use jiff::civil::Date;
use pacer_core::{
    models::Plan,
    proposal::{validate_proposal, Proposal},
    templates::Template,
    Database, PlannerBuilder,
};
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};

/// Two weeks: a rest day, an easy run and a long run in week 1, one easy run
/// in week 2.
pub const TEMPLATE_JSON: &str = r#"{
    "program_name": "Half Marathon Novice",
    "weeks": [
        {
            "week_number": 1,
            "days": {
                "monday": { "raw": "Rest", "type_guess": "rest" },
                "tuesday": {
                    "raw": "3 miles easy",
                    "type_guess": "easy-run",
                    "metrics": { "distance_value": 3.0, "distance_unit": "miles" }
                },
                "saturday": {
                    "raw": "5 miles long",
                    "type_guess": "lrl",
                    "metrics": { "distance_value": 5.0, "distance_unit": "miles" }
                }
            }
        },
        {
            "week_number": 2,
            "days": {
                "tuesday": { "raw": "3.5 miles easy", "type_guess": "easy-run" }
            }
        }
    ]
}"#;

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, pacer_core::Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// Helper function to create a temporary database for testing
pub fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

/// Import [`TEMPLATE_JSON`] as a new plan.
pub fn import_plan(db: &mut Database, race_date: Option<Date>) -> Plan {
    let template = Template::from_json(TEMPLATE_JSON).expect("template should parse");
    db.import_template(&template, "Spring Half", race_date, None)
        .expect("Failed to import template")
}

/// Wrap `changes` in an otherwise valid proposal object.
pub fn proposal_json(changes: Value) -> Value {
    json!({
        "coachReply": "Here is what I would change.",
        "summary": "Adjust the week",
        "confidence": "medium",
        "riskFlags": [],
        "changes": changes,
    })
}

/// Validate a proposal built with [`proposal_json`].
pub fn proposal(changes: Value) -> Proposal {
    validate_proposal(&proposal_json(changes)).expect("proposal should validate")
}
