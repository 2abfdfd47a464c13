//! Plan operations for the Planner.

use super::Planner;
use crate::{
    display::PlanSummaries,
    error::{PlannerError, Result},
    models::{Plan, PlanSummary},
    params::{CreatePlan, Id, ImportTemplate, ListPlans, SetRaceDate},
    proposal::validate::{clamp_text, MAX_TITLE_CHARS},
    templates::Template,
};

const DEFAULT_IMPORT_TITLE: &str = "Imported plan";

impl Planner {
    /// Creates a DRAFT plan with empty weeks.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<Plan> {
        let new_plan = params.validate()?;
        self.with_database(move |db| db.create_plan(&new_plan)).await
    }

    /// Creates a DRAFT plan from weekly-grid template JSON.
    ///
    /// The title falls back to the template's program name.
    pub async fn import_template(&self, params: &ImportTemplate) -> Result<Plan> {
        let template = Template::from_json(&params.template_json)?;
        let (race_date, start_date) = params.anchor()?;
        let title = params
            .title
            .as_deref()
            .or(template.program_name.as_deref())
            .map(|t| clamp_text(t, MAX_TITLE_CHARS))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_IMPORT_TITLE.to_string());

        self.with_database(move |db| {
            db.import_template(&template, &title, race_date, start_date)
        })
        .await
    }

    /// Retrieves a plan with its full calendar.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        let plan_id = params.id;
        self.with_database(move |db| db.get_plan(plan_id)).await
    }

    /// Like [`Planner::get_plan`] but a missing plan is an error.
    pub async fn show_plan(&self, params: &Id) -> Result<Plan> {
        self.get_plan(params)
            .await?
            .ok_or(PlannerError::PlanNotFound { id: params.id })
    }

    /// Lists plan summaries with activity counts.
    pub async fn list_plans(&self, params: &ListPlans) -> Result<Vec<PlanSummary>> {
        let filter = params.validate()?;
        self.with_database(move |db| db.list_plans(&filter)).await
    }

    /// Lists plan summaries wrapped for display.
    pub async fn list_plans_summary(&self, params: &ListPlans) -> Result<PlanSummaries> {
        Ok(PlanSummaries(self.list_plans(params).await?))
    }

    /// Publishes a draft plan (DRAFT -> ACTIVE).
    pub async fn publish_plan(&self, params: &Id) -> Result<Plan> {
        let plan_id = params.id;
        self.with_database(move |db| db.publish_plan(plan_id)).await
    }

    /// Archives a plan. Archived plans reject every edit.
    pub async fn archive_plan(&self, params: &Id) -> Result<Plan> {
        let plan_id = params.id;
        self.with_database(move |db| db.archive_plan(plan_id)).await
    }

    /// Restores an archived plan as active.
    pub async fn unarchive_plan(&self, params: &Id) -> Result<Plan> {
        let plan_id = params.id;
        self.with_database(move |db| db.unarchive_plan(plan_id)).await
    }

    /// Sets or clears the race date the calendar is anchored to.
    pub async fn set_race_date(&self, params: &SetRaceDate) -> Result<Plan> {
        let race_date = params.validate()?;
        let plan_id = params.id;
        self.with_database(move |db| db.set_race_date(plan_id, race_date))
            .await
    }
}
