//! Proposal preview and apply for the Planner.
//!
//! Preview never writes. Apply validates the caller's copy of the proposal
//! again and hands it to [`crate::db::Database::apply_proposal`], which
//! re-sanitizes it against lock state read inside its own transaction.

use jiff::Zoned;
use log::{debug, warn};

use super::Planner;
use crate::{
    advice::{AdviceContext, AdviceService},
    error::{PlannerError, Result},
    locks::LockState,
    params::{ApplyProposal, Id, PreviewProposal},
    proposal::{sanitize, validate_proposal, ApplyOutcome, ProposalPreview},
};

impl Planner {
    /// Asks `advice` for a proposal and returns it with the changes that
    /// would survive sanitization right now.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - empty or overlong feedback
    /// * `PlannerError::PlanNotFound` / `PlannerError::PlanNotEditable`
    /// * `PlannerError::ProposalGenerationFailed` - the service failed or
    ///   returned a proposal the validator rejects
    pub async fn preview_proposal<A: AdviceService>(
        &self,
        params: &PreviewProposal,
        advice: &A,
    ) -> Result<ProposalPreview> {
        let feedback = params.validate()?;
        let plan_id = params.plan_id;

        let plan = self.show_plan(&Id { id: plan_id }).await?;
        if !plan.status.is_editable() {
            return Err(PlannerError::PlanNotEditable { id: plan_id });
        }

        let locks = LockState::from_plan(&plan);
        let context = AdviceContext::from_plan(&plan, &locks, Zoned::now().date(), &feedback);

        let raw = advice.propose(&context).await.map_err(|e| {
            warn!("plan {plan_id}: advice service failed: {e}");
            PlannerError::ProposalGenerationFailed {
                reason: e.to_string(),
            }
        })?;

        let proposal = validate_proposal(&raw).map_err(|e| match e {
            PlannerError::InvalidProposalShape { reason } => {
                warn!("plan {plan_id}: rejected advice output: {reason}");
                PlannerError::ProposalGenerationFailed {
                    reason: format!("advice service returned an invalid proposal: {reason}"),
                }
            }
            other => other,
        })?;

        let sanitized = sanitize(&proposal, &locks);
        debug!(
            "plan {plan_id}: previewed {} change(s), {} would be dropped",
            proposal.changes.len(),
            sanitized.dropped.len()
        );

        Ok(ProposalPreview {
            plan_id,
            proposal,
            sanitized,
        })
    }

    /// Applies a previewed proposal after the athlete confirmed it.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - `confirmed` is false
    /// * `PlannerError::InvalidProposalShape` - the proposal fails validation
    /// * any error of [`crate::db::Database::apply_proposal`]
    pub async fn apply_proposal(&self, params: &ApplyProposal) -> Result<ApplyOutcome> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed")
                .with_reason("The athlete must confirm the proposal before it is applied"));
        }

        let proposal = validate_proposal(&params.proposal)?;
        let plan_id = params.plan_id;
        self.with_database(move |db| db.apply_proposal(plan_id, &proposal))
            .await
    }
}
