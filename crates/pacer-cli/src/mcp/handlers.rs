//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use pacer_core::{params as core, Planner, StaticAdvice};
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types only derive `JsonSchema` behind the `schema` feature.
// The transparent wrapper lets every tool take them as-is while keeping the
// MCP plumbing out of the core crate.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> McpParams<T>
where
    T: JsonSchema,
{
    fn into_inner(self) -> T {
        self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type ListPlans = McpParams<core::ListPlans>;
pub type PreviewProposal = McpParams<core::PreviewSuppliedProposal>;
pub type ApplyProposal = McpParams<core::ApplyProposal>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text_result(text: impl Into<String>) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    planner: Arc<Planner>,
}

impl McpHandlers {
    pub fn new(planner: Arc<Planner>) -> Self {
        Self { planner }
    }

    pub async fn list_plans(&self, Parameters(params): Parameters<ListPlans>) -> McpResult {
        debug!("list_plans: {params:?}");

        let inner_params = params.as_ref();
        let summaries = self
            .planner
            .list_plans_summary(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to list plans", &e))?;

        let title = match inner_params.status.as_deref() {
            Some(status) => format!("Plans ({status})"),
            None if inner_params.archived => "All Plans".to_string(),
            None => "Plans".to_string(),
        };
        text_result(format!("# {title}\n\n{summaries}"))
    }

    pub async fn show_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_plan: {params:?}");

        let plan = self
            .planner
            .show_plan(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show plan", &e))?;
        text_result(plan.to_string())
    }

    pub async fn preview_proposal(
        &self,
        Parameters(params): Parameters<PreviewProposal>,
    ) -> McpResult {
        debug!("preview_proposal: plan {}", params.as_ref().plan_id);

        let (request, proposal) = params.into_inner().into_parts();
        let preview = self
            .planner
            .preview_proposal(&request, &StaticAdvice::new(proposal))
            .await
            .map_err(|e| to_mcp_error("Failed to preview proposal", &e))?;
        text_result(preview.to_string())
    }

    pub async fn apply_proposal(&self, Parameters(params): Parameters<ApplyProposal>) -> McpResult {
        debug!("apply_proposal: plan {}", params.as_ref().plan_id);

        let outcome = self
            .planner
            .apply_proposal(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to apply proposal", &e))?;
        text_result(outcome.to_string())
    }
}
