//! MCP server implementation for Pacer
//!
//! Exposes plan inspection and the preview/apply proposal flow to coaching
//! agents over stdio. Proposals previewed here are supplied by the agent
//! itself and go through the same validation and lock-aware sanitization as
//! the CLI.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use pacer_core::Planner;
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{ApplyProposal, Id, ListPlans, McpResult, PreviewProposal};

const INSTRUCTIONS: &str = r#"Pacer keeps running training plans as weeks of days and applies coach proposals to them.

## Core Concepts
- **Plans** are anchored by a race date (week N of N ends on race day) or by a Monday start date; undated plans use week numbers only.
- **Locked days** hold a completed activity or a manual done marker. No proposal can change them.
- **Proposals** are JSON objects with `coachReply`, `summary`, `confidence`, `riskFlags` and a list of `changes`.

## Workflow
1. `show_plan` to read the calendar, including day and activity IDs and which days are locked
2. Draft a proposal and call `preview_proposal`; nothing is written, and changes touching history are listed as skipped
3. Show the preview to the athlete
4. Only after the athlete agrees, call `apply_proposal` with the same proposal and `confirmed=true`

## Change operations
- `edit_activity`, `add_activity`, `delete_activity`, `move_activity`
- `extend_plan` with `newStartDate` (YYYY-MM-DD) to add empty lead-in weeks before week 1"#;

/// MCP server for Pacer
#[derive(Clone)]
pub struct PacerMcpServer {
    planner: Arc<Planner>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PacerMcpServer {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.planner.clone())
    }

    #[tool(
        name = "list_plans",
        description = "List training plans with their status, race date, week count and completed activity count. Archived plans are hidden unless archived=true; status (draft, active, archived) filters to one status."
    )]
    async fn list_plans(&self, params: Parameters<ListPlans>) -> McpResult {
        self.handlers().list_plans(params).await
    }

    #[tool(
        name = "show_plan",
        description = "Show a plan's full calendar: weeks with their resolved date ranges, days with dates and lock markers, and each activity with its ID, targets and completion state. Use the IDs shown here when drafting proposal changes."
    )]
    async fn show_plan(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_plan(params).await
    }

    #[tool(
        name = "preview_proposal",
        description = "Validate a drafted proposal against the plan's current state without writing anything. Returns the changes that would be applied and the ones that would be skipped because they touch a locked day or a completed activity. Requires plan_id, the athlete's feedback and the proposal object."
    )]
    async fn preview_proposal(&self, params: Parameters<PreviewProposal>) -> McpResult {
        self.handlers().preview_proposal(params).await
    }

    #[tool(
        name = "apply_proposal",
        description = "Apply a previewed proposal in one transaction. Requires confirmed=true, meaning the athlete approved the preview. Locks are re-checked at apply time, so changes to days completed since the preview are skipped. Fails without writing anything if a referenced activity or day no longer exists."
    )]
    async fn apply_proposal(&self, params: Parameters<ApplyProposal>) -> McpResult {
        self.handlers().apply_proposal(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PacerMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pacer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: PacerMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Pacer MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pacer_core::PlannerBuilder;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_server_exposes_proposal_tools() {
        let dir = TempDir::new().unwrap();
        let planner = PlannerBuilder::new()
            .with_database_path(Some(dir.path().join("pacer.db")))
            .build()
            .await
            .unwrap();
        let server = PacerMcpServer::new(planner);

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            ["apply_proposal", "list_plans", "preview_proposal", "show_plan"]
        );

        let info = server.get_info();
        assert_eq!(info.server_info.name, "pacer");
        assert!(info.instructions.unwrap().contains("apply_proposal"));
    }

    #[test]
    fn test_instructions_list_only_known_operations() {
        for op in [
            "edit_activity",
            "add_activity",
            "delete_activity",
            "move_activity",
            "extend_plan",
        ] {
            assert!(INSTRUCTIONS.contains(&format!("`{op}`")), "{op} missing");
        }
        assert!(!INSTRUCTIONS.contains("update_day_notes"));
        assert!(!INSTRUCTIONS.contains("extend_plan_start"));
    }
}
