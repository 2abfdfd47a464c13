//! Error handling utilities for MCP server

use pacer_core::PlannerError;
use rmcp::ErrorData;

/// Convert a planner error into an MCP error.
///
/// Errors caused by the caller's arguments are reported as invalid params so
/// the client can correct them; everything else is internal.
pub fn to_mcp_error(message: &str, error: &PlannerError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        PlannerError::InvalidInput { .. }
        | PlannerError::InvalidProposalShape { .. }
        | PlannerError::PlanNotFound { .. }
        | PlannerError::PlanNotEditable { .. }
        | PlannerError::TargetNotFound { .. }
        | PlannerError::NothingToApply { .. } => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_caller_errors_are_invalid_params() {
        let error = to_mcp_error("Failed to show plan", &PlannerError::PlanNotFound { id: 4 });
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(error.message, "Failed to show plan: Plan with ID 4 not found");
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let error = to_mcp_error(
            "Failed to list plans",
            &PlannerError::Configuration {
                message: "Task join error".to_string(),
            },
        );
        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
    }
}
