//! Display formatting for models and operation results.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! and operation outcomes get newtype wrappers so the CLI and the MCP server
//! render the same markdown.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers & impl │    │   Markdown      │
//! │ (Plan, Change)  │───▶│    Display      │───▶│ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (PlanSummaries)
//! - [`results`]: Operation result types (CreateResult, UpdateResult) and
//!   proposal outcomes
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use pacer_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Plan 3 published".to_string());
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::PlanSummaries;
pub use datetime::{DateRange, LocalDateTime};
pub use results::{CreateResult, UpdateResult};
pub use status::OperationStatus;
