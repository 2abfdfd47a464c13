//! Data models for training plans.
//!
//! A [`Plan`] owns an ordered list of [`Week`]s, each week owns up to seven
//! [`Day`]s and each day owns its [`Activity`] rows. Calendar dates are never
//! stored on days; they are derived through [`crate::calendar`] whenever they
//! are needed, so inserting weeks never leaves stale dates behind.
//!
//! Display implementations for these models live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use pacer_core::models::{Plan, PlanStatus};
//! use jiff::{civil::date, Timestamp};
//!
//! let plan = Plan {
//!     id: 1,
//!     title: "Spring Marathon".to_string(),
//!     status: PlanStatus::Active,
//!     race_date: Some(date(2026, 4, 19)),
//!     week_count: 0,
//! #   source_id: None,
//! #   owner: None,
//! #   athlete: None,
//! #   created_at: Timestamp::now(),
//! #   updated_at: Timestamp::now(),
//! #   weeks: vec![],
//! };
//! assert!(plan.week_indexes().is_empty());
//! ```

pub mod activity;
pub mod external;
pub mod filters;
pub mod plan;
pub mod requests;
pub mod status;
pub mod summary;


pub use activity::{Activity, ActivityType, DistanceUnit, Priority};
pub use external::ExternalActivity;
pub use filters::PlanFilter;
pub use plan::{Day, Plan, Week};
pub use requests::{ActivityLog, NewPlan};
pub use status::PlanStatus;
pub use summary::PlanSummary;
