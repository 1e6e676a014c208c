#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report store, query engine, and status transitions for the crime portal.
//!
//! [`ReportStore`] is the single owner of the report collection. Every
//! listing goes through [`query::query_reports`], which applies role scoping
//! before any filter predicate, so callers cannot forget the visibility
//! boundary. Status changes go through [`status::transition`], which checks
//! the actor's role and restamps `updatedAt`.

pub mod fixtures;
pub mod query;
pub mod stats;
pub mod status;
pub mod store;
pub mod submit;

use crime_portal_report_models::FieldErrors;
use crime_portal_user_models::Role;
use thiserror::Error;

pub use store::{ReportPatch, ReportStore};
pub use submit::{ValidDraft, submit_report, validate_draft};

/// Errors returned by report operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No report has the requested ID (or the viewer may not see it).
    #[error("Report {id} not found")]
    NotFound {
        /// The requested report ID.
        id: u64,
    },

    /// The actor's role does not permit the operation.
    #[error("User {user_id} with role {role} is not authorized to {action}")]
    NotAuthorized {
        /// The acting user's ID.
        user_id: u64,
        /// The acting user's role.
        role: Role,
        /// What was attempted.
        action: &'static str,
    },

    /// Submitted fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Embedded fixture data could not be parsed.
    #[error("Fixture error: {message}")]
    Fixture {
        /// Description of what went wrong.
        message: String,
    },
}
