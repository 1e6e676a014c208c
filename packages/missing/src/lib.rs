#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Missing and found items board for the crime portal.
//!
//! Any signed-in user may browse and post. Marking an item found (or
//! missing again) is limited to the poster, police, and admins.

pub mod board;
pub mod fixtures;

use crime_portal_report_models::FieldErrors;
use thiserror::Error;

pub use board::MissingItemBoard;

/// Errors returned by board operations.
#[derive(Debug, Error)]
pub enum ItemError {
    /// No item has the requested ID.
    #[error("Item {id} not found")]
    NotFound {
        /// The requested item ID.
        id: u64,
    },

    /// The actor may not change this item.
    #[error("User {user_id} is not authorized to update item {id}")]
    NotAuthorized {
        /// The acting user's ID.
        user_id: u64,
        /// The item ID.
        id: u64,
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
