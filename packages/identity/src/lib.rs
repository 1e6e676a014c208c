#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session and identity provider for the crime portal.
//!
//! [`UserDirectory`] owns user accounts and bearer-token sessions. It
//! handles login, self-registration, logout, and token resolution, plus the
//! admin-only account management operations in [`admin`]. The report core
//! only needs [`SessionProvider`]: who is the current user, if anyone.

pub mod admin;
pub mod directory;
pub mod fixtures;
mod password;

use crime_portal_report_models::FieldErrors;
use crime_portal_user_models::{Role, User};
use serde::Serialize;
use thiserror::Error;

pub use directory::UserDirectory;

/// Errors returned by identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but has been deactivated.
    #[error("Account {email} is inactive")]
    AccountInactive {
        /// The account's email.
        email: String,
    },

    /// Another account already uses this email.
    #[error("User with email {email} already exists")]
    EmailTaken {
        /// The conflicting email.
        email: String,
    },

    /// The bearer token is missing, unknown, or revoked.
    #[error("Not authenticated")]
    Unauthenticated,

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

    /// No user has the requested ID.
    #[error("User {id} not found")]
    NotFound {
        /// The requested user ID.
        id: u64,
    },

    /// Submitted fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A password could not be hashed.
    #[error("Password hashing failed: {message}")]
    PasswordHash {
        /// Description of what went wrong.
        message: String,
    },

    /// Embedded fixture data could not be parsed.
    #[error("Fixture error: {message}")]
    Fixture {
        /// Description of what went wrong.
        message: String,
    },
}

/// Who is making the current request, if anyone.
pub trait SessionProvider {
    /// The signed-in user, or `None` for an anonymous caller.
    fn current_user(&self) -> Option<User>;

    /// Whether a user is signed in.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// A signed-in user and the bearer token that identifies the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The signed-in user.
    pub user: User,
    /// Opaque bearer token.
    pub token: String,
}

impl SessionProvider for Session {
    fn current_user(&self) -> Option<User> {
        Some(self.user.clone())
    }
}

impl SessionProvider for Option<Session> {
    fn current_user(&self) -> Option<User> {
        self.as_ref().map(|session| session.user.clone())
    }
}
