#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! User identity, role, and account status types for the crime portal.
//!
//! The report core consumes [`User`] values but does not own them: the
//! viewer's [`Role`] decides which reports are visible and whether status
//! changes are allowed.

use chrono::{DateTime, Utc};
use crime_portal_report_models::{FieldErrors, normalize_search, parse_choice};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// What a user is allowed to see and do.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Member of the public; sees only their own reports
    Citizen,
    /// Officer; sees and works every report
    Police,
    /// Administrator; everything police can do plus user management
    Admin,
}

impl Role {
    /// Whether this role sees every report rather than only its own.
    #[must_use]
    pub const fn sees_all_reports(self) -> bool {
        matches!(self, Self::Police | Self::Admin)
    }

    /// Whether this role may change report status.
    #[must_use]
    pub const fn can_change_status(self) -> bool {
        matches!(self, Self::Police | Self::Admin)
    }

    /// Whether this role may manage user accounts.
    #[must_use]
    pub const fn can_manage_users(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Citizen, Self::Police, Self::Admin]
    }
}

/// Whether an account may sign in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    /// Account is usable
    #[default]
    Active,
    /// Account is disabled
    Inactive,
}

/// A portal user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Login email, unique across users.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Access role.
    pub role: Role,
    /// Whether the account is enabled.
    pub status: UserStatus,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Account creation input, shared by self-registration and admin creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Plain-text password.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

impl NewUser {
    /// Checks the form rules: every field present, password long enough,
    /// confirmation matching.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] with one message per offending field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }
        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        }
        if self.phone.trim().is_empty() {
            errors.insert("phone", "Phone number is required");
        }
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
        }
        if self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Predicates narrowing the admin user table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Case-insensitive substring over name and email, plain substring over
    /// phone.
    pub search: Option<String>,
    /// Exact role match.
    pub role: Option<Role>,
    /// Exact status match.
    pub status: Option<UserStatus>,
}

impl UserFilter {
    /// Builds a filter from raw query-string values. Empty strings and
    /// `all` mean "no predicate".
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every value that failed to parse.
    pub fn parse(
        search: Option<&str>,
        role: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let role = parse_choice(role, "role", "Unknown role", &mut errors);
        let status = parse_choice(status, "status", "Unknown status", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            search: search.and_then(normalize_search),
            role,
            status,
        })
    }

    /// Whether `user` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let search_matches = self
            .search
            .as_deref()
            .and_then(normalize_search)
            .is_none_or(|term| {
                user.name.to_lowercase().contains(&term)
                    || user.email.to_lowercase().contains(&term)
                    || user.phone.contains(&term)
            });
        search_matches
            && self.role.is_none_or(|role| user.role == role)
            && self.status.is_none_or(|status| user.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str, phone: &str, role: Role, status: UserStatus) -> User {
        User {
            id: 1,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            role,
            status,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn valid_new_user() -> NewUser {
        NewUser {
            name: "Robert Johnson".to_string(),
            email: "robert@example.com".to_string(),
            phone: "(123) 456-7893".to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        }
    }

    #[test]
    fn only_police_and_admin_change_status() {
        assert!(!Role::Citizen.can_change_status());
        assert!(Role::Police.can_change_status());
        assert!(Role::Admin.can_change_status());
        assert!(!Role::Police.can_manage_users());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Police).unwrap(), "\"police\"");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        for role in Role::all() {
            assert_eq!(role.as_ref().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn new_user_reports_all_missing_fields() {
        let errors = NewUser::default().validate().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
        assert!(errors.contains("phone"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn new_user_rejects_short_and_mismatched_passwords() {
        let mut new_user = valid_new_user();
        new_user.password = "short".to_string();
        let errors = new_user.validate().unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
        assert!(valid_new_user().validate().is_ok());
    }

    #[test]
    fn filter_searches_name_email_and_phone() {
        let jane = user(
            "Jane Smith",
            "jane@example.com",
            "(123) 456-7891",
            Role::Police,
            UserStatus::Active,
        );
        assert!(UserFilter::parse(Some("SMITH"), None, None).unwrap().matches(&jane));
        assert!(UserFilter::parse(Some("456-7891"), None, None).unwrap().matches(&jane));
        assert!(!UserFilter::parse(Some("robert"), None, None).unwrap().matches(&jane));

        let literal = UserFilter {
            search: Some("SMITH".to_string()),
            ..UserFilter::default()
        };
        assert!(literal.matches(&jane));
    }

    #[test]
    fn filter_is_conjunctive() {
        let robert = user(
            "Robert Johnson",
            "robert@example.com",
            "(123) 456-7893",
            Role::Citizen,
            UserStatus::Inactive,
        );
        let filter = UserFilter::parse(None, Some("citizen"), Some("inactive")).unwrap();
        assert!(filter.matches(&robert));
        let filter = UserFilter::parse(None, Some("citizen"), Some("active")).unwrap();
        assert!(!filter.matches(&robert));
    }

    #[test]
    fn filter_rejects_unknown_role() {
        let errors = UserFilter::parse(None, Some("sheriff"), None).unwrap_err();
        assert!(errors.contains("role"));
    }
}
