#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime portal server.
//!
//! These types are serialized to JSON for the REST API. Submission bodies
//! keep enum and date fields as raw strings so that each malformed value
//! becomes its own per-field validation message. Single-value update bodies
//! (status and role changes) are typed; a body that fails to deserialize is
//! reported under the `body` field.

use chrono::NaiveTime;
use crime_portal_missing_models::{ItemDraft, ItemFilter, ItemStatus};
use crime_portal_report_models::{
    CrimeType, FieldErrors, Report, ReportDraft, ReportFilter, ReportStats, ReportStatus,
    parse_choice, parse_date,
};
use crime_portal_user_models::{NewUser, Role, User, UserFilter, UserStatus};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// Error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable summary.
    pub error: String,
    /// Per-field messages, present for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// `POST /api/users` body: the registration form plus the chosen role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    /// Account details.
    #[serde(flatten)]
    pub user: NewUser,
    /// Role for the new account; citizen when omitted.
    #[serde(default)]
    pub role: Option<Role>,
}

/// `PATCH /api/users/{id}/status` body.
#[derive(Debug, Clone, Deserialize)]
pub struct UserStatusRequest {
    /// New account status.
    pub status: UserStatus,
}

/// `PATCH /api/users/{id}/role` body.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRoleRequest {
    /// New role.
    pub role: Role,
}

/// A user in the admin listing, with the number of reports they filed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    /// The account.
    #[serde(flatten)]
    pub user: User,
    /// How many reports the user has submitted.
    pub reports: usize,
}

/// Query parameters for `GET /api/users`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQueryParams {
    /// Name, email, or phone substring.
    pub search: Option<String>,
    /// Role name, or `all`.
    pub role: Option<String>,
    /// Account status, or `all`.
    pub status: Option<String>,
}

impl UserQueryParams {
    /// Converts the raw parameters into a [`UserFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] for unknown role or status names.
    pub fn to_filter(&self) -> Result<UserFilter, FieldErrors> {
        UserFilter::parse(
            self.search.as_deref(),
            self.role.as_deref(),
            self.status.as_deref(),
        )
    }
}

/// Query parameters for `GET /api/reports`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQueryParams {
    /// Status name, or `all`.
    pub status: Option<String>,
    /// Crime type name, or `all`.
    #[serde(rename = "type")]
    pub crime_type: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    /// Free-text search term.
    pub search: Option<String>,
}

impl ReportQueryParams {
    /// Converts the raw parameters into a [`ReportFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] for unknown names or malformed dates.
    pub fn to_filter(&self) -> Result<ReportFilter, FieldErrors> {
        ReportFilter::parse(
            self.status.as_deref(),
            self.crime_type.as_deref(),
            self.date_from.as_deref(),
            self.date_to.as_deref(),
            self.search.as_deref(),
        )
    }
}

/// `POST /api/reports` body, as typed into the submission form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitReportRequest {
    /// Short title.
    pub title: String,
    /// Free-text account of the incident.
    pub description: String,
    /// Where it happened.
    pub location: String,
    /// Latitude from geolocation.
    pub latitude: Option<f64>,
    /// Longitude from geolocation.
    pub longitude: Option<f64>,
    /// Crime type name.
    #[serde(rename = "type")]
    pub crime_type: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`.
    pub time: Option<String>,
}

impl SubmitReportRequest {
    /// Parses the typed fields into a draft filed by `user_id`.
    ///
    /// Blank values stay unset so that required-field validation reports
    /// them; only values that are present but unreadable fail here.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] for an unknown type or a malformed date or
    /// time.
    pub fn into_draft(self, user_id: u64) -> Result<ReportDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let crime_type: Option<CrimeType> = parse_choice(
            self.crime_type.as_deref(),
            "type",
            "Unknown crime type",
            &mut errors,
        );
        let date = parse_date(self.date.as_deref(), "date", &mut errors);
        let time = parse_time(self.time.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ReportDraft {
            title: self.title,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            crime_type,
            date,
            time,
            user_id,
        })
    }
}

fn parse_time(raw: Option<&str>, errors: &mut FieldErrors) -> Option<NaiveTime> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_or_else(
            |_| {
                errors.insert("time", format!("Invalid time: {raw}"));
                None
            },
            Some,
        )
}

/// `PATCH /api/reports/{id}/status` body.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeRequest {
    /// Target status.
    pub status: ReportStatus,
}

/// A single report with the status changes a UI may offer for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    /// The report.
    #[serde(flatten)]
    pub report: Report,
    /// Every status other than the current one.
    pub available_transitions: Vec<ReportStatus>,
}

/// `GET /api/dashboard` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Counts over the viewer's reports.
    pub stats: ReportStats,
    /// The viewer's most recent reports, newest first.
    pub recent_reports: Vec<Report>,
}

/// An entry of the crime type catalogue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrimeType {
    /// Wire value.
    pub value: CrimeType,
    /// Display label.
    pub label: &'static str,
}

impl From<CrimeType> for ApiCrimeType {
    fn from(value: CrimeType) -> Self {
        Self {
            value,
            label: value.label(),
        }
    }
}

/// Query parameters for `GET /api/missing-items`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQueryParams {
    /// Free-text search term.
    pub search: Option<String>,
    /// `missing`, `found`, or `all`.
    pub status: Option<String>,
    /// Category name, or `all`.
    pub category: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
}

impl ItemQueryParams {
    /// Converts the raw parameters into an [`ItemFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] for unknown names or malformed dates.
    pub fn to_filter(&self) -> Result<ItemFilter, FieldErrors> {
        ItemFilter::parse(
            self.search.as_deref(),
            self.status.as_deref(),
            self.category.as_deref(),
            self.date_from.as_deref(),
            self.date_to.as_deref(),
        )
    }
}

/// `POST /api/missing-items` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitItemRequest {
    /// Short title.
    pub title: String,
    /// Distinguishing details.
    pub description: String,
    /// Category name.
    pub category: Option<String>,
    /// Where it was lost or found.
    pub location: String,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `missing` or `found`; missing when omitted.
    pub status: Option<String>,
    /// Contact email.
    pub contact: String,
    /// Contact phone number.
    pub phone: String,
    /// Optional image URL.
    pub image: Option<String>,
}

impl SubmitItemRequest {
    /// Parses the typed fields into a draft posted by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] for an unknown category or status, or a
    /// malformed date.
    pub fn into_draft(self, user_id: u64) -> Result<ItemDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let category = parse_choice(
            self.category.as_deref(),
            "category",
            "Unknown category",
            &mut errors,
        );
        let status = parse_choice(
            self.status.as_deref(),
            "status",
            "Unknown item status",
            &mut errors,
        );
        let date = parse_date(self.date.as_deref(), "date", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ItemDraft {
            title: self.title,
            description: self.description,
            category,
            location: self.location,
            date,
            status,
            contact: self.contact,
            phone: self.phone,
            image: self.image,
            user_id,
        })
    }
}

/// `PATCH /api/missing-items/{id}/status` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemStatusRequest {
    /// New item status.
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crime_portal_missing_models::ItemCategory;

    use super::*;

    #[test]
    fn submit_request_parses_form_values() {
        let request: SubmitReportRequest = serde_json::from_value(serde_json::json!({
            "title": "Broken window",
            "description": "Rock through the front window",
            "location": "12 Elm St",
            "type": "vandalism",
            "date": "2023-05-01",
            "time": "21:15"
        }))
        .unwrap();
        let draft = request.into_draft(7).unwrap();
        assert_eq!(draft.crime_type, Some(CrimeType::Vandalism));
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(draft.time, NaiveTime::from_hms_opt(21, 15, 0));
        assert_eq!(draft.user_id, 7);
    }

    #[test]
    fn blank_form_values_stay_unset() {
        let draft = SubmitReportRequest {
            crime_type: Some(String::new()),
            time: Some("  ".to_string()),
            ..SubmitReportRequest::default()
        }
        .into_draft(1)
        .unwrap();
        assert_eq!(draft.crime_type, None);
        assert_eq!(draft.date, None);
        assert_eq!(draft.time, None);
    }

    #[test]
    fn malformed_form_values_are_reported() {
        let errors = SubmitReportRequest {
            crime_type: Some("arson".to_string()),
            date: Some("05/01/2023".to_string()),
            time: Some("25:00".to_string()),
            ..SubmitReportRequest::default()
        }
        .into_draft(1)
        .unwrap_err();
        assert!(errors.contains("type"));
        assert!(errors.contains("date"));
        assert!(errors.contains("time"));
    }

    #[test]
    fn report_query_reads_type_param() {
        let params = ReportQueryParams {
            crime_type: Some("theft".to_string()),
            status: Some("all".to_string()),
            ..ReportQueryParams::default()
        };
        let filter = params.to_filter().unwrap();
        assert_eq!(filter.crime_type, Some(CrimeType::Theft));
        assert_eq!(filter.status, None);
    }

    #[test]
    fn item_request_defaults_status() {
        let draft = SubmitItemRequest {
            category: Some("pet".to_string()),
            date: Some("2023-04-17".to_string()),
            ..SubmitItemRequest::default()
        }
        .into_draft(2)
        .unwrap();
        assert_eq!(draft.category, Some(ItemCategory::Pet));
        assert_eq!(draft.status, None);
    }

    #[test]
    fn add_user_request_flattens_form() {
        let request: AddUserRequest = serde_json::from_value(serde_json::json!({
            "name": "Officer Dee",
            "email": "dee@example.com",
            "phone": "555-0100",
            "password": "password123",
            "confirmPassword": "password123",
            "role": "police"
        }))
        .unwrap();
        assert_eq!(request.role, Some(Role::Police));
        assert_eq!(request.user.confirm_password, "password123");
    }

    #[test]
    fn api_error_omits_empty_fields() {
        let body = serde_json::to_value(ApiError {
            error: "Not found".to_string(),
            fields: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Not found" }));
    }
}
