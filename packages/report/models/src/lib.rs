#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime report, filter, and statistics types for the crime portal.
//!
//! A [`Report`] is a citizen-submitted incident with a mutable
//! [`ReportStatus`]. A [`ReportFilter`] narrows a report listing and is
//! built fresh for every query. These types are shared by the report store,
//! the HTTP server, and its API models.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of incident being reported.
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
pub enum CrimeType {
    /// Theft of property
    Theft,
    /// Unlawful entry into a building
    Burglary,
    /// Physical attack on a person
    Assault,
    /// Willful damage to property
    Vandalism,
    /// Deception for financial gain
    Fraud,
    /// Repeated unwanted contact or intimidation
    Harassment,
    /// Suspicious activity worth a look
    Suspicious,
    /// Anything else
    Other,
}

impl CrimeType {
    /// Human-readable label shown in type pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Theft => "Theft",
            Self::Burglary => "Burglary",
            Self::Assault => "Assault",
            Self::Vandalism => "Vandalism",
            Self::Fraud => "Fraud",
            Self::Harassment => "Harassment",
            Self::Suspicious => "Suspicious Activity",
            Self::Other => "Other",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Theft,
            Self::Burglary,
            Self::Assault,
            Self::Vandalism,
            Self::Fraud,
            Self::Harassment,
            Self::Suspicious,
            Self::Other,
        ]
    }
}

/// Lifecycle status of a report.
///
/// Every status is reachable from every other one. `Resolved` is not
/// terminal; a resolved case can be reopened.
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
pub enum ReportStatus {
    /// Submitted, not yet picked up
    Pending,
    /// Being worked by police
    Investigating,
    /// Closed out
    Resolved,
}

impl ReportStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::Investigating, Self::Resolved]
    }
}

/// A stored crime report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique, immutable identifier.
    pub id: u64,
    /// Short title.
    pub title: String,
    /// Free-text account of the incident.
    pub description: String,
    /// Where it happened, as typed by the submitter.
    pub location: String,
    /// Latitude, when captured via geolocation.
    pub latitude: Option<f64>,
    /// Longitude, when captured via geolocation.
    pub longitude: Option<f64>,
    /// Kind of incident.
    #[serde(rename = "type")]
    pub crime_type: CrimeType,
    /// Date the incident occurred.
    pub date: NaiveDate,
    /// Time of day the incident occurred.
    pub time: NaiveTime,
    /// Current lifecycle status.
    pub status: ReportStatus,
    /// ID of the submitting user.
    pub user_id: u64,
    /// When the report was submitted.
    pub created_at: DateTime<Utc>,
    /// When the report was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Submission input for a new report.
///
/// Required fields are optional here so that validation can report every
/// missing field at once instead of failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
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
    /// Kind of incident.
    #[serde(rename = "type")]
    pub crime_type: Option<CrimeType>,
    /// Date the incident occurred.
    pub date: Option<NaiveDate>,
    /// Time of day the incident occurred.
    pub time: Option<NaiveTime>,
    /// ID of the submitting user.
    pub user_id: u64,
}

/// Per-field validation messages, keyed by the camelCase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates an empty set of field errors.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Returns the message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has a message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with a message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Predicates narrowing a report listing. All present predicates must match.
///
/// The `with_*` methods and [`ReportFilter::parse`] store `search` trimmed
/// and lower-cased. Matching normalizes it again, so filters built as
/// struct literals or deserialized directly behave the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    /// Exact status match.
    pub status: Option<ReportStatus>,
    /// Exact type match.
    #[serde(rename = "type")]
    pub crime_type: Option<CrimeType>,
    /// Inclusive lower bound on the incident date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the incident date.
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring over title, description, and location.
    pub search: Option<String>,
}

impl ReportFilter {
    /// Restricts to reports with `status`.
    #[must_use]
    pub const fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to reports of `crime_type`.
    #[must_use]
    pub const fn with_type(mut self, crime_type: CrimeType) -> Self {
        self.crime_type = Some(crime_type);
        self
    }

    /// Restricts to incidents on or after `date`.
    #[must_use]
    pub const fn with_date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    /// Restricts to incidents on or before `date`.
    #[must_use]
    pub const fn with_date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    /// Restricts to reports mentioning `term`. A blank term clears the
    /// predicate.
    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        self.search = normalize_search(term);
        self
    }

    /// Whether no predicate is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.crime_type.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.search.is_none()
    }

    /// Builds a filter from raw query-string values.
    ///
    /// Missing values, empty strings, and the `all` sentinel mean "no
    /// predicate". An inverted date range is accepted and simply matches
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every value that failed to parse.
    pub fn parse(
        status: Option<&str>,
        crime_type: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let status = parse_choice(status, "status", "Unknown status", &mut errors);
        let crime_type = parse_choice(crime_type, "type", "Unknown crime type", &mut errors);
        let date_from = parse_date(date_from, "dateFrom", &mut errors);
        let date_to = parse_date(date_to, "dateTo", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            status,
            crime_type,
            date_from,
            date_to,
            search: search.and_then(normalize_search),
        })
    }
}

/// Trims and lower-cases a search term, dropping blank terms.
#[must_use]
pub fn normalize_search(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Whether a raw query value means "no predicate".
#[must_use]
pub fn is_unset(raw: Option<&str>) -> bool {
    raw.is_none_or(|s| {
        let s = s.trim();
        s.is_empty() || s.eq_ignore_ascii_case("all")
    })
}

/// Parses an optional enum-valued query parameter, recording `message` under
/// `field` when the value is not recognized.
pub fn parse_choice<T: std::str::FromStr>(
    raw: Option<&str>,
    field: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    if is_unset(raw) {
        return None;
    }
    let raw = raw?.trim();
    raw.parse().map_or_else(
        |_| {
            errors.insert(field, format!("{message}: {raw}"));
            None
        },
        Some,
    )
}

/// Parses an optional `YYYY-MM-DD` query parameter.
pub fn parse_date(raw: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    if is_unset(raw) {
        return None;
    }
    let raw = raw?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_or_else(
        |_| {
            errors.insert(field, format!("Invalid date: {raw}"));
            None
        },
        Some,
    )
}

/// Count of reports for a single crime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    /// Crime type.
    #[serde(rename = "type")]
    pub crime_type: CrimeType,
    /// Number of reports.
    pub count: u64,
}

/// Dashboard summary over the reports a viewer can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    /// All visible reports.
    pub total_reports: u64,
    /// Reports still pending.
    pub pending_reports: u64,
    /// Reports under investigation.
    pub investigating_reports: u64,
    /// Resolved reports.
    pub resolved_reports: u64,
    /// One entry per [`CrimeType`], in [`CrimeType::all`] order.
    pub by_type: Vec<TypeCount>,
}
