//! Report submission: required-field validation followed by insertion.

use chrono::{NaiveDate, NaiveTime};
use crime_portal_report_models::{CrimeType, FieldErrors, Report, ReportDraft};

use crate::{ReportError, ReportStore};

/// A draft whose required fields are all present.
///
/// Only [`validate_draft`] produces one, so [`ReportStore::insert`] cannot
/// store an incomplete report.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) location: String,
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
    pub(crate) crime_type: CrimeType,
    pub(crate) date: NaiveDate,
    pub(crate) time: NaiveTime,
    pub(crate) user_id: u64,
}

/// Checks that title, description, type, date, and time are present, and
/// that a location is given unless both coordinates were captured.
///
/// Text fields are trimmed. When the location is blank but coordinates are
/// present, the location is rendered from the coordinates.
///
/// # Errors
///
/// Returns [`ReportError::Validation`] listing every missing field.
pub fn validate_draft(draft: ReportDraft) -> Result<ValidDraft, ReportError> {
    let mut errors = FieldErrors::new();

    let title = draft.title.trim().to_string();
    let description = draft.description.trim().to_string();
    let mut location = draft.location.trim().to_string();

    if title.is_empty() {
        errors.insert("title", "Title is required");
    }
    if description.is_empty() {
        errors.insert("description", "Description is required");
    }
    if location.is_empty() {
        match (draft.latitude, draft.longitude) {
            (Some(lat), Some(lng)) => location = format!("{lat:.4}, {lng:.4}"),
            _ => errors.insert("location", "Location is required"),
        }
    }
    if draft.crime_type.is_none() {
        errors.insert("type", "Crime type is required");
    }
    if draft.date.is_none() {
        errors.insert("date", "Date is required");
    }
    if draft.time.is_none() {
        errors.insert("time", "Time is required");
    }
    if draft
        .latitude
        .is_some_and(|lat| !(-90.0..=90.0).contains(&lat))
    {
        errors.insert("latitude", "Latitude must be between -90 and 90");
    }
    if draft
        .longitude
        .is_some_and(|lng| !(-180.0..=180.0).contains(&lng))
    {
        errors.insert("longitude", "Longitude must be between -180 and 180");
    }

    match (draft.crime_type, draft.date, draft.time) {
        (Some(crime_type), Some(date), Some(time)) if errors.is_empty() => Ok(ValidDraft {
            title,
            description,
            location,
            latitude: draft.latitude,
            longitude: draft.longitude,
            crime_type,
            date,
            time,
            user_id: draft.user_id,
        }),
        _ => Err(ReportError::Validation(errors)),
    }
}

/// Validates `draft` and stores it as a new `Pending` report.
///
/// # Errors
///
/// Returns [`ReportError::Validation`] if required fields are missing; the
/// store is left untouched.
pub fn submit_report(store: &ReportStore, draft: ReportDraft) -> Result<Report, ReportError> {
    let valid = validate_draft(draft).inspect_err(|e| {
        log::debug!("Rejected report submission: {e}");
    })?;
    let report = store.insert(valid);
    log::info!(
        "Report {} submitted by user {} ({})",
        report.id,
        report.user_id,
        report.crime_type
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ReportDraft {
        ReportDraft {
            title: "Stolen Bicycle".to_string(),
            description: "Taken from outside the library".to_string(),
            location: "123 Main St".to_string(),
            crime_type: Some(CrimeType::Theft),
            date: NaiveDate::from_ymd_opt(2023, 4, 15),
            time: NaiveTime::from_hms_opt(14, 30, 0),
            user_id: 1,
            ..ReportDraft::default()
        }
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let Err(ReportError::Validation(errors)) = validate_draft(ReportDraft::default()) else {
            panic!("expected validation error");
        };
        for field in ["title", "description", "location", "type", "date", "time"] {
            assert!(errors.contains(field), "missing {field}");
        }
    }

    #[test]
    fn whitespace_only_title_is_missing() {
        let draft = ReportDraft {
            title: "   ".to_string(),
            ..complete()
        };
        let Err(ReportError::Validation(errors)) = validate_draft(draft) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("title"), Some("Title is required"));
    }

    #[test]
    fn coordinates_stand_in_for_location() {
        let draft = ReportDraft {
            location: String::new(),
            latitude: Some(40.7128),
            longitude: Some(-74.006),
            ..complete()
        };
        let valid = validate_draft(draft).unwrap();
        assert_eq!(valid.location, "40.7128, -74.0060");
    }

    #[test]
    fn one_coordinate_is_not_enough() {
        let draft = ReportDraft {
            location: String::new(),
            latitude: Some(40.7128),
            ..complete()
        };
        assert!(matches!(
            validate_draft(draft),
            Err(ReportError::Validation(errors)) if errors.contains("location")
        ));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let draft = ReportDraft {
            latitude: Some(91.0),
            longitude: Some(0.0),
            ..complete()
        };
        assert!(matches!(
            validate_draft(draft),
            Err(ReportError::Validation(errors)) if errors.contains("latitude")
        ));
    }

    #[test]
    fn submit_stores_pending_report() {
        let store = ReportStore::new();
        let report = submit_report(&store, complete()).unwrap();
        assert_eq!(report.id, 1);
        assert_eq!(report.title, "Stolen Bicycle");
        assert_eq!(store.get(1).unwrap(), report);
    }

    #[test]
    fn failed_submit_leaves_store_untouched() {
        let store = ReportStore::new();
        assert!(submit_report(&store, ReportDraft::default()).is_err());
        assert!(store.is_empty());
    }
}
