//! Seed reports baked into the binary.
//!
//! `fixtures/reports.toml` is embedded at compile time via [`include_str!`]
//! and parsed on demand.

use crime_portal_report_models::Report;
use serde::Deserialize;

use crate::ReportError;

const REPORTS_TOML: &str = include_str!("../fixtures/reports.toml");

#[derive(Deserialize)]
struct ReportFixtures {
    reports: Vec<Report>,
}

/// Parses a `[[reports]]` TOML document.
///
/// # Errors
///
/// Returns [`ReportError::Fixture`] if the document does not parse, or if a
/// report's `updatedAt` precedes its `createdAt`.
pub fn parse_reports_toml(toml_str: &str) -> Result<Vec<Report>, ReportError> {
    let fixtures: ReportFixtures =
        toml::de::from_str(toml_str).map_err(|e| ReportError::Fixture {
            message: e.to_string(),
        })?;

    if let Some(bad) = fixtures
        .reports
        .iter()
        .find(|r| r.updated_at < r.created_at)
    {
        return Err(ReportError::Fixture {
            message: format!("report {} was updated before it was created", bad.id),
        });
    }

    Ok(fixtures.reports)
}

/// The embedded seed reports.
///
/// # Errors
///
/// Returns [`ReportError::Fixture`] if the embedded TOML is malformed.
pub fn seed_reports() -> Result<Vec<Report>, ReportError> {
    parse_reports_toml(REPORTS_TOML)
}

#[cfg(test)]
mod tests {
    use crime_portal_report_models::{CrimeType, ReportStatus};

    use super::*;

    #[test]
    fn embedded_reports_parse() {
        let reports = seed_reports().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].crime_type, CrimeType::Theft);
        assert_eq!(reports[0].status, ReportStatus::Investigating);
        assert_eq!(reports[0].time.to_string(), "14:30:00");
        assert_eq!(reports[2].user_id, 2);
    }

    #[test]
    fn rejects_updated_before_created() {
        let toml_str = r#"
            [[reports]]
            id = 9
            title = "t"
            description = "d"
            location = "l"
            type = "other"
            date = "2023-01-01"
            time = "00:00:00"
            status = "Pending"
            userId = 1
            createdAt = "2023-01-02T00:00:00Z"
            updatedAt = "2023-01-01T00:00:00Z"
        "#;
        assert!(matches!(
            parse_reports_toml(toml_str),
            Err(ReportError::Fixture { .. })
        ));
    }

    #[test]
    fn rejects_unknown_type() {
        let toml_str = r#"
            [[reports]]
            id = 9
            title = "t"
            description = "d"
            location = "l"
            type = "arson"
            date = "2023-01-01"
            time = "00:00:00"
            status = "Pending"
            userId = 1
            createdAt = "2023-01-01T00:00:00Z"
            updatedAt = "2023-01-01T00:00:00Z"
        "#;
        assert!(parse_reports_toml(toml_str).is_err());
    }
}
