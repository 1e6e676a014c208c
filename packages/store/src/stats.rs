//! Dashboard counts over the reports a viewer can see.

use crime_portal_report_models::{CrimeType, ReportFilter, ReportStats, ReportStatus, TypeCount};
use crime_portal_user_models::User;

use crate::ReportStore;
use crate::query::query_reports;

/// Counts `viewer`'s visible reports by status and by crime type.
///
/// Every [`CrimeType`] appears in `by_type`, with zero when there are none.
#[must_use]
pub fn report_stats(store: &ReportStore, viewer: &User) -> ReportStats {
    let reports = query_reports(store, viewer, &ReportFilter::default());

    let count_status = |status: ReportStatus| -> u64 {
        reports.iter().filter(|r| r.status == status).count() as u64
    };

    let by_type = CrimeType::all()
        .iter()
        .map(|crime_type| TypeCount {
            crime_type: *crime_type,
            count: reports
                .iter()
                .filter(|r| r.crime_type == *crime_type)
                .count() as u64,
        })
        .collect();

    ReportStats {
        total_reports: reports.len() as u64,
        pending_reports: count_status(ReportStatus::Pending),
        investigating_reports: count_status(ReportStatus::Investigating),
        resolved_reports: count_status(ReportStatus::Resolved),
        by_type,
    }
}
