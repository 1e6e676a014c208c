//! Role-scoped, filtered, newest-first report listings.
//!
//! Scoping is applied here and nowhere else: every caller that lists or
//! reads reports on behalf of a user goes through this module.

use std::cmp::Reverse;

use crime_portal_report_models::{Report, ReportFilter, normalize_search};
use crime_portal_user_models::User;

use crate::{ReportError, ReportStore};

/// Number of reports on the dashboard's "recent" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Whether `viewer` may see `report`. Citizens see only their own reports;
/// police and admins see everything.
#[must_use]
pub const fn is_visible_to(report: &Report, viewer: &User) -> bool {
    viewer.role.sees_all_reports() || report.user_id == viewer.id
}

/// Whether `report` satisfies every predicate in `filter`.
///
/// The date bounds are inclusive and compare against the incident date, not
/// the submission time. An inverted range matches nothing.
#[must_use]
pub fn matches_filter(report: &Report, filter: &ReportFilter) -> bool {
    if filter.status.is_some_and(|status| report.status != status) {
        return false;
    }
    if filter
        .crime_type
        .is_some_and(|crime_type| report.crime_type != crime_type)
    {
        return false;
    }
    if filter.date_from.is_some_and(|from| report.date < from) {
        return false;
    }
    if filter.date_to.is_some_and(|to| report.date > to) {
        return false;
    }
    filter
        .search
        .as_deref()
        .and_then(normalize_search)
        .is_none_or(|term| mentions(report, &term))
}

/// Case-insensitive substring match against title, description, or
/// location. `term` must already be lower-cased.
fn mentions(report: &Report, term: &str) -> bool {
    [&report.title, &report.description, &report.location]
        .into_iter()
        .any(|field| field.to_lowercase().contains(term))
}

/// Orders reports newest `createdAt` first, breaking ties by descending ID.
pub fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by_key(|report| (Reverse(report.created_at), Reverse(report.id)));
}

/// Lists the reports `viewer` may see that match `filter`, newest first.
///
/// An empty filter returns the viewer's whole scope.
#[must_use]
pub fn query_reports(store: &ReportStore, viewer: &User, filter: &ReportFilter) -> Vec<Report> {
    let mut reports: Vec<Report> = store
        .all()
        .into_iter()
        .filter(|report| is_visible_to(report, viewer))
        .filter(|report| matches_filter(report, filter))
        .collect();

    sort_newest_first(&mut reports);

    log::debug!(
        "Query by user {} ({}) matched {} report(s)",
        viewer.id,
        viewer.role,
        reports.len()
    );
    reports
}

/// The `limit` newest reports `viewer` may see.
#[must_use]
pub fn recent_reports(store: &ReportStore, viewer: &User, limit: usize) -> Vec<Report> {
    let mut reports = query_reports(store, viewer, &ReportFilter::default());
    reports.truncate(limit);
    reports
}

/// Reads one report on behalf of `viewer`.
///
/// A report outside the viewer's scope is reported as not found, so its
/// existence is not revealed.
///
/// # Errors
///
/// Returns [`ReportError::NotFound`] if the report does not exist or is not
/// visible to `viewer`.
pub fn get_visible_report(
    store: &ReportStore,
    viewer: &User,
    id: u64,
) -> Result<Report, ReportError> {
    let report = store.get(id)?;
    if is_visible_to(&report, viewer) {
        Ok(report)
    } else {
        log::warn!(
            "User {} tried to read report {id} outside their scope",
            viewer.id
        );
        Err(ReportError::NotFound { id })
    }
}
