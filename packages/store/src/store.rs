//! The in-memory report collection.
//!
//! A single [`RwLock`] guards the whole collection: writers are serialized,
//! readers clone a consistent snapshot and never observe a half-applied
//! patch.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use crime_portal_clock::{Clock, SystemClock};
use crime_portal_report_models::{Report, ReportStatus};

use crate::ReportError;
use crate::submit::ValidDraft;

/// Field-level changes applied by [`ReportStore::update`].
///
/// Identity fields (`id`, `userId`, `createdAt`) are not patchable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportPatch {
    /// New lifecycle status.
    pub status: Option<ReportStatus>,
}

impl ReportPatch {
    /// A patch that only sets the status.
    #[must_use]
    pub const fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    fn apply(self, report: &mut Report) {
        if let Some(status) = self.status {
            report.status = status;
        }
    }
}

/// Owner of every stored [`Report`], keyed by ID.
#[derive(Debug)]
pub struct ReportStore {
    reports: RwLock<BTreeMap<u64, Report>>,
    clock: Arc<dyn Clock>,
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportStore {
    /// Creates an empty store stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            reports: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    /// Loads pre-existing reports, replacing any with the same ID.
    #[must_use]
    pub fn with_reports(self, reports: impl IntoIterator<Item = Report>) -> Self {
        {
            let mut guard = self.write();
            for report in reports {
                guard.insert(report.id, report);
            }
        }
        self
    }

    /// Current time according to the store's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Stores a validated draft as a new `Pending` report.
    ///
    /// The new ID is one past the largest existing ID, or `1` for an empty
    /// store. ID allocation and insertion happen under the same write lock.
    pub fn insert(&self, draft: ValidDraft) -> Report {
        let now = self.clock.now();
        let mut guard = self.write();
        let id = guard.keys().next_back().map_or(1, |max| max + 1);

        let report = Report {
            id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            latitude: draft.latitude,
            longitude: draft.longitude,
            crime_type: draft.crime_type,
            date: draft.date,
            time: draft.time,
            status: ReportStatus::Pending,
            user_id: draft.user_id,
            created_at: now,
            updated_at: now,
        };
        guard.insert(id, report.clone());

        log::debug!("Inserted report {id} for user {}", report.user_id);
        report
    }

    /// Returns a copy of the report with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NotFound`] if no report has that ID.
    pub fn get(&self, id: u64) -> Result<Report, ReportError> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(ReportError::NotFound { id })
    }

    /// Applies `patch` to the report with `id` and stamps `updatedAt`.
    ///
    /// `updatedAt` never moves backwards, even if the clock does.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NotFound`] if no report has that ID.
    pub fn update(&self, id: u64, patch: ReportPatch) -> Result<Report, ReportError> {
        let now = self.clock.now();
        let mut guard = self.write();
        let report = guard.get_mut(&id).ok_or(ReportError::NotFound { id })?;

        patch.apply(report);
        report.updated_at = now.max(report.updated_at).max(report.created_at);

        Ok(report.clone())
    }

    /// Returns a snapshot of every report, in ID order.
    #[must_use]
    pub fn all(&self) -> Vec<Report> {
        self.read().values().cloned().collect()
    }

    /// Number of stored reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no reports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of reports submitted by `user_id`.
    #[must_use]
    pub fn count_for_user(&self, user_id: u64) -> usize {
        self.read()
            .values()
            .filter(|report| report.user_id == user_id)
            .count()
    }

    // Every mutation is a single assignment under the lock, so a poisoned
    // lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, Report>> {
        self.reports.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, Report>> {
        self.reports.write().unwrap_or_else(PoisonError::into_inner)
    }
}
