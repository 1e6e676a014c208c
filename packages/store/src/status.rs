//! Status transitions, the only path that changes a report's status.
//!
//! Transitions are unrestricted: any status may follow any other, including
//! itself, and resolved cases may be reopened. What is restricted is who may
//! make them.

use crime_portal_report_models::{Report, ReportStatus};
use crime_portal_user_models::User;

use crate::{ReportError, ReportPatch, ReportStore};

/// Moves report `id` to `new_status` on behalf of `actor`.
///
/// The role check happens before the lookup, so unauthorized actors learn
/// nothing about which IDs exist. Setting the current status again is a
/// valid transition and still refreshes `updatedAt`.
///
/// # Errors
///
/// * [`ReportError::NotAuthorized`] unless `actor` is police or admin.
/// * [`ReportError::NotFound`] if no report has that ID.
pub fn transition(
    store: &ReportStore,
    id: u64,
    new_status: ReportStatus,
    actor: &User,
) -> Result<Report, ReportError> {
    if !actor.role.can_change_status() {
        log::warn!(
            "User {} ({}) attempted to set report {id} to {new_status}",
            actor.id,
            actor.role
        );
        return Err(ReportError::NotAuthorized {
            user_id: actor.id,
            role: actor.role,
            action: "change report status",
        });
    }

    let report = store.update(id, ReportPatch::status(new_status))?;
    log::info!("Report {id} set to {new_status} by user {}", actor.id);
    Ok(report)
}

/// The statuses a UI should offer for `report`: every status except the
/// current one.
#[must_use]
pub fn available_transitions(report: &Report) -> Vec<ReportStatus> {
    ReportStatus::all()
        .iter()
        .copied()
        .filter(|status| *status != report.status)
        .collect()
}

#[cfg(test)]
mod tests {
    use crime_portal_user_models::Role;

    use super::*;
    use crate::query::tests::{sample_store, user};

    #[test]
    fn police_can_resolve_then_reopen() {
        let store = sample_store();
        let police = user(2, Role::Police);
        let before = store.get(2).unwrap();

        let resolved = transition(&store, 2, ReportStatus::Resolved, &police).unwrap();
        assert_eq!(resolved.status, ReportStatus::Resolved);
        assert!(resolved.updated_at > before.updated_at);

        let reopened = transition(&store, 2, ReportStatus::Pending, &police).unwrap();
        assert_eq!(reopened.status, ReportStatus::Pending);
        assert!(reopened.updated_at > resolved.updated_at);
        assert!(reopened.updated_at >= reopened.created_at);
    }

    #[test]
    fn admin_can_transition() {
        let store = sample_store();
        let report = transition(&store, 1, ReportStatus::Resolved, &user(3, Role::Admin)).unwrap();
        assert_eq!(store.get(1).unwrap(), report);
    }

    #[test]
    fn citizen_is_not_authorized_even_for_own_report() {
        let store = sample_store();
        let citizen = user(1, Role::Citizen);
        for status in ReportStatus::all() {
            assert!(matches!(
                transition(&store, 1, *status, &citizen),
                Err(ReportError::NotAuthorized { user_id: 1, .. })
            ));
        }
        assert_eq!(store.get(1).unwrap().status, ReportStatus::Investigating);
    }

    #[test]
    fn citizen_check_precedes_lookup() {
        let store = sample_store();
        assert!(matches!(
            transition(&store, 999, ReportStatus::Resolved, &user(1, Role::Citizen)),
            Err(ReportError::NotAuthorized { .. })
        ));
    }

    #[test]
    fn unknown_report_is_not_found() {
        let store = sample_store();
        assert!(matches!(
            transition(&store, 999, ReportStatus::Resolved, &user(2, Role::Police)),
            Err(ReportError::NotFound { id: 999 })
        ));
    }

    #[test]
    fn same_status_is_idempotent_but_restamps() {
        let store = sample_store();
        let before = store.get(3).unwrap();
        let after = transition(&store, 3, before.status, &user(2, Role::Police)).unwrap();
        assert_eq!(after.status, before.status);
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn every_pair_of_statuses_is_reachable() {
        let store = sample_store();
        let police = user(2, Role::Police);
        for from in ReportStatus::all() {
            for to in ReportStatus::all() {
                transition(&store, 4, *from, &police).unwrap();
                assert_eq!(transition(&store, 4, *to, &police).unwrap().status, *to);
            }
        }
    }

    #[test]
    fn available_transitions_exclude_current() {
        let store = sample_store();
        let report = store.get(1).unwrap();
        assert_eq!(
            available_transitions(&report),
            vec![ReportStatus::Pending, ReportStatus::Resolved]
        );
    }
}
