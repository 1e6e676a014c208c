//! Admin-only account management: list, add, activate/deactivate, re-role.

use crime_portal_user_models::{NewUser, Role, User, UserFilter, UserStatus};

use crate::{IdentityError, UserDirectory};

fn require_admin(actor: &User, action: &'static str) -> Result<(), IdentityError> {
    if actor.role.can_manage_users() {
        Ok(())
    } else {
        log::warn!("User {} ({}) attempted to {action}", actor.id, actor.role);
        Err(IdentityError::NotAuthorized {
            user_id: actor.id,
            role: actor.role,
            action,
        })
    }
}

/// Admins may not lock themselves out of user management.
fn refuse_self_lockout(actor: &User, action: &'static str) -> IdentityError {
    log::warn!("Admin {} attempted to {action}", actor.id);
    IdentityError::NotAuthorized {
        user_id: actor.id,
        role: actor.role,
        action,
    }
}

impl UserDirectory {
    /// Users matching `filter`, in ID order.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotAuthorized`] unless `actor` is an admin.
    pub fn list_users(
        &self,
        actor: &User,
        filter: &UserFilter,
    ) -> Result<Vec<User>, IdentityError> {
        require_admin(actor, "list users")?;
        Ok(self
            .read()
            .by_id
            .values()
            .map(|account| &account.user)
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }

    /// Creates an active account with the chosen `role`.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::NotAuthorized`] unless `actor` is an admin.
    /// * [`IdentityError::Validation`] if the form is incomplete.
    /// * [`IdentityError::EmailTaken`] if the email is already registered.
    pub fn add_user(
        &self,
        actor: &User,
        new_user: NewUser,
        role: Role,
    ) -> Result<User, IdentityError> {
        require_admin(actor, "add users")?;
        let user = self.create_account(new_user, role)?;
        log::info!("Admin {} added user {} as {role}", actor.id, user.id);
        Ok(user)
    }

    /// Activates or deactivates an account. Deactivating revokes the
    /// account's sessions.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::NotAuthorized`] unless `actor` is an admin, or if
    ///   `actor` tries to deactivate their own account.
    /// * [`IdentityError::NotFound`] if no user has that ID.
    pub fn set_user_status(
        &self,
        actor: &User,
        id: u64,
        status: UserStatus,
    ) -> Result<User, IdentityError> {
        require_admin(actor, "change user status")?;
        if id == actor.id && status == UserStatus::Inactive {
            return Err(refuse_self_lockout(actor, "deactivate their own account"));
        }
        let mut accounts = self.write();
        let account = accounts
            .by_id
            .get_mut(&id)
            .ok_or(IdentityError::NotFound { id })?;
        account.user.status = status;
        let user = account.user.clone();

        if status == UserStatus::Inactive {
            accounts.revoke_sessions_for(id);
        }

        log::info!("Admin {} set user {id} to {status}", actor.id);
        Ok(user)
    }

    /// Changes an account's role. Existing sessions pick up the new role on
    /// their next request.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::NotAuthorized`] unless `actor` is an admin, or if
    ///   `actor` tries to give up their own admin role.
    /// * [`IdentityError::NotFound`] if no user has that ID.
    pub fn set_user_role(&self, actor: &User, id: u64, role: Role) -> Result<User, IdentityError> {
        require_admin(actor, "change user roles")?;
        if id == actor.id && !role.can_manage_users() {
            return Err(refuse_self_lockout(actor, "revoke their own admin role"));
        }
        let mut accounts = self.write();
        let account = accounts
            .by_id
            .get_mut(&id)
            .ok_or(IdentityError::NotFound { id })?;
        account.user.role = role;

        log::info!("Admin {} made user {id} {role}", actor.id);
        Ok(account.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::tests::{new_user, seeded};

    fn admin(directory: &UserDirectory) -> User {
        directory.get(3).unwrap()
    }

    #[test]
    fn admin_lists_with_filters() {
        let directory = seeded();
        let admin = admin(&directory);

        let all = directory.list_users(&admin, &UserFilter::default()).unwrap();
        assert_eq!(all.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);

        let police = UserFilter::parse(None, Some("police"), Some("active")).unwrap();
        let found = directory.list_users(&admin, &police).unwrap();
        assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 5]);

        let search = UserFilter::parse(Some("emily"), None, None).unwrap();
        assert_eq!(directory.list_users(&admin, &search).unwrap().len(), 1);
    }

    #[test]
    fn non_admins_cannot_manage_users() {
        let directory = seeded();
        for id in [1, 2] {
            let actor = directory.get(id).unwrap();
            assert!(matches!(
                directory.list_users(&actor, &UserFilter::default()),
                Err(IdentityError::NotAuthorized { .. })
            ));
            assert!(matches!(
                directory.set_user_status(&actor, 1, UserStatus::Inactive),
                Err(IdentityError::NotAuthorized { .. })
            ));
            assert!(matches!(
                directory.add_user(&actor, new_user("x@example.com"), Role::Admin),
                Err(IdentityError::NotAuthorized { .. })
            ));
        }
    }

    #[test]
    fn admin_adds_user_with_role() {
        let directory = seeded();
        let user = directory
            .add_user(&admin(&directory), new_user("officer@example.com"), Role::Police)
            .unwrap();
        assert_eq!(user.id, 6);
        assert_eq!(user.role, Role::Police);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn deactivating_revokes_sessions() {
        let directory = seeded();
        let session = directory.login("john@example.com", "password123").unwrap();
        let user = directory
            .set_user_status(&admin(&directory), 1, UserStatus::Inactive)
            .unwrap();
        assert_eq!(user.status, UserStatus::Inactive);
        assert!(directory.resolve(&session.token).is_err());

        directory
            .set_user_status(&admin(&directory), 1, UserStatus::Active)
            .unwrap();
        assert!(directory.login("john@example.com", "password123").is_ok());
    }

    #[test]
    fn role_change_applies_to_live_session() {
        let directory = seeded();
        let session = directory.login("john@example.com", "password123").unwrap();
        directory
            .set_user_role(&admin(&directory), 1, Role::Police)
            .unwrap();
        assert_eq!(directory.resolve(&session.token).unwrap().role, Role::Police);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let directory = seeded();
        assert!(matches!(
            directory.set_user_role(&admin(&directory), 42, Role::Admin),
            Err(IdentityError::NotFound { id: 42 })
        ));
    }

    #[test]
    fn admin_cannot_deactivate_or_demote_themselves() {
        let directory = seeded();
        let admin = admin(&directory);
        let session = directory.login("admin@example.com", "password123").unwrap();

        assert!(matches!(
            directory.set_user_status(&admin, admin.id, UserStatus::Inactive),
            Err(IdentityError::NotAuthorized { .. })
        ));
        for role in [Role::Citizen, Role::Police] {
            assert!(matches!(
                directory.set_user_role(&admin, admin.id, role),
                Err(IdentityError::NotAuthorized { .. })
            ));
        }

        let unchanged = directory.resolve(&session.token).unwrap();
        assert_eq!(unchanged.role, Role::Admin);
        assert_eq!(unchanged.status, UserStatus::Active);

        assert!(directory.set_user_status(&admin, admin.id, UserStatus::Active).is_ok());
        assert!(directory.set_user_role(&admin, admin.id, Role::Admin).is_ok());
    }
}
