//! User accounts and bearer-token sessions.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use crime_portal_clock::{Clock, SystemClock};
use crime_portal_user_models::{NewUser, Role, User, UserStatus};

use crate::password::PasswordHash;
use crate::{IdentityError, Session};

/// A user plus their stored password.
#[derive(Debug, Clone)]
pub(crate) struct Account {
    pub(crate) user: User,
    pub(crate) password: PasswordHash,
}

/// How long a bearer token resolves after it was issued.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Live tokens one user may hold; signing in again past this drops the
/// oldest.
pub const MAX_SESSIONS_PER_USER: usize = 8;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionEntry {
    pub(crate) user_id: u64,
    pub(crate) issued_at: DateTime<Utc>,
}

impl SessionEntry {
    fn is_live(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now < self.issued_at + ttl
    }
}

#[derive(Debug, Default)]
pub(crate) struct Accounts {
    pub(crate) by_id: BTreeMap<u64, Account>,
    pub(crate) sessions: HashMap<String, SessionEntry>,
}

impl Accounts {
    pub(crate) fn email_taken(&self, email: &str) -> bool {
        self.by_id
            .values()
            .any(|account| account.user.email == email)
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.by_id.keys().next_back().map_or(1, |max| max + 1)
    }

    pub(crate) fn revoke_sessions_for(&mut self, user_id: u64) {
        self.sessions.retain(|_, session| session.user_id != user_id);
    }

    /// Issues a token for `user_id`, first pruning expired sessions and
    /// then the user's oldest ones beyond [`MAX_SESSIONS_PER_USER`].
    fn start_session(&mut self, user_id: u64, now: DateTime<Utc>, ttl: Duration) -> String {
        self.sessions.retain(|_, session| session.is_live(now, ttl));

        let mut held: Vec<(DateTime<Utc>, String)> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.user_id == user_id)
            .map(|(token, session)| (session.issued_at, token.clone()))
            .collect();
        if held.len() >= MAX_SESSIONS_PER_USER {
            held.sort();
            let excess = held.len() + 1 - MAX_SESSIONS_PER_USER;
            for (_, token) in held.into_iter().take(excess) {
                self.sessions.remove(&token);
            }
            log::debug!("Dropped {excess} oldest session(s) of user {user_id}");
        }

        let token = new_token();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                user_id,
                issued_at: now,
            },
        );
        token
    }
}

/// Emails are compared trimmed and lower-cased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Owner of user accounts and active sessions.
#[derive(Debug)]
pub struct UserDirectory {
    pub(crate) accounts: RwLock<Accounts>,
    pub(crate) clock: Arc<dyn Clock>,
    session_ttl: Duration,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    /// Creates an empty directory stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty directory stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: RwLock::new(Accounts::default()),
            clock,
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    /// Sets how long tokens resolve after sign-in.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Loads pre-existing users with their plain-text passwords, which are
    /// hashed on the way in.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::PasswordHash`] if a password cannot be
    /// hashed.
    pub fn with_users(
        self,
        users: impl IntoIterator<Item = (User, String)>,
    ) -> Result<Self, IdentityError> {
        {
            let mut accounts = self.write();
            for (mut user, password) in users {
                user.email = normalize_email(&user.email);
                let password = PasswordHash::new(&password)?;
                accounts.by_id.insert(user.id, Account { user, password });
            }
        }
        Ok(self)
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::InvalidCredentials`] for an unknown email or a
    ///   wrong password.
    /// * [`IdentityError::AccountInactive`] if the account is disabled.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let email = normalize_email(email);
        let now = self.clock.now();
        let mut accounts = self.write();

        let account = accounts
            .by_id
            .values()
            .find(|account| account.user.email == email)
            .filter(|account| account.password.verify(password))
            .ok_or_else(|| {
                log::debug!("Failed login for {email}");
                IdentityError::InvalidCredentials
            })?;

        if account.user.status == UserStatus::Inactive {
            return Err(IdentityError::AccountInactive { email });
        }

        let user = account.user.clone();
        let token = accounts.start_session(user.id, now, self.session_ttl);

        log::info!("User {} signed in", user.id);
        Ok(Session { user, token })
    }

    /// Creates a citizen account and signs it in.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::Validation`] if the form is incomplete.
    /// * [`IdentityError::EmailTaken`] if the email is already registered.
    pub fn register(&self, new_user: NewUser) -> Result<Session, IdentityError> {
        let user = self.create_account(new_user, Role::Citizen)?;
        let now = self.clock.now();
        let token = self.write().start_session(user.id, now, self.session_ttl);

        log::info!("User {} registered", user.id);
        Ok(Session { user, token })
    }

    /// Ends the session identified by `token`. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) {
        if let Some(session) = self.write().sessions.remove(token) {
            log::info!("User {} signed out", session.user_id);
        }
    }

    /// Resolves a bearer token to its user.
    ///
    /// Sessions of accounts deactivated since sign-in no longer resolve,
    /// nor do sessions older than the session TTL.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unauthenticated`] for an unknown, expired,
    /// or revoked token.
    pub fn resolve(&self, token: &str) -> Result<User, IdentityError> {
        let now = self.clock.now();
        let accounts = self.read();
        accounts
            .sessions
            .get(token)
            .filter(|session| session.is_live(now, self.session_ttl))
            .and_then(|session| accounts.by_id.get(&session.user_id))
            .map(|account| account.user.clone())
            .filter(|user| user.status == UserStatus::Active)
            .ok_or(IdentityError::Unauthenticated)
    }

    /// The session for `token`, or `None` if it does not resolve.
    #[must_use]
    pub fn session(&self, token: &str) -> Option<Session> {
        self.resolve(token).ok().map(|user| Session {
            user,
            token: token.to_string(),
        })
    }

    /// Looks up a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] if no user has that ID.
    pub fn get(&self, id: u64) -> Result<User, IdentityError> {
        self.read()
            .by_id
            .get(&id)
            .map(|account| account.user.clone())
            .ok_or(IdentityError::NotFound { id })
    }

    /// Number of live and not yet pruned sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.read().sessions.len()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    /// Whether there are no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().by_id.is_empty()
    }

    /// Validates `new_user` and stores it as an active account with `role`.
    pub(crate) fn create_account(
        &self,
        new_user: NewUser,
        role: Role,
    ) -> Result<User, IdentityError> {
        new_user.validate().map_err(IdentityError::Validation)?;
        let password = PasswordHash::new(&new_user.password)?;

        let email = normalize_email(&new_user.email);
        let created_at = self.clock.now();
        let mut accounts = self.write();

        if accounts.email_taken(&email) {
            return Err(IdentityError::EmailTaken { email });
        }

        let user = User {
            id: accounts.next_id(),
            name: new_user.name.trim().to_string(),
            email,
            phone: new_user.phone.trim().to_string(),
            role,
            status: UserStatus::Active,
            created_at,
        };
        accounts.by_id.insert(
            user.id,
            Account {
                user: user.clone(),
                password,
            },
        );

        Ok(user)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Accounts> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Accounts> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn new_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use crime_portal_clock::ManualClock;

    use super::*;
    use crate::SessionProvider;

    pub(crate) fn seeded() -> UserDirectory {
        seeded_with_clock().0
    }

    fn seeded_with_clock() -> (UserDirectory, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::stepping_from(DateTime::<Utc>::UNIX_EPOCH));
        let directory = UserDirectory::with_clock(clock.clone())
            .with_users(crate::fixtures::seed_users().unwrap())
            .unwrap();
        (directory, clock)
    }

    pub(crate) fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Sam Lee".to_string(),
            email: email.to_string(),
            phone: "(123) 456-0000".to_string(),
            password: "correct horse".to_string(),
            confirm_password: "correct horse".to_string(),
        }
    }

    #[test]
    fn login_with_valid_credentials() {
        let directory = seeded();
        let session = directory.login("jane@example.com", "password123").unwrap();
        assert_eq!(session.user.role, Role::Police);
        assert!(session.is_authenticated());
        assert_eq!(directory.resolve(&session.token).unwrap().id, 2);
    }

    #[test]
    fn login_email_is_case_insensitive() {
        let directory = seeded();
        assert!(directory.login(" JOHN@example.com ", "password123").is_ok());
    }

    #[test]
    fn login_rejects_wrong_password_and_unknown_email() {
        let directory = seeded();
        assert!(matches!(
            directory.login("john@example.com", "nope"),
            Err(IdentityError::InvalidCredentials)
        ));
        assert!(matches!(
            directory.login("nobody@example.com", "password123"),
            Err(IdentityError::InvalidCredentials)
        ));
    }

    #[test]
    fn inactive_account_cannot_login() {
        let directory = seeded();
        assert!(matches!(
            directory.login("robert@example.com", "password123"),
            Err(IdentityError::AccountInactive { .. })
        ));
    }

    #[test]
    fn register_creates_signed_in_citizen() {
        let directory = seeded();
        let session = directory.register(new_user("sam@example.com")).unwrap();
        assert_eq!(session.user.id, 6);
        assert_eq!(session.user.role, Role::Citizen);
        assert_eq!(session.user.status, UserStatus::Active);
        assert_eq!(directory.resolve(&session.token).unwrap(), session.user);
        assert!(directory.login("sam@example.com", "correct horse").is_ok());
    }

    #[test]
    fn register_rejects_duplicate_email() {
        let directory = seeded();
        assert!(matches!(
            directory.register(new_user("Jane@Example.com")),
            Err(IdentityError::EmailTaken { .. })
        ));
        assert_eq!(directory.len(), 5);
    }

    #[test]
    fn register_rejects_invalid_form() {
        let directory = seeded();
        let mut form = new_user("sam@example.com");
        form.confirm_password = "different".to_string();
        let Err(IdentityError::Validation(errors)) = directory.register(form) else {
            panic!("expected validation error");
        };
        assert!(errors.contains("confirmPassword"));
    }

    #[test]
    fn logout_invalidates_token() {
        let directory = seeded();
        let session = directory.login("john@example.com", "password123").unwrap();
        directory.logout(&session.token);
        assert!(matches!(
            directory.resolve(&session.token),
            Err(IdentityError::Unauthenticated)
        ));
        assert!(directory.session(&session.token).is_none());
        directory.logout("never-issued");
    }

    #[test]
    fn unknown_token_is_unauthenticated() {
        let directory = seeded();
        assert!(matches!(
            directory.resolve("bogus"),
            Err(IdentityError::Unauthenticated)
        ));
    }

    #[test]
    fn sessions_expire_after_the_ttl() {
        let (directory, clock) = seeded_with_clock();
        let directory = directory.with_session_ttl(Duration::hours(1));
        let session = directory.login("john@example.com", "password123").unwrap();
        assert!(directory.resolve(&session.token).is_ok());

        clock.set(DateTime::<Utc>::UNIX_EPOCH + Duration::hours(2));
        assert!(matches!(
            directory.resolve(&session.token),
            Err(IdentityError::Unauthenticated)
        ));

        let fresh = directory.login("jane@example.com", "password123").unwrap();
        assert!(directory.resolve(&fresh.token).is_ok());
        assert_eq!(directory.session_count(), 1);
    }

    #[test]
    fn repeated_logins_keep_a_bounded_number_of_sessions() {
        let directory = seeded();
        let tokens: Vec<String> = (0..12)
            .map(|_| directory.login("john@example.com", "password123").unwrap().token)
            .collect();

        assert_eq!(directory.session_count(), MAX_SESSIONS_PER_USER);
        assert!(directory.resolve(&tokens[0]).is_err());
        for token in &tokens[tokens.len() - MAX_SESSIONS_PER_USER..] {
            assert_eq!(directory.resolve(token).unwrap().id, 1);
        }

        let other = directory.login("jane@example.com", "password123").unwrap();
        assert!(directory.resolve(&other.token).is_ok());
        assert_eq!(directory.session_count(), MAX_SESSIONS_PER_USER + 1);
    }
}
