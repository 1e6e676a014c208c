//! Seed accounts baked into the binary from `fixtures/users.toml`.

use crime_portal_user_models::User;
use serde::Deserialize;

use crate::IdentityError;

const USERS_TOML: &str = include_str!("../fixtures/users.toml");

#[derive(Deserialize)]
struct UserFixture {
    #[serde(flatten)]
    user: User,
    password: String,
}

#[derive(Deserialize)]
struct UserFixtures {
    users: Vec<UserFixture>,
}

/// Parses a `[[users]]` TOML document into users with their plain-text
/// passwords.
///
/// # Errors
///
/// Returns [`IdentityError::Fixture`] if the document does not parse.
pub fn parse_users_toml(toml_str: &str) -> Result<Vec<(User, String)>, IdentityError> {
    let fixtures: UserFixtures =
        toml::de::from_str(toml_str).map_err(|e| IdentityError::Fixture {
            message: e.to_string(),
        })?;
    Ok(fixtures
        .users
        .into_iter()
        .map(|f| (f.user, f.password))
        .collect())
}

/// The embedded seed accounts.
///
/// # Errors
///
/// Returns [`IdentityError::Fixture`] if the embedded TOML is malformed.
pub fn seed_users() -> Result<Vec<(User, String)>, IdentityError> {
    parse_users_toml(USERS_TOML)
}
