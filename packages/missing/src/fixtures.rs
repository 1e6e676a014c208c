//! Seed posts baked into the binary from `fixtures/items.toml`.

use crime_portal_missing_models::MissingItem;
use serde::Deserialize;

use crate::ItemError;

const ITEMS_TOML: &str = include_str!("../fixtures/items.toml");

#[derive(Deserialize)]
struct ItemFixtures {
    items: Vec<MissingItem>,
}

/// Parses an `[[items]]` TOML document.
///
/// # Errors
///
/// Returns [`ItemError::Fixture`] if the document does not parse.
pub fn parse_items_toml(toml_str: &str) -> Result<Vec<MissingItem>, ItemError> {
    let fixtures: ItemFixtures = toml::de::from_str(toml_str).map_err(|e| ItemError::Fixture {
        message: e.to_string(),
    })?;
    Ok(fixtures.items)
}

/// The embedded seed posts.
///
/// # Errors
///
/// Returns [`ItemError::Fixture`] if the embedded TOML is malformed.
pub fn seed_items() -> Result<Vec<MissingItem>, ItemError> {
    parse_items_toml(ITEMS_TOML)
}

#[cfg(test)]
mod tests {
    use crime_portal_missing_models::{ItemCategory, ItemStatus};

    use super::*;

    #[test]
    fn embedded_items_parse() {
        let items = seed_items().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1].category, ItemCategory::Pet);
        assert_eq!(items[3].status, ItemStatus::Found);
        assert!(items.iter().all(|item| item.image.is_none()));
    }

    #[test]
    fn unknown_category_is_a_fixture_error() {
        let toml = r#"
            [[items]]
            id = 1
            title = "t"
            description = "d"
            category = "vehicle"
            location = "l"
            date = "2023-04-15"
            status = "missing"
            contact = "c"
            phone = ""
            userId = 1
            createdAt = "2023-04-16T10:30:00Z"
        "#;
        assert!(matches!(
            parse_items_toml(toml),
            Err(ItemError::Fixture { .. })
        ));
    }
}
