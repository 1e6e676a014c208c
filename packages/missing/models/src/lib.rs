#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Missing and found item types for the crime portal board.

use chrono::{DateTime, NaiveDate, Utc};
use crime_portal_report_models::{FieldErrors, normalize_search, parse_choice, parse_date};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// What kind of item was lost or found.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemCategory {
    /// Wallets, keys, bags
    Personal,
    /// Lost or found animals
    Pet,
    /// Phones, laptops, cameras
    Electronics,
    /// Rings, watches, necklaces
    Jewelry,
    /// IDs, passports, papers
    Document,
    /// Anything else
    Other,
}

impl ItemCategory {
    /// Human-readable label shown in category pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal Items",
            Self::Pet => "Pets",
            Self::Electronics => "Electronics",
            Self::Jewelry => "Jewelry",
            Self::Document => "Documents",
            Self::Other => "Other",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Personal,
            Self::Pet,
            Self::Electronics,
            Self::Jewelry,
            Self::Document,
            Self::Other,
        ]
    }
}

/// Whether the poster lost the item or found it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemStatus {
    /// Someone is looking for it
    #[default]
    Missing,
    /// Someone has it
    Found,
}

/// A post on the missing and found board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingItem {
    /// Unique identifier.
    pub id: u64,
    /// Short title.
    pub title: String,
    /// Distinguishing details.
    pub description: String,
    /// Kind of item.
    pub category: ItemCategory,
    /// Where it was lost or found.
    pub location: String,
    /// When it was lost or found.
    pub date: NaiveDate,
    /// Lost or found.
    pub status: ItemStatus,
    /// Contact email.
    pub contact: String,
    /// Contact phone number.
    pub phone: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// ID of the posting user.
    pub user_id: u64,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
}

/// Input for a new board post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    /// Short title.
    pub title: String,
    /// Distinguishing details.
    pub description: String,
    /// Kind of item.
    pub category: Option<ItemCategory>,
    /// Where it was lost or found.
    pub location: String,
    /// When it was lost or found.
    pub date: Option<NaiveDate>,
    /// Lost or found; defaults to missing.
    pub status: Option<ItemStatus>,
    /// Contact email.
    pub contact: String,
    /// Contact phone number.
    pub phone: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// ID of the posting user.
    pub user_id: u64,
}

/// Predicates narrowing the board. All present predicates must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    /// Case-insensitive substring over title, description, and location.
    pub search: Option<String>,
    /// Missing or found tab.
    pub status: Option<ItemStatus>,
    /// Exact category match.
    pub category: Option<ItemCategory>,
    /// Inclusive lower bound on the item date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the item date.
    pub date_to: Option<NaiveDate>,
}

impl ItemFilter {
    /// Builds a filter from raw query-string values. Empty strings and
    /// `all` mean "no predicate".
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every value that failed to parse.
    pub fn parse(
        search: Option<&str>,
        status: Option<&str>,
        category: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let status = parse_choice(status, "status", "Unknown item status", &mut errors);
        let category = parse_choice(category, "category", "Unknown category", &mut errors);
        let date_from = parse_date(date_from, "dateFrom", &mut errors);
        let date_to = parse_date(date_to, "dateTo", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            search: search.and_then(normalize_search),
            status,
            category,
            date_from,
            date_to,
        })
    }

    /// Whether `item` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, item: &MissingItem) -> bool {
        let search_matches = self
            .search
            .as_deref()
            .and_then(normalize_search)
            .is_none_or(|term| {
                [&item.title, &item.description, &item.location]
                    .into_iter()
                    .any(|field| field.to_lowercase().contains(&term))
            });

        search_matches
            && self.status.is_none_or(|status| item.status == status)
            && self.category.is_none_or(|category| item.category == category)
            && self.date_from.is_none_or(|from| item.date >= from)
            && self.date_to.is_none_or(|to| item.date <= to)
    }
}
