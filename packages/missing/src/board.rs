//! The in-memory board of missing and found posts.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crime_portal_clock::{Clock, SystemClock};
use crime_portal_missing_models::{ItemDraft, ItemFilter, ItemStatus, MissingItem};
use crime_portal_report_models::FieldErrors;
use crime_portal_user_models::User;

use crate::ItemError;

/// Owner of every board post, keyed by ID.
#[derive(Debug)]
pub struct MissingItemBoard {
    items: RwLock<BTreeMap<u64, MissingItem>>,
    clock: Arc<dyn Clock>,
}

impl Default for MissingItemBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MissingItemBoard {
    /// Creates an empty board stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty board stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    /// Loads pre-existing posts, replacing any with the same ID.
    #[must_use]
    pub fn with_items(self, items: impl IntoIterator<Item = MissingItem>) -> Self {
        {
            let mut guard = self.write();
            for item in items {
                guard.insert(item.id, item);
            }
        }
        self
    }

    /// Validates and stores a new post.
    ///
    /// Title, description, category, location, date, and a contact email are
    /// required. Status defaults to missing.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::Validation`] listing every missing field.
    pub fn submit(&self, draft: ItemDraft) -> Result<MissingItem, ItemError> {
        let mut errors = FieldErrors::new();
        let required = [
            ("title", draft.title.trim(), "Title is required"),
            ("description", draft.description.trim(), "Description is required"),
            ("location", draft.location.trim(), "Location is required"),
            ("contact", draft.contact.trim(), "Contact email is required"),
        ];
        for (field, value, message) in required {
            if value.is_empty() {
                errors.insert(field, message);
            }
        }
        if draft.category.is_none() {
            errors.insert("category", "Category is required");
        }
        if draft.date.is_none() {
            errors.insert("date", "Date is required");
        }

        let (Some(category), Some(date), true) = (draft.category, draft.date, errors.is_empty())
        else {
            return Err(ItemError::Validation(errors));
        };

        let created_at = self.clock.now();
        let mut guard = self.write();
        let id = guard.keys().next_back().map_or(1, |max| max + 1);

        let item = MissingItem {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            category,
            location: draft.location.trim().to_string(),
            date,
            status: draft.status.unwrap_or_default(),
            contact: draft.contact.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            image: draft.image.filter(|url| !url.trim().is_empty()),
            user_id: draft.user_id,
            created_at,
        };
        guard.insert(id, item.clone());

        log::info!(
            "Item {id} posted as {} by user {}",
            item.status,
            item.user_id
        );
        Ok(item)
    }

    /// Returns a copy of the post with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::NotFound`] if no post has that ID.
    pub fn get(&self, id: u64) -> Result<MissingItem, ItemError> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(ItemError::NotFound { id })
    }

    /// Posts matching `filter`, newest first with ties broken by descending
    /// ID.
    #[must_use]
    pub fn list(&self, filter: &ItemFilter) -> Vec<MissingItem> {
        let mut items: Vec<MissingItem> = self
            .read()
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by_key(|item| (Reverse(item.created_at), Reverse(item.id)));
        items
    }

    /// Marks a post missing or found.
    ///
    /// # Errors
    ///
    /// * [`ItemError::NotFound`] if no post has that ID.
    /// * [`ItemError::NotAuthorized`] unless `actor` posted it or is police
    ///   or admin.
    pub fn set_status(
        &self,
        id: u64,
        status: ItemStatus,
        actor: &User,
    ) -> Result<MissingItem, ItemError> {
        let mut guard = self.write();
        let item = guard.get_mut(&id).ok_or(ItemError::NotFound { id })?;

        if item.user_id != actor.id && !actor.role.sees_all_reports() {
            return Err(ItemError::NotAuthorized {
                user_id: actor.id,
                id,
            });
        }

        item.status = status;
        log::info!("Item {id} marked {status} by user {}", actor.id);
        Ok(item.clone())
    }

    /// Number of posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the board has no posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, MissingItem>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, MissingItem>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}
