//! Create, update, delete and lookup operations on the action collection.
//!
//! Every mutation writes the whole collection back through [`Store::save`].
//! The returned [`Change`] carries the save status so callers can surface a
//! capacity warning; the in-memory change stands either way.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::event::{Event, EventFields, EventId};
use crate::store::{SaveStatus, Store};

/// Outcome of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// The action that was targeted.
    pub id: EventId,
    /// Whether the collection was modified.
    pub applied: bool,
    /// Result of persisting the collection afterwards.
    pub save: SaveStatus,
}

/// Repository operations over a [`Store`].
#[derive(Debug)]
pub struct EventRepository {
    store: Store,
}

impl EventRepository {
    /// Wrap a loaded store.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// All actions, in collection order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        self.store.events()
    }

    /// Look up an action by id.
    #[must_use]
    pub fn find_by_id(&self, id: EventId) -> Option<&Event> {
        self.store.events().iter().find(|e| e.id == id)
    }

    /// A time-based id strictly greater than every existing id.
    fn next_id(&self) -> Result<EventId> {
        let now = Utc::now().timestamp_millis();
        let max = self.store.events().iter().map(|e| e.id).max().unwrap_or(0);
        let above = max
            .checked_add(1)
            .ok_or_else(|| Error::internal(format!("no id left above {max}")))?;
        Ok(now.max(above))
    }

    /// Append a new action and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] if the fields fail validation, or
    /// [`Error::Internal`] if the existing ids leave no room for a new one.
    pub fn create(&mut self, fields: EventFields) -> Result<Change> {
        fields.validate()?;
        let id = self.next_id()?;
        let event = Event::new(id, fields);
        info!(id, category = %event.category, images = event.images.len(), "Created action");
        self.store.events_mut().push(event);

        Ok(Change {
            id,
            applied: true,
            save: self.store.save(),
        })
    }

    /// Overwrite an existing action and persist.
    ///
    /// Images are replaced only when `fields.images` is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventNotFound`] if no action has this id, or
    /// [`Error::InvalidEvent`] if the fields fail validation.
    pub fn update(&mut self, id: EventId, fields: EventFields) -> Result<Change> {
        fields.validate()?;
        let event = self
            .store
            .events_mut()
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Error::EventNotFound { id })?;

        let replaces_images = !fields.images.is_empty();
        event.apply(fields);
        info!(id, replaces_images, "Updated action");

        Ok(Change {
            id,
            applied: true,
            save: self.store.save(),
        })
    }

    /// Remove an action and persist. Missing ids leave the collection as is.
    pub fn delete(&mut self, id: EventId) -> Change {
        let events = self.store.events_mut();
        let before = events.len();
        events.retain(|e| e.id != id);
        let applied = events.len() != before;

        if applied {
            info!(id, "Deleted action");
        } else {
            debug!(id, "Delete target not found");
        }

        Change {
            id,
            applied,
            save: self.store.save(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::event::{Category, ImageRef};
    use crate::presentation::{filtered_list, ListFilter};
    use crate::storage::Storage;

    const KEY: &str = "heroStageEvents";
    const LIMIT: usize = 5 * 1024 * 1024;

    fn repo() -> EventRepository {
        EventRepository::new(Store::load(Storage::open_in_memory().unwrap(), KEY, LIMIT).unwrap())
    }

    fn fields(category: Category, title: &str, images: &[&str]) -> EventFields {
        EventFields {
            category,
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: "D".to_string(),
            images: images
                .iter()
                .map(|s| ImageRef::from((*s).to_string()))
                .collect(),
        }
    }

    fn persisted(repo: &EventRepository) -> Vec<Event> {
        let raw = repo.store().storage().read_slot(KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_create_end_to_end() {
        let mut repo = repo();
        let before = repo.events().len();

        let change = repo.create(fields(Category::Arrests, "T", &[])).unwrap();

        assert!(change.applied);
        assert!(change.save.is_saved());
        assert_eq!(repo.events().len(), before + 1);

        let created = repo.find_by_id(change.id).unwrap();
        assert_eq!(created.title, "T");
        assert_eq!(created.description, "D");
        assert!(created.images.is_empty());

        assert!(persisted(&repo).iter().any(|e| e.id == change.id));

        let arrests = filtered_list(repo.events(), ListFilter::Category(Category::Arrests));
        assert!(arrests.iter().any(|e| e.id == change.id));
        let flags = filtered_list(repo.events(), ListFilter::Category(Category::Flags));
        assert!(flags.iter().all(|e| e.id != change.id));
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut repo = repo();
        let mut ids: HashSet<EventId> = repo.events().iter().map(|e| e.id).collect();

        for i in 0..20 {
            let before = ids.len();
            let change = repo
                .create(fields(Category::Other, &format!("n{i}"), &[]))
                .unwrap();
            assert!(ids.insert(change.id), "id {} reused", change.id);
            assert_eq!(ids.len(), before + 1);
        }
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let mut repo = repo();
        let before = repo.events().to_vec();

        let err = repo.create(fields(Category::Flags, "  ", &[])).unwrap_err();

        assert!(matches!(err, Error::InvalidEvent { .. }));
        assert_eq!(repo.events(), before.as_slice());
    }

    #[test]
    fn test_create_preserves_image_order() {
        let mut repo = repo();
        let change = repo
            .create(fields(
                Category::Flags,
                "imgs",
                &["https://a/1.png", "https://a/2.png", "data:image/jpeg;base64,AA"],
            ))
            .unwrap();

        let images: Vec<&str> = repo
            .find_by_id(change.id)
            .unwrap()
            .images
            .iter()
            .map(ImageRef::as_str)
            .collect();
        assert_eq!(
            images,
            vec!["https://a/1.png", "https://a/2.png", "data:image/jpeg;base64,AA"]
        );
    }

    #[test]
    fn test_update_without_images_keeps_them() {
        let mut repo = repo();
        let id = repo
            .create(fields(Category::Flags, "old", &["https://a/1.png"]))
            .unwrap()
            .id;

        repo.update(id, fields(Category::Other, "new", &[])).unwrap();

        let event = repo.find_by_id(id).unwrap();
        assert_eq!(event.title, "new");
        assert_eq!(event.category, Category::Other);
        assert_eq!(event.images, vec![ImageRef::Url("https://a/1.png".to_string())]);
    }

    #[test]
    fn test_update_with_new_url_replaces_images() {
        let mut repo = repo();
        let id = repo
            .create(fields(
                Category::Flags,
                "old",
                &["https://a/1.png", "https://a/2.png"],
            ))
            .unwrap()
            .id;

        repo.update(id, fields(Category::Flags, "old", &["https://b/3.png"]))
            .unwrap();

        assert_eq!(
            repo.find_by_id(id).unwrap().images,
            vec![ImageRef::Url("https://b/3.png".to_string())]
        );
        assert_eq!(persisted(&repo), repo.events());
    }

    #[test]
    fn test_update_missing_id() {
        let mut repo = repo();
        let err = repo
            .update(123_456, fields(Category::Flags, "x", &[]))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_existing() {
        let mut repo = repo();
        let change = repo.delete(1);

        assert!(change.applied);
        assert!(repo.find_by_id(1).is_none());
        assert!(persisted(&repo).iter().all(|e| e.id != 1));
    }

    #[test]
    fn test_delete_missing_leaves_collection_unchanged() {
        let mut repo = repo();
        repo.create(fields(Category::Other, "keep", &[])).unwrap();
        let before = repo.store().serialize().unwrap();

        let change = repo.delete(987_654_321);

        assert!(!change.applied);
        assert_eq!(repo.store().serialize().unwrap(), before);
    }

    #[test]
    fn test_ids_stay_above_existing_maximum() {
        let mut repo = repo();
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        repo.store.events_mut()[0].id = far_future;

        let change = repo.create(fields(Category::Other, "next", &[])).unwrap();
        assert_eq!(change.id, far_future + 1);
    }

    #[test]
    fn test_create_fails_when_ids_exhausted() {
        let mut repo = repo();
        repo.store.events_mut()[0].id = i64::MAX;
        let before = repo.events().to_vec();

        let err = repo
            .create(fields(Category::Other, "one too many", &[]))
            .unwrap_err();

        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(repo.events(), before.as_slice());
    }

    #[test]
    fn test_replay_matches_reload_after_each_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herolog.db");
        let open = || {
            EventRepository::new(Store::load(Storage::open(&path).unwrap(), KEY, LIMIT).unwrap())
        };

        let mut live = open();
        let a = live
            .create(fields(Category::Flags, "a", &["https://x/1.png"]))
            .unwrap();
        let b = live.create(fields(Category::Arrests, "b", &[])).unwrap();
        live.update(a.id, fields(Category::Other, "a2", &[]))
            .unwrap();
        live.delete(1);
        live.update(b.id, fields(Category::Arrests, "b2", &["https://x/2.png"]))
            .unwrap();
        live.delete(424_242);
        let expected = live.events().to_vec();
        drop(live);

        let reloaded = open();
        assert_eq!(reloaded.events(), expected.as_slice());
    }
}
