//! Core event types for herolog.
//!
//! This module defines the logbook record (`Event`), its fixed category set,
//! and the image references attached to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a logged action.
pub type EventId = i64;

/// The kind of action an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Flag capture.
    Flags,
    /// Arrest.
    Arrests,
    /// Any other action.
    Other,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 3] = [Self::Flags, Self::Arrests, Self::Other];

    /// Human-readable label used by the timelines and the list.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Flags => "🚩 Capture de Drapeau",
            Self::Arrests => "👮 Arrestation",
            Self::Other => "⭐ Autre Action",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flags => write!(f, "flags"),
            Self::Arrests => write!(f, "arrests"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flags" => Ok(Self::Flags),
            "arrests" => Ok(Self::Arrests),
            "other" => Ok(Self::Other),
            _ => Err(Error::invalid_event(format!("unknown category: {s}"))),
        }
    }
}

/// A reference to an image attached to an event.
///
/// Persisted as a bare string: embedded images are `data:` URIs, everything
/// else is treated as an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageRef {
    /// Image data encoded into the record.
    Embedded(String),
    /// Remote image URL.
    Url(String),
}

impl ImageRef {
    /// The underlying string, as persisted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Embedded(s) | Self::Url(s) => s,
        }
    }

    /// Whether the image data lives inside the record.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        if s.starts_with("data:") {
            Self::Embedded(s)
        } else {
            Self::Url(s)
        }
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        match image {
            ImageRef::Embedded(s) | ImageRef::Url(s) => s,
        }
    }
}

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier, fixed at creation.
    pub id: EventId,
    /// What kind of action this was.
    pub category: Category,
    /// Short title.
    pub title: String,
    /// Day the action took place.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Attached images, in input order.
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// User-supplied values for creating or updating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    /// Category of the action.
    pub category: Category,
    /// Title; must not be blank.
    pub title: String,
    /// Day of the action.
    pub date: NaiveDate,
    /// Description, may be empty.
    pub description: String,
    /// Newly supplied images. On update an empty list keeps the old images.
    pub images: Vec<ImageRef>,
}

impl EventFields {
    /// Check that the fields describe a storable event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] if the title is blank.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_event("title must not be empty"));
        }
        Ok(())
    }
}

impl Event {
    /// Build a new event from validated fields.
    #[must_use]
    pub fn new(id: EventId, fields: EventFields) -> Self {
        Self {
            id,
            category: fields.category,
            title: fields.title,
            date: fields.date,
            description: fields.description,
            images: fields.images,
        }
    }

    /// Overwrite this event with updated fields.
    ///
    /// Images are only replaced when `fields.images` is non-empty.
    pub fn apply(&mut self, fields: EventFields) {
        self.category = fields.category;
        self.title = fields.title;
        self.date = fields.date;
        self.description = fields.description;
        if !fields.images.is_empty() {
            self.images = fields.images;
        }
    }

    /// Number of attached images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// The two sample events shown when nothing has been saved yet.
#[must_use]
pub fn seed_events() -> Vec<Event> {
    vec![
        Event {
            id: 1,
            category: Category::Flags,
            title: "Capture du drapeau de la guilde des Ombres".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap_or_default(),
            description: "Utilisation stratégique de mon alter Glace pour immobiliser les gardes, \
                          puis Feu pour créer une diversion. Mission réussie avec mon équipe."
                .to_string(),
            images: Vec::new(),
        },
        Event {
            id: 2,
            category: Category::Arrests,
            title: "Arrestation d'un villain de rang B".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap_or_default(),
            description: "Intervention lors d'un braquage. J'ai utilisé mon alter Glace pour \
                          bloquer les issues et neutraliser le suspect sans violence excessive."
                .to_string(),
            images: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fields(title: &str, images: Vec<ImageRef>) -> EventFields {
        EventFields {
            category: Category::Other,
            title: title.to_string(),
            date: date(2025, 2, 1),
            description: String::new(),
            images,
        }
    }

    #[test]
    fn test_category_display_and_parse() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("heists".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Flags.label(), "🚩 Capture de Drapeau");
        assert_eq!(Category::Arrests.label(), "👮 Arrestation");
        assert_eq!(Category::Other.label(), "⭐ Autre Action");
    }

    #[test]
    fn test_image_ref_kind_from_string() {
        let embedded = ImageRef::from("data:image/jpeg;base64,AAAA".to_string());
        assert!(embedded.is_embedded());

        let url = ImageRef::from("https://i.imgur.com/abc.png".to_string());
        assert!(!url.is_embedded());
        assert_eq!(url.as_str(), "https://i.imgur.com/abc.png");
    }

    #[test]
    fn test_event_json_shape() {
        let event = Event::new(
            7,
            EventFields {
                category: Category::Arrests,
                title: "T".to_string(),
                date: date(2025, 3, 1),
                description: "D".to_string(),
                images: vec![ImageRef::Url("https://x/y.png".to_string())],
            },
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["category"], "arrests");
        assert_eq!(value["date"], "2025-03-01");
        assert_eq!(value["images"][0], "https://x/y.png");
    }

    #[test]
    fn test_event_rejects_unknown_category() {
        let json = serde_json::json!({
            "id": 1,
            "category": "heists",
            "title": "x",
            "date": "2025-01-01",
            "description": "",
            "images": [],
        });
        assert!(serde_json::from_value::<Event>(json).is_err());
    }

    #[test]
    fn test_event_missing_images_defaults_to_empty() {
        let json = serde_json::json!({
            "id": 1,
            "category": "other",
            "title": "x",
            "date": "2025-01-01",
            "description": "",
        });
        let event: Event = serde_json::from_value(json).unwrap();
        assert!(event.images.is_empty());
    }

    #[test]
    fn test_apply_keeps_images_without_new_input() {
        let old = vec![ImageRef::Url("https://a/1.png".to_string())];
        let mut event = Event::new(1, fields("before", old.clone()));

        event.apply(fields("after", Vec::new()));

        assert_eq!(event.title, "after");
        assert_eq!(event.images, old);
    }

    #[test]
    fn test_apply_replaces_images_with_new_input() {
        let mut event = Event::new(
            1,
            fields(
                "before",
                vec![
                    ImageRef::Url("https://a/1.png".to_string()),
                    ImageRef::Url("https://a/2.png".to_string()),
                ],
            ),
        );
        let new = vec![ImageRef::Url("https://b/3.png".to_string())];

        event.apply(fields("after", new.clone()));

        assert_eq!(event.images, new);
    }

    #[test]
    fn test_validate_blank_title() {
        assert!(fields("   ", Vec::new()).validate().is_err());
        assert!(fields("ok", Vec::new()).validate().is_ok());
    }

    #[test]
    fn test_seed_events() {
        let seeds = seed_events();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].id, 1);
        assert_eq!(seeds[0].category, Category::Flags);
        assert_eq!(seeds[0].date, date(2025, 1, 10));
        assert_eq!(seeds[1].id, 2);
        assert_eq!(seeds[1].category, Category::Arrests);
        assert_eq!(seeds[1].date, date(2025, 1, 12));
    }
}
