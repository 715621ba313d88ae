//! Derived views over the action collection.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::{Category, Event};

/// Placeholder shown for a category without actions.
pub const EMPTY_TIMELINE: &str = "Aucune action enregistrée dans cette catégorie.";

/// Which actions the management list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ListFilter {
    /// Every action.
    #[default]
    All,
    /// Only actions of one category.
    Category(Category),
}

impl ListFilter {
    /// Whether `event` passes this filter.
    #[must_use]
    pub fn matches(self, event: &Event) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => event.category == category,
        }
    }
}

impl std::fmt::Display for ListFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Category(category) => write!(f, "{category}"),
        }
    }
}

impl std::str::FromStr for ListFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Category)
        }
    }
}

impl TryFrom<String> for ListFilter {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ListFilter> for String {
    fn from(filter: ListFilter) -> Self {
        filter.to_string()
    }
}

/// Date-descending timeline of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timeline<'a> {
    /// No actions in this category.
    Empty(Category),
    /// Actions, newest first.
    Entries {
        /// The category shown.
        category: Category,
        /// The matching actions.
        events: Vec<&'a Event>,
    },
}

impl<'a> Timeline<'a> {
    /// The category this timeline covers.
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Empty(category) | Self::Entries { category, .. } => *category,
        }
    }

    /// The actions shown, empty for the placeholder.
    #[must_use]
    pub fn events(&self) -> &[&'a Event] {
        match self {
            Self::Empty(_) => &[],
            Self::Entries { events, .. } => events,
        }
    }
}

/// Newest first. The sort is stable, so actions sharing a date keep their
/// collection order.
fn newest_first<'a>(events: impl Iterator<Item = &'a Event>) -> Vec<&'a Event> {
    let mut sorted: Vec<&Event> = events.collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Build the timeline of `category`.
#[must_use]
pub fn timeline_for(events: &[Event], category: Category) -> Timeline<'_> {
    let matching = newest_first(events.iter().filter(|e| e.category == category));
    if matching.is_empty() {
        Timeline::Empty(category)
    } else {
        Timeline::Entries {
            category,
            events: matching,
        }
    }
}

/// The management list under `filter`, newest first.
#[must_use]
pub fn filtered_list(events: &[Event], filter: ListFilter) -> Vec<&Event> {
    newest_first(events.iter().filter(|e| filter.matches(e)))
}

/// Number of actions per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Flag captures.
    pub flags: usize,
    /// Arrests.
    pub arrests: usize,
    /// Other actions.
    pub other: usize,
}

impl CategoryStats {
    /// Count for one category.
    #[must_use]
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Flags => self.flags,
            Category::Arrests => self.arrests,
            Category::Other => self.other,
        }
    }

    /// Total across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.flags + self.arrests + self.other
    }
}

/// Count actions per category.
#[must_use]
pub fn stats(events: &[Event]) -> CategoryStats {
    events
        .iter()
        .fold(CategoryStats::default(), |mut acc, event| {
            match event.category {
                Category::Flags => acc.flags += 1,
                Category::Arrests => acc.arrests += 1,
                Category::Other => acc.other += 1,
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::event::EventFields;

    fn event(id: i64, category: Category, day: u32) -> Event {
        Event::new(
            id,
            EventFields {
                category,
                title: format!("event {id}"),
                date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
                description: String::new(),
                images: Vec::new(),
            },
        )
    }

    fn ids(events: &[&Event]) -> Vec<i64> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_timeline_filters_and_sorts_descending() {
        let events = vec![
            event(1, Category::Flags, 3),
            event(2, Category::Arrests, 9),
            event(3, Category::Flags, 20),
            event(4, Category::Flags, 11),
        ];

        let timeline = timeline_for(&events, Category::Flags);

        assert_eq!(timeline.category(), Category::Flags);
        assert_eq!(ids(timeline.events()), vec![3, 4, 1]);
    }

    #[test]
    fn test_timeline_empty_placeholder() {
        let events = vec![event(1, Category::Arrests, 1)];

        let timeline = timeline_for(&events, Category::Flags);

        assert_eq!(timeline, Timeline::Empty(Category::Flags));
        assert!(timeline.events().is_empty());
    }

    #[test]
    fn test_same_date_keeps_collection_order() {
        let events = vec![
            event(5, Category::Other, 7),
            event(6, Category::Other, 7),
            event(7, Category::Other, 7),
        ];

        assert_eq!(
            ids(timeline_for(&events, Category::Other).events()),
            vec![5, 6, 7]
        );
    }

    #[test]
    fn test_filtered_list_all() {
        let events = vec![
            event(1, Category::Flags, 1),
            event(2, Category::Arrests, 5),
            event(3, Category::Other, 3),
        ];

        assert_eq!(ids(&filtered_list(&events, ListFilter::All)), vec![2, 3, 1]);
    }

    #[test]
    fn test_filtered_list_category() {
        let events = vec![
            event(1, Category::Flags, 1),
            event(2, Category::Arrests, 5),
            event(3, Category::Arrests, 8),
        ];

        let list = filtered_list(&events, ListFilter::Category(Category::Arrests));
        assert_eq!(ids(&list), vec![3, 2]);
    }

    #[test]
    fn test_filtered_list_does_not_reorder_collection() {
        let events = vec![event(1, Category::Flags, 1), event(2, Category::Flags, 9)];
        let _ = filtered_list(&events, ListFilter::All);
        assert_eq!(events[0].id, 1);
    }

    #[test]
    fn test_list_filter_parse_and_display() {
        assert_eq!("all".parse::<ListFilter>().unwrap(), ListFilter::All);
        assert_eq!(
            "flags".parse::<ListFilter>().unwrap(),
            ListFilter::Category(Category::Flags)
        );
        assert!("everything".parse::<ListFilter>().is_err());
        assert_eq!(ListFilter::Category(Category::Other).to_string(), "other");
    }

    #[test]
    fn test_list_filter_serde() {
        let json = serde_json::to_string(&ListFilter::Category(Category::Arrests)).unwrap();
        assert_eq!(json, "\"arrests\"");
        let back: ListFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, ListFilter::All);
    }

    #[test]
    fn test_stats() {
        let events = vec![
            event(1, Category::Flags, 1),
            event(2, Category::Arrests, 5),
            event(3, Category::Arrests, 8),
        ];

        let counts = stats(&events);
        assert_eq!(counts.get(Category::Flags), 1);
        assert_eq!(counts.get(Category::Arrests), 2);
        assert_eq!(counts.get(Category::Other), 0);
        assert_eq!(counts.total(), 3);
    }
}
