//! Read-only views over the action collection.
//!
//! Three per-category timelines, the filtered management list, per-event
//! image carousels and the text renderer that turns them into terminal
//! output. Nothing here mutates the collection.

mod carousel;
mod render;
mod timeline;

pub use carousel::{carousel, CarouselState, CarouselView};
pub use render::{
    describe_image, format_date, render_carousel, render_entry, render_list_item, render_stats,
    render_timeline, Style,
};
pub use timeline::{
    filtered_list, stats, timeline_for, CategoryStats, ListFilter, Timeline, EMPTY_TIMELINE,
};

use crate::event::{Category, Event};

/// Renders the collection and keeps carousel positions between redraws.
#[derive(Debug, Clone)]
pub struct Presenter {
    carousels: CarouselState,
    style: Style,
}

impl Presenter {
    /// Create a presenter, with or without ANSI colors.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self {
            carousels: CarouselState::new(),
            style: Style::new(color),
        }
    }

    /// Carousel positions of the last render.
    #[must_use]
    pub fn carousels(&self) -> &CarouselState {
        &self.carousels
    }

    /// Mutable carousel positions, for paging between redraws.
    pub fn carousels_mut(&mut self) -> &mut CarouselState {
        &mut self.carousels
    }

    /// Rebuild the three timelines. Carousel positions restart at 0.
    pub fn render_timelines(&mut self, events: &[Event]) -> String {
        self.carousels.reset(events);
        let mut sections = vec![render_stats(&stats(events), self.style)];
        sections.extend(
            Category::ALL
                .iter()
                .map(|category| self.render_category(events, *category)),
        );
        sections.join("\n\n")
    }

    /// Render the timeline of one category using current carousel positions.
    #[must_use]
    pub fn render_category(&self, events: &[Event], category: Category) -> String {
        render_timeline(
            &timeline_for(events, category),
            |event| self.carousels.page(event.id),
            self.style,
        )
    }

    /// Render the management list under `filter`.
    #[must_use]
    pub fn render_list(&self, events: &[Event], filter: ListFilter) -> String {
        let rows: Vec<String> = filtered_list(events, filter)
            .into_iter()
            .map(|event| render_list_item(event, self.style))
            .collect();
        if rows.is_empty() {
            EMPTY_TIMELINE.to_string()
        } else {
            rows.join("\n")
        }
    }

    /// Render one action, optionally jumping its carousel to `page`.
    pub fn render_event(&mut self, event: &Event, page: Option<usize>) -> String {
        self.carousels.reset([event]);
        if let Some(page) = page {
            self.carousels.go_to(event, page);
        }
        render_entry(event, self.carousels.page(event.id), self.style)
    }
}
