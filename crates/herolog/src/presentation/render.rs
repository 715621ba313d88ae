//! Plain-text rendering of timelines, the management list and carousels.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

use super::carousel::{carousel, CarouselView};
use super::timeline::{CategoryStats, Timeline, EMPTY_TIMELINE};
use crate::event::{Category, Event, ImageRef};

const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Format a date the way the logbook shows it: `10 janvier 2025`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Short description of an image for the terminal.
///
/// Embedded images are summarized instead of dumping their data.
#[must_use]
pub fn describe_image(image: &ImageRef) -> String {
    match image {
        ImageRef::Url(url) => url.clone(),
        ImageRef::Embedded(data) => format!("[image intégrée, {} Ko]", data.len().div_ceil(1024)),
    }
}

/// Terminal styling switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    /// Styling with or without ANSI colors.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn title(self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn category(self, category: Category) -> String {
        let label = category.label();
        if !self.color {
            return label.to_string();
        }
        match category {
            Category::Flags => label.red().to_string(),
            Category::Arrests => label.blue().to_string(),
            Category::Other => label.yellow().to_string(),
        }
    }
}

/// Render the carousel of `images` at `page`, one line per row.
#[must_use]
pub fn render_carousel(images: &[ImageRef], page: usize, style: Style) -> Vec<String> {
    match carousel(images, page) {
        CarouselView::Hidden => Vec::new(),
        CarouselView::Single(image) => vec![describe_image(image)],
        CarouselView::Paged { images, page } => {
            let dots: String = (0..images.len())
                .map(|i| if i == page { "●" } else { "○" })
                .collect::<Vec<_>>()
                .join(" ");
            vec![
                format!("‹ {}/{} ›  {}", page + 1, images.len(), style.dim(&dots)),
                describe_image(&images[page]),
            ]
        }
    }
}

/// Render one timeline entry.
#[must_use]
pub fn render_entry(event: &Event, page: usize, style: Style) -> String {
    let mut lines = vec![
        style.category(event.category),
        style.dim(&format_date(event.date)),
        style.title(&event.title),
    ];
    lines.extend(render_carousel(&event.images, page, style));
    if !event.description.is_empty() {
        lines.push(event.description.clone());
    }
    lines
        .iter()
        .map(|line| format!("  │ {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a full timeline. `page_of` gives each event's carousel position.
#[must_use]
pub fn render_timeline(
    timeline: &Timeline<'_>,
    page_of: impl Fn(&Event) -> usize,
    style: Style,
) -> String {
    let header = style.title(timeline.category().label());
    match timeline {
        Timeline::Empty(_) => format!("{header}\n  {EMPTY_TIMELINE}"),
        Timeline::Entries { events, .. } => {
            let entries: Vec<String> = events
                .iter()
                .map(|event| render_entry(event, page_of(*event), style))
                .collect();
            format!("{header}\n{}", entries.join("\n  │\n"))
        }
    }
}

/// Render one management list row.
#[must_use]
pub fn render_list_item(event: &Event, style: Style) -> String {
    format!(
        "{}\n  {} - {} - {} image(s)  {}",
        style.title(&event.title),
        style.category(event.category),
        format_date(event.date),
        event.image_count(),
        style.dim(&format!("[#{}]", event.id)),
    )
}

/// Render the per-category counters followed by the total.
#[must_use]
pub fn render_stats(stats: &CategoryStats, style: Style) -> String {
    let mut parts: Vec<String> = Category::ALL
        .iter()
        .map(|category| format!("{}: {}", style.category(*category), stats.get(*category)))
        .collect();
    parts.push(style.title(&format!("Total: {}", stats.total())));
    parts.join("   ")
}
