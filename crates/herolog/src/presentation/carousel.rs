//! Paged image viewer state.

use std::collections::HashMap;

use crate::event::{Event, EventId, ImageRef};

/// How an event's images are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselView<'a> {
    /// No images.
    Hidden,
    /// A single static image.
    Single(&'a ImageRef),
    /// Several images with previous/next controls and position dots.
    Paged {
        /// All images of the event.
        images: &'a [ImageRef],
        /// Index of the visible image.
        page: usize,
    },
}

/// Choose the view for `images` positioned at `page`.
#[must_use]
pub fn carousel(images: &[ImageRef], page: usize) -> CarouselView<'_> {
    match images {
        [] => CarouselView::Hidden,
        [only] => CarouselView::Single(only),
        _ => CarouselView::Paged {
            images,
            page: page.min(images.len() - 1),
        },
    }
}

/// Current page of every multi-image event on screen.
///
/// Positions are transient: they start at 0 each time the views are rebuilt
/// and are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarouselState {
    pages: HashMap<EventId, usize>,
}

impl CarouselState {
    /// Create empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all positions and start every multi-image event at page 0.
    pub fn reset<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        self.pages.clear();
        for event in events {
            if event.images.len() > 1 {
                self.pages.insert(event.id, 0);
            }
        }
    }

    /// Current page of `id` (0 when unknown).
    #[must_use]
    pub fn page(&self, id: EventId) -> usize {
        self.pages.get(&id).copied().unwrap_or(0)
    }

    /// Number of tracked carousels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no carousel is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Move by `step` pages, wrapping around at both ends.
    fn shift(&mut self, event: &Event, step: isize) -> usize {
        let count = event.images.len();
        if count <= 1 {
            return 0;
        }
        let current = self.page(event.id);
        let next = if step < 0 {
            (current + count - 1) % count
        } else {
            (current + 1) % count
        };
        self.pages.insert(event.id, next);
        next
    }

    /// Advance to the next image, wrapping to the first.
    pub fn next(&mut self, event: &Event) -> usize {
        self.shift(event, 1)
    }

    /// Go back one image, wrapping to the last.
    pub fn previous(&mut self, event: &Event) -> usize {
        self.shift(event, -1)
    }

    /// Jump to `index`. Out-of-range indexes leave the position unchanged.
    pub fn go_to(&mut self, event: &Event, index: usize) -> usize {
        if event.images.len() > 1 && index < event.images.len() {
            self.pages.insert(event.id, index);
        }
        self.page(event.id)
    }
}
