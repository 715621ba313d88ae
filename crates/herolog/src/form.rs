//! The add/edit form and its session state.
//!
//! A [`FormController`] holds the values of the single edit form, whether a
//! submit creates or updates, the management list filter and the live
//! feedback of each URL field. URL probes are stamped with a per-field
//! generation so that a slow probe can never overwrite the result of a
//! newer edit.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::error::Result;
use crate::event::{Category, EventFields, EventId, ImageRef};
use crate::images::{
    compress_file, normalize_url, probe, CompressOptions, ImageLoader, ProbeResult,
};
use crate::presentation::ListFilter;
use crate::repository::{Change, EventRepository};

/// Confirmation shown after a successful create.
pub const CREATED_MESSAGE: &str = "Action ajoutée avec succès !";

/// Confirmation shown after a successful update.
pub const UPDATED_MESSAGE: &str = "Action modifiée avec succès !";

/// What a submit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Append a new action.
    #[default]
    Create,
    /// Overwrite the action with this id.
    Edit(EventId),
}

/// Validation indicator of one URL field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlFeedback {
    /// Nothing to show.
    #[default]
    None,
    /// A probe is running.
    Pending,
    /// The last probe loaded an image.
    Valid,
    /// The last probe failed.
    Invalid,
}

impl UrlFeedback {
    /// Indicator text for the terminal.
    #[must_use]
    pub fn indicator(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Pending => "…",
            Self::Valid => "✓ Image valide",
            Self::Invalid => "✗ Image introuvable",
        }
    }
}

/// One URL input of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlInput {
    /// Current value.
    pub value: String,
    /// Feedback of the latest probe.
    pub feedback: UrlFeedback,
    generation: u64,
}

/// A probe started by [`FormController::begin_probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTicket {
    /// Index of the URL field.
    pub field: usize,
    /// Normalized URL to probe.
    pub url: String,
    generation: u64,
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Confirmation message.
    pub message: &'static str,
    /// The repository change, including the save status.
    pub change: Change,
}

/// State of the add/edit form.
#[derive(Debug, Clone)]
pub struct FormController {
    mode: FormMode,
    /// Selected category.
    pub category: Category,
    /// Title input.
    pub title: String,
    /// Date input.
    pub date: NaiveDate,
    /// Description input.
    pub description: String,
    url_inputs: Vec<UrlInput>,
    /// Selected image files.
    pub files: Vec<PathBuf>,
    filter: ListFilter,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    /// An empty form in create mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            category: Category::Flags,
            title: String::new(),
            date: Local::now().date_naive(),
            description: String::new(),
            url_inputs: vec![UrlInput::default()],
            files: Vec::new(),
            filter: ListFilter::All,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Current management list filter.
    #[must_use]
    pub fn filter(&self) -> ListFilter {
        self.filter
    }

    /// Change the management list filter.
    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
    }

    /// The URL fields. There is always at least one.
    #[must_use]
    pub fn url_inputs(&self) -> &[UrlInput] {
        &self.url_inputs
    }

    /// Append an empty URL field and return its index.
    pub fn add_url_input(&mut self) -> usize {
        self.url_inputs.push(UrlInput::default());
        self.url_inputs.len() - 1
    }

    /// Drop every URL field, leaving one empty slot.
    pub fn clear_urls(&mut self) {
        self.url_inputs = vec![UrlInput::default()];
    }

    /// Set the raw value of a URL field without probing.
    pub fn set_url(&mut self, field: usize, value: impl Into<String>) {
        if let Some(input) = self.url_inputs.get_mut(field) {
            input.value = value.into();
            input.generation += 1;
            input.feedback = UrlFeedback::None;
        }
    }

    /// Load an existing action into the form and switch to edit mode.
    ///
    /// Returns `false` and leaves the form untouched if `id` is unknown.
    pub fn enter_edit(&mut self, repo: &EventRepository, id: EventId) -> bool {
        let Some(event) = repo.find_by_id(id) else {
            debug!(id, "Edit target not found");
            return false;
        };

        self.mode = FormMode::Edit(id);
        self.category = event.category;
        self.title.clone_from(&event.title);
        self.date = event.date;
        self.description.clone_from(&event.description);
        self.files.clear();
        self.url_inputs = event
            .images
            .iter()
            .map(|image| UrlInput {
                value: image.as_str().to_string(),
                ..UrlInput::default()
            })
            .collect();
        if self.url_inputs.is_empty() {
            self.url_inputs.push(UrlInput::default());
        }
        true
    }

    /// Clear every field and return to create mode. The filter is kept.
    pub fn reset(&mut self) {
        *self = Self {
            filter: self.filter,
            ..Self::new()
        };
    }

    /// Abandon the current edit.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Record an edit of a URL field and start a probe for it.
    ///
    /// The value is normalized in place. Returns `None` when the field does
    /// not exist or the value is blank, in which case its feedback is cleared.
    pub fn begin_probe(&mut self, field: usize, value: &str) -> Option<ProbeTicket> {
        let input = self.url_inputs.get_mut(field)?;
        input.generation += 1;

        let trimmed = value.trim();
        if trimmed.is_empty() {
            input.value = value.to_string();
            input.feedback = UrlFeedback::None;
            return None;
        }

        input.value = normalize_url(trimmed);
        input.feedback = UrlFeedback::Pending;
        Some(ProbeTicket {
            field,
            url: input.value.clone(),
            generation: input.generation,
        })
    }

    /// Apply a finished probe. Results from superseded generations are
    /// discarded; returns whether this one was applied.
    pub fn finish_probe(&mut self, ticket: &ProbeTicket, result: ProbeResult) -> bool {
        let Some(input) = self.url_inputs.get_mut(ticket.field) else {
            return false;
        };
        if input.generation != ticket.generation {
            debug!(
                field = ticket.field,
                url = %ticket.url,
                "Discarding superseded probe result"
            );
            return false;
        }

        if result.success {
            input.value = result.url;
            input.feedback = UrlFeedback::Valid;
        } else {
            input.feedback = UrlFeedback::Invalid;
        }
        true
    }

    /// Edit a URL field and probe it to completion.
    pub async fn check_url<L>(&mut self, field: usize, value: &str, loader: &L) -> UrlFeedback
    where
        L: ImageLoader + ?Sized,
    {
        let Some(ticket) = self.begin_probe(field, value) else {
            return UrlFeedback::None;
        };
        let result = probe(loader, &ticket.url).await;
        self.finish_probe(&ticket, result);
        self.url_inputs
            .get(field)
            .map_or(UrlFeedback::None, |input| input.feedback)
    }

    /// Trimmed, normalized, non-empty URL inputs in field order.
    #[must_use]
    pub fn gathered_urls(&self) -> Vec<ImageRef> {
        self.url_inputs
            .iter()
            .map(|input| input.value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| ImageRef::from(normalize_url(value)))
            .collect()
    }

    /// Compress every selected file. Files that fail are logged and skipped.
    async fn compressed_files(&self, options: CompressOptions) -> Vec<ImageRef> {
        let handles: Vec<_> = self
            .files
            .iter()
            .cloned()
            .map(|path| {
                tokio::spawn(async move {
                    let result = compress_file(&path, options).await;
                    (path, result)
                })
            })
            .collect();

        let mut images = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok((_, Ok(image))) => images.push(image),
                Ok((path, Err(e))) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Skipping image that could not be processed"
                    );
                }
                Err(e) => warn!(error = %e, "Image task failed"),
            }
        }
        images
    }

    /// The field values plus every gathered image, URLs first.
    async fn collect_fields(&self, options: CompressOptions) -> EventFields {
        let mut images = self.gathered_urls();
        images.extend(self.compressed_files(options).await);
        EventFields {
            category: self.category,
            title: self.title.trim().to_string(),
            date: self.date,
            description: self.description.clone(),
            images,
        }
    }

    /// Process images, then create or update the action.
    ///
    /// On success the form is reset to create mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository rejects the fields or the edit
    /// target no longer exists. The form keeps its values in that case.
    pub async fn submit(
        &mut self,
        repo: &mut EventRepository,
        options: CompressOptions,
    ) -> Result<SubmitOutcome> {
        let fields = self.collect_fields(options).await;
        let (change, message) = match self.mode {
            FormMode::Create => (repo.create(fields)?, CREATED_MESSAGE),
            FormMode::Edit(id) => (repo.update(id, fields)?, UPDATED_MESSAGE),
        };
        self.reset();
        Ok(SubmitOutcome { message, change })
    }
}
