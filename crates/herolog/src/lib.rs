//! `herolog` - A local logbook of a hero's actions.
//!
//! Actions (flag captures, arrests and anything else) are kept as one JSON
//! collection in a single SQLite slot, shown as per-category timelines with
//! image carousels and managed through an add/edit form.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod form;
pub mod images;
pub mod logging;
pub mod presentation;
pub mod repository;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{Category, Event, EventFields, EventId, ImageRef};
pub use form::FormController;
pub use logging::init_logging;
pub use repository::{Change, EventRepository};
pub use storage::{Storage, StorageStats};
pub use store::{SaveStatus, Store};
