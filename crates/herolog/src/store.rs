//! In-memory action collection backed by one storage slot.
//!
//! The [`Store`] is the only owner of the collection. It is loaded once at
//! startup and the whole collection is rewritten to the slot on every save.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::{seed_events, Event};
use crate::storage::Storage;

/// Notice shown when the collection no longer fits in the slot.
pub const CAPACITY_WARNING: &str = "⚠️ ATTENTION : Espace de stockage plein!\n\n\
Vous avez trop d'images uploadées. Solutions:\n\n\
1. Utilisez des URLs Imgur au lieu d'uploader des fichiers\n\
2. Supprimez des anciennes actions\n\
3. Exportez vos données (herolog export)\n\n\
La modification en cours n'a pas été enregistrée.";

/// Result of writing the collection to its slot.
///
/// A failed save never rolls back the in-memory collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// The collection was written.
    Saved {
        /// Size of the written document.
        bytes: usize,
    },
    /// The serialized collection is larger than the slot allows.
    CapacityExceeded {
        /// Size of the rejected document.
        bytes: usize,
        /// Configured capacity.
        limit: usize,
        /// Number of actions in memory.
        events: usize,
    },
    /// The write failed for another reason.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl SaveStatus {
    /// Whether the collection reached the slot.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// User-facing notice for this status, if one should be shown.
    #[must_use]
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::CapacityExceeded { .. } => Some(CAPACITY_WARNING),
            _ => None,
        }
    }
}

/// The action collection and the slot it persists to.
#[derive(Debug)]
pub struct Store {
    storage: Storage,
    slot_key: String,
    max_slot_bytes: usize,
    events: Vec<Event>,
}

impl Store {
    /// Load the collection from `slot_key`.
    ///
    /// A missing or malformed slot yields the seed events, which are not
    /// written back until the first save.
    ///
    /// # Errors
    ///
    /// Returns an error only if the slot cannot be read.
    pub fn load(
        storage: Storage,
        slot_key: impl Into<String>,
        max_slot_bytes: usize,
    ) -> Result<Self> {
        let slot_key = slot_key.into();
        let events = match storage.read_slot(&slot_key)? {
            None => {
                debug!("Slot {} is empty, using sample actions", slot_key);
                seed_events()
            }
            Some(raw) => match serde_json::from_str::<Vec<Event>>(&raw) {
                Ok(events) => {
                    debug!("Loaded {} actions from slot {}", events.len(), slot_key);
                    events
                }
                Err(e) => {
                    warn!(slot = %slot_key, error = %e, "Ignoring malformed saved actions");
                    seed_events()
                }
            },
        };

        Ok(Self {
            storage,
            slot_key,
            max_slot_bytes,
            events,
        })
    }

    /// Open the configured database and load the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or read.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        Self::load(
            storage,
            config.storage.slot_key.clone(),
            config.storage.max_slot_bytes,
        )
    }

    /// All actions, in collection order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn events_mut(&mut self) -> &mut Vec<Event> {
        &mut self.events
    }

    /// The underlying slot storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Key of the slot holding the collection.
    #[must_use]
    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Serialize the collection as stored in the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.events)?)
    }

    /// Check that `document` fits in the slot.
    fn check_capacity(&self, document: &str) -> Result<()> {
        if document.len() > self.max_slot_bytes {
            return Err(Error::StorageCapacity {
                bytes: document.len(),
                limit: self.max_slot_bytes,
            });
        }
        Ok(())
    }

    /// File that receives the collection when it cannot reach the slot:
    /// `<database>.recovery.json`, next to the database.
    ///
    /// # Errors
    ///
    /// Returns an error for in-memory storage, which has no location on disk.
    pub fn recovery_path(&self) -> Result<PathBuf> {
        if self.storage.is_in_memory() {
            return Err(Error::internal("in-memory storage has no recovery location"));
        }
        let mut path = self.storage.path().as_os_str().to_owned();
        path.push(".recovery.json");
        Ok(PathBuf::from(path))
    }

    /// Write the in-memory collection to [`Store::recovery_path`] as pretty
    /// JSON, so an unsaved change survives the process.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no recovery location or the file cannot
    /// be written.
    pub fn write_recovery(&self) -> Result<PathBuf> {
        let path = self.recovery_path()?;
        let document = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(&path, document)?;
        warn!(
            path = %path.display(),
            events = self.events.len(),
            "Wrote unsaved actions to recovery file"
        );
        Ok(path)
    }

    /// Write the whole collection to the slot.
    pub fn save(&self) -> SaveStatus {
        let result = self
            .serialize()
            .and_then(|document| self.check_capacity(&document).map(|()| document))
            .and_then(|document| {
                self.storage.write_slot(&self.slot_key, &document)?;
                Ok(document.len())
            });

        match result {
            Ok(bytes) => {
                info!("Saved {} actions ({} bytes)", self.events.len(), bytes);
                SaveStatus::Saved { bytes }
            }
            Err(Error::StorageCapacity { bytes, limit }) => {
                error!(
                    events = self.events.len(),
                    bytes, limit, "Storage slot full, actions kept in memory only"
                );
                SaveStatus::CapacityExceeded {
                    bytes,
                    limit,
                    events: self.events.len(),
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to save actions");
                SaveStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
