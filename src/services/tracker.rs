//! Tracker service for Webworm.
//!
//! Implements `TrackerTrait`: the operations the presentation layer invokes
//! (`fetch_bookmarks`, `insert`, `advance`, `previous`, `remove`, plus
//! `mark_seen` and `check_new`). Each one validates its input and runs one
//! store transaction while holding the database lock, so calls racing on the
//! same bookmark are serialized and listings never see a half-applied change.

use std::fs;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::database::Database;
use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::services::episode_probe::{EpisodeProbe, HttpProbe};
use crate::types::bookmark::{Bookmark, EpisodeStep};
use crate::types::errors::TrackerError;
use crate::types::settings::TrackerConfig;

/// Trait defining the tracker operations.
pub trait TrackerTrait {
    fn fetch_bookmarks(&self) -> Result<Vec<Bookmark>, TrackerError>;
    /// Stores `entry` as given; only `has_new` is reset to `false`.
    fn insert(&self, entry: Bookmark) -> Result<Bookmark, TrackerError>;
    fn advance(&self, name: &str) -> Result<Bookmark, TrackerError>;
    fn previous(&self, name: &str) -> Result<Bookmark, TrackerError>;
    fn remove(&self, name: &str) -> Result<(), TrackerError>;
    /// Clears `has_new` once the viewer has seen the update.
    fn mark_seen(&self, name: &str) -> Result<Bookmark, TrackerError>;
    /// Flags the bookmark as new when its next episode is already online.
    fn check_new(&self, name: &str) -> Result<Bookmark, TrackerError>;
}

/// Tracker owning the bookmark database and the episode probe.
///
/// `Tracker` is `Sync`; share it between threads with `Arc`.
pub struct Tracker {
    db: Mutex<Database>,
    probe: Box<dyn EpisodeProbe>,
}

impl Tracker {
    /// Creates a tracker over an opened database.
    pub fn new(db: Database, probe: Box<dyn EpisodeProbe>) -> Self {
        Self {
            db: Mutex::new(db),
            probe,
        }
    }

    /// Opens the database named by `config` (creating its directory) with an HTTP probe.
    pub fn open(config: &TrackerConfig) -> Result<Self, TrackerError> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    TrackerError::StorageFailure(format!(
                        "failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let db = Database::open_with_timeout(
            &config.database_path,
            Duration::from_millis(config.busy_timeout_ms),
        )?;
        let probe = HttpProbe::new(Duration::from_millis(config.probe_timeout_ms))?;
        info!(path = %config.database_path.display(), "opened bookmark database");
        Ok(Self::new(db, Box::new(probe)))
    }

    /// Runs `f` against the store while holding the database lock.
    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut BookmarkStore<'_>) -> Result<T, TrackerError>,
    ) -> Result<T, TrackerError> {
        let db = self
            .db
            .lock()
            .map_err(|e| TrackerError::StorageFailure(format!("database lock poisoned: {}", e)))?;
        let mut store = BookmarkStore::new(db.connection());
        f(&mut store)
    }

    /// Names are keys and are matched exactly; blank ones are rejected.
    fn validate_name(name: &str) -> Result<&str, TrackerError> {
        if name.trim().is_empty() {
            warn!("rejected empty bookmark name");
            return Err(TrackerError::InvalidInput("name must not be empty".to_string()));
        }
        Ok(name)
    }

    fn validate_entry(entry: Bookmark) -> Result<Bookmark, TrackerError> {
        Self::validate_name(&entry.name)?;
        if entry.url.trim().is_empty() {
            warn!(name = %entry.name, "rejected bookmark without url");
            return Err(TrackerError::InvalidInput("url must not be empty".to_string()));
        }
        if entry.episode < 0 {
            warn!(name = %entry.name, episode = entry.episode, "rejected negative episode");
            return Err(TrackerError::InvalidInput(format!(
                "episode must not be negative, got {}",
                entry.episode
            )));
        }
        Ok(Bookmark {
            has_new: false,
            ..entry
        })
    }
}

impl TrackerTrait for Tracker {
    fn fetch_bookmarks(&self) -> Result<Vec<Bookmark>, TrackerError> {
        self.with_store(|store| store.get_all())
    }

    fn insert(&self, entry: Bookmark) -> Result<Bookmark, TrackerError> {
        let entry = Self::validate_entry(entry)?;
        self.with_store(|store| store.insert(&entry))
    }

    fn advance(&self, name: &str) -> Result<Bookmark, TrackerError> {
        let name = Self::validate_name(name)?;
        self.with_store(|store| store.mutate_episode(name, EpisodeStep::Forward))
    }

    /// At episode zero the counter stays at zero; `has_new` is cleared either way.
    fn previous(&self, name: &str) -> Result<Bookmark, TrackerError> {
        let name = Self::validate_name(name)?;
        self.with_store(|store| store.mutate_episode(name, EpisodeStep::Back))
    }

    fn remove(&self, name: &str) -> Result<(), TrackerError> {
        let name = Self::validate_name(name)?;
        self.with_store(|store| store.remove(name))
    }

    fn mark_seen(&self, name: &str) -> Result<Bookmark, TrackerError> {
        let name = Self::validate_name(name)?;
        self.with_store(|store| store.set_has_new(name, false))
    }

    /// The network request runs without the database lock held, so the flag
    /// is only set if the episode has not moved in the meantime.
    fn check_new(&self, name: &str) -> Result<Bookmark, TrackerError> {
        let name = Self::validate_name(name)?;
        let Some((episode, next_url)) = self.with_store(|store| store.next_episode(name))? else {
            debug!(name, "bookmark url has no episode slot, skipping probe");
            return self.with_store(|store| store.get(name));
        };

        if self.probe.is_available(&next_url)? {
            info!(name, url = %next_url, "next episode available");
            self.with_store(|store| store.mark_new_at(name, episode))
        } else {
            self.with_store(|store| store.get(name))
        }
    }
}
