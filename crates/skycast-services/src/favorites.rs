//! Favorite locations: a deduplicated, persisted list of saved cities.
//!
//! The list is loaded once at startup and the full list is written back
//! after every mutation; the last full list wins. Each entry carries the
//! weather snapshot captured at the moment of favoriting.

use serde::{Deserialize, Serialize};
use skycast_weather::{Coordinates, WeatherSample};

use crate::storage::{StorageBackend, StorageError, StorageResult};

/// Storage key the favorites list is persisted under.
const FAVORITES_KEY: &str = "favorites";

/// A saved location with its point-in-time weather snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Deduplication identity: `"{name},{country}"`, exact provider case
    pub key: String,
    pub name: String,
    pub country: String,
    pub coord: Coordinates,
    /// Snapshot captured at favoriting time, not a live reference;
    /// refreshed only by removing and re-adding the favorite.
    pub snapshot: WeatherSample,
}

impl FavoriteEntry {
    /// Capture a favorite from a displayed weather sample.
    pub fn from_sample(sample: &WeatherSample) -> Self {
        Self {
            key: sample.location_key(),
            name: sample.name.clone(),
            country: sample.country.clone(),
            coord: sample.coord,
            snapshot: sample.clone(),
        }
    }
}

/// Persisted favorites list. At most one entry per location key.
pub struct FavoritesStore<S: StorageBackend> {
    storage: S,
    entries: Vec<FavoriteEntry>,
}

impl<S: StorageBackend> FavoritesStore<S> {
    /// Load the favorites list from storage.
    ///
    /// An absent payload yields an empty list. A malformed payload is
    /// logged and discarded, never surfaced as an error.
    ///
    /// # Errors
    /// Returns an error only if the storage read itself fails.
    pub fn load(storage: S) -> StorageResult<Self> {
        let entries = match storage.get(FAVORITES_KEY)? {
            Some(payload) => match serde_json::from_str(&payload) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Discarding malformed favorites payload: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self { storage, entries })
    }

    /// All saved favorites, in insertion order.
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact string match against stored location keys.
    pub fn is_favorite(&self, location_key: &str) -> bool {
        self.entries.iter().any(|e| e.key == location_key)
    }

    /// Append an entry unless its key is already present.
    ///
    /// A duplicate key is a no-op, not an upsert; callers deciding between
    /// add and remove check `is_favorite` first. Persists the full list.
    pub fn add(&mut self, entry: FavoriteEntry) -> StorageResult<()> {
        if self.is_favorite(&entry.key) {
            tracing::debug!("Favorite {} already saved", entry.key);
            return Ok(());
        }

        tracing::debug!("Adding favorite {}", entry.key);
        self.entries.push(entry);
        self.persist()
    }

    /// Remove the entry with the given key; no-op if absent. Persists the
    /// full list.
    pub fn remove(&mut self, location_key: &str) -> StorageResult<()> {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != location_key);
        if self.entries.len() == before {
            return Ok(());
        }

        tracing::debug!("Removed favorite {}", location_key);
        self.persist()
    }

    /// Remove by row position (per-row deletion in a list view);
    /// out-of-range is a silent no-op.
    pub fn remove_at(&mut self, index: usize) -> StorageResult<()> {
        if index >= self.entries.len() {
            tracing::debug!("Ignoring favorite removal at out-of-range index {}", index);
            return Ok(());
        }

        let removed = self.entries.remove(index);
        tracing::debug!("Removed favorite {}", removed.key);
        self.persist()
    }

    /// Toggle the favorite derived from `sample`: add when absent, remove
    /// when present. Returns whether the location is a favorite afterwards.
    pub fn toggle(&mut self, sample: &WeatherSample) -> StorageResult<bool> {
        let key = sample.location_key();
        if self.is_favorite(&key) {
            self.remove(&key)?;
            Ok(false)
        } else {
            self.add(FavoriteEntry::from_sample(sample))?;
            Ok(true)
        }
    }

    fn persist(&self) -> StorageResult<()> {
        let payload = serde_json::to_string(&self.entries)
            .map_err(|e| StorageError::write(e.to_string()))?;
        self.storage.set(FAVORITES_KEY, &payload)?;
        tracing::debug!("Persisted {} favorites", self.entries.len());
        Ok(())
    }
}
