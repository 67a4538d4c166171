use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::UserRecord;

/// A snapshot is eligible for startup restore for 1 hour after capture.
pub const FRESHNESS_WINDOW_MS: i64 = 60 * 60 * 1000;

/// Name of the single persisted slot.
const SNAPSHOT_SLOT: &str = "users_data";

/// Timestamped copy of the last successfully fetched user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: Vec<UserRecord>,
    /// Capture time in epoch milliseconds.
    pub timestamp: i64,
}

impl Snapshot {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self::captured_at(users, Utc::now().timestamp_millis())
    }

    pub fn captured_at(users: Vec<UserRecord>, timestamp: i64) -> Self {
        Self { users, timestamp }
    }

    pub fn captured_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// An age that does not fit in an `i64` counts as stale.
    pub fn is_fresh_at(&self, now_ms: i64) -> bool {
        now_ms
            .checked_sub(self.timestamp)
            .is_some_and(|age| age < FRESHNESS_WINDOW_MS)
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now().timestamp_millis())
    }

    pub fn age_display_at(&self, now_ms: i64) -> String {
        let minutes = now_ms.saturating_sub(self.timestamp) / 60_000;
        if minutes < 1 {
            // Also covers clock skew
            "agora mesmo".to_string()
        } else if minutes < 60 {
            format!("{}m atrás", minutes)
        } else if minutes < 1440 {
            format!("{}h atrás", minutes / 60)
        } else {
            format!("{}d atrás", minutes / 1440)
        }
    }

    pub fn age_display(&self) -> String {
        self.age_display_at(Utc::now().timestamp_millis())
    }
}

/// Single-slot snapshot store backed by a JSON file.
///
/// Persistence never fails observably: write errors and unreadable slots are
/// logged and treated as a cache miss.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn slot_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", SNAPSHOT_SLOT))
    }

    fn read(&self) -> Result<Option<Snapshot>> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", SNAPSHOT_SLOT))?;

        let snapshot: Snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", SNAPSHOT_SLOT))?;

        Ok(Some(snapshot))
    }

    fn write(&self, snapshot: &Snapshot) -> Result<()> {
        let contents = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(self.slot_path(), contents)
            .with_context(|| format!("Failed to write cache file: {}", SNAPSHOT_SLOT))?;
        Ok(())
    }

    /// Persisted snapshot, if present and well-formed.
    pub fn load(&self) -> Option<Snapshot> {
        match self.read() {
            Ok(snapshot) => {
                debug!(found = snapshot.is_some(), "Snapshot slot read");
                snapshot
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Ignoring unreadable snapshot");
                None
            }
        }
    }

    /// Overwrite the slot with `snapshot`.
    pub fn save(&self, snapshot: &Snapshot) {
        match self.write(snapshot) {
            Ok(()) => debug!(count = snapshot.users.len(), "Snapshot saved"),
            Err(e) => warn!(error = %format!("{:#}", e), "Failed to save snapshot"),
        }
    }

    /// Remove the slot. A missing slot is not an error.
    pub fn evict(&self) {
        match std::fs::remove_file(self.slot_path()) {
            Ok(()) => debug!("Snapshot evicted"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "Failed to evict snapshot"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
