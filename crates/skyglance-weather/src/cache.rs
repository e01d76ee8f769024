//! Time-stamped key/value cache over an injected storage capability.
//!
//! Entries are stored as `{"data": <payload>, "time": <epoch millis>}` and are
//! considered fresh while `now - time < ttl`. Stale entries are never deleted;
//! they are simply reported as misses.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::WeatherError;

/// Default lifetime of a cached snapshot (10 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_millis(600_000);

const KEY_PREFIX: &str = "weather_";
const GEOLOCATION_KEY: &str = "geo";

/// What a cached snapshot was looked up by.
///
/// Place keys use the raw submitted text, so two spellings that resolve to
/// the same coordinates are cached independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Place(String),
    Geolocation,
}

impl CacheKey {
    pub fn place(text: impl Into<String>) -> Self {
        Self::Place(text.into())
    }

    /// Key under which the entry is written to storage
    pub fn storage_key(&self) -> String {
        match self {
            Self::Place(text) => format!("{KEY_PREFIX}{text}"),
            Self::Geolocation => format!("{KEY_PREFIX}{GEOLOCATION_KEY}"),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// Source of "now" in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Durable string storage the cache writes through
pub trait CacheStorage: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Process-local storage, mostly for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CacheStorage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Longest file name most filesystems accept, in bytes
const MAX_FILE_NAME: usize = 255;

/// Bytes of the encoded key kept in front of the digest for long keys
const LONG_KEY_PREFIX: usize = 64;

/// File name for `key`. Keys carry free user text, so they are percent-encoded;
/// keys whose encoding would overflow a file name are shortened to a prefix
/// plus their SHA-256 digest.
fn entry_file_name(key: &str) -> String {
    let encoded = urlencoding::encode(key);
    if encoded.len() + ".json".len() <= MAX_FILE_NAME {
        return format!("{}.json", encoded);
    }

    // Percent-encoded text is ASCII, so any byte index is a char boundary
    format!(
        "{}-{:x}.json",
        &encoded[..LONG_KEY_PREFIX],
        Sha256::digest(key.as_bytes())
    )
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(entry_file_name(key))
    }
}

impl CacheStorage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn put(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::write(self.entry_path(key), value)
    }
}

/// Stored form of a cached payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub time: i64,
}

impl<T> CacheEntry<T> {
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_millis.saturating_sub(self.time) < ttl_millis
    }
}

#[derive(Clone)]
pub struct WeatherCache {
    storage: Arc<dyn CacheStorage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherCache").field("ttl", &self.ttl).finish()
    }
}

impl WeatherCache {
    pub fn new(storage: Arc<dyn CacheStorage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock), DEFAULT_TTL)
    }

    pub fn with_clock(storage: Arc<dyn CacheStorage>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            storage,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `payload` under `key`, stamped with the current time.
    /// Overwrites any previous entry for the key.
    pub fn put<T: Serialize>(&self, key: &str, payload: &T) -> Result<(), WeatherError> {
        let entry = CacheEntry {
            data: payload,
            time: self.clock.now_millis(),
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| WeatherError::Cache(format!("serialize {}: {}", key, e)))?;
        self.storage
            .put(key, &json)
            .map_err(|e| WeatherError::Cache(format!("write {}: {}", key, e)))?;
        tracing::debug!("Cached entry {}", key);
        Ok(())
    }

    /// Fresh payload for `key`, or `None` when absent, stale, or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read cache entry {}: {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Ignoring malformed cache entry {}: {}", key, e);
                return None;
            }
        };

        if entry.is_fresh(self.clock.now_millis(), self.ttl) {
            Some(entry.data)
        } else {
            tracing::debug!("Cache entry {} is stale", key);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Clock;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that only moves when told to
    #[derive(Debug, Default)]
    pub struct ManualClock(AtomicI64);

    impl ManualClock {
        pub fn at(millis: i64) -> Self {
            Self(AtomicI64::new(millis))
        }

        pub fn advance(&self, millis: i64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }
}
