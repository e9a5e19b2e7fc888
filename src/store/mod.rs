use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Keyed store whose entries expire after a TTL.
///
/// Holds the funnel's only mutable shared state (rate-limit windows and
/// processed webhook events). Implementations must outlive the process and be
/// visible to every instance serving traffic.
pub trait ExpiringStore: Send + Sync {
    /// Read a live entry. Expired entries read as `None`.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    fn put(&self, key: &str, value: &serde_json::Value, ttl: Duration) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Read a live entry and deserialize it.
///
/// An entry that no longer matches `T` is treated as absent.
pub fn get_as<T: DeserializeOwned>(store: &dyn ExpiringStore, key: &str) -> Result<Option<T>> {
    Ok(store
        .get(key)?
        .and_then(|value| serde_json::from_value(value).ok()))
}

/// Serialize and store a value.
pub fn put_as<T: Serialize>(
    store: &dyn ExpiringStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<()> {
    let value = serde_json::to_value(value).context("Failed to serialize store entry")?;
    store.put(key, &value, ttl)
}

/// Get the platform-appropriate store directory for iq-snapshot
pub fn get_store_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("iq-snapshot/store"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/iq-snapshot/store",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Remove every entry in the store directory
pub fn clear_store(path: &std::path::Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove store directory"),
    }
}

/// On-disk envelope: the value plus its absolute expiry (unix seconds)
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    expires_at: i64,
    value: serde_json::Value,
}

/// Disk-persistent store built on cacache.
///
/// Survives restarts and is shared by every process pointing at the same
/// directory.
#[derive(Clone, Debug)]
pub struct DiskStore {
    path: PathBuf,
}

impl DiskStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default platform cache location
    pub fn open_default() -> Self {
        Self::new(get_store_path())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ExpiringStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let bytes = match cacache::read_sync(&self.path, key) {
            Ok(bytes) => bytes,
            Err(cacache::Error::EntryNotFound(..)) => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read store entry '{}'", key))
            }
        };

        let entry: StoredEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Discarding unreadable store entry '{}': {}", key, e);
                return Ok(None);
            }
        };

        if entry.expires_at <= Utc::now().timestamp() {
            // Best-effort cleanup; a failed removal still reads as expired
            let _ = cacache::remove_sync(&self.path, key);
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    fn put(&self, key: &str, value: &serde_json::Value, ttl: Duration) -> Result<()> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let entry = StoredEntry {
            expires_at: Utc::now().timestamp().saturating_add(ttl_secs),
            value: value.clone(),
        };
        let json = serde_json::to_vec(&entry).context("Failed to serialize store entry")?;
        cacache::write_sync(&self.path, key, &json)
            .with_context(|| format!("Failed to write store entry '{}'", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        cacache::remove_sync(&self.path, key)
            .with_context(|| format!("Failed to remove store entry '{}'", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, DiskStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path().join("store"));
        (dir, store)
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_dir, store) = temp_store();
        assert!(store.get("nothing-here").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let (_dir, store) = temp_store();
        store
            .put("k", &json!({"count": 2}), Duration::from_secs(60))
            .unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!({"count": 2})));
    }

    #[test]
    fn test_zero_ttl_reads_as_expired() {
        let (_dir, store) = temp_store();
        store.put("k", &json!(1), Duration::ZERO).unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let (_dir, store) = temp_store();
        store.put("k", &json!(1), Duration::from_secs(60)).unwrap();
        store.put("k", &json!(2), Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_remove() {
        let (_dir, store) = temp_store();
        store.put("k", &json!(1), Duration::from_secs(60)).unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_survives_reopen() {
        let (dir, store) = temp_store();
        store.put("k", &json!("v"), Duration::from_secs(60)).unwrap();
        drop(store);

        let reopened = DiskStore::new(dir.path().join("store"));
        assert_eq!(reopened.get("k").unwrap(), Some(json!("v")));
    }

    #[test]
    fn test_typed_helpers() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Window {
            count: u32,
        }

        let (_dir, store) = temp_store();
        put_as(&store, "w", &Window { count: 3 }, Duration::from_secs(60)).unwrap();
        let window: Option<Window> = get_as(&store, "w").unwrap();
        assert_eq!(window, Some(Window { count: 3 }));

        // Shape mismatch reads as absent
        let wrong: Option<String> = get_as(&store, "w").unwrap();
        assert!(wrong.is_none());
    }

    #[test]
    fn test_clear_store_drops_entries() {
        let (_dir, store) = temp_store();
        store.put("k", &json!(1), Duration::from_secs(60)).unwrap();

        clear_store(store.path()).unwrap();
        assert!(!store.path().exists());
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_clear_store_missing_dir_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(clear_store(&dir.path().join("absent")).is_ok());
    }
}
