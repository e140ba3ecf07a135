//! Persisted history of visited locations.
//!
//! The history is a flat JSON array of `{label, address, lat, lon, ts}`
//! objects, most-recent-first. Loading is lenient: malformed entries are
//! dropped and any unreadable file yields an empty history. Saving is
//! best-effort: failures are logged and otherwise ignored, the app keeps
//! running with its in-memory list.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::types::{GeoPoint, HistoryEntry};

/// Current local time formatted for history timestamps.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// In-memory history list bound to its backing file.
///
/// Every mutating operation rewrites the file in full; the caller does not
/// need to schedule saves (shutdown still calls [`HistoryStore::save`] once
/// more for good measure).
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Loads the history from `path`, or starts empty if the file is
    /// missing or unparsable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries }
    }

    /// The persisted entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry unless an existing one sits at the same coordinates
    /// (within tolerance). Returns `true` if the list changed.
    pub fn add(&mut self, entry: HistoryEntry) -> bool {
        let point = entry.point();
        if self.entries.iter().any(|e| e.point().approx_eq(&point)) {
            return false;
        }
        self.entries.insert(0, entry);
        self.save();
        true
    }

    /// Removes the entry at `index`, if it exists.
    pub fn remove(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
            self.save();
        }
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
    }

    /// Writes the full list to the backing file, pretty-printed.
    ///
    /// Failures are non-fatal; a warning is logged and the in-memory list
    /// is left untouched.
    pub fn save(&self) {
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    log::warn!("failed to write {}: {err}", self.path.display());
                }
            }
            Err(err) => log::warn!("failed to serialize history: {err}"),
        }
    }
}

/// Reads and normalizes the persisted list. Never fails: an unreadable or
/// unparsable file, or a file that is not a JSON array, yields an empty
/// list, and malformed items are skipped.
fn load_entries(path: &Path) -> Vec<HistoryEntry> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&raw) else {
        return Vec::new();
    };
    items.iter().filter_map(normalize_entry).collect()
}

/// Turns one raw JSON item into a [`HistoryEntry`], filling defaults for
/// missing label/address/timestamp. Items without numeric lat/lon are
/// rejected.
fn normalize_entry(item: &Value) -> Option<HistoryEntry> {
    let obj = item.as_object()?;
    let lat = obj.get("lat")?.as_f64()?;
    let lon = obj.get("lon")?.as_f64()?;

    let address = obj
        .get("address")
        .and_then(Value::as_str)
        .map(str::to_string);
    let label = obj
        .get("label")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match &address {
            Some(addr) => addr.split(',').next().unwrap_or(addr).trim().to_string(),
            None => GeoPoint::new(lat, lon).coord_label(),
        });
    let address = address.unwrap_or_else(|| label.clone());
    let ts = obj
        .get("ts")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(timestamp);

    Some(HistoryEntry {
        label,
        address,
        lat,
        lon,
        ts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(content: &str) -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, content).unwrap();
        let store = HistoryStore::load(&path);
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::load(dir.path().join("nope.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn garbage_file_loads_empty() {
        let (_dir, store) = store_with("{not json");
        assert!(store.is_empty());
    }

    #[test]
    fn non_array_file_loads_empty() {
        let (_dir, store) = store_with(r#"{"lat": 1.0, "lon": 2.0}"#);
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_entry_dropped_without_losing_valid_ones() {
        let (_dir, store) = store_with(
            r#"[
                {"label": "A", "address": "A, street", "lat": 35.7, "lon": 51.4, "ts": "2026-01-01 10:00:00"},
                {"lat": "bad"},
                {"label": "no coords"},
                {"label": "B", "address": "B", "lat": 35.68, "lon": 51.42, "ts": "2026-01-02 10:00:00"}
            ]"#,
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].label, "A");
        assert_eq!(store.entries()[1].label, "B");
    }

    #[test]
    fn defaults_filled_on_load() {
        let (_dir, store) = store_with(
            r#"[
                {"address": "Azadi Tower, Tehran", "lat": 35.6997, "lon": 51.3381},
                {"lat": 1.0, "lon": 2.0}
            ]"#,
        );
        let entries = store.entries();
        assert_eq!(entries[0].label, "Azadi Tower");
        assert!(!entries[0].ts.is_empty());
        assert_eq!(entries[1].label, "1.00000, 2.00000");
        assert_eq!(entries[1].address, entries[1].label);
    }

    #[test]
    fn add_dedups_by_coordinate_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json"));

        let a = HistoryEntry::new("Place", GeoPoint::new(35.6892, 51.3890));
        let b = HistoryEntry::new("Place again", GeoPoint::new(35.689200003, 51.389000003));

        assert!(store.add(a));
        assert!(!store.add(b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_inserts_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json"));

        store.add(HistoryEntry::new("First", GeoPoint::new(1.0, 1.0)));
        store.add(HistoryEntry::new("Second", GeoPoint::new(2.0, 2.0)));

        assert_eq!(store.entries()[0].label, "Second");
        assert_eq!(store.entries()[1].label, "First");
    }

    #[test]
    fn mutations_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut store = HistoryStore::load(&path);
        store.add(HistoryEntry::new("Kept", GeoPoint::new(1.0, 1.0)));
        store.add(HistoryEntry::new("Removed", GeoPoint::new(2.0, 2.0)));
        store.remove(0);

        let reloaded = HistoryStore::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0].label, "Kept");
    }

    #[test]
    fn clear_empties_list_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut store = HistoryStore::load(&path);
        store.add(HistoryEntry::new("A", GeoPoint::new(1.0, 1.0)));
        store.clear();

        assert!(store.is_empty());
        assert!(HistoryStore::load(&path).is_empty());
    }

    #[test]
    fn save_failure_is_swallowed() {
        // Point the store at a path whose parent does not exist.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("history.json");
        let mut store = HistoryStore::load(&path);

        // The write fails, the in-memory entry survives.
        store.add(HistoryEntry::new("A", GeoPoint::new(1.0, 1.0)));
        assert_eq!(store.len(), 1);
    }
}
