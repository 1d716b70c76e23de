//! The growing, deduplicated set of articles known to one session.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use super::item::{Item, ItemRecord, PageId};

/// Relative tolerance when comparing a stored `log_views` with the derived one.
const LOG_VIEWS_TOLERANCE: f64 = 1e-9;

/// Reasons a snapshot cannot be turned back into a [`Collection`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SnapshotError {
    #[error("Duplicate page id {0} in snapshot")]
    DuplicateId(PageId),

    #[error("Invalid coordinates for page {id}: lat={lat}, lon={lon}")]
    InvalidCoordinates { id: PageId, lat: f64, lon: f64 },

    #[error("Failed to decode snapshot: {0}")]
    Decode(String),
}

/// Append-only mapping from page id to [`Item`], in insertion order.
///
/// Items are never removed or replaced once inserted. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Vec<Item>,
    index: HashMap<PageId, usize>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: PageId) -> Option<&Item> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Largest `log_views` in the collection, `None` when empty.
    pub fn max_log_views(&self) -> Option<f64> {
        self.items
            .iter()
            .map(Item::log_views)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Copy of this collection with `new_items` appended.
    ///
    /// Items whose id is already known (or repeated within `new_items`) are
    /// skipped, the first occurrence wins.
    pub fn merged(&self, new_items: impl IntoIterator<Item = Item>) -> Collection {
        let mut out = self.clone();
        for item in new_items {
            out.push(item);
        }
        out
    }

    fn push(&mut self, item: Item) -> bool {
        if self.index.contains_key(&item.id) {
            return false;
        }
        self.index.insert(item.id, self.items.len());
        self.items.push(item);
        true
    }

    /// Ordered flat records, the persisted form of a collection.
    pub fn to_records(&self) -> Vec<ItemRecord> {
        self.items.iter().map(Item::to_record).collect()
    }

    /// Rebuild a collection from flat records.
    ///
    /// `log_views` is always re-derived from `views`; a stored value that
    /// disagrees is logged and discarded.
    pub fn from_records(records: Vec<ItemRecord>) -> Result<Self, SnapshotError> {
        let mut collection = Collection::new();
        for record in records {
            if !record.lat.is_finite()
                || !record.lon.is_finite()
                || !(-90.0..=90.0).contains(&record.lat)
                || !(-180.0..=180.0).contains(&record.lon)
            {
                return Err(SnapshotError::InvalidCoordinates {
                    id: record.id,
                    lat: record.lat,
                    lon: record.lon,
                });
            }

            let item = Item::new(record.id, record.title, record.lat, record.lon, record.views);
            let drift = (item.log_views() - record.log_views).abs();
            if !(drift <= LOG_VIEWS_TOLERANCE * item.log_views().max(1.0)) {
                log::warn!(
                    "Snapshot log_views {} for page {} does not match views {}; using {}",
                    record.log_views,
                    item.id,
                    item.views(),
                    item.log_views()
                );
            }

            if !collection.push(item) {
                return Err(SnapshotError::DuplicateId(record.id));
            }
        }
        Ok(collection)
    }

    /// Decode a JSON snapshot (array of flat records).
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let records: Vec<ItemRecord> =
            serde_json::from_str(json).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        Self::from_records(records)
    }

    /// Encode as a JSON snapshot (array of flat records).
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.to_records()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Hex SHA-256 of the JSON snapshot, lets clients detect growth cheaply.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_json().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .items
                .iter()
                .all(|item| other.get(item.id).is_some_and(|o| o == item))
    }
}

impl FromIterator<Item> for Collection {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Collection::new().merged(iter)
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
