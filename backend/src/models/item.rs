//! Geo-located articles and their popularity.

use serde::{Deserialize, Serialize};

crate::define_id_type!(u64, PageId);

/// Log2 popularity transform. Zero views map to zero.
#[inline]
pub fn log_views(views: u64) -> f64 {
    if views == 0 {
        0.0
    } else {
        (views as f64).log2()
    }
}

/// One geo-located article with its trailing-window view count.
///
/// `log_views` is derived from `views` at construction and cannot be set on
/// its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: PageId,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
    views: u64,
    log_views: f64,
}

impl Item {
    pub fn new(id: PageId, title: impl Into<String>, lat: f64, lon: f64, views: u64) -> Self {
        Self {
            id,
            title: title.into(),
            lat,
            lon,
            views,
            log_views: log_views(views),
        }
    }

    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn log_views(&self) -> f64 {
        self.log_views
    }

    /// Flat record form used for snapshots.
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            id: self.id,
            title: self.title.clone(),
            lat: self.lat,
            lon: self.lon,
            views: self.views,
            log_views: self.log_views,
        }
    }
}

/// Flat, serializable form of an [`Item`].
///
/// This is the persisted layout of a collection snapshot:
/// `{id, title, lat, lon, views, log_views}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: PageId,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
    pub views: u64,
    pub log_views: f64,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        item.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_views_zero() {
        assert_eq!(log_views(0), 0.0);
    }

    #[test]
    fn test_log_views_powers_of_two() {
        assert_eq!(log_views(1), 0.0);
        assert_eq!(log_views(4), 2.0);
        assert_eq!(log_views(256), 8.0);
    }

    #[test]
    fn test_item_derives_log_views() {
        let item = Item::new(PageId::new(7), "Brandenburger Tor", 52.5163, 13.3777, 64);
        assert_eq!(item.views(), 64);
        assert_eq!(item.log_views(), 6.0);

        let zero = Item::new(PageId::new(8), "Nowhere", 0.0, 0.0, 0);
        assert_eq!(zero.log_views(), 0.0);
    }

    #[test]
    fn test_record_carries_all_fields() {
        let item = Item::new(PageId::new(3), "Reichstag", 52.5186, 13.3762, 1024);
        let record = item.to_record();
        assert_eq!(record.id, PageId::new(3));
        assert_eq!(record.title, "Reichstag");
        assert_eq!(record.views, 1024);
        assert_eq!(record.log_views, 10.0);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["log_views"], 10.0);
    }
}
