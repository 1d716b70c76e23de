use super::*;

fn item(id: u64, views: u64) -> Item {
    Item::new(
        PageId::new(id),
        format!("Page {}", id),
        52.5 + id as f64 * 0.001,
        13.4 - id as f64 * 0.001,
        views,
    )
}

#[test]
fn test_empty_collection() {
    let c = Collection::new();
    assert!(c.is_empty());
    assert_eq!(c.max_log_views(), None);
    assert!(c.to_records().is_empty());
}

#[test]
fn test_merged_skips_known_ids() {
    let base: Collection = vec![item(1, 10), item(2, 20)].into_iter().collect();
    let grown = base.merged(vec![item(2, 999), item(3, 30), item(3, 31)]);

    assert_eq!(base.len(), 2);
    assert_eq!(grown.len(), 3);
    assert_eq!(grown.get(PageId::new(2)).unwrap().views(), 20);
    assert_eq!(grown.get(PageId::new(3)).unwrap().views(), 30);
}

#[test]
fn test_merged_preserves_insertion_order() {
    let c: Collection = vec![item(5, 1), item(1, 2), item(9, 3)].into_iter().collect();
    let ids: Vec<u64> = c.iter().map(|i| i.id.value()).collect();
    assert_eq!(ids, vec![5, 1, 9]);
}

#[test]
fn test_max_log_views() {
    let c: Collection = vec![item(1, 0), item(2, 4), item(3, 64)].into_iter().collect();
    assert_eq!(c.max_log_views(), Some(6.0));

    let zeros: Collection = vec![item(1, 0), item(2, 0)].into_iter().collect();
    assert_eq!(zeros.max_log_views(), Some(0.0));
}

#[test]
fn test_round_trip_five_items() {
    let original: Collection = vec![item(1, 0), item(2, 1), item(3, 7), item(4, 256), item(5, 12345)]
        .into_iter()
        .collect();

    let json = original.to_json();
    let restored = Collection::from_json(&json).unwrap();

    assert_eq!(restored, original);
    for it in original.iter() {
        let other = restored.get(it.id).unwrap();
        assert_eq!(other.title, it.title);
        assert_eq!(other.lat, it.lat);
        assert_eq!(other.lon, it.lon);
        assert_eq!(other.views(), it.views());
        assert_eq!(other.log_views(), it.log_views());
    }
}

#[test]
fn test_equality_ignores_order() {
    let a: Collection = vec![item(1, 1), item(2, 2)].into_iter().collect();
    let b: Collection = vec![item(2, 2), item(1, 1)].into_iter().collect();
    assert_eq!(a, b);

    let c: Collection = vec![item(2, 3), item(1, 1)].into_iter().collect();
    assert_ne!(a, c);
}

#[test]
fn test_from_records_rederives_log_views() {
    let mut record = item(1, 256).to_record();
    record.log_views = 3.0;

    let c = Collection::from_records(vec![record]).unwrap();
    assert_eq!(c.get(PageId::new(1)).unwrap().log_views(), 8.0);
}

#[test]
fn test_from_records_rejects_duplicates() {
    let records = vec![item(1, 1).to_record(), item(1, 2).to_record()];
    assert_eq!(
        Collection::from_records(records),
        Err(SnapshotError::DuplicateId(PageId::new(1)))
    );
}

#[test]
fn test_from_records_rejects_bad_coordinates() {
    let mut record = item(4, 1).to_record();
    record.lat = 120.0;
    assert!(matches!(
        Collection::from_records(vec![record]),
        Err(SnapshotError::InvalidCoordinates { .. })
    ));
}

#[test]
fn test_from_json_rejects_negative_views() {
    let json = r#"[{"id": 1, "title": "x", "lat": 0.0, "lon": 0.0, "views": -3, "log_views": 0.0}]"#;
    assert!(matches!(Collection::from_json(json), Err(SnapshotError::Decode(_))));
}

#[test]
fn test_checksum_tracks_content() {
    let a: Collection = vec![item(1, 1)].into_iter().collect();
    let b = a.merged(vec![item(2, 2)]);
    assert_eq!(a.checksum(), a.clone().checksum());
    assert_ne!(a.checksum(), b.checksum());
    assert_eq!(a.checksum().len(), 64);
}
