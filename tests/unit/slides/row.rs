use super::*;

#[test]
fn new_table_holds_ten_empty_rows() {
    let table = RowTable::new();
    assert_eq!(table.rows().len(), MAX_ROWS);
    assert!(table.rows().iter().all(|r| !r.is_complete()));
    assert_eq!(table.complete_count(), 0);
}

#[test]
fn completeness_ignores_surrounding_whitespace() {
    assert!(ContentRow::new("Intro", "Welcome").is_complete());
    assert!(!ContentRow::new("   ", "Welcome").is_complete());
    assert!(!ContentRow::new("Intro", "\t\n").is_complete());
    assert!(!ContentRow::default().is_complete());
}

#[test]
fn set_rejects_indexes_past_capacity() {
    let mut table = RowTable::new();
    table.set(9, ContentRow::new("Last", "slot")).unwrap();
    assert!(table.set(10, ContentRow::new("Overflow", "slot")).is_err());
    assert_eq!(table.get(9).unwrap().title, "Last");
}

#[test]
fn from_rows_pads_and_caps() {
    let table = RowTable::from_rows([ContentRow::new("a", "b")]).unwrap();
    assert_eq!(table.rows().len(), MAX_ROWS);
    assert_eq!(table.complete_count(), 1);

    let too_many = (0..11).map(|i| ContentRow::new(format!("t{i}"), "c"));
    assert!(RowTable::from_rows(too_many).is_err());
}

#[test]
fn edits_produce_new_values() {
    let original = ContentRow::new("Intro", "Welcome");
    let edited = original
        .clone()
        .with_title("Opening")
        .with_duration(SlideSeconds::new(45).unwrap());
    assert_eq!(original.title, "Intro");
    assert_eq!(original.duration.get(), 30);
    assert_eq!(edited.title, "Opening");
    assert_eq!(edited.duration.get(), 45);
}

#[test]
fn deserializes_with_default_duration() {
    let row: ContentRow =
        serde_json::from_str(r#"{"title": "Body", "content": "Main point"}"#).unwrap();
    assert_eq!(row.duration.get(), 30);

    let row: ContentRow =
        serde_json::from_str(r#"{"title": "Body", "content": "x", "duration_secs": 60}"#).unwrap();
    assert_eq!(row.duration.get(), 60);

    assert!(
        serde_json::from_str::<ContentRow>(r#"{"title": "a", "content": "b", "duration_secs": 500}"#)
            .is_err()
    );
}
