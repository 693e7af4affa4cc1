use roster_db::{FrequencyEntry, Roster, RosterConfig, RosterError, Value};
use std::collections::HashMap;

const COLLECTION: &str = "users";

fn test_store() -> (tempfile::TempDir, Roster) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = RosterConfig::with_path(temp_dir.path().join("freq.db"));
    let db = Roster::with_config(config).unwrap();
    (temp_dir, db)
}

fn insert_with_year(db: &Roster, year: i64) {
    let mut data = HashMap::new();
    data.insert("year".to_string(), Value::from(year));
    db.insert_record(COLLECTION, data).unwrap();
}

#[test]
fn year_frequencies_and_percentages() {
    let (_dir, db) = test_store();
    insert_with_year(&db, 2021);
    insert_with_year(&db, 2021);
    insert_with_year(&db, 2022);

    let report = db.field_frequency(COLLECTION, "year").unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(
        report.get("2021"),
        Some(&FrequencyEntry {
            frequency: 2,
            percentage: "66.7%".to_string()
        })
    );
    assert_eq!(
        report.get("2022"),
        Some(&FrequencyEntry {
            frequency: 1,
            percentage: "33.3%".to_string()
        })
    );
}

#[test]
fn absent_field_is_an_error() {
    let (_dir, db) = test_store();
    insert_with_year(&db, 2021);

    let result = db.field_frequency(COLLECTION, "hometown");
    assert!(matches!(result, Err(RosterError::NoMatchingField(_))));
}

#[test]
fn report_covers_only_records_with_the_field() {
    let (_dir, db) = test_store();
    insert_with_year(&db, 2021);

    let mut no_year = HashMap::new();
    no_year.insert("name".to_string(), Value::from("Alan"));
    db.insert_record(COLLECTION, no_year).unwrap();

    // One record matched, so its value is 100% of the matched population,
    // not 50% of the whole collection.
    let report = db.field_frequency(COLLECTION, "year").unwrap();
    assert_eq!(report.get("2021").unwrap().percentage, "100.0%");
}

#[test]
fn empty_string_values_still_counted() {
    let (_dir, db) = test_store();

    let mut blank = HashMap::new();
    blank.insert("minor".to_string(), Value::from(""));
    blank.insert("name".to_string(), Value::from("Ada"));
    db.insert_record(COLLECTION, blank).unwrap();

    let report = db.field_frequency(COLLECTION, "minor").unwrap();
    assert_eq!(report.get("").unwrap().frequency, 1);
}
