use crate::db::Roster;
use crate::error::{Result, RosterError};
use crate::network::http_models::json_to_insert_data;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Bulk-loads records from a JSON file containing an array of objects. Each
/// entry gets a freshly allocated id. Inserts run strictly sequentially, one
/// in flight at a time, so a large file cannot flood the store. Returns the
/// number of records inserted.
pub fn populate_from_file<P: AsRef<Path>>(
    db: &Roster,
    collection: &str,
    path: P,
) -> Result<usize> {
    let bytes = std::fs::read(path)?;
    let parsed: JsonValue = serde_json::from_slice(&bytes)?;
    let entries = parsed
        .as_array()
        .ok_or(RosterError::InvalidUserData)?;

    let mut inserted = 0;
    for entry in entries {
        let data = json_to_insert_data(entry.clone())?;
        db.insert_record(collection, data)?;
        inserted += 1;
    }
    println!("Finished inserting {} entries", inserted);
    Ok(inserted)
}
