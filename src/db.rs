use crate::aggregate;
use crate::error::{Result, RosterError};
use crate::id::IdAllocator;
use crate::types::{FrequencyEntry, Record, RosterConfig, Value};
use std::collections::HashMap;

/// The record store. Holds one sled handle for the process lifetime; every
/// operation validates its inputs, then performs a single logical access
/// against the keyspace. Collections are key prefixes (`collection:id`), so
/// one store can carry several of them.
pub struct Roster {
    db: sled::Db,
    allocator: IdAllocator,
}

impl Roster {
    /// Opens (or creates) a store at `path` with default configuration.
    pub fn open(path: &str) -> Result<Self> {
        Self::with_config(RosterConfig::with_path(path))
    }

    pub fn with_config(config: RosterConfig) -> Result<Self> {
        if config.create_dirs {
            if let Some(parent) = config.db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let db = sled::Config::new()
            .path(&config.db_path)
            .cache_capacity((config.cache_capacity_mb * 1024 * 1024) as u64)
            .flush_every_ms(config.flush_interval_ms)
            .mode(sled::Mode::HighThroughput)
            .open()?;

        Ok(Self {
            db,
            allocator: IdAllocator::new(config.id_length, config.id_max_attempts),
        })
    }

    fn key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }

    fn validate_field(field: &str) -> Result<()> {
        if field.is_empty() {
            return Err(RosterError::InvalidField);
        }
        Ok(())
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        if !self.allocator.is_valid(id) {
            return Err(RosterError::InvalidId);
        }
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<Record> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Whether a record with this id exists in the collection.
    pub fn contains(&self, collection: &str, id: &str) -> Result<bool> {
        Ok(self.db.contains_key(Self::key(collection, id).as_bytes())?)
    }

    /// Fetches the full record with the given id.
    pub fn get_record(&self, collection: &str, id: &str) -> Result<Record> {
        self.validate_id(id)?;
        match self.db.get(Self::key(collection, id).as_bytes())? {
            Some(bytes) => Self::decode(&bytes),
            None => Err(RosterError::RecordNotFound(id.to_string())),
        }
    }

    /// Every record in the collection, in key order.
    pub fn all_records(&self, collection: &str) -> Result<Vec<Record>> {
        let prefix = format!("{}:", collection);
        let mut records = Vec::new();
        for entry in self.db.scan_prefix(prefix.as_bytes()) {
            let (_, bytes) = entry?;
            records.push(Self::decode(&bytes)?);
        }
        Ok(records)
    }

    /// Records whose value at `field` equals `value`, sorted descending by
    /// that field. The sort key is always the queried field itself.
    pub fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record>> {
        Self::validate_field(field)?;
        let mut matches: Vec<Record> = self
            .all_records(collection)?
            .into_iter()
            .filter(|record| record.get(field) == Some(value))
            .collect();
        matches.sort_by(|a, b| b.get(field).cmp(&a.get(field)));
        Ok(matches)
    }

    /// Records that carry `field` at all, regardless of its value. This is
    /// the aggregation input: empty strings still count as present.
    pub fn find_with_field(&self, collection: &str, field: &str) -> Result<Vec<Record>> {
        Self::validate_field(field)?;
        Ok(self
            .all_records(collection)?
            .into_iter()
            .filter(|record| record.data.contains_key(field))
            .collect())
    }

    /// Picks an id not currently present in the collection. Bounded: after
    /// the configured attempt cap the store is considered too dense for the
    /// id space and the allocation fails instead of spinning.
    pub fn allocate_id(&self, collection: &str) -> Result<String> {
        for _ in 0..self.allocator.max_attempts() {
            let candidate = self.allocator.candidate();
            if !self.contains(collection, &candidate)? {
                return Ok(candidate);
            }
        }
        Err(RosterError::WriteError(format!(
            "could not allocate a unique id after {} attempts",
            self.allocator.max_attempts()
        )))
    }

    /// Inserts a record under a caller-chosen id. The write is an atomic
    /// insert-if-absent, so two racing inserts of the same id cannot both
    /// succeed.
    pub fn insert_with_id(
        &self,
        collection: &str,
        id: &str,
        data: HashMap<String, Value>,
    ) -> Result<()> {
        self.validate_id(id)?;
        if data.is_empty() {
            return Err(RosterError::InvalidUserData);
        }
        let record = Record::new(id.to_string(), data);
        let bytes = serde_json::to_vec(&record)?;
        self.db
            .compare_and_swap(
                Self::key(collection, id).as_bytes(),
                None as Option<&[u8]>,
                Some(bytes),
            )?
            .map_err(|_| RosterError::WriteError(format!("id {} already in use", id)))?;
        Ok(())
    }

    /// Inserts a new record, assigning it a fresh id. Returns the id. A lost
    /// race on the insert (another allocation landed the same id first) just
    /// regenerates, up to the attempt cap.
    pub fn insert_record(&self, collection: &str, data: HashMap<String, Value>) -> Result<String> {
        if data.is_empty() {
            return Err(RosterError::InvalidUserData);
        }
        for _ in 0..self.allocator.max_attempts() {
            let id = self.allocator.candidate();
            match self.insert_with_id(collection, &id, data.clone()) {
                Ok(()) => return Ok(id),
                Err(RosterError::WriteError(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(RosterError::WriteError(format!(
            "could not insert with a unique id after {} attempts",
            self.allocator.max_attempts()
        )))
    }

    /// Partial update: sets exactly one field, leaving every other field of
    /// the record as it was. Editing a record that does not exist is an
    /// error, not a silent no-op.
    pub fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<()> {
        Self::validate_field(field)?;
        self.validate_id(id)?;
        match &value {
            Value::Null => return Err(RosterError::InvalidValue),
            Value::String(s) if s.is_empty() => return Err(RosterError::InvalidValue),
            _ => {}
        }

        let mut record = self.get_record(collection, id)?;
        record.data.insert(field.to_string(), value);
        let bytes = serde_json::to_vec(&record)?;
        self.db.insert(Self::key(collection, id).as_bytes(), bytes)?;
        Ok(())
    }

    /// Removes the record with the given id.
    pub fn delete_record(&self, collection: &str, id: &str) -> Result<()> {
        self.validate_id(id)?;
        match self.db.remove(Self::key(collection, id).as_bytes())? {
            Some(_) => Ok(()),
            None => Err(RosterError::RecordNotFound(id.to_string())),
        }
    }

    /// Frequency report for `field` across the collection: every distinct
    /// value mapped to its count and share of the matched population. Fails
    /// with `NoMatchingField` when no record carries the field.
    pub fn field_frequency(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<HashMap<String, FrequencyEntry>> {
        Self::validate_field(field)?;
        let matched = self.find_with_field(collection, field)?;
        if matched.is_empty() {
            return Err(RosterError::NoMatchingField(field.to_string()));
        }
        let values: Vec<Value> = matched
            .into_iter()
            .filter_map(|mut record| record.data.remove(field))
            .collect();
        Ok(aggregate::frequency_report(&values))
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl Drop for Roster {
    fn drop(&mut self) {
        if let Err(e) = self.db.flush() {
            eprintln!("Error flushing store: {}", e);
        }
    }
}
