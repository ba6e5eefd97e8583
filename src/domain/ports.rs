use crate::domain::entity::StoredRow;
use crate::utils::error::PersistenceError;
use std::path::PathBuf;

/// Read access shared by every Person representation.
pub trait PersonFields {
    fn name(&self) -> String;
    fn age(&self) -> i64;
}

/// Durable storage a persistence context flushes into.
///
/// `write_rows` must be all-or-nothing: on `Err` the store holds exactly what it
/// held before the call. Rows are upserted by id.
pub trait RecordStore {
    fn write_rows(&mut self, rows: &[StoredRow]) -> Result<(), PersistenceError>;
    fn read_rows(&self, entity: &str) -> Result<Vec<StoredRow>, PersistenceError>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn write_rows(&mut self, rows: &[StoredRow]) -> Result<(), PersistenceError> {
        (**self).write_rows(rows)
    }

    fn read_rows(&self, entity: &str) -> Result<Vec<StoredRow>, PersistenceError> {
        (**self).read_rows(entity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// `"memory"` selects the in-memory store; anything else is a file path.
    pub fn parse(value: &str) -> Self {
        if value == "memory" {
            StoreLocation::Memory
        } else {
            StoreLocation::File(PathBuf::from(value))
        }
    }
}

pub trait ConfigProvider {
    fn pretty_output(&self) -> bool;
    fn store_location(&self) -> StoreLocation;
    fn person_name(&self) -> &str;
    fn person_age(&self) -> i64;
}
