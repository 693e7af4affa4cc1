use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid field provided")]
    InvalidField,

    #[error("Invalid ID provided")]
    InvalidId,

    #[error("Invalid value provided")]
    InvalidValue,

    #[error("Invalid user data")]
    InvalidUserData,

    #[error("Entry does not have field {0}")]
    FieldNotFound(String),

    #[error("No entries with ID {0} found")]
    RecordNotFound(String),

    #[error("No entries have field {0}")]
    NoMatchingField(String),

    #[error("Write failed: {0}")]
    WriteError(String),
}

pub type Result<T> = std::result::Result<T, RosterError>;
