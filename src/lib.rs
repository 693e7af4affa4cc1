pub mod aggregate;
pub mod db;
pub mod error;
pub mod id;
pub mod import;
pub mod network;
pub mod projection;
pub mod types;

pub use db::Roster;
pub use error::{Result, RosterError};
pub use projection::Projection;
pub use types::{FrequencyEntry, Record, RosterConfig, Value};
