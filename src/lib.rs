pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::{toml_config::TomlConfig, Settings};

pub use adapters::store::{open_store, InMemoryStore, JsonFileStore};
pub use crate::core::codec::{decode, decode_managed, encode, encode_compact, encode_managed};
pub use crate::core::context::PersistenceContext;
pub use crate::core::managed::ManagedPerson;
pub use crate::core::showcase::Showcase;
pub use domain::model::{Person, SharedPerson};
pub use utils::error::{DecodingError, EncodingError, PersistenceError, RecordError, Result};
