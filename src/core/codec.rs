//! JSON encode/decode for Person records.
//!
//! The wire shape is `{"name": <string>, "age": <integer>}`. Encoding emits the
//! keys in that order; decoding accepts any order and ignores unknown keys.

use crate::core::context::PersistenceContext;
use crate::core::managed::ManagedPerson;
use crate::domain::model::Person;
use crate::domain::ports::RecordStore;
use crate::utils::error::{DecodingError, EncodingError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Indented JSON.
pub fn encode<T: Serialize + ?Sized>(record: &T) -> std::result::Result<String, EncodingError> {
    encode_with(record, true)
}

/// Single-line JSON.
pub fn encode_compact<T: Serialize + ?Sized>(record: &T) -> std::result::Result<String, EncodingError> {
    encode_with(record, false)
}

pub fn encode_with<T: Serialize + ?Sized>(
    record: &T,
    pretty: bool,
) -> std::result::Result<String, EncodingError> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    tracing::debug!("Encoded record ({} bytes)", json.len());
    Ok(json)
}

pub fn decode<T: DeserializeOwned>(text: &str) -> std::result::Result<T, DecodingError> {
    serde_json::from_str(text).map_err(|e| {
        let err = DecodingError::from(e);
        tracing::debug!("Decode failed: {}", err);
        err
    })
}

/// Encodes the row behind `record`. Fails if the row is unknown to `context` or incomplete.
pub fn encode_managed<S: RecordStore>(
    context: &PersistenceContext<S>,
    record: &ManagedPerson,
    pretty: bool,
) -> Result<String> {
    let person = record.to_person(context)?;
    Ok(encode_with(&person, pretty)?)
}

/// Decodes `text` and constructs the result as a pending row in `context`.
///
/// The row only becomes durable once the caller runs `context.save()`. When
/// decoding fails nothing is registered.
pub fn decode_managed<S: RecordStore>(
    text: &str,
    context: &mut PersistenceContext<S>,
) -> Result<ManagedPerson> {
    let person: Person = decode(text)?;
    let record = ManagedPerson::insert(context, &person)?;
    tracing::debug!("Decoded managed record {}", record.id());
    Ok(record)
}
