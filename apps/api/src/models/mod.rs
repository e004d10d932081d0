pub mod application;
pub mod job;
pub mod language;
pub mod organization;
pub mod worker;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a JSON list column. Non-lists decode as empty and malformed
/// elements are skipped, so bad stored data never fails a read.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}
