use crate::domain::model::{Record, ResultRow};
use serde_json::Value;
use std::sync::Arc;

/// Maps a raw dataset record into the shape responders expect. Must be pure.
pub type InputConverter = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Merges a raw dataset record with the collected responder outputs into the
/// row that gets persisted. Must be pure.
pub type OutputConverter = Arc<dyn Fn(&Record, &ResultRow) -> Record + Send + Sync>;

/// Default input converter: the record as a JSON object, unchanged.
pub fn identity_input() -> InputConverter {
    Arc::new(|record| Value::Object(record.data.clone()))
}

/// Default output converter: shallow merge. Responder outputs overwrite
/// input fields on key collision, so a responder named like an input field
/// shadows it. That is the documented policy, not an accident.
pub fn merge_output() -> OutputConverter {
    Arc::new(|record, outputs| {
        let mut data = record.data.clone();
        for (key, value) in outputs {
            data.insert(key.clone(), value.clone());
        }
        Record { data }
    })
}
