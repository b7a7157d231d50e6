use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered field map (serde_json is built with `preserve_order`),
/// so inferred column order follows the order fields were produced in.
pub type FieldMap = serde_json::Map<String, Value>;

/// One row of caller-supplied input data, or one merged output row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: FieldMap,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(data) => Some(Self { data }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }
}

impl From<FieldMap> for Record {
    fn from(data: FieldMap) -> Self {
        Self { data }
    }
}

/// Per-record mapping from responder name to that responder's output.
/// Built fresh for every record and discarded after merging.
pub type ResultRow = FieldMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Column with the default title: the uppercased id.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let title = id.to_uppercase();
        Self { id, title }
    }
}

/// Fixed, ordered column list used by the sink for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub columns: Vec<Column>,
}

impl OutputSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Derives the schema from a sample output row: one column per key,
    /// in key order, titled with the uppercased key.
    pub fn infer(sample: &Record) -> Self {
        Self {
            columns: sample.data.keys().map(|id| Column::from_id(id.as_str())).collect(),
        }
    }
}

/// Everything a finished run hands back: the merged rows, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub results: Vec<Record>,
}
